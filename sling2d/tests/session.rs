//! End-to-end slingshot sessions driven through the public API with real
//! physics stepping.

use sling2d::{Level, SlingshotGame, SpriteScene, Vec2};

const DT: f32 = 1.0 / 60.0;

fn simulate(game: &mut SlingshotGame<SpriteScene>, seconds: f32) {
    let steps = (seconds / DT).ceil() as usize;
    for _ in 0..steps {
        game.update(DT);
    }
}

fn drag_back(game: &mut SlingshotGame<SpriteScene>, pull: Vec2) {
    let bird = game.current_bird().expect("no anchored bird");
    let pos = game.physics().body_position(bird).unwrap();
    game.pointer_down(pos);
    assert!(game.is_dragging());
    game.pointer_move(Level::campaign().anchor() + pull);
    game.pointer_up();
}

#[test]
fn a_full_shot_cycle_spawns_the_next_bird() {
    let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
    game.start();

    let first = game.current_bird().unwrap();
    drag_back(&mut game, Vec2::new(-80.0, 20.0));
    assert!(game.current_bird().is_none());
    assert_eq!(game.state().birds_remaining, 2);

    // The launched bird flies forward while the respawn delay runs.
    simulate(&mut game, 1.0);
    let pos = game.physics().body_position(first).unwrap();
    assert!(pos.x > 200.0);

    // Next bird is anchored after the 3 s delay; the launched one is still
    // in flight (younger than the despawn floor).
    simulate(&mut game, 2.5);
    let second = game.current_bird().expect("next bird never spawned");
    assert_ne!(second, first);
    assert!(game.physics().has_body(first));
}

#[test]
fn a_lofted_shot_despawns_after_leaving_the_playfield() {
    let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
    game.start();

    let bird = game.current_bird().unwrap();
    // Pull hard down-left: the bird sails up-right, far over the structure.
    drag_back(&mut game, Vec2::new(-85.0, 85.0));

    // Well before the despawn floor the bird still exists, wherever it is.
    simulate(&mut game, 4.0);
    assert!(game.physics().has_body(bird));

    // By 7 s it has long left the playfield and must be gone, body and
    // visual both.
    simulate(&mut game, 3.0);
    assert!(!game.physics().has_body(bird));
    assert!(game.visuals().node(bird).is_none());
}

#[test]
fn reset_mid_flight_tears_the_world_down() {
    let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
    game.start();

    drag_back(&mut game, Vec2::new(-80.0, 10.0));
    simulate(&mut game, 1.0);

    game.reset();
    assert!(!game.state().is_running);
    assert_eq!(game.physics().body_count(), 0);
    assert!(game.visuals().is_empty());

    // Updating the idle session does nothing; the cancelled respawn task
    // never resurrects a bird.
    simulate(&mut game, 5.0);
    assert!(game.current_bird().is_none());
    assert_eq!(game.physics().body_count(), 0);
}

#[test]
fn restarting_mid_session_rebuilds_a_fresh_round() {
    let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
    game.start();
    drag_back(&mut game, Vec2::new(-60.0, 30.0));
    simulate(&mut game, 2.0);

    game.start();
    let state = game.state();
    assert!(state.is_running);
    assert_eq!(state.birds_remaining, 3);
    assert_eq!(game.live_pigs(), 4);
    assert!(game.current_bird().is_some());
}

#[test]
fn custom_levels_load_from_json() {
    let level = Level::campaign();
    let json = level.to_json().unwrap();
    let mut trimmed = Level::from_json(&json).unwrap();
    trimmed.pigs.truncate(1);
    trimmed.blocks.truncate(2);

    let mut game = SlingshotGame::new(trimmed, SpriteScene::new());
    game.start();
    assert_eq!(game.live_pigs(), 1);
    // ground + 2 posts + 2 blocks + 1 pig + 1 bird
    assert_eq!(game.physics().body_count(), 7);
}
