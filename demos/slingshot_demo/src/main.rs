//! Headless scripted run of the slingshot game: three shots with different
//! pulls, progress printed to stdout.

use anyhow::Result;
use sling2d::{Level, SlingshotGame, SpriteScene, Vec2};

const DT: f32 = 1.0 / 60.0;

fn simulate(game: &mut SlingshotGame<SpriteScene>, seconds: f32) {
    let steps = (seconds / DT).ceil() as usize;
    for _ in 0..steps {
        game.update(DT);
    }
}

fn shoot(game: &mut SlingshotGame<SpriteScene>, pull: Vec2) {
    let Some(bird) = game.current_bird() else {
        println!("  no bird available to launch");
        return;
    };
    let pos = game.physics().body_position(bird).unwrap_or_default();
    game.pointer_down(pos);
    let anchor = Level::campaign().anchor();
    game.pointer_move(anchor + pull);
    game.pointer_up();
    println!(
        "  launched (pull {:?}), birds remaining: {}",
        pull,
        game.state().birds_remaining
    );
}

fn main() -> Result<()> {
    let level = Level::campaign();
    println!(
        "Slingshot demo: {} blocks, {} pigs, {} birds",
        level.blocks.len(),
        level.pigs.len(),
        level.birds_per_round
    );

    let mut game = SlingshotGame::new(level, SpriteScene::new());
    game.start();

    // Let the structure settle before the first shot.
    simulate(&mut game, 1.0);
    println!("World settled, {} pigs alive", game.live_pigs());

    for pull in [
        Vec2::new(-100.0, 10.0),
        Vec2::new(-90.0, 40.0),
        Vec2::new(-110.0, 25.0),
    ] {
        shoot(&mut game, pull);
        // Flight time plus the respawn delay.
        simulate(&mut game, 3.5);
        println!(
            "  {} pigs alive, {} sprites on screen",
            game.live_pigs(),
            game.visuals().len()
        );
    }

    // Run out the clock so the end-of-round check lands.
    simulate(&mut game, 2.0);
    let state = game.state();
    if state.game_over {
        println!(
            "Game over: {}",
            if state.won { "victory!" } else { "pigs survived" }
        );
    } else {
        println!("Session still running");
    }

    game.reset();
    println!("Reset, world empty: {}", game.physics().body_count() == 0);
    Ok(())
}
