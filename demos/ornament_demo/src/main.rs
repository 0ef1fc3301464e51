//! Headless run of the ambient ornament scene: the stock roster drops in,
//! a few random extras join, one body gets flicked around with the pointer,
//! and the container is resized mid-run.

use anyhow::Result;
use sling2d::{mascot_roster, MascotSpec, OrnamentScene, SceneConfig, SpriteScene, Vec2};

const DT: f32 = 1.0 / 60.0;

fn simulate(scene: &mut OrnamentScene<SpriteScene>, seconds: f32) {
    let steps = (seconds / DT).ceil() as usize;
    for _ in 0..steps {
        scene.update(DT);
    }
}

fn main() -> Result<()> {
    let mut scene = OrnamentScene::new(SceneConfig::default(), SpriteScene::new(), 1.0);
    scene.start();
    simulate(&mut scene, 1.0);
    println!("Roster settled: {} mascots", scene.mascots().len());

    // A few random extras at varied sizes.
    let roster = mascot_roster();
    for _ in 0..3 {
        let base = &roster[fastrand::usize(..roster.len())];
        let spec = MascotSpec {
            radius: base.radius * (0.8 + 0.4 * fastrand::f32()),
            ..base.clone()
        };
        scene.spawn_mascot(spec);
    }
    simulate(&mut scene, 2.0);
    println!("With extras: {} mascots", scene.mascots().len());

    // Flick one body toward the top-right corner.
    if let Some(&id) = scene.mascots().first() {
        if let Some(pos) = scene.scene_mut().physics().body_position(id) {
            scene.pointer_down(pos);
            scene.pointer_move(Vec2::new(760.0, 40.0));
            simulate(&mut scene, 0.5);
            scene.pointer_up();
        }
    }

    // Shrink the container; walls follow, escapees get swept.
    scene.resize(400.0, 300.0, false);
    simulate(&mut scene, 8.0);
    println!("After resize and sweeps: {} mascots", scene.mascots().len());

    scene.set_visibility(false);
    simulate(&mut scene, 1.0); // no-op while hidden
    scene.set_visibility(true);

    scene.stop();
    println!("Stopped cleanly");
    Ok(())
}
