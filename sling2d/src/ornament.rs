//! Ambient ornament scene: decorative mascot bodies tumbling inside a
//! container. Purely cosmetic — bodies fall in, can be flicked around with
//! the pointer, and are garbage-collected by the scene sweep if they escape.

use crate::math::{Transform2D, Vec2};
use crate::physics::{BodyId, BodyKind, ColliderShape};
use crate::scene::{PhysicsScene, SceneConfig};
use crate::textures::TextureStore;
use crate::visual::{SpriteDesc, VisualSync};

/// One decorative body in the roster.
#[derive(Clone, Debug)]
pub struct MascotSpec {
    pub sprite: String,
    pub radius: f32,
    /// Extra visual scale on top of the physics diameter.
    pub scale: f32,
}

impl MascotSpec {
    fn new(sprite: &str, radius: f32, scale: f32) -> Self {
        Self {
            sprite: sprite.to_string(),
            radius,
            scale,
        }
    }
}

/// The stock roster: two light bodies spawned immediately, six heavier ones
/// deferred to the first idle tick.
pub fn mascot_roster() -> Vec<MascotSpec> {
    vec![
        MascotSpec::new("assets/mascots/mascot_red.png", 30.0, 2.0),
        MascotSpec::new("assets/mascots/mascot_yellow.png", 27.0, 2.0),
        MascotSpec::new("assets/mascots/mascot_blue_a.png", 18.0, 1.0),
        MascotSpec::new("assets/mascots/mascot_blue_b.png", 18.0, 1.0),
        MascotSpec::new("assets/mascots/mascot_blue_c.png", 18.0, 1.0),
        MascotSpec::new("assets/mascots/mascot_black.png", 54.0, 2.0),
        MascotSpec::new("assets/mascots/mascot_white.png", 51.0, 2.0),
        MascotSpec::new("assets/mascots/mascot_big.png", 72.0, 2.0),
    ]
}

/// How many roster entries spawn immediately at start.
const LIGHT_SET: usize = 2;
/// Spawn height above the container floor.
const SPAWN_HEIGHT: f32 = 150.0;

enum OrnamentTask {
    SpawnDeferred,
}

/// Decorative physics scene with a mascot roster.
pub struct OrnamentScene<V: VisualSync> {
    scene: PhysicsScene,
    visuals: V,
    textures: TextureStore,
    tasks: crate::tasks::Scheduler<OrnamentTask>,
    roster: Vec<MascotSpec>,
    /// Radius multiplier for small viewports (0.6 on narrow screens).
    viewport_scale: f32,
    mascots: Vec<BodyId>,
    clock: f64,
}

impl<V: VisualSync> OrnamentScene<V> {
    pub fn new(config: SceneConfig, visuals: V, viewport_scale: f32) -> Self {
        Self {
            scene: PhysicsScene::new(config),
            visuals,
            textures: TextureStore::new(),
            tasks: crate::tasks::Scheduler::new(),
            roster: mascot_roster(),
            viewport_scale,
            mascots: Vec::new(),
            clock: 0.0,
        }
    }

    /// Replace the stock roster before starting.
    pub fn with_roster(mut self, roster: Vec<MascotSpec>) -> Self {
        self.roster = roster;
        self
    }

    /// Start the scene and drop in the light half of the roster; the heavier
    /// half is deferred to the next update tick.
    pub fn start(&mut self) {
        self.scene.start();
        if !self.scene.is_running() {
            return;
        }
        let light: Vec<MascotSpec> = self.roster.iter().take(LIGHT_SET).cloned().collect();
        for spec in &light {
            self.spawn_mascot(spec.clone());
        }
        self.tasks.schedule(self.clock, 0.0, OrnamentTask::SpawnDeferred);
    }

    /// Advance the scene and keep visuals in sync.
    pub fn update(&mut self, dt: f32) {
        if !self.scene.is_running() || self.scene.is_paused() {
            return;
        }
        self.clock += dt as f64;

        for task in self.tasks.drain_due(self.clock) {
            match task {
                OrnamentTask::SpawnDeferred => {
                    let heavy: Vec<MascotSpec> =
                        self.roster.iter().skip(LIGHT_SET).cloned().collect();
                    for spec in heavy {
                        self.spawn_mascot(spec);
                    }
                }
            }
        }

        for id in self.scene.update(dt) {
            self.visuals.despawn(id);
            self.mascots.retain(|m| *m != id);
        }

        for &id in &self.mascots {
            if let (Some(position), Some(rotation)) = (
                self.scene.physics().body_position(id),
                self.scene.physics().body_rotation(id),
            ) {
                self.visuals
                    .set_transform(id, Transform2D::new(position, rotation));
            }
        }
    }

    /// Drop one mascot into the container at the spawn column.
    pub fn spawn_mascot(&mut self, spec: MascotSpec) -> Option<BodyId> {
        if !self.scene.is_running() {
            return None;
        }
        let (width, height) = self.scene.size();
        let radius = spec.radius * self.viewport_scale;
        let position = Vec2::new(width / 2.0, height - SPAWN_HEIGHT);

        let physics = self.scene.physics_mut();
        let id = physics.create_body(BodyKind::Dynamic, position);
        if physics
            .add_collider_with_material(id, ColliderShape::Circle { radius }, 0.001, 0.3, 0.5)
            .is_err()
        {
            return None;
        }

        let texture = self.textures.load(&spec.sprite);
        let sprite_scale = texture.scale_for_diameter(radius * 2.0, spec.scale);
        let size = Vec2::new(
            texture.width as f32 * sprite_scale,
            texture.height as f32 * sprite_scale,
        );
        self.visuals.spawn(id, SpriteDesc::new(spec.sprite, size));
        self.visuals
            .set_transform(id, Transform2D::new(position, 0.0));

        self.mascots.push(id);
        Some(id)
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.scene.pointer_down(position);
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.scene.pointer_move(position);
    }

    pub fn pointer_up(&mut self) {
        self.scene.pointer_up();
    }

    pub fn resize(&mut self, width: f32, height: f32, force: bool) {
        self.scene.resize(width, height, force);
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.scene.set_visibility(visible);
    }

    /// Full teardown: physics first, then visuals.
    pub fn stop(&mut self) {
        self.scene.stop();
        self.tasks.clear();
        self.mascots.clear();
        self.visuals.clear();
    }

    pub fn mascots(&self) -> &[BodyId] {
        &self.mascots
    }

    pub fn scene_mut(&mut self) -> &mut PhysicsScene {
        &mut self.scene
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }
}
