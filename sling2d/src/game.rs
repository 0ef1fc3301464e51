//! The interactive slingshot game session.
//!
//! Owns its physics world directly (unlike the ambient scenes, which share
//! [`PhysicsScene`](crate::scene::PhysicsScene)): the bird lifecycle needs
//! kinematic freezing, spring anchoring and per-contact damage resolution
//! that the decorative adapter deliberately does not expose.

use std::collections::HashMap;

use crate::effects::{EffectKind, EffectQueue};
use crate::level::Level;
use crate::math::{Transform2D, Vec2};
use crate::physics::{BodyId, BodyKind, ColliderShape, PhysicsEvent, PhysicsWorld};
use crate::tasks::Scheduler;
use crate::textures::TextureStore;
use crate::visual::{SpriteDesc, VisualSync};

/// Fixed physics timestep, in seconds.
const FIXED_DT: f32 = 1.0 / 60.0;

const BIRD_RADIUS: f32 = 15.0;
const PIG_RADIUS: f32 = 16.0;

/// Pointer must press within this distance of the bird to begin a drag.
const GRAB_RADIUS: f32 = 50.0;
/// Maximum pull distance from the anchor.
const MAX_PULL: f32 = 120.0;
/// The bird cannot be pushed more than this far forward of the anchor.
const FORWARD_SLACK: f32 = 10.0;
/// Velocity gained per pixel of pull displacement, before the archetype
/// power multiplier.
const LAUNCH_IMPULSE: f32 = 6.0;

/// Spring binding the anchored bird to the launch point.
const ANCHOR_STIFFNESS: f32 = 30.0;
const ANCHOR_DAMPING: f32 = 4.0;

const BIRD_DAMAGE: u32 = 2;
const BLOCK_DAMAGE: u32 = 1;
/// A pig takes block damage at most once per this window.
const BLOCK_DAMAGE_COOLDOWN: f64 = 0.5;
/// Damage flash duration on a pig sprite.
const FLASH_DURATION: f64 = 0.3;

/// Delay between a launch and the next bird (or the end-of-round check).
const RESPAWN_DELAY: f64 = 3.0;
/// Extra delay before the loss check after the final shot.
const END_CHECK_DELAY: f64 = 1.0;
/// Delay between the last pig dying and the victory banner.
const VICTORY_DELAY: f64 = 1.0;

/// A launched bird is never despawned younger than this.
const SETTLE_MIN_AGE: f64 = 5.0;
/// Age at which a bird resting on the floor may be despawned.
const SETTLE_REST_AGE: f64 = 8.0;
/// Below this speed a bird counts as resting.
const REST_SPEED: f32 = 1.0;
/// "At the floor line" means within this distance of the bottom edge.
const FLOOR_MARGIN: f32 = 30.0;
/// Off-screen margins for early (post-5s) despawn.
const OFFSCREEN_RIGHT: f32 = 300.0;
const OFFSCREEN_BELOW: f32 = 200.0;

/// Pig destruction transition timings.
const DESTROY_SPRITE_DELAY: f64 = 0.5;
const DESTROY_INDICATOR_DELAY: f64 = 0.3;

const POST_SPRITE: &str = "assets/game/post.png";
const POST_SIZE: Vec2 = Vec2 { x: 8.0, y: 80.0 };
/// Horizontal offset of each post from the slingshot base.
const POST_SPREAD: f32 = 15.0;

/// Category tag for a game element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Bird,
    Pig,
    Block,
    Slingshot,
}

/// Session progress, the single source of truth for the host's HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub is_running: bool,
    pub birds_remaining: u32,
    pub game_over: bool,
    pub won: bool,
}

#[derive(Clone, Copy, Debug)]
struct PigStatus {
    health: u32,
    max_health: u32,
    last_damage_at: Option<f64>,
}

#[derive(Clone, Copy, Debug)]
struct CurrentBird {
    id: BodyId,
    archetype: usize,
}

#[derive(Clone, Copy, Debug)]
struct LaunchedBird {
    id: BodyId,
    launched_at: f64,
}

/// Delayed session actions. Every delayed step goes through the scheduler
/// so teardown can cancel it.
#[derive(Clone, Copy, Debug)]
enum Task {
    NextBird,
    RoundEndCheck,
    DeclareVictory,
    FlashOff(BodyId),
    DropPigIndicator(BodyId),
    DropPigSprite(BodyId),
}

/// A full slingshot game session.
pub struct SlingshotGame<V: VisualSync> {
    level: Level,
    physics: PhysicsWorld,
    visuals: V,
    textures: TextureStore,

    state: GameState,
    kinds: HashMap<BodyId, ElementKind>,
    pigs: HashMap<BodyId, PigStatus>,
    current: Option<CurrentBird>,
    dragging: bool,
    launched: Vec<LaunchedBird>,
    next_archetype: usize,

    tasks: Scheduler<Task>,
    effects: EffectQueue,
    clock: f64,
    accumulator: f32,
}

impl<V: VisualSync> SlingshotGame<V> {
    pub fn new(level: Level, visuals: V) -> Self {
        let birds_per_round = level.birds_per_round;
        Self {
            level,
            physics: PhysicsWorld::new(),
            visuals,
            textures: TextureStore::new(),
            state: GameState {
                is_running: false,
                birds_remaining: birds_per_round,
                game_over: false,
                won: false,
            },
            kinds: HashMap::new(),
            pigs: HashMap::new(),
            current: None,
            dragging: false,
            launched: Vec::new(),
            next_archetype: 0,
            tasks: Scheduler::new(),
            effects: EffectQueue::new(),
            clock: 0.0,
            accumulator: 0.0,
        }
    }

    // ------------------------------
    // Session lifecycle
    // ------------------------------

    /// Begin a fresh round: tear down whatever came before, rebuild the
    /// world and anchor the first bird.
    pub fn start(&mut self) {
        self.teardown();
        self.state = GameState {
            is_running: true,
            birds_remaining: self.level.birds_per_round,
            game_over: false,
            won: false,
        };
        self.next_archetype = 0;
        self.build_world();
        self.spawn_bird();
    }

    /// Full teardown back to the idle state.
    pub fn reset(&mut self) {
        self.teardown();
        self.state = GameState {
            is_running: false,
            birds_remaining: self.level.birds_per_round,
            game_over: false,
            won: false,
        };
    }

    /// Advance the session. Physics steps on a fixed timestep; contacts,
    /// delayed tasks, bird settling and effect expiry all resolve against the
    /// session clock.
    pub fn update(&mut self, dt: f32) {
        if !self.state.is_running {
            return;
        }
        self.clock += dt as f64;

        self.accumulator += dt;
        while self.accumulator >= FIXED_DT {
            self.physics.step(FIXED_DT);
            self.accumulator -= FIXED_DT;
            let events = self.physics.drain_events();
            for event in events {
                match event {
                    PhysicsEvent::CollisionEnter { a, b } | PhysicsEvent::TriggerEnter { a, b } => {
                        self.resolve_contact(a, b)
                    }
                    _ => {}
                }
            }
        }

        for task in self.tasks.drain_due(self.clock) {
            self.run_task(task);
        }
        self.settle_launched();
        for effect_id in self.effects.prune(self.clock) {
            self.visuals.expire_effect(effect_id);
        }
        self.sync_visuals();
    }

    // ------------------------------
    // Pointer interaction
    // ------------------------------

    /// Pointer pressed. Starts a drag if the press lands near the anchored
    /// bird; anything else is a no-op.
    pub fn pointer_down(&mut self, position: Vec2) {
        if !self.state.is_running || self.state.game_over || self.dragging {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        // Only a bird still bound to the slingshot can be grabbed.
        if !self.physics.has_spring(current.id) {
            return;
        }
        let Some(bird_pos) = self.physics.body_position(current.id) else {
            return;
        };
        if bird_pos.distance(position) < GRAB_RADIUS {
            self.dragging = true;
            self.physics.set_frozen(current.id, true);
        }
    }

    /// Pointer moved. While dragging, the bird tracks the pointer clamped to
    /// the pull radius and never forward of the anchor.
    pub fn pointer_move(&mut self, position: Vec2) {
        if !self.dragging {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        let anchor = self.level.anchor();
        let mut target = anchor + (position - anchor).clamp_length(MAX_PULL);
        if target.x > anchor.x + FORWARD_SLACK {
            target.x = anchor.x + FORWARD_SLACK;
        }
        self.physics.set_body_position(current.id, target);
        // Immediate sync so the sprite never lags the pointer.
        self.visuals
            .set_transform(current.id, Transform2D::new(target, 0.0));
    }

    /// Pointer released: launch.
    pub fn pointer_up(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        let Some(current) = self.current.take() else {
            return;
        };
        let id = current.id;
        let anchor = self.level.anchor();
        let position = self.physics.body_position(id).unwrap_or(anchor);
        let power = self.level.bird(current.archetype).power;

        self.physics.set_frozen(id, false);
        self.physics.detach_spring(id);
        let impulse = (anchor - position) * LAUNCH_IMPULSE * power;
        self.physics.apply_impulse(id, impulse);

        log::debug!(
            "Launched {} bird with impulse {:?}",
            self.level.bird(current.archetype).name,
            impulse
        );

        self.launched.push(LaunchedBird {
            id,
            launched_at: self.clock,
        });
        self.state.birds_remaining = self.state.birds_remaining.saturating_sub(1);
        self.next_archetype = (current.archetype + 1) % self.level.birds.len();
        self.tasks.schedule(self.clock, RESPAWN_DELAY, Task::NextBird);
    }

    // ------------------------------
    // Introspection
    // ------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn live_pigs(&self) -> usize {
        self.pigs.len()
    }

    pub fn pig_ids(&self) -> Vec<BodyId> {
        self.pigs.keys().copied().collect()
    }

    pub fn pig_health(&self, id: BodyId) -> Option<u32> {
        self.pigs.get(&id).map(|p| p.health)
    }

    pub fn current_bird(&self) -> Option<BodyId> {
        self.current.map(|c| c.id)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn active_effects(&self) -> &EffectQueue {
        &self.effects
    }

    // ------------------------------
    // World construction
    // ------------------------------

    fn build_world(&mut self) {
        self.physics.set_gravity(self.level.gravity);
        let w = self.level.width;
        let h = self.level.height;

        // Static ground, thick enough that nothing tunnels through.
        let ground = self.physics.create_body(BodyKind::Fixed, Vec2::new(w / 2.0, h - 10.0));
        let _ = self.physics.add_collider_with_material(
            ground,
            ColliderShape::Box {
                hx: w / 2.0,
                hy: 30.0,
            },
            1.0,
            0.9,
            0.1,
        );

        // Decorative slingshot posts: sensors, so contacts report but never
        // push anything.
        let slingshot = self.level.slingshot;
        for dx in [-POST_SPREAD, POST_SPREAD] {
            let post = self
                .physics
                .create_body(BodyKind::Fixed, slingshot + Vec2::new(dx, 0.0));
            let _ = self.physics.add_sensor(
                post,
                ColliderShape::Box {
                    hx: POST_SIZE.x / 2.0,
                    hy: POST_SIZE.y / 2.0,
                },
            );
            self.kinds.insert(post, ElementKind::Slingshot);
            self.visuals.spawn(post, SpriteDesc::new(POST_SPRITE, POST_SIZE));
            self.visuals
                .set_transform(post, Transform2D::new(slingshot + Vec2::new(dx, 0.0), 0.0));
        }

        let blocks = self.level.blocks.clone();
        for block in blocks {
            let id = self.physics.create_body(BodyKind::Dynamic, block.position);
            let _ = self.physics.add_collider_with_material(
                id,
                ColliderShape::Box {
                    hx: block.width / 2.0,
                    hy: block.height / 2.0,
                },
                block.density,
                1.0,
                0.1,
            );
            self.physics.set_linear_damping(id, 0.5);
            self.kinds.insert(id, ElementKind::Block);
            self.visuals.spawn(
                id,
                SpriteDesc::new(block.sprite, Vec2::new(block.width, block.height)),
            );
            self.visuals
                .set_transform(id, Transform2D::new(block.position, 0.0));
        }

        let pigs = self.level.pigs.clone();
        let pig_sprite = self.level.pig_sprite.clone();
        for pig in pigs {
            let id = self.physics.create_body(BodyKind::Dynamic, pig.position);
            let _ = self.physics.add_collider_with_material(
                id,
                ColliderShape::Circle { radius: PIG_RADIUS },
                0.001,
                0.9,
                0.3,
            );
            self.physics.set_linear_damping(id, 0.3);
            self.kinds.insert(id, ElementKind::Pig);
            self.pigs.insert(
                id,
                PigStatus {
                    health: pig.health,
                    max_health: pig.health,
                    last_damage_at: None,
                },
            );
            let texture = self.textures.load(&pig_sprite);
            let scale = texture.scale_for_diameter(PIG_RADIUS * 2.0, 1.0);
            let size = Vec2::new(
                texture.width as f32 * scale,
                texture.height as f32 * scale,
            );
            self.visuals.spawn(id, SpriteDesc::new(pig_sprite.clone(), size));
            self.visuals
                .set_transform(id, Transform2D::new(pig.position, 0.0));
            self.visuals.set_health(id, Some(1.0));
        }
    }

    /// Anchor a fresh bird above the slingshot. A no-op while another bird
    /// is still undischarged.
    fn spawn_bird(&mut self) {
        if !self.state.is_running || self.state.game_over {
            return;
        }
        if self.current.is_some() {
            log::debug!("Bird already anchored; not spawning another");
            return;
        }

        let archetype = self.next_archetype;
        let spec = self.level.bird(archetype).clone();
        let anchor = self.level.anchor();

        let id = self.physics.create_body(BodyKind::Dynamic, anchor);
        let _ = self.physics.add_collider_with_material(
            id,
            ColliderShape::Circle {
                radius: BIRD_RADIUS,
            },
            0.002,
            0.5,
            0.3,
        );
        self.physics.set_linear_damping(id, 0.2);
        self.physics
            .attach_spring(id, anchor, ANCHOR_STIFFNESS, ANCHOR_DAMPING);

        self.kinds.insert(id, ElementKind::Bird);
        self.current = Some(CurrentBird { id, archetype });

        let texture = self.textures.load(&spec.sprite);
        let scale = texture.scale_for_diameter(BIRD_RADIUS * 2.0, 1.0);
        let size = Vec2::new(texture.width as f32 * scale, texture.height as f32 * scale);
        self.visuals.spawn(id, SpriteDesc::new(spec.sprite, size));
        self.visuals
            .set_transform(id, Transform2D::new(anchor, 0.0));

        log::debug!("Anchored {} bird", spec.name);
    }

    // ------------------------------
    // Contacts and damage
    // ------------------------------

    fn resolve_contact(&mut self, a: BodyId, b: BodyId) {
        let kind_a = self.kinds.get(&a).copied();
        let kind_b = self.kinds.get(&b).copied();

        // Decorative posts never affect gameplay.
        if kind_a == Some(ElementKind::Slingshot) || kind_b == Some(ElementKind::Slingshot) {
            return;
        }

        let (pig_id, attacker) = if kind_a == Some(ElementKind::Pig) {
            (a, kind_b)
        } else if kind_b == Some(ElementKind::Pig) {
            (b, kind_a)
        } else {
            return;
        };

        let damage = match attacker {
            Some(ElementKind::Bird) => BIRD_DAMAGE,
            Some(ElementKind::Block) => BLOCK_DAMAGE,
            _ => 0,
        };
        if damage == 0 {
            return;
        }

        let rate_limited = attacker == Some(ElementKind::Block);
        self.apply_damage(pig_id, damage, rate_limited);
    }

    fn apply_damage(&mut self, pig_id: BodyId, damage: u32, rate_limited: bool) {
        let now = self.clock;
        let Some(pig) = self.pigs.get_mut(&pig_id) else {
            return;
        };
        if rate_limited {
            if let Some(last) = pig.last_damage_at {
                if now - last <= BLOCK_DAMAGE_COOLDOWN {
                    return;
                }
            }
        }

        pig.health = pig.health.saturating_sub(damage);
        pig.last_damage_at = Some(now);
        let fraction = pig.health as f32 / pig.max_health as f32;
        let dead = pig.health == 0;

        self.visuals.set_health(pig_id, Some(fraction));

        let position = self.physics.body_position(pig_id).unwrap_or(Vec2::ZERO);
        let effect = self.effects.spawn(position, EffectKind::Hit, now);
        self.visuals.spawn_effect(&effect);
        self.visuals.set_flash(pig_id, true);
        self.tasks.schedule(now, FLASH_DURATION, Task::FlashOff(pig_id));

        if dead {
            self.destroy_pig(pig_id, position);
        }
    }

    fn destroy_pig(&mut self, pig_id: BodyId, position: Vec2) {
        let effect = self.effects.spawn(position, EffectKind::Destroy, self.clock);
        self.visuals.spawn_effect(&effect);

        // The body and the roster entry go immediately; only the visual
        // transition lingers.
        self.physics.remove_body(pig_id);
        self.pigs.remove(&pig_id);
        self.kinds.remove(&pig_id);

        self.visuals.begin_destroy(pig_id);
        self.tasks
            .schedule(self.clock, DESTROY_INDICATOR_DELAY, Task::DropPigIndicator(pig_id));
        self.tasks
            .schedule(self.clock, DESTROY_SPRITE_DELAY, Task::DropPigSprite(pig_id));

        if self.pigs.is_empty() {
            self.tasks
                .schedule(self.clock, VICTORY_DELAY, Task::DeclareVictory);
        }
    }

    // ------------------------------
    // Delayed tasks and settling
    // ------------------------------

    fn run_task(&mut self, task: Task) {
        match task {
            Task::NextBird => {
                if self.state.game_over {
                    return;
                }
                if self.state.birds_remaining > 0 {
                    self.spawn_bird();
                } else {
                    self.tasks
                        .schedule(self.clock, END_CHECK_DELAY, Task::RoundEndCheck);
                }
            }
            Task::RoundEndCheck => {
                // Loss only if pigs survived; a destruction landing inside
                // the delay window resolves to the pending victory instead.
                if self.state.game_over || self.pigs.is_empty() {
                    return;
                }
                self.state.game_over = true;
                self.state.won = false;
                log::debug!("Round over: {} pigs left standing", self.pigs.len());
            }
            Task::DeclareVictory => {
                if self.state.game_over {
                    return;
                }
                self.state.game_over = true;
                self.state.won = true;
                log::debug!("All pigs destroyed");
            }
            Task::FlashOff(id) => self.visuals.set_flash(id, false),
            Task::DropPigIndicator(id) => self.visuals.set_health(id, None),
            Task::DropPigSprite(id) => self.visuals.despawn(id),
        }
    }

    fn settle_launched(&mut self) {
        let now = self.clock;
        let mut i = 0;
        while i < self.launched.len() {
            let LaunchedBird { id, launched_at } = self.launched[i];
            let age = now - launched_at;
            let Some(position) = self.physics.body_position(id) else {
                self.launched.swap_remove(i);
                continue;
            };
            let speed = self.physics.speed(id).unwrap_or(0.0);
            if should_despawn(age, position, speed, self.level.width, self.level.height) {
                log::debug!(
                    "Despawning settled bird {:?} at {:?} (age {:.1}s, speed {:.2})",
                    id,
                    position,
                    age,
                    speed
                );
                self.physics.remove_body(id);
                self.kinds.remove(&id);
                self.visuals.despawn(id);
                self.launched.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn sync_visuals(&mut self) {
        for (&id, _) in &self.kinds {
            if let (Some(position), Some(rotation)) = (
                self.physics.body_position(id),
                self.physics.body_rotation(id),
            ) {
                self.visuals
                    .set_transform(id, Transform2D::new(position, rotation));
            }
        }
    }

    /// Teardown in dependency order: constraint, bodies, stepping state,
    /// then visuals. Pending tasks are cancelled so nothing stale fires.
    fn teardown(&mut self) {
        if let Some(current) = self.current {
            self.physics.detach_spring(current.id);
        }
        self.physics.clear();
        self.tasks.clear();
        self.effects.clear();
        self.visuals.clear();

        self.kinds.clear();
        self.pigs.clear();
        self.launched.clear();
        self.current = None;
        self.dragging = false;
        self.clock = 0.0;
        self.accumulator = 0.0;
    }

    #[cfg(test)]
    fn tick_clock(&mut self, dt: f64) {
        self.clock += dt;
        for task in self.tasks.drain_due(self.clock) {
            self.run_task(task);
        }
    }
}

/// Despawn policy for launched birds.
///
/// Birds younger than [`SETTLE_MIN_AGE`] always stay so slow arcs finish
/// visually. After that, leaving the playfield by a wide margin is enough;
/// a bird merely resting at the floor must also be past
/// [`SETTLE_REST_AGE`].
fn should_despawn(age: f64, position: Vec2, speed: f32, width: f32, height: f32) -> bool {
    if age < SETTLE_MIN_AGE {
        return false;
    }
    if position.x > width + OFFSCREEN_RIGHT || position.y > height + OFFSCREEN_BELOW {
        return true;
    }
    age >= SETTLE_REST_AGE && speed < REST_SPEED && position.y >= height - FLOOR_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{HealthBand, SpriteScene};

    fn game() -> SlingshotGame<SpriteScene> {
        let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
        game.start();
        game
    }

    fn pig_with_health(game: &SlingshotGame<SpriteScene>, health: u32) -> BodyId {
        game.pig_ids()
            .into_iter()
            .find(|id| game.pig_health(*id) == Some(health))
            .expect("no pig with that health")
    }

    fn block_id(game: &SlingshotGame<SpriteScene>) -> BodyId {
        *game
            .kinds
            .iter()
            .find(|(_, k)| **k == ElementKind::Block)
            .map(|(id, _)| id)
            .expect("no block")
    }

    fn post_id(game: &SlingshotGame<SpriteScene>) -> BodyId {
        *game
            .kinds
            .iter()
            .find(|(_, k)| **k == ElementKind::Slingshot)
            .map(|(id, _)| id)
            .expect("no post")
    }

    fn drag_and_launch(game: &mut SlingshotGame<SpriteScene>) {
        let bird = game.current_bird().expect("no bird to launch");
        let pos = game.physics().body_position(bird).unwrap();
        game.pointer_down(pos);
        assert!(game.is_dragging());
        let anchor = Level::campaign().anchor();
        game.pointer_move(anchor - Vec2::new(80.0, 20.0));
        game.pointer_up();
    }

    #[test]
    fn start_builds_the_full_world() {
        let game = game();
        let state = game.state();
        assert!(state.is_running);
        assert!(!state.game_over);
        assert_eq!(state.birds_remaining, 3);
        assert_eq!(game.live_pigs(), 4);
        assert!(game.current_bird().is_some());

        // ground + 2 posts + 13 blocks + 4 pigs + 1 bird
        assert_eq!(game.physics().body_count(), 21);
        // Everything except the ground has a visual proxy.
        assert_eq!(game.visuals().len(), 20);
    }

    #[test]
    fn health_never_goes_negative_and_pig_is_removed_at_zero() {
        let mut game = game();
        let pig = pig_with_health(&game, 2);
        let bird = game.current_bird().unwrap();

        game.resolve_contact(bird, pig);
        assert_eq!(game.pig_health(pig), None);
        assert_eq!(game.live_pigs(), 3);
        assert!(!game.physics().has_body(pig));
        assert!(game.visuals().node(pig).unwrap().destroying);

        // Further contacts against the destroyed pig are no-ops.
        game.resolve_contact(bird, pig);
        assert_eq!(game.live_pigs(), 3);
    }

    #[test]
    fn block_damage_is_rate_limited_bird_damage_is_not() {
        let mut game = game();
        let pig = pig_with_health(&game, 3);
        let block = block_id(&game);

        game.resolve_contact(block, pig);
        assert_eq!(game.pig_health(pig), Some(2));

        // Within the cooldown window: no-op.
        game.tick_clock(0.4);
        game.resolve_contact(block, pig);
        assert_eq!(game.pig_health(pig), Some(2));

        // Past the window: applies again.
        game.tick_clock(0.2);
        game.resolve_contact(pig, block);
        assert_eq!(game.pig_health(pig), Some(1));

        // Bird damage ignores the cooldown entirely.
        let bird = game.current_bird().unwrap();
        game.resolve_contact(bird, pig);
        assert_eq!(game.pig_health(pig), None);
    }

    #[test]
    fn damage_updates_indicator_band_and_flash() {
        let mut game = game();
        let pig = pig_with_health(&game, 3);
        let block = block_id(&game);

        game.resolve_contact(block, pig);
        let node = game.visuals().node(pig).unwrap();
        let (fraction, band) = node.health.unwrap();
        assert!((fraction - 2.0 / 3.0).abs() < 1e-4);
        assert_eq!(band, HealthBand::Green);
        assert!(node.flashing);
        assert_eq!(game.active_effects().active().len(), 1);

        // Flash reverts after its duration.
        game.tick_clock(0.35);
        assert!(!game.visuals().node(pig).unwrap().flashing);

        game.tick_clock(0.5);
        game.resolve_contact(block, pig);
        let (_, band) = game.visuals().node(pig).unwrap().health.unwrap();
        assert_eq!(band, HealthBand::Yellow);
    }

    #[test]
    fn post_contacts_are_ignored() {
        let mut game = game();
        let pig = pig_with_health(&game, 2);
        let post = post_id(&game);

        game.resolve_contact(post, pig);
        assert_eq!(game.pig_health(pig), Some(2));
        assert!(game.active_effects().active().is_empty());
    }

    #[test]
    fn pig_on_pig_and_unknown_contacts_deal_no_damage() {
        let mut game = game();
        let ids = game.pig_ids();
        game.resolve_contact(ids[0], ids[1]);
        for id in &ids {
            assert!(game.pig_health(*id).is_some());
        }
        assert_eq!(game.live_pigs(), 4);
    }

    #[test]
    fn grab_requires_proximity_and_an_anchored_bird() {
        let mut game = game();
        let anchor = Level::campaign().anchor();

        // Too far away: no drag.
        game.pointer_down(anchor + Vec2::new(200.0, 0.0));
        assert!(!game.is_dragging());

        // Close enough: drag starts and the bird freezes.
        game.pointer_down(anchor + Vec2::new(30.0, 0.0));
        assert!(game.is_dragging());
        let bird = game.current_bird().unwrap();
        assert_eq!(game.physics().body_kind(bird), Some(BodyKind::Kinematic));
    }

    #[test]
    fn drag_is_clamped_to_pull_radius_and_never_forward() {
        let mut game = game();
        let anchor = Level::campaign().anchor();
        let bird = game.current_bird().unwrap();
        game.pointer_down(anchor);

        // Way past the pull radius: clamped to 120 px.
        game.pointer_move(anchor - Vec2::new(500.0, 0.0));
        let pos = game.physics().body_position(bird).unwrap();
        assert!((pos.distance(anchor) - MAX_PULL).abs() < 1e-3);

        // Forward of the anchor: x capped just past it.
        game.pointer_move(anchor + Vec2::new(200.0, 10.0));
        let pos = game.physics().body_position(bird).unwrap();
        assert!((pos.x - (anchor.x + FORWARD_SLACK)).abs() < 1e-3);
    }

    #[test]
    fn launch_detaches_spring_and_schedules_the_next_bird() {
        let mut game = game();
        let bird = game.current_bird().unwrap();

        drag_and_launch(&mut game);
        assert!(game.current_bird().is_none());
        assert!(!game.physics().has_spring(bird));
        assert_eq!(game.state().birds_remaining, 2);
        // Launch impulse points forward (positive x, since we pulled back).
        let vel = game.physics().linear_velocity(bird).unwrap();
        assert!(vel.x > 0.0);

        // Next bird arrives after the respawn delay, cycling archetypes.
        game.tick_clock(2.9);
        assert!(game.current_bird().is_none());
        game.tick_clock(0.2);
        let next = game.current_bird().unwrap();
        assert_ne!(next, bird);
        assert!(game.physics().has_spring(next));
    }

    #[test]
    fn dragging_with_no_current_bird_is_a_no_op() {
        let mut game = game();
        drag_and_launch(&mut game);

        let anchor = Level::campaign().anchor();
        game.pointer_down(anchor);
        assert!(!game.is_dragging());
        game.pointer_move(anchor - Vec2::new(50.0, 0.0));
        game.pointer_up();
        assert_eq!(game.state().birds_remaining, 2);
    }

    #[test]
    fn at_most_one_anchored_bird_exists() {
        let mut game = game();
        let before = game.physics().body_count();
        game.spawn_bird();
        assert_eq!(game.physics().body_count(), before);
    }

    #[test]
    fn despawn_policy_gates() {
        let (w, h) = (1024.0, 400.0);
        let far_right = Vec2::new(w + 400.0, 100.0);
        let resting = Vec2::new(500.0, h - 10.0);
        let mid_air = Vec2::new(500.0, 100.0);

        // Never before the minimum age, no matter what.
        assert!(!should_despawn(4.9, far_right, 0.0, w, h));
        assert!(!should_despawn(1.0, resting, 0.0, w, h));

        // Past the minimum age, off-screen is enough.
        assert!(should_despawn(5.1, far_right, 50.0, w, h));
        assert!(should_despawn(5.1, Vec2::new(500.0, h + 250.0), 50.0, w, h));

        // Resting on the floor needs the longer age gate.
        assert!(!should_despawn(6.0, resting, 0.1, w, h));
        assert!(should_despawn(8.1, resting, 0.1, w, h));

        // Still moving or off the floor: keep it.
        assert!(!should_despawn(8.1, resting, 10.0, w, h));
        assert!(!should_despawn(8.1, mid_air, 0.1, w, h));
    }

    #[test]
    fn victory_fires_only_when_the_last_pig_dies() {
        let mut game = game();
        let bird = game.current_bird().unwrap();

        let pigs = game.pig_ids();
        for (i, pig) in pigs.iter().enumerate() {
            // Two bird contacts destroy any pig (max health 3).
            game.resolve_contact(bird, *pig);
            if game.pig_health(*pig).is_some() {
                game.resolve_contact(bird, *pig);
            }
            if i < pigs.len() - 1 {
                assert!(!game.state().game_over);
            }
        }
        assert_eq!(game.live_pigs(), 0);
        // Not yet: the banner waits out the destruction animation.
        assert!(!game.state().game_over);

        game.tick_clock(1.1);
        let state = game.state();
        assert!(state.game_over);
        assert!(state.won);
        // Victory is independent of birds remaining.
        assert_eq!(state.birds_remaining, 3);
    }

    #[test]
    fn loss_fires_when_birds_run_out_with_pigs_alive() {
        let mut game = game();

        for _ in 0..3 {
            drag_and_launch(&mut game);
            game.tick_clock(3.05);
        }
        assert_eq!(game.state().birds_remaining, 0);
        assert!(!game.state().game_over);

        // End-of-round check lands one second after the respawn window.
        game.tick_clock(1.05);
        let state = game.state();
        assert!(state.game_over);
        assert!(!state.won);
    }

    #[test]
    fn late_destruction_inside_the_loss_window_still_wins() {
        let mut game = game();

        // Clear all pigs but one before spending the birds.
        let bird = game.current_bird().unwrap();
        let pigs = game.pig_ids();
        for pig in &pigs[..3] {
            game.resolve_contact(bird, *pig);
            if game.pig_health(*pig).is_some() {
                game.resolve_contact(bird, *pig);
            }
        }
        // Victory for those three never fired (one pig still alive).
        game.tick_clock(1.5);
        assert!(!game.state().game_over);

        for _ in 0..3 {
            drag_and_launch(&mut game);
            game.tick_clock(3.05);
        }
        assert_eq!(game.state().birds_remaining, 0);

        // The last pig falls inside the end-check delay.
        let last = pigs[3];
        game.resolve_contact(bird, last);
        if game.pig_health(last).is_some() {
            game.resolve_contact(bird, last);
        }
        assert_eq!(game.live_pigs(), 0);

        game.tick_clock(2.0);
        let state = game.state();
        assert!(state.game_over);
        assert!(state.won);
    }

    #[test]
    fn first_hit_destroys_weak_pig_and_later_birds_cannot_touch_it() {
        let mut game = game();
        let pig = pig_with_health(&game, 2);

        for _ in 0..3 {
            let bird = game.current_bird().unwrap();
            game.resolve_contact(bird, pig);
            drag_and_launch(&mut game);
            game.tick_clock(3.05);
        }
        // Destroyed by the first contact; the other two were no-ops.
        assert!(!game.physics().has_body(pig));
        assert_eq!(game.live_pigs(), 3);
    }

    #[test]
    fn pig_destruction_visual_teardown_is_staged() {
        let mut game = game();
        let pig = pig_with_health(&game, 2);
        let bird = game.current_bird().unwrap();

        game.resolve_contact(bird, pig);
        let node = game.visuals().node(pig).unwrap();
        assert!(node.destroying);
        assert!(node.health.is_some());

        // Indicator goes first, sprite after.
        game.tick_clock(0.35);
        let node = game.visuals().node(pig).unwrap();
        assert!(node.health.is_none());

        game.tick_clock(0.2);
        assert!(game.visuals().node(pig).is_none());
    }

    #[test]
    fn reset_cancels_everything() {
        let mut game = game();
        drag_and_launch(&mut game);

        game.reset();
        let state = game.state();
        assert!(!state.is_running);
        assert!(!state.game_over);
        assert_eq!(state.birds_remaining, 3);
        assert_eq!(game.physics().body_count(), 0);
        assert!(game.visuals().is_empty());
        assert_eq!(game.live_pigs(), 0);

        // The pending respawn task must never fire against the torn-down
        // world.
        game.tick_clock(10.0);
        assert!(game.current_bird().is_none());
        assert_eq!(game.physics().body_count(), 0);

        // The session is re-enterable.
        game.start();
        assert!(game.state().is_running);
        assert_eq!(game.live_pigs(), 4);
    }

    #[test]
    fn update_is_inert_while_idle() {
        let mut game = SlingshotGame::new(Level::campaign(), SpriteScene::new());
        game.update(1.0);
        assert!(!game.state().is_running);
        assert_eq!(game.physics().body_count(), 0);
    }

    #[test]
    fn pointer_input_is_ignored_after_game_over() {
        let mut game = game();
        for _ in 0..3 {
            drag_and_launch(&mut game);
            game.tick_clock(3.05);
        }
        game.tick_clock(1.05);
        assert!(game.state().game_over);

        let anchor = Level::campaign().anchor();
        game.pointer_down(anchor);
        assert!(!game.is_dragging());
    }
}
