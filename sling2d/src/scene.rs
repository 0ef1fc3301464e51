//! Shared adapter for ambient physics scenes.
//!
//! A [`PhysicsScene`] owns one physics world and a fixed-step runner, and
//! handles the chores every decorative scene needs: invisible boundary walls
//! that follow the container size, visibility-driven pause/resume, lazily
//! enabled pointer dragging, and a periodic sweep that removes bodies which
//! escaped the visible area.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::physics::{BodyId, BodyKind, ColliderShape, PhysicsWorld};

/// Boundary wall thickness in pixels.
const WALL_THICKNESS: f32 = 150.0;
/// Walls overlap the container by this much so bodies rest flush with the
/// visible edges.
const WALL_PADDING: f32 = 5.0;
/// Seconds between out-of-bounds sweeps.
const SWEEP_INTERVAL: f64 = 3.0;
/// A body this far beyond any edge is swept.
const SWEEP_MARGIN: f32 = 200.0;
/// Fixed physics timestep, in seconds.
const FIXED_DT: f32 = 1.0 / 60.0;
/// Soft spring pulling a dragged body toward the pointer.
const DRAG_STIFFNESS: f32 = 40.0;
const DRAG_DAMPING: f32 = 8.0;

/// Container configuration for an ambient scene.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity: Vec2::new(0.0, 400.0),
        }
    }
}

/// One physics world with walls, pause state and a sweep loop.
pub struct PhysicsScene {
    physics: PhysicsWorld,
    width: f32,
    height: f32,
    walls: Vec<BodyId>,
    running: bool,
    paused: bool,
    clock: f64,
    accumulator: f32,
    next_sweep: f64,
    drag_enabled: bool,
    dragged: Option<BodyId>,
}

impl PhysicsScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            physics: PhysicsWorld::with_gravity(config.gravity),
            width: config.width,
            height: config.height,
            walls: Vec::new(),
            running: false,
            paused: false,
            clock: 0.0,
            accumulator: 0.0,
            next_sweep: SWEEP_INTERVAL,
            drag_enabled: false,
            dragged: None,
        }
    }

    /// Begin running the scene. Aborts (logged, no error) on a degenerate
    /// container: the feature is decorative, not load-bearing.
    pub fn start(&mut self) {
        if self.width <= 0.0 || self.height <= 0.0 {
            log::warn!(
                "Scene container has degenerate size {}x{}; not starting",
                self.width,
                self.height
            );
            return;
        }
        self.rebuild_walls();
        self.running = true;
        self.paused = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
    }

    /// Page-visibility hook: pause while hidden, resume when shown again.
    pub fn set_visibility(&mut self, visible: bool) {
        if visible {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Tear the scene down completely.
    pub fn stop(&mut self) {
        if let Some(id) = self.dragged.take() {
            self.physics.detach_spring(id);
        }
        self.physics.clear();
        self.walls.clear();
        self.running = false;
        self.paused = false;
        self.clock = 0.0;
        self.accumulator = 0.0;
        self.next_sweep = SWEEP_INTERVAL;
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Track a container size change. Walls are rebuilt to the new size; a
    /// no-change call is skipped unless `force` is set.
    pub fn resize(&mut self, width: f32, height: f32, force: bool) {
        if !force && width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        if self.running {
            self.rebuild_walls();
        }
    }

    /// Advance the scene. Physics steps on a fixed timestep; returns ids of
    /// bodies removed by the out-of-bounds sweep so the owner can drop their
    /// visuals.
    pub fn update(&mut self, dt: f32) -> Vec<BodyId> {
        if !self.running || self.paused {
            return Vec::new();
        }

        self.clock += dt as f64;
        self.accumulator += dt;
        while self.accumulator >= FIXED_DT {
            self.physics.step(FIXED_DT);
            self.accumulator -= FIXED_DT;
        }

        let mut removed = Vec::new();
        while self.clock >= self.next_sweep {
            removed.extend(self.sweep());
            self.next_sweep += SWEEP_INTERVAL;
        }
        removed
    }

    // ------------------------------
    // Pointer dragging
    // ------------------------------

    /// Pointer pressed. The drag machinery is enabled on the first call and
    /// stays enabled for the scene's lifetime.
    pub fn pointer_down(&mut self, position: Vec2) {
        if !self.running {
            return;
        }
        if !self.drag_enabled {
            self.drag_enabled = true;
            log::debug!("Pointer drag enabled");
        }
        if self.dragged.is_some() {
            return;
        }
        if let Some(id) = self.physics.point_query(position) {
            if self.physics.body_kind(id) == Some(BodyKind::Dynamic) {
                self.physics
                    .attach_spring(id, position, DRAG_STIFFNESS, DRAG_DAMPING);
                self.dragged = Some(id);
            }
        }
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        if let Some(id) = self.dragged {
            self.physics.move_spring(id, position);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(id) = self.dragged.take() {
            self.physics.detach_spring(id);
        }
    }

    /// Shared access to the underlying world for populating the scene.
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    // ------------------------------
    // Private helpers
    // ------------------------------

    fn rebuild_walls(&mut self) {
        for id in self.walls.drain(..) {
            self.physics.remove_body(id);
        }

        let offset = WALL_THICKNESS / 2.0 - WALL_PADDING;
        let (w, h) = (self.width, self.height);
        let half_t = WALL_THICKNESS / 2.0;

        let specs = [
            // top, bottom, left, right
            (Vec2::new(w / 2.0, -offset), w / 2.0, half_t),
            (Vec2::new(w / 2.0, h + offset), w / 2.0, half_t),
            (Vec2::new(-offset, h / 2.0), half_t, h / 2.0),
            (Vec2::new(w + offset, h / 2.0), half_t, h / 2.0),
        ];

        for (position, hx, hy) in specs {
            let id = self.physics.create_body(BodyKind::Fixed, position);
            // Wall creation cannot fail for a body we just made.
            let _ = self
                .physics
                .add_collider_with_material(id, ColliderShape::Box { hx, hy }, 1.0, 0.8, 0.1);
            self.walls.push(id);
        }
    }

    fn sweep(&mut self) -> Vec<BodyId> {
        let mut removed = Vec::new();
        for id in self.physics.body_ids() {
            if self.physics.body_kind(id) == Some(BodyKind::Fixed) {
                continue;
            }
            let Some(pos) = self.physics.body_position(id) else {
                continue;
            };
            let out = pos.x < -SWEEP_MARGIN
                || pos.x > self.width + SWEEP_MARGIN
                || pos.y < -SWEEP_MARGIN
                || pos.y > self.height + SWEEP_MARGIN;
            if out {
                log::debug!("Sweeping out-of-bounds body {:?} at {:?}", id, pos);
                self.physics.remove_body(id);
                if self.dragged == Some(id) {
                    self.dragged = None;
                }
                removed.push(id);
            }
        }
        removed
    }
}
