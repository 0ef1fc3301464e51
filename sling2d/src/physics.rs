use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::math::Vec2;

// Rapier is a private implementation detail: do NOT re-export it.
use rapier2d::prelude::*;

/// Unique identifier for a body owned by a [`PhysicsWorld`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl BodyId {
    /// Get the underlying integer ID (useful for debugging or keying visuals).
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// Engine-facing rigid body type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Dynamic,
    Kinematic,
    Fixed,
}

/// Engine-facing collider shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ColliderShape {
    Box { hx: f32, hy: f32 },
    Circle { radius: f32 },
}

/// Engine-facing collision event. Uses BodyId only.
#[derive(Clone, Copy, Debug)]
pub enum PhysicsEvent {
    CollisionEnter { a: BodyId, b: BodyId },
    CollisionExit { a: BodyId, b: BodyId },
    TriggerEnter { a: BodyId, b: BodyId },
    TriggerExit { a: BodyId, b: BodyId },
}

/// A compliant spring binding a body to a fixed world point.
///
/// Used for the slingshot anchor and for soft pointer dragging. The spring
/// applies `stiffness * displacement - damping * velocity` as an acceleration
/// each step, so behavior is independent of body mass.
#[derive(Clone, Copy, Debug)]
struct Spring {
    point: Vec2,
    stiffness: f32,
    damping: f32,
}

pub struct PhysicsWorld {
    // --- rapier internals ---
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    // Event channels
    event_recv_collision: crossbeam_channel::Receiver<CollisionEvent>,
    event_recv_contact_force: crossbeam_channel::Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,

    // --- mappings (engine <-> rapier) ---
    id_to_body: HashMap<BodyId, RigidBodyHandle>,
    body_to_id: HashMap<RigidBodyHandle, BodyId>,
    springs: HashMap<BodyId, Spring>,
    next_id: u64,

    gravity: Vec2,

    // Collected engine-facing events for the frame
    pending_events: Vec<PhysicsEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (send_col, recv_col) = crossbeam_channel::unbounded();
        let (send_force, recv_force) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector::new(send_col, send_force);

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),

            event_recv_collision: recv_col,
            event_recv_contact_force: recv_force,
            event_handler,

            id_to_body: HashMap::new(),
            body_to_id: HashMap::new(),
            springs: HashMap::new(),
            next_id: 1,

            gravity: Vec2::new(0.0, 150.0),
            pending_events: Vec::new(),
        }
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut w = Self::new();
        w.gravity = gravity;
        w
    }

    /// Clear all bodies, colliders and springs, keeping only gravity.
    /// Completely rebuilds the physics world for a fresh session.
    pub fn clear(&mut self) {
        let gravity = self.gravity;
        *self = Self::with_gravity(gravity);
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Create a new body and return its id.
    pub fn create_body(&mut self, kind: BodyKind, position: Vec2) -> BodyId {
        let rb_type = match kind {
            BodyKind::Dynamic => rapier2d::prelude::RigidBodyType::Dynamic,
            BodyKind::Kinematic => rapier2d::prelude::RigidBodyType::KinematicPositionBased,
            BodyKind::Fixed => rapier2d::prelude::RigidBodyType::Fixed,
        };

        let mut builder =
            RigidBodyBuilder::new(rb_type).translation(vector![position.x, position.y]);

        // Enable CCD for dynamic bodies to prevent tunneling through thin colliders
        if matches!(kind, BodyKind::Dynamic) {
            builder = builder.ccd_enabled(true);
        }

        let handle = self.rigid_bodies.insert(builder.build());
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.id_to_body.insert(id, handle);
        self.body_to_id.insert(handle, id);
        id
    }

    /// Remove a body (with its colliders and spring). Returns whether one existed.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        self.springs.remove(&id);
        if let Some(handle) = self.id_to_body.remove(&id) {
            self.rigid_bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            self.body_to_id.remove(&handle);
            true
        } else {
            false
        }
    }

    /// Add a solid collider with material properties.
    ///
    /// All solid colliders report collision-start/stop events.
    pub fn add_collider_with_material(
        &mut self,
        id: BodyId,
        shape: ColliderShape,
        density: f32,
        friction: f32,
        restitution: f32,
    ) -> Result<()> {
        let body = self.body_handle(id)?;

        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .density(density)
            .friction(friction)
            .restitution(restitution)
            .sensor(false)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Add a sensor (trigger volume) that reports events but exerts no forces.
    pub fn add_sensor(&mut self, id: BodyId, shape: ColliderShape) -> Result<()> {
        let body = self.body_handle(id)?;

        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Step simulation by fixed dt (seconds). Springs are applied as forces
    /// for this step only.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        let mut forced: Vec<RigidBodyHandle> = Vec::new();
        for (id, spring) in &self.springs {
            let Some(&handle) = self.id_to_body.get(id) else {
                continue;
            };
            let Some(body) = self.rigid_bodies.get_mut(handle) else {
                continue;
            };
            if body.body_type() != rapier2d::prelude::RigidBodyType::Dynamic {
                continue;
            }
            let pos = body.translation();
            let vel = body.linvel();
            let accel_x = (spring.point.x - pos.x) * spring.stiffness - vel.x * spring.damping;
            let accel_y = (spring.point.y - pos.y) * spring.stiffness - vel.y * spring.damping;
            let mass = body.mass();
            body.add_force(vector![accel_x * mass, accel_y * mass], true);
            forced.push(handle);
        }

        let gravity = vector![self.gravity.x, self.gravity.y];
        let hooks = &();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            hooks,
            &self.event_handler,
        );

        for handle in forced {
            if let Some(body) = self.rigid_bodies.get_mut(handle) {
                body.reset_forces(true);
            }
        }

        self.query_pipeline
            .update(&self.island_manager, &self.rigid_bodies, &self.colliders);

        self.collect_events();
    }

    /// Drain physics events collected since the last step.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------
    // Springs (slingshot anchor, pointer drag)
    // ------------------------------

    /// Bind a body to a world point with a compliant spring. Replaces any
    /// existing spring on that body.
    pub fn attach_spring(&mut self, id: BodyId, point: Vec2, stiffness: f32, damping: f32) {
        if self.id_to_body.contains_key(&id) {
            self.springs.insert(
                id,
                Spring {
                    point,
                    stiffness,
                    damping,
                },
            );
        }
    }

    /// Move an existing spring's world point. Returns whether one existed.
    pub fn move_spring(&mut self, id: BodyId, point: Vec2) -> bool {
        if let Some(spring) = self.springs.get_mut(&id) {
            spring.point = point;
            true
        } else {
            false
        }
    }

    /// Remove the spring bound to a body. Returns whether one existed.
    pub fn detach_spring(&mut self, id: BodyId) -> bool {
        self.springs.remove(&id).is_some()
    }

    pub fn has_spring(&self, id: BodyId) -> bool {
        self.springs.contains_key(&id)
    }

    // ------------------------------
    // Per-body queries/actions
    // ------------------------------

    pub fn body_position(&self, id: BodyId) -> Option<Vec2> {
        let b = self.body(id)?;
        let t = b.translation();
        Some(Vec2::new(t.x, t.y))
    }

    pub fn body_rotation(&self, id: BodyId) -> Option<f32> {
        Some(self.body(id)?.rotation().angle())
    }

    pub fn linear_velocity(&self, id: BodyId) -> Option<Vec2> {
        let v = self.body(id)?.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    /// Current speed (magnitude of linear velocity).
    pub fn speed(&self, id: BodyId) -> Option<f32> {
        self.linear_velocity(id).map(|v| v.length())
    }

    pub fn body_kind(&self, id: BodyId) -> Option<BodyKind> {
        match self.body(id)?.body_type() {
            rapier2d::prelude::RigidBodyType::Dynamic => Some(BodyKind::Dynamic),
            rapier2d::prelude::RigidBodyType::KinematicVelocityBased
            | rapier2d::prelude::RigidBodyType::KinematicPositionBased => Some(BodyKind::Kinematic),
            rapier2d::prelude::RigidBodyType::Fixed => Some(BodyKind::Fixed),
        }
    }

    pub fn set_body_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(b) = self.body_mut(id) {
            b.set_translation(vector![pos.x, pos.y], true);
        }
    }

    pub fn set_linear_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(b) = self.body_mut(id) {
            b.set_linvel(vector![vel.x, vel.y], true);
        }
    }

    pub fn set_linear_damping(&mut self, id: BodyId, d: f32) {
        if let Some(b) = self.body_mut(id) {
            b.set_linear_damping(d);
        }
    }

    /// Freeze a body in place (kinematic) or restore it to dynamic.
    ///
    /// A frozen body ignores gravity and springs and moves only via
    /// [`set_body_position`](Self::set_body_position).
    pub fn set_frozen(&mut self, id: BodyId, frozen: bool) {
        if let Some(b) = self.body_mut(id) {
            if frozen {
                b.set_body_type(rapier2d::prelude::RigidBodyType::KinematicPositionBased);
            } else {
                b.set_body_type(rapier2d::prelude::RigidBodyType::Dynamic);
                b.set_linvel(vector![0.0, 0.0], true);
                b.wake_up(true);
            }
        }
    }

    /// Instantaneous velocity change.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(b) = self.body_mut(id) {
            let v = b.linvel();
            b.set_linvel(vector![v.x + impulse.x, v.y + impulse.y], true);
        }
    }

    // ------------------------------
    // Queries (engine-facing)
    // ------------------------------

    /// Find the topmost body whose collider contains the given point.
    pub fn point_query(&self, p: Vec2) -> Option<BodyId> {
        let pt = point![p.x, p.y];
        for (_, c) in self.colliders.iter() {
            if c.shape().contains_point(c.position(), &pt) {
                let body = c.parent()?;
                return self.body_to_id.get(&body).copied();
            }
        }
        None
    }

    /// Ids of all live bodies.
    pub fn body_ids(&self) -> Vec<BodyId> {
        self.id_to_body.keys().copied().collect()
    }

    pub fn has_body(&self, id: BodyId) -> bool {
        self.id_to_body.contains_key(&id)
    }

    pub fn body_count(&self) -> usize {
        self.id_to_body.len()
    }

    // ------------------------------
    // Private helpers
    // ------------------------------

    fn body(&self, id: BodyId) -> Option<&RigidBody> {
        let h = *self.id_to_body.get(&id)?;
        self.rigid_bodies.get(h)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let h = *self.id_to_body.get(&id)?;
        self.rigid_bodies.get_mut(h)
    }

    fn body_handle(&self, id: BodyId) -> Result<RigidBodyHandle> {
        self.id_to_body
            .get(&id)
            .copied()
            .ok_or_else(|| anyhow!("No physics body with id {:?}", id))
    }

    fn collect_events(&mut self) {
        while let Ok(ev) = self.event_recv_collision.try_recv() {
            match ev {
                CollisionEvent::Started(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerEnter { a, b }
                        } else {
                            PhysicsEvent::CollisionEnter { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
                CollisionEvent::Stopped(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerExit { a, b }
                        } else {
                            PhysicsEvent::CollisionExit { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
            }
        }

        // Contact force events are not used by the games; drain so the
        // channel does not grow unbounded.
        while self.event_recv_contact_force.try_recv().is_ok() {}
    }

    fn map_pair(&self, c1: ColliderHandle, c2: ColliderHandle) -> Option<(BodyId, BodyId, bool)> {
        let col1 = self.colliders.get(c1)?;
        let col2 = self.colliders.get(c2)?;
        let b1 = col1.parent()?;
        let b2 = col2.parent()?;
        let a = *self.body_to_id.get(&b1)?;
        let b = *self.body_to_id.get(&b2)?;

        // trigger if either collider is a sensor
        let is_trigger = col1.is_sensor() || col2.is_sensor();
        Some((a, b, is_trigger))
    }
}

fn to_rapier_shape(s: ColliderShape) -> SharedShape {
    match s {
        ColliderShape::Box { hx, hy } => SharedShape::cuboid(hx, hy),
        ColliderShape::Circle { radius } => SharedShape::ball(radius),
    }
}
