//! Sling2D - physics mini-games over a 2D rigid-body engine.
//!
//! Two games ship here: an interactive slingshot game (birds, pigs, a block
//! pyramid) and an ambient ornament scene of decorative tumbling bodies.
//! Rendering is abstracted behind [`VisualSync`]; hosts supply a container
//! size and pointer events and draw from the retained scene.

pub mod effects;
pub mod game;
pub mod level;
pub mod math;
pub mod ornament;
pub mod physics;
pub mod scene;
pub mod tasks;
pub mod textures;
pub mod visual;

pub use crate::effects::{EffectKind, EffectQueue, ImpactEffect};
pub use crate::game::{ElementKind, GameState, SlingshotGame};
pub use crate::level::{BirdSpec, BlockSpec, Level, PigSpec};
pub use crate::math::{Transform2D, Vec2};
pub use crate::ornament::{mascot_roster, MascotSpec, OrnamentScene};
pub use crate::physics::{BodyId, BodyKind, ColliderShape, PhysicsEvent, PhysicsWorld};
pub use crate::scene::{PhysicsScene, SceneConfig};
pub use crate::tasks::Scheduler;
pub use crate::textures::{TextureInfo, TextureStore};
pub use crate::visual::{HealthBand, SpriteDesc, SpriteScene, VisualSync};
