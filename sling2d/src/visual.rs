use std::collections::HashMap;

use crate::effects::ImpactEffect;
use crate::math::{Transform2D, Vec2};
use crate::physics::BodyId;

/// Color band for a health indicator, derived from the remaining fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthBand {
    Green,
    Yellow,
    Red,
}

impl HealthBand {
    /// Band for a health fraction in `[0, 1]`: above 66% green, above 33%
    /// yellow, otherwise red.
    pub fn for_fraction(fraction: f32) -> Self {
        if fraction > 0.66 {
            HealthBand::Green
        } else if fraction > 0.33 {
            HealthBand::Yellow
        } else {
            HealthBand::Red
        }
    }
}

/// Description of a sprite node to create for a body.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteDesc {
    /// Asset path resolved by the host.
    pub texture: String,
    /// On-screen size in playfield pixels.
    pub size: Vec2,
}

impl SpriteDesc {
    pub fn new(texture: impl Into<String>, size: Vec2) -> Self {
        Self {
            texture: texture.into(),
            size,
        }
    }
}

/// Keeps on-screen proxies in sync with physics bodies.
///
/// The game core calls this once per displayable frame for every live body,
/// plus edge-triggered calls for damage feedback. Implementations map ids to
/// retained scene nodes; the core never touches a UI stack directly.
pub trait VisualSync {
    /// Create the proxy for a body.
    fn spawn(&mut self, id: BodyId, desc: SpriteDesc);

    /// Copy a body transform to its proxy.
    fn set_transform(&mut self, id: BodyId, transform: Transform2D);

    /// Update a health indicator. `None` removes the indicator.
    fn set_health(&mut self, id: BodyId, fraction: Option<f32>);

    /// Toggle the brief damage flash on a proxy.
    fn set_flash(&mut self, id: BodyId, on: bool);

    /// Start the shrink/rotate/fade-out destruction transition.
    fn begin_destroy(&mut self, id: BodyId);

    /// Remove the proxy (and any indicator) entirely.
    fn despawn(&mut self, id: BodyId);

    /// Show a transient impact flourish.
    fn spawn_effect(&mut self, effect: &ImpactEffect);

    /// Remove an expired flourish.
    fn expire_effect(&mut self, effect_id: u64);

    /// Remove everything.
    fn clear(&mut self);
}

/// A retained sprite node held by [`SpriteScene`].
#[derive(Clone, Debug)]
pub struct SpriteNode {
    pub desc: SpriteDesc,
    pub transform: Transform2D,
    /// Health fraction plus its color band, if this node has an indicator.
    pub health: Option<(f32, HealthBand)>,
    pub flashing: bool,
    pub destroying: bool,
}

/// Retained-mode [`VisualSync`] implementation.
///
/// Hosts draw from this scene each frame; tests inspect it directly.
#[derive(Default)]
pub struct SpriteScene {
    nodes: HashMap<BodyId, SpriteNode>,
    effects: Vec<ImpactEffect>,
}

impl SpriteScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: BodyId) -> Option<&SpriteNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn effects(&self) -> &[ImpactEffect] {
        &self.effects
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&BodyId, &SpriteNode)> {
        self.nodes.iter()
    }
}

impl VisualSync for SpriteScene {
    fn spawn(&mut self, id: BodyId, desc: SpriteDesc) {
        self.nodes.insert(
            id,
            SpriteNode {
                desc,
                transform: Transform2D::identity(),
                health: None,
                flashing: false,
                destroying: false,
            },
        );
    }

    fn set_transform(&mut self, id: BodyId, transform: Transform2D) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.transform = transform;
        }
    }

    fn set_health(&mut self, id: BodyId, fraction: Option<f32>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.health = fraction.map(|f| (f, HealthBand::for_fraction(f)));
        }
    }

    fn set_flash(&mut self, id: BodyId, on: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flashing = on;
        }
    }

    fn begin_destroy(&mut self, id: BodyId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.destroying = true;
        }
    }

    fn despawn(&mut self, id: BodyId) {
        self.nodes.remove(&id);
    }

    fn spawn_effect(&mut self, effect: &ImpactEffect) {
        self.effects.push(effect.clone());
    }

    fn expire_effect(&mut self, effect_id: u64) {
        self.effects.retain(|e| e.id != effect_id);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.effects.clear();
    }
}
