use crate::math::Vec2;

/// How long a spawned effect stays visible, in seconds.
pub const EFFECT_LIFETIME: f64 = 1.0;

/// Flavor of a transient impact flourish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Hit,
    Destroy,
    Bounce,
}

/// Ephemeral marker for a transient visual flourish. Self-expires after
/// [`EFFECT_LIFETIME`]; never persisted.
#[derive(Clone, Debug)]
pub struct ImpactEffect {
    pub id: u64,
    pub position: Vec2,
    pub kind: EffectKind,
    pub spawned_at: f64,
}

/// Owns the set of live impact effects and their expiry.
#[derive(Default)]
pub struct EffectQueue {
    effects: Vec<ImpactEffect>,
    next_id: u64,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an effect at the given position and return it.
    pub fn spawn(&mut self, position: Vec2, kind: EffectKind, now: f64) -> ImpactEffect {
        let effect = ImpactEffect {
            id: self.next_id,
            position,
            kind,
            spawned_at: now,
        };
        self.next_id += 1;
        self.effects.push(effect.clone());
        effect
    }

    /// Drop effects older than [`EFFECT_LIFETIME`], returning the expired ids.
    pub fn prune(&mut self, now: f64) -> Vec<u64> {
        let mut expired = Vec::new();
        self.effects.retain(|e| {
            if now - e.spawned_at >= EFFECT_LIFETIME {
                expired.push(e.id);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn active(&self) -> &[ImpactEffect] {
        &self.effects
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
