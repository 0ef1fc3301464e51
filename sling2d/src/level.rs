//! Level configuration for the slingshot game.
//!
//! A [`Level`] is plain serializable data: playfield dimensions, the
//! slingshot position, the block structure, pig placements and the bird
//! roster. The campaign layout ships as the default; hosts can load custom
//! layouts from JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// One bird archetype in the launch rotation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BirdSpec {
    pub name: String,
    pub sprite: String,
    /// Launch-power multiplier applied to the pull displacement.
    pub power: f32,
}

/// One structural block in the stacked structure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockSpec {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub sprite: String,
    pub density: f32,
}

/// One pig placement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PigSpec {
    pub position: Vec2,
    pub health: u32,
}

/// Complete slingshot level description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    /// Playfield size in logical pixels.
    pub width: f32,
    pub height: f32,
    pub gravity: Vec2,
    /// Base of the slingshot posts.
    pub slingshot: Vec2,
    /// How far above the slingshot base the bird anchor sits.
    pub anchor_height: f32,
    pub birds_per_round: u32,
    pub birds: Vec<BirdSpec>,
    pub pig_sprite: String,
    pub blocks: Vec<BlockSpec>,
    pub pigs: Vec<PigSpec>,
}

impl Level {
    /// The point launched birds are anchored to and pulled against.
    pub fn anchor(&self) -> Vec2 {
        self.slingshot - Vec2::new(0.0, self.anchor_height)
    }

    /// Bird archetype for a rotation index (wraps around the roster).
    pub fn bird(&self, index: usize) -> &BirdSpec {
        &self.birds[index % self.birds.len()]
    }

    /// Serialize this level to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a level from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a level from a file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The built-in campaign layout: a 1024x400 playfield with a 3-tier
    /// pyramid of 13 blocks and 4 pigs of increasing difficulty.
    pub fn campaign() -> Self {
        let w = 1024.0;
        let h = 400.0;

        let plank = "assets/game/plank_long.png";
        let block = "assets/game/block.png";

        let plank_at = |x: f32, y: f32, bw: f32, bh: f32, density: f32| BlockSpec {
            position: Vec2::new(x, y),
            width: bw,
            height: bh,
            sprite: plank.to_string(),
            density,
        };
        let block_at = |x: f32, y: f32, bw: f32, bh: f32, density: f32| BlockSpec {
            position: Vec2::new(x, y),
            width: bw,
            height: bh,
            sprite: block.to_string(),
            density,
        };

        let blocks = vec![
            // Heavy foundation planks
            plank_at(600.0, h - 40.0, 120.0, 30.0, 0.01),
            plank_at(720.0, h - 40.0, 120.0, 30.0, 0.01),
            plank_at(840.0, h - 40.0, 120.0, 30.0, 0.01),
            // First tier supports
            block_at(580.0, h - 85.0, 30.0, 70.0, 0.008),
            block_at(660.0, h - 85.0, 30.0, 70.0, 0.008),
            block_at(740.0, h - 85.0, 30.0, 70.0, 0.008),
            block_at(820.0, h - 85.0, 30.0, 70.0, 0.008),
            block_at(900.0, h - 85.0, 30.0, 70.0, 0.008),
            // First tier platform, overlapping for stability
            plank_at(650.0, h - 125.0, 140.0, 25.0, 0.006),
            plank_at(790.0, h - 125.0, 140.0, 25.0, 0.006),
            // Second tier supports
            block_at(680.0, h - 170.0, 25.0, 70.0, 0.005),
            block_at(760.0, h - 170.0, 25.0, 70.0, 0.005),
            // Top platform
            plank_at(720.0, h - 210.0, 80.0, 20.0, 0.003),
        ];

        let pigs = vec![
            PigSpec {
                position: Vec2::new(620.0, h - 75.0),
                health: 2,
            },
            PigSpec {
                position: Vec2::new(820.0, h - 75.0),
                health: 2,
            },
            PigSpec {
                position: Vec2::new(720.0, h - 155.0),
                health: 3,
            },
            PigSpec {
                position: Vec2::new(720.0, h - 235.0),
                health: 3,
            },
        ];

        let birds = vec![
            BirdSpec {
                name: "Red".to_string(),
                sprite: "assets/game/red_bird.png".to_string(),
                power: 1.2,
            },
            BirdSpec {
                name: "Blue".to_string(),
                sprite: "assets/game/blue_bird.png".to_string(),
                power: 1.0,
            },
            BirdSpec {
                name: "Yellow".to_string(),
                sprite: "assets/game/yellow_bird.png".to_string(),
                power: 1.5,
            },
        ];

        Self {
            width: w,
            height: h,
            gravity: Vec2::new(0.0, 150.0),
            slingshot: Vec2::new(150.0, 320.0),
            anchor_height: 80.0,
            birds_per_round: 3,
            birds,
            pig_sprite: "assets/game/pig.png".to_string(),
            blocks,
            pigs,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::campaign()
    }
}
