use serde::{Deserialize, Serialize};

use crate::atlas::AtlasCell;

/// Surface material of one terrain quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Snow,
    Deepslate,
    Grass,
    Dirt,
    Stone,
}

impl Biome {
    /// Only flat grass can host features such as trees
    pub fn is_feature_eligible(self) -> bool {
        matches!(self, Biome::Grass)
    }
}

/// Atlas tile per biome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeCells {
    pub snow: AtlasCell,
    pub deepslate: AtlasCell,
    pub grass: AtlasCell,
    pub dirt: AtlasCell,
    pub stone: AtlasCell,
}

impl Default for BiomeCells {
    fn default() -> Self {
        Self {
            snow: AtlasCell::new(2, 3),
            deepslate: AtlasCell::new(3, 0),
            grass: AtlasCell::new(0, 2),
            dirt: AtlasCell::new(1, 1),
            stone: AtlasCell::new(3, 2),
        }
    }
}

/// Prioritised quad classification, first match wins:
/// snow above `snow_threshold`, deepslate below `deepslate_threshold`,
/// otherwise grass / dirt / stone by local relief.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeRules {
    pub snow_threshold: f32,
    pub deepslate_threshold: f32,
    /// Relief strictly below this is grass
    pub grass_relief: f32,
    /// Relief strictly below this (and not grass) is dirt
    pub dirt_relief: f32,
    pub cells: BiomeCells,
}

impl Default for BiomeRules {
    fn default() -> Self {
        Self {
            snow_threshold: 100.0,
            deepslate_threshold: -40.0,
            grass_relief: 1.5,
            dirt_relief: 4.0,
            cells: BiomeCells::default(),
        }
    }
}

impl BiomeRules {
    /// Higher snow line and deeper deepslate, for terrain with a large height multiplier
    pub fn alpine() -> Self {
        Self {
            snow_threshold: 200.0,
            deepslate_threshold: -50.0,
            ..Self::default()
        }
    }

    pub fn classify(&self, max_y: f32, relief: f32) -> Biome {
        if max_y > self.snow_threshold {
            Biome::Snow
        } else if max_y < self.deepslate_threshold {
            Biome::Deepslate
        } else if relief < self.grass_relief {
            Biome::Grass
        } else if relief < self.dirt_relief {
            Biome::Dirt
        } else {
            Biome::Stone
        }
    }

    pub fn cell(&self, biome: Biome) -> AtlasCell {
        match biome {
            Biome::Snow => self.cells.snow,
            Biome::Deepslate => self.cells.deepslate,
            Biome::Grass => self.cells.grass,
            Biome::Dirt => self.cells.dirt,
            Biome::Stone => self.cells.stone,
        }
    }
}
