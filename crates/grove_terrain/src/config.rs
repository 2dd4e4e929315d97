use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::map_function::{Displacement, MapFunction};
use crate::mesh_gen::MeshSettings;
use crate::noise_util::NoiseParams;

/// Full description of one terrain generation request.
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    pub mesh: MeshSettings,
    pub noise: NoiseParams,
    /// Noise in [0, 1] is scaled by this before the displacement is added
    pub noise_height_multiplier: f32,
    /// Constant added to every height, e.g. `-max_height / 2` to recentre
    pub height_offset: f32,
    pub displacement: Option<Displacement>,
    pub tree_pool_capacity: usize,
    /// Trees sit this far above (negative: below) the sampled corner height
    pub tree_y_offset: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 523,
            mesh: MeshSettings::default(),
            noise: NoiseParams::default(),
            noise_height_multiplier: 120.0,
            height_offset: 0.0,
            displacement: Some(Displacement::centered(MapFunction::Wave)),
            tree_pool_capacity: 64,
            tree_y_offset: -4.5,
        }
    }
}

impl TerrainConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mesh.width == 0 || self.mesh.depth == 0 {
            return Err(TerrainError::InvalidGridDimensions {
                width: self.mesh.width,
                depth: self.mesh.depth,
            });
        }
        self.noise.validate()?;
        if !self.noise_height_multiplier.is_finite() || !self.height_offset.is_finite() {
            return Err(TerrainError::InvalidConfig("height multiplier and offset must be finite".into()));
        }
        let probability = self.mesh.features.spawn_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(TerrainError::InvalidConfig(format!(
                "spawn probability must be within [0, 1], got {}",
                probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::UvCornerOrder;

    #[test]
    fn test_empty_json_is_default() {
        let config = TerrainConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TerrainConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "seed": 9,
            "mesh": { "width": 16, "depth": 8, "uv_order": "loop",
                      "features": { "spawn_probability": 0.2, "max_count": 10 } },
            "displacement": null
        }"#;
        let config = TerrainConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!((config.mesh.width, config.mesh.depth), (16, 8));
        assert_eq!(config.mesh.uv_order, UvCornerOrder::Loop);
        assert_eq!(config.mesh.features.max_count, Some(10));
        assert!(config.displacement.is_none());
        assert_eq!(config.noise, NoiseParams::default());
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = TerrainConfig::from_json_str(r#"{"mesh": {"depth": 0}}"#);
        assert!(matches!(result, Err(TerrainError::InvalidGridDimensions { depth: 0, .. })));
    }

    #[test]
    fn test_rejects_oversized_atlas() {
        let json = r#"{"mesh": {"atlas": {"tile_count": 16, "tile_size": 2147483648}}}"#;
        assert!(matches!(TerrainConfig::from_json_str(json), Err(TerrainError::Parse(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(TerrainConfig::from_json_str("{ seed: }"), Err(TerrainError::Parse(_))));
    }
}
