use crate::config::TerrainConfig;
use crate::error::Result;
use crate::height::DisplacedHeightfield;
use crate::map_function::{Displacement, MapFunction};
use crate::mesh_gen::{generate_heightfield_mesh, TerrainMesh};
use crate::noise_util::FbmNoise;
use crate::pool::PlacementPool;
use crate::seed::{SeedLayer, WorldSeed};

/// A generated terrain and the tree placements derived from it.
///
/// Every change goes through an explicit call that remeshes the whole grid;
/// nothing is recomputed behind the caller's back. A failed call leaves the
/// previous state untouched.
#[derive(Debug)]
pub struct Terrain {
    config: TerrainConfig,
    noise: FbmNoise,
    mesh: TerrainMesh,
    trees: PlacementPool,
}

impl Terrain {
    pub fn build(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        let noise = FbmNoise::new(WorldSeed::new(config.seed).layer_seed(SeedLayer::Noise), config.noise)?;
        let mesh = generate_mesh(&config, &noise)?;
        let mut trees = PlacementPool::new(config.tree_pool_capacity);
        place_trees(&mut trees, &mesh, config.tree_y_offset);

        log::info!(
            "Built terrain {}x{} (seed {}): {} quads, {} trees",
            config.mesh.width,
            config.mesh.depth,
            config.seed,
            mesh.quad_count(),
            trees.active_count()
        );

        Ok(Self {
            config,
            noise,
            mesh,
            trees,
        })
    }

    /// Full remesh with a new configuration
    pub fn regenerate(&mut self, config: TerrainConfig) -> Result<&TerrainMesh> {
        config.validate()?;

        let noise_seed = WorldSeed::new(config.seed).layer_seed(SeedLayer::Noise);
        let noise = if noise_seed == self.noise.seed() && config.noise == *self.noise.params() {
            self.noise.clone()
        } else {
            FbmNoise::new(noise_seed, config.noise)?
        };
        let mesh = generate_mesh(&config, &noise)?;

        if self.trees.capacity() != config.tree_pool_capacity {
            self.trees = PlacementPool::new(config.tree_pool_capacity);
        }
        place_trees(&mut self.trees, &mesh, config.tree_y_offset);

        log::info!(
            "Regenerated terrain {}x{}: {} feature candidates, {} trees placed",
            config.mesh.width,
            config.mesh.depth,
            mesh.features.len(),
            self.trees.active_count()
        );

        self.config = config;
        self.noise = noise;
        self.mesh = mesh;
        Ok(&self.mesh)
    }

    /// Set A (clamped to the function's range) and remesh; no-op without a displacement
    pub fn set_displacement_a(&mut self, a: f32) -> Result<&TerrainMesh> {
        let mut config = self.config.clone();
        if let Some(displacement) = config.displacement.as_mut() {
            displacement.set_a(a);
        }
        self.regenerate(config)
    }

    pub fn set_displacement_b(&mut self, b: f32) -> Result<&TerrainMesh> {
        let mut config = self.config.clone();
        if let Some(displacement) = config.displacement.as_mut() {
            displacement.set_b(b);
        }
        self.regenerate(config)
    }

    /// Switch map function with A and B at their range centres
    pub fn select_function(&mut self, function: MapFunction) -> Result<&TerrainMesh> {
        let mut config = self.config.clone();
        match config.displacement.as_mut() {
            Some(displacement) => displacement.select(function),
            None => config.displacement = Some(Displacement::centered(function)),
        }
        self.regenerate(config)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn trees(&self) -> &PlacementPool {
        &self.trees
    }

    /// Sampled corner height, `None` off the grid
    pub fn height_at(&self, x: u32, z: u32) -> Option<f32> {
        self.mesh.heightmap.get(x, z)
    }
}

fn generate_mesh(config: &TerrainConfig, noise: &FbmNoise) -> Result<TerrainMesh> {
    let field = DisplacedHeightfield {
        noise,
        noise_height_multiplier: config.noise_height_multiplier,
        offset: config.height_offset,
        displacement: config.displacement,
        width: config.mesh.width,
        depth: config.mesh.depth,
    };
    let mut rng = WorldSeed::new(config.seed).rng(SeedLayer::Features);
    generate_heightfield_mesh(&config.mesh, &field, &mut rng)
}

fn place_trees(pool: &mut PlacementPool, mesh: &TerrainMesh, y_offset: f32) {
    pool.release_all();
    for candidate in &mesh.features {
        if pool.allocate(candidate.world_position(y_offset)).is_none() {
            log::warn!(
                "Tree pool exhausted at {} trees; {} candidates left unplaced",
                pool.capacity(),
                mesh.features.len() - pool.capacity()
            );
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_gen::FeaturePolicy;

    fn small_config() -> TerrainConfig {
        let mut config = TerrainConfig::default();
        config.mesh.width = 24;
        config.mesh.depth = 16;
        config
    }

    #[test]
    fn test_build() {
        let terrain = Terrain::build(small_config()).unwrap();
        assert_eq!(terrain.mesh().quad_count(), 24 * 16);
        assert_eq!(terrain.mesh().mesh.vertex_count(), 4 * 24 * 16);
        assert!(terrain.height_at(24, 16).is_some());
        assert!(terrain.height_at(25, 0).is_none());
    }

    #[test]
    fn test_regenerate_same_config_is_identical() {
        let mut terrain = Terrain::build(small_config()).unwrap();
        let before = terrain.mesh().clone();
        let after = terrain.regenerate(small_config()).unwrap();
        assert_eq!(before.mesh.position_bytes(), after.mesh.position_bytes());
        assert_eq!(before.mesh.uv_bytes(), after.mesh.uv_bytes());
        assert_eq!(before.mesh.index_bytes(), after.mesh.index_bytes());
        assert_eq!(before.features, after.features);
    }

    #[test]
    fn test_set_a_clamps_and_remeshes() {
        let mut terrain = Terrain::build(small_config()).unwrap();
        terrain.set_displacement_a(10.0).unwrap();
        let displacement = terrain.config().displacement.unwrap();
        assert_eq!(displacement.function, MapFunction::Wave);
        assert_eq!(displacement.a, 0.2);
    }

    #[test]
    fn test_select_function_resets_parameters() {
        let mut terrain = Terrain::build(small_config()).unwrap();
        terrain.select_function(MapFunction::Diamond).unwrap();
        let displacement = terrain.config().displacement.unwrap();
        assert_eq!(displacement.function, MapFunction::Diamond);
        assert!((displacement.a - 2.5).abs() < 1e-6);
        assert!((displacement.b - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_trees_follow_candidates() {
        let mut config = small_config();
        config.displacement = None;
        config.noise_height_multiplier = 0.0;
        config.tree_pool_capacity = 10;
        config.mesh.features = FeaturePolicy {
            spawn_probability: 1.0,
            max_count: None,
        };
        let terrain = Terrain::build(config).unwrap();

        // Flat grid: every cell is grass, the pool caps placement
        assert_eq!(terrain.mesh().features.len(), 24 * 16);
        assert_eq!(terrain.trees().active_count(), 10);
        let (_, first) = terrain.trees().active().next().unwrap();
        assert_eq!(first.position, glam::Vec3::new(0.0, -4.5, 0.0));
    }

    #[test]
    fn test_failed_regenerate_keeps_state() {
        let mut terrain = Terrain::build(small_config()).unwrap();
        let mut bad = small_config();
        bad.mesh.width = 0;
        assert!(terrain.regenerate(bad).is_err());
        assert_eq!(terrain.config().mesh.width, 24);
    }
}
