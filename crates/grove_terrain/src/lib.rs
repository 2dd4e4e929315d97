pub mod atlas;
pub mod biome;
pub mod config;
pub mod error;
pub mod height;
pub mod map_function;
pub mod mesh_gen;
pub mod noise_util;
pub mod pool;
pub mod seed;
pub mod terrain;
pub mod voronoi;

// Re-export commonly used items
pub use atlas::{AtlasCell, AtlasLayout, UvCornerOrder, UvRect};
pub use biome::{Biome, BiomeRules};
pub use config::TerrainConfig;
pub use error::TerrainError;
pub use height::{DisplacedHeightfield, HeightSource, Heightmap};
pub use map_function::{Displacement, MapFunction};
pub use mesh_gen::{generate_heightfield_mesh, FeatureCandidate, FeaturePolicy, MeshData, MeshSettings, TerrainMesh};
pub use noise_util::{FbmNoise, LayeredPerlin, NoiseParams};
pub use pool::{PlacementPool, SlotHandle};
pub use seed::{SeedLayer, WorldSeed};
pub use terrain::Terrain;
pub use voronoi::VoronoiMap;
