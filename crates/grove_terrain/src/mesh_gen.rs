use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::atlas::{AtlasLayout, UvCornerOrder};
use crate::biome::{Biome, BiomeRules};
use crate::error::{Result, TerrainError};
use crate::height::{check_grid, HeightSource, Heightmap};

/// Which grass quads become feature candidates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturePolicy {
    /// Chance in [0, 1] that an eligible quad is picked
    pub spawn_probability: f32,
    /// Stop recording candidates once this many exist; `None` is uncapped
    pub max_count: Option<usize>,
}

impl Default for FeaturePolicy {
    fn default() -> Self {
        Self {
            spawn_probability: 0.05,
            max_count: None,
        }
    }
}

/// A grass cell chosen to carry a secondary feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureCandidate {
    pub x: u32,
    pub z: u32,
    /// Height of the cell's (x, z) corner
    pub height: f32,
}

impl FeatureCandidate {
    pub fn world_position(&self, y_offset: f32) -> Vec3 {
        Vec3::new(self.x as f32, self.height + y_offset, self.z as f32)
    }
}

/// Everything the mesher needs besides the heights and the RNG
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub width: u32,
    pub depth: u32,
    pub biome_rules: BiomeRules,
    pub atlas: AtlasLayout,
    pub features: FeaturePolicy,
    pub uv_order: UvCornerOrder,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            width: 64,
            depth: 64,
            biome_rules: BiomeRules::default(),
            atlas: AtlasLayout::default(),
            features: FeaturePolicy::default(),
            uv_order: UvCornerOrder::default(),
        }
    }
}

/// Axis-aligned bounds of a vertex set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let first = Vec3::from_array(*points.first()?);
        let (min, max) = points.iter().fold((first, first), |(min, max), p| {
            let p = Vec3::from_array(*p);
            (min.min(p), max.max(p))
        });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Renderable buffers; index `i` of positions, normals and uvs is vertex `i`
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub bounds: Bounds,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Mesher output: the mesh plus per-quad biomes, feature candidates and the sampled corners
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub mesh: MeshData,
    /// One entry per quad, in emission order
    pub biomes: Vec<Biome>,
    pub features: Vec<FeatureCandidate>,
    pub heightmap: Heightmap,
}

impl TerrainMesh {
    pub fn quad_count(&self) -> usize {
        self.biomes.len()
    }
}

/// Tessellate a heightfield into unshared, individually textured quads.
///
/// Cells are walked x-major. Each cell emits vertices
/// `(x,y00,z), (x,y01,z+1), (x+1,y10,z), (x+1,y11,z+1)` and triangles
/// `(0,1,2), (3,2,1)`, which face +Y. Grass cells draw one value from `rng`
/// each, in cell order, whether or not the candidate cap has been reached.
pub fn generate_heightfield_mesh<H, R>(settings: &MeshSettings, heights: &H, rng: &mut R) -> Result<TerrainMesh>
where
    H: HeightSource + ?Sized,
    R: Rng + ?Sized,
{
    let MeshSettings {
        width,
        depth,
        biome_rules,
        atlas,
        features: policy,
        uv_order,
    } = *settings;

    check_grid(width, depth)?;
    if !(0.0..=1.0).contains(&policy.spawn_probability) {
        return Err(TerrainError::InvalidConfig(format!(
            "spawn probability must be within [0, 1], got {}",
            policy.spawn_probability
        )));
    }

    // Resolve every biome's UVs before sampling so a bad atlas cell fails fast
    let uv_for = |biome: Biome| -> Result<[[f32; 2]; 4]> {
        Ok(atlas.uv_rect(biome_rules.cell(biome))?.corners(uv_order))
    };
    let snow_uv = uv_for(Biome::Snow)?;
    let deepslate_uv = uv_for(Biome::Deepslate)?;
    let grass_uv = uv_for(Biome::Grass)?;
    let dirt_uv = uv_for(Biome::Dirt)?;
    let stone_uv = uv_for(Biome::Stone)?;

    let heightmap = Heightmap::sample(width, depth, heights)?;

    let quad_count = width as usize * depth as usize;
    let mut positions = Vec::with_capacity(quad_count * 4);
    let mut uvs = Vec::with_capacity(quad_count * 4);
    let mut indices = Vec::with_capacity(quad_count * 6);
    let mut biomes = Vec::with_capacity(quad_count);
    let mut candidates = Vec::new();

    for x in 0..width {
        for z in 0..depth {
            let Some([y00, y01, y10, y11]) = heightmap.cell_corners(x, z) else {
                continue;
            };

            let base = positions.len() as u32;
            let (fx, fz) = (x as f32, z as f32);
            positions.push([fx, y00, fz]);
            positions.push([fx, y01, fz + 1.0]);
            positions.push([fx + 1.0, y10, fz]);
            positions.push([fx + 1.0, y11, fz + 1.0]);

            indices.extend_from_slice(&[base, base + 1, base + 2, base + 3, base + 2, base + 1]);

            let max_y = y00.max(y01).max(y10).max(y11);
            let min_y = y00.min(y01).min(y10).min(y11);
            let biome = biome_rules.classify(max_y, max_y - min_y);

            if biome.is_feature_eligible() {
                let roll: f32 = rng.gen();
                let under_cap = policy.max_count.map_or(true, |max| candidates.len() < max);
                if roll < policy.spawn_probability && under_cap {
                    candidates.push(FeatureCandidate { x, z, height: y00 });
                }
            }

            uvs.extend_from_slice(match biome {
                Biome::Snow => &snow_uv,
                Biome::Deepslate => &deepslate_uv,
                Biome::Grass => &grass_uv,
                Biome::Dirt => &dirt_uv,
                Biome::Stone => &stone_uv,
            });
            biomes.push(biome);
        }
    }

    let normals = calculate_normals(&positions, &indices);
    let bounds = Bounds::from_points(&positions).ok_or(TerrainError::InvalidGridDimensions { width, depth })?;

    log::debug!(
        "Heightfield mesh {}x{}: {} vertices, {} triangles, {} feature candidates",
        width,
        depth,
        positions.len(),
        indices.len() / 3,
        candidates.len()
    );

    Ok(TerrainMesh {
        mesh: MeshData {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        },
        biomes,
        features: candidates,
        heightmap,
    })
}

/// Per-vertex normals from summed face normals.
///
/// Quads share no vertices, so this averages only within a quad and every
/// quad keeps hard edges.
pub fn calculate_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;

        let p0 = Vec3::from_array(positions[i0]);
        let p1 = Vec3::from_array(positions[i1]);
        let p2 = Vec3::from_array(positions[i2]);

        let face_normal = (p1 - p0).cross(p2 - p0);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals.into_iter().map(|n| n.normalize_or_zero().to_array()).collect()
}
