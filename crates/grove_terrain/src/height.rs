use crate::error::{Result, TerrainError};
use crate::map_function::Displacement;
use crate::noise_util::FbmNoise;

/// A deterministic height sample over integer grid coordinates
pub trait HeightSource {
    fn height(&self, x: i32, z: i32) -> f32;
}

impl<F> HeightSource for F
where
    F: Fn(i32, i32) -> f32,
{
    fn height(&self, x: i32, z: i32) -> f32 {
        self(x, z)
    }
}

/// Corner samples for a `width x depth` cell grid, i.e. `(width + 1) x (depth + 1)` heights.
///
/// Stored x-major (`x * (depth + 1) + z`), the order the cells are walked in.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: u32,
    depth: u32,
    heights: Vec<f32>,
}

impl Heightmap {
    /// Sample every corner of the grid, failing on the first non-finite value
    pub fn sample<H: HeightSource + ?Sized>(width: u32, depth: u32, source: &H) -> Result<Self> {
        check_grid(width, depth)?;

        let mut heights = Vec::with_capacity((width as usize + 1) * (depth as usize + 1));
        for x in 0..=width as i32 {
            for z in 0..=depth as i32 {
                let value = source.height(x, z);
                if !value.is_finite() {
                    return Err(TerrainError::NonFiniteHeight { x, z, value });
                }
                heights.push(value);
            }
        }

        Ok(Self { width, depth, heights })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Height at a corner, `None` outside `[0, width] x [0, depth]`
    pub fn get(&self, x: u32, z: u32) -> Option<f32> {
        if x > self.width || z > self.depth {
            return None;
        }
        self.heights.get(x as usize * (self.depth as usize + 1) + z as usize).copied()
    }

    /// Corner heights of cell `(x, z)` as `[y00, y01, y10, y11]`
    pub fn cell_corners(&self, x: u32, z: u32) -> Option<[f32; 4]> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        Some([
            self.get(x, z)?,
            self.get(x, z + 1)?,
            self.get(x + 1, z)?,
            self.get(x + 1, z + 1)?,
        ])
    }

    /// (min, max) over all samples
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }
}

/// Reject grids that are empty or whose samples and quad vertices cannot be addressed with `u32`
pub(crate) fn check_grid(width: u32, depth: u32) -> Result<()> {
    let samples = width
        .checked_add(1)
        .zip(depth.checked_add(1))
        .and_then(|(w, d)| w.checked_mul(d));
    let vertices = width.checked_mul(depth).and_then(|cells| cells.checked_mul(4));
    if width == 0 || depth == 0 || samples.is_none() || vertices.is_none() {
        return Err(TerrainError::InvalidGridDimensions { width, depth });
    }
    Ok(())
}

impl HeightSource for Heightmap {
    fn height(&self, x: i32, z: i32) -> f32 {
        if x < 0 || z < 0 {
            return f32::NAN;
        }
        self.get(x as u32, z as u32).unwrap_or(f32::NAN)
    }
}

/// Noise scaled by a height multiplier plus an optional parametric displacement.
///
/// `h(x, z) = f(x - W/2, z - D/2, A, B) + noise(x, z) * multiplier + offset`
/// with `W`, `D` the sample-grid extent (`width + 1`, `depth + 1`).
#[derive(Debug, Clone)]
pub struct DisplacedHeightfield<'a> {
    pub noise: &'a FbmNoise,
    pub noise_height_multiplier: f32,
    pub offset: f32,
    pub displacement: Option<Displacement>,
    pub width: u32,
    pub depth: u32,
}

impl DisplacedHeightfield<'_> {
    fn displacement_at(&self, x: i32, z: i32) -> f32 {
        match &self.displacement {
            Some(displacement) => {
                let half_w = (self.width + 1) as f32 / 2.0;
                let half_d = (self.depth + 1) as f32 / 2.0;
                displacement.evaluate(x as f32 - half_w, z as f32 - half_d)
            }
            None => 0.0,
        }
    }
}

impl HeightSource for DisplacedHeightfield<'_> {
    fn height(&self, x: i32, z: i32) -> f32 {
        self.displacement_at(x, z)
            + self.noise.height(x, z) * self.noise_height_multiplier
            + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_function::MapFunction;
    use crate::noise_util::NoiseParams;

    #[test]
    fn test_heightmap_layout() {
        let map = Heightmap::sample(3, 2, &|x: i32, z: i32| (x * 10 + z) as f32).unwrap();
        assert_eq!(map.as_slice().len(), 4 * 3);
        assert_eq!(map.get(2, 1), Some(21.0));
        assert_eq!(map.get(4, 0), None);
        assert_eq!(map.cell_corners(1, 1), Some([11.0, 12.0, 21.0, 22.0]));
        assert_eq!(map.cell_corners(3, 0), None);
        assert_eq!(map.height_range(), (0.0, 32.0));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let result = Heightmap::sample(0, 5, &|_: i32, _: i32| 0.0);
        assert!(matches!(
            result,
            Err(TerrainError::InvalidGridDimensions { width: 0, depth: 5 })
        ));
    }

    #[test]
    fn test_rejects_unaddressable_grid() {
        let sampled = std::cell::Cell::new(0u32);
        let source = |_: i32, _: i32| {
            sampled.set(sampled.get() + 1);
            0.0
        };
        for (width, depth) in [(65536, 65536), (u32::MAX, 1), (1 << 30, 2)] {
            assert!(matches!(
                Heightmap::sample(width, depth, &source),
                Err(TerrainError::InvalidGridDimensions { .. })
            ));
        }
        assert_eq!(sampled.get(), 0);
    }

    #[test]
    fn test_heightmap_as_source() {
        let map = Heightmap::sample(2, 2, &|x: i32, z: i32| (x + z) as f32).unwrap();
        assert_eq!(map.height(2, 1), 3.0);
        assert!(map.height(-1, 0).is_nan());
        assert!(map.height(3, 0).is_nan());

        // A sampled map can be remeshed as-is
        let copy = Heightmap::sample(2, 2, &map).unwrap();
        assert_eq!(copy, map);
    }

    #[test]
    fn test_rejects_nan() {
        let result = Heightmap::sample(4, 4, &|x: i32, z: i32| if x == 2 && z == 3 { f32::NAN } else { 1.0 });
        assert!(matches!(result, Err(TerrainError::NonFiniteHeight { x: 2, z: 3, .. })));
    }

    #[test]
    fn test_displacement_is_centred() {
        let noise = FbmNoise::new(9, NoiseParams::default()).unwrap();
        let field = DisplacedHeightfield {
            noise: &noise,
            noise_height_multiplier: 0.0,
            offset: 0.0,
            displacement: Some(Displacement::new(MapFunction::Ripple, 2.0, 0.5)),
            width: 9,
            depth: 9,
        };
        // Grid extent 10 puts the radial function's origin on sample (5, 5)
        assert!(field.height(5, 5).abs() < 1e-6);
        assert!((field.height(4, 5) - field.height(6, 5)).abs() < 1e-5);
    }

    #[test]
    fn test_offset_and_multiplier() {
        let noise = FbmNoise::new(3, NoiseParams::default()).unwrap();
        let field = DisplacedHeightfield {
            noise: &noise,
            noise_height_multiplier: 100.0,
            offset: -50.0,
            displacement: None,
            width: 8,
            depth: 8,
        };
        let h = field.height(3, 4);
        assert!((-50.0..=50.0).contains(&h));
        assert!((h - (noise.sample(3.0, 4.0) * 100.0 - 50.0)).abs() < 1e-4);
    }
}
