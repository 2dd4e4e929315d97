use glam::IVec2;
use rand::Rng;

use crate::error::{Result, TerrainError};

/// Nearest-site region labels over a `width x height` raster
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiMap {
    width: u32,
    height: u32,
    sites: Vec<IVec2>,
    colors: Vec<[f32; 3]>,
    /// Row-major (`y * width + x`) site index per pixel
    labels: Vec<u32>,
}

impl VoronoiMap {
    /// Draw one colour per region, then one site per region, then label every pixel
    pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, region_count: u32, rng: &mut R) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidVoronoi(format!(
                "raster must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if region_count == 0 {
            return Err(TerrainError::InvalidVoronoi("region count must be at least 1".into()));
        }

        let colors = (0..region_count)
            .map(|_| [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()])
            .collect();
        let sites = (0..region_count)
            .map(|_| IVec2::new(rng.gen_range(0..width as i32), rng.gen_range(0..height as i32)))
            .collect::<Vec<_>>();

        let mut labels = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                labels.push(closest_site(&sites, IVec2::new(x, y)));
            }
        }

        log::debug!("Voronoi map {}x{} with {} regions", width, height, region_count);

        Ok(Self {
            width,
            height,
            sites,
            colors,
            labels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sites(&self) -> &[IVec2] {
        &self.sites
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn region_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels.get((y * self.width + x) as usize).copied()
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        self.region_at(x, y).map(|region| self.colors[region as usize])
    }

    /// Pixel count per region
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.sites.len()];
        for &label in &self.labels {
            sizes[label as usize] += 1;
        }
        sizes
    }
}

/// Brute-force nearest site; ties go to the lower index
pub fn closest_site(sites: &[IVec2], point: IVec2) -> u32 {
    let point = point.as_vec2();
    let mut closest = 0;
    let mut best = f32::INFINITY;
    for (i, site) in sites.iter().enumerate() {
        let distance = site.as_vec2().distance(point);
        if distance < best {
            best = distance;
            closest = i;
        }
    }
    closest as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_every_pixel_labelled() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let map = VoronoiMap::generate(32, 16, 5, &mut rng).unwrap();
        assert_eq!(map.labels().len(), 32 * 16);
        assert!(map.labels().iter().all(|&l| l < 5));
        assert_eq!(map.region_sizes().iter().sum::<usize>(), 32 * 16);
    }

    #[test]
    fn test_site_pixel_belongs_to_a_site_at_distance_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let map = VoronoiMap::generate(20, 20, 4, &mut rng).unwrap();
        for site in map.sites() {
            let label = map.region_at(site.x as u32, site.y as u32).unwrap();
            assert_eq!(map.sites()[label as usize], *site);
        }
    }

    #[test]
    fn test_ties_go_to_lower_index() {
        let sites = [IVec2::new(0, 0), IVec2::new(2, 0)];
        assert_eq!(closest_site(&sites, IVec2::new(1, 0)), 0);
        assert_eq!(closest_site(&sites, IVec2::new(2, 1)), 1);
    }

    #[test]
    fn test_deterministic() {
        let a = VoronoiMap::generate(16, 16, 6, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let b = VoronoiMap::generate(16, 16, 6, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_empty_requests() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(VoronoiMap::generate(0, 4, 2, &mut rng).is_err());
        assert!(VoronoiMap::generate(4, 4, 0, &mut rng).is_err());
    }
}
