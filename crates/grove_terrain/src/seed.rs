use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Independent random streams derived from one terrain seed.
///
/// Each consumer gets its own layer so, for example, changing how many
/// features are rolled never shifts the noise permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedLayer {
    Noise,
    Features,
    Voronoi,
}

impl SeedLayer {
    fn id(self) -> u32 {
        match self {
            SeedLayer::Noise => 0,
            SeedLayer::Features => 1,
            SeedLayer::Voronoi => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorldSeed {
    pub value: u32,
}

impl WorldSeed {
    pub fn new(seed: u32) -> Self {
        Self { value: seed }
    }

    /// Boost-style combine: `seed ^ (value + 0x9e3779b9 + (seed << 6) + (seed >> 2))`
    pub fn hash_combine(&self, value: u32) -> u32 {
        let seed = self.value;
        seed ^ (value
            .wrapping_add(0x9e3779b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2))
    }

    pub fn layer_seed(&self, layer: SeedLayer) -> u32 {
        self.hash_combine(layer.id())
    }

    /// Fresh stream for `layer`; two calls yield identical sequences
    pub fn rng(&self, layer: SeedLayer) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.layer_seed(layer) as u64)
    }
}

impl From<u32> for WorldSeed {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
