use glam::Vec2;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::height::HeightSource;

/// Fractal Brownian motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub frequency: f32,
    pub amplitude: f32,
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
    /// World units to noise space
    pub scale: f32,
    /// Shifts the [-1, 1] fBm sum before it is folded into [0, 1]
    pub normalize_bias: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            amplitude: 0.5,
            octaves: 8,
            lacunarity: 2.0,
            gain: 0.5,
            scale: 0.01,
            normalize_bias: 1.0,
        }
    }
}

impl NoiseParams {
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(TerrainError::InvalidConfig("noise octaves must be at least 1".into()));
        }
        if !(self.amplitude > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "noise amplitude must be positive, got {}",
                self.amplitude
            )));
        }
        if !(self.normalize_bias > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "noise normalize_bias must be positive, got {}",
                self.normalize_bias
            )));
        }
        Ok(())
    }
}

/// Seeded fBm over Perlin noise, normalised into [0, 1]
///
/// The permutation table is built once per seed, so sampling a full grid
/// does not rebuild it per call.
#[derive(Clone)]
pub struct FbmNoise {
    perlin: Perlin,
    params: NoiseParams,
    seed: u32,
}

impl FbmNoise {
    pub fn new(seed: u32, params: NoiseParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            perlin: Perlin::new(seed),
            params,
            seed,
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Raw fBm sum divided by the total amplitude, roughly in [-1, 1]
    pub fn fbm(&self, point: Vec2) -> f32 {
        let p = &self.params;
        let mut value = 0.0;
        let mut amplitude = p.amplitude;
        let mut frequency = p.frequency;
        let mut max_value = 0.0;

        for _ in 0..p.octaves {
            let sample_x = (point.x * p.scale * frequency) as f64;
            let sample_y = (point.y * p.scale * frequency) as f64;

            value += self.perlin.get([sample_x, sample_y]) as f32 * amplitude;
            max_value += amplitude;

            amplitude *= p.gain;
            frequency *= p.lacunarity;
        }

        value / max_value
    }

    /// noise(x, z) in [0, 1]
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let bias = self.params.normalize_bias;
        ((self.fbm(Vec2::new(x, z)) + bias) / (2.0 * bias)).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for FbmNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FbmNoise")
            .field("seed", &self.seed)
            .field("params", &self.params)
            .finish()
    }
}

impl HeightSource for FbmNoise {
    fn height(&self, x: i32, z: i32) -> f32 {
        self.sample(x as f32, z as f32)
    }
}

/// Summed Perlin layers with a growing sample step and falling weight
///
/// `h = sum_i n(x * step_i + seed + 0.5, z * step_i + seed + 0.5) * max_height / (i + 1)`
/// where `step_{i+1} = step_i + step_gain` and `n` is Perlin folded into [0, 1].
#[derive(Clone)]
pub struct LayeredPerlin {
    perlin: Perlin,
    seed: u32,
    pub step: f32,
    pub step_gain: f32,
    pub iterations: u32,
    pub max_height: f32,
}

impl LayeredPerlin {
    pub fn new(seed: u32, step: f32, step_gain: f32, iterations: u32, max_height: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
            step,
            step_gain,
            iterations,
            max_height,
        }
    }
}

impl HeightSource for LayeredPerlin {
    fn height(&self, x: i32, z: i32) -> f32 {
        let offset = self.seed as f64 + 0.5;
        let mut step = self.step;
        let mut height = 0.0;

        for i in 0..self.iterations {
            let real_x = x as f64 * step as f64 + offset;
            let real_z = z as f64 * step as f64 + offset;
            let n = (self.perlin.get([real_x, real_z]) as f32 + 1.0) * 0.5;
            height += n.clamp(0.0, 1.0) * (self.max_height / (i + 1) as f32);
            step += self.step_gain;
        }

        height
    }
}
