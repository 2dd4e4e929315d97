use glam::Vec2;
use grove_terrain::{FbmNoise, NoiseParams, SeedLayer, WorldSeed};

fn main() {
    let world_seed = WorldSeed::new(1587);
    let noise = match FbmNoise::new(world_seed.layer_seed(SeedLayer::Noise), NoiseParams::default()) {
        Ok(noise) => noise,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("World Seed: {}", world_seed.value);
    println!("Noise layer seed: {}", noise.seed());

    for (x, z) in [(0, 0), (10, 10), (32, 7), (64, 64)] {
        let raw = noise.fbm(Vec2::new(x as f32, z as f32));
        let normalized = noise.sample(x as f32, z as f32);
        println!("({:>3}, {:>3}): fbm {:+.4}, normalized {:.4}", x, z, raw, normalized);
    }
}
