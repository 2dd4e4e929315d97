use grove_terrain::{
    generate_heightfield_mesh, Biome, BiomeRules, FbmNoise, FeaturePolicy, LayeredPerlin, MeshSettings, NoiseParams,
    SeedLayer, Terrain, TerrainConfig, TerrainError, VoronoiMap, WorldSeed,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn settings(width: u32, depth: u32) -> MeshSettings {
    MeshSettings {
        width,
        depth,
        ..MeshSettings::default()
    }
}

#[test]
fn buffer_sizes_follow_cell_count() {
    let noise = FbmNoise::new(7, NoiseParams::default()).unwrap();
    let heights = |x: i32, z: i32| noise.sample(x as f32, z as f32) * 60.0;

    for (width, depth) in [(1, 1), (1, 9), (7, 3), (32, 32)] {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let terrain = generate_heightfield_mesh(&settings(width, depth), &heights, &mut rng).unwrap();
        let cells = (width * depth) as usize;
        assert_eq!(terrain.quad_count(), cells);
        assert_eq!(terrain.mesh.positions.len(), 4 * cells);
        assert_eq!(terrain.mesh.uvs.len(), 4 * cells);
        assert_eq!(terrain.mesh.normals.len(), 4 * cells);
        assert_eq!(terrain.mesh.indices.len(), 6 * cells);
    }
}

#[test]
fn same_inputs_give_identical_bytes() {
    let source = LayeredPerlin::new(11, 0.05, 0.02, 4, 40.0);
    let run = || {
        let mut rng = WorldSeed::new(11).rng(SeedLayer::Features);
        generate_heightfield_mesh(&settings(40, 24), &source, &mut rng).unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.mesh.position_bytes(), b.mesh.position_bytes());
    assert_eq!(a.mesh.uv_bytes(), b.mesh.uv_bytes());
    assert_eq!(a.mesh.index_bytes(), b.mesh.index_bytes());
    assert_eq!(a.features, b.features);
}

#[test]
fn rejects_empty_grid_before_sampling() {
    let sampled = std::cell::Cell::new(0);
    let heights = |_: i32, _: i32| {
        sampled.set(sampled.get() + 1);
        0.0
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let result = generate_heightfield_mesh(&settings(0, 5), &heights, &mut rng);
    assert!(matches!(result, Err(TerrainError::InvalidGridDimensions { width: 0, depth: 5 })));
    assert_eq!(sampled.get(), 0);
}

#[test]
fn nan_height_fails_fast() {
    let heights = |x: i32, z: i32| if x == 3 && z == 2 { f32::NAN } else { 0.0 };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let result = generate_heightfield_mesh(&settings(4, 4), &heights, &mut rng);
    assert!(matches!(result, Err(TerrainError::NonFiniteHeight { x: 3, z: 2, .. })));
}

#[test]
fn biome_presets() {
    let alpine = BiomeRules::alpine();
    assert_eq!(alpine.classify(250.0, 0.0), Biome::Snow);
    assert_eq!(alpine.classify(150.0, 0.0), Biome::Grass);

    let default = BiomeRules::default();
    assert_eq!(default.classify(0.0, 1.0), Biome::Grass);
    assert_eq!(default.classify(150.0, 0.0), Biome::Snow);
    assert_eq!(default.classify(-45.0, 10.0), Biome::Deepslate);
}

#[test]
fn feature_cap_limits_candidates() {
    let flat = |_: i32, _: i32| 0.0;
    let mut capped = settings(10, 10);
    capped.features = FeaturePolicy {
        spawn_probability: 1.0,
        max_count: Some(7),
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let terrain = generate_heightfield_mesh(&capped, &flat, &mut rng).unwrap();
    assert_eq!(terrain.features.len(), 7);

    // Candidates are recorded in cell order
    let first = terrain.features[0];
    assert_eq!((first.x, first.z), (0, 0));
    assert_eq!((terrain.features[6].x, terrain.features[6].z), (0, 6));
}

#[test]
fn terrain_from_json_config() {
    let config = TerrainConfig::from_json_str(
        r#"{ "seed": 42, "mesh": { "width": 20, "depth": 12 }, "displacement": { "function": "ripple", "a": 2.0, "b": 0.5 } }"#,
    )
    .unwrap();
    let terrain = Terrain::build(config).unwrap();
    assert_eq!(terrain.mesh().quad_count(), 240);
    assert!(terrain.trees().active_count() <= terrain.mesh().features.len());
}

#[test]
fn voronoi_covers_every_pixel() {
    let mut rng = WorldSeed::new(5).rng(SeedLayer::Voronoi);
    let map = VoronoiMap::generate(48, 32, 6, &mut rng).unwrap();
    assert_eq!(map.labels().len(), 48 * 32);
    assert_eq!(map.region_sizes().iter().sum::<usize>(), 48 * 32);
    for site in map.sites() {
        let region = map.region_at(site.x as u32, site.y as u32).unwrap();
        assert_eq!(map.sites()[region as usize], *site);
    }
}
