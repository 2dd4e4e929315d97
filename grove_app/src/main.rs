//! Grove CLI - procedural terrain, plants and Voronoi maps.
//!
//! Hosts the library pipelines: loads JSON configuration, runs a generation
//! and logs what came out. Set `RUST_LOG=debug` for per-run statistics.

use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use grove_lsystem::{generate_plant, PlantRecipe};
use grove_terrain::{Biome, BiomeRules, MapFunction, Terrain, TerrainConfig, UvCornerOrder, VoronoiMap};

/// Procedural terrain and plant generator.
#[derive(Parser)]
#[command(name = "grove")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mesh a displaced noise heightfield and place trees on it.
    Terrain {
        /// JSON terrain configuration; flags below override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        seed: Option<u32>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        depth: Option<u32>,

        /// Displacement function (A and B start at the range centres).
        #[arg(short, long)]
        function: Option<FunctionArg>,

        /// Displacement parameter A, clamped to the function's range.
        #[arg(short)]
        a: Option<f32>,

        /// Displacement parameter B, clamped to the function's range.
        #[arg(short)]
        b: Option<f32>,

        /// Snow above 200 and deepslate below -50 instead of 100 / -40.
        #[arg(long)]
        alpine: bool,

        /// Emit quad UVs in loop order instead of grid order.
        #[arg(long)]
        uv_loop: bool,

        /// Remesh this many times while stepping A across its range.
        #[arg(long, default_value = "0")]
        sweep: u32,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Grow an L-system plant.
    Plant {
        /// Preset recipe.
        #[arg(short, long, default_value = "oak")]
        recipe: RecipeArg,

        /// JSON recipe file; replaces the preset.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of rewrite generations.
        #[arg(short, long)]
        generations: Option<u32>,

        /// Print the expanded symbol string.
        #[arg(long)]
        print_symbols: bool,
    },

    /// Rasterize nearest-site Voronoi regions.
    Voronoi {
        #[arg(long, default_value = "64")]
        width: u32,

        #[arg(long, default_value = "32")]
        height: u32,

        #[arg(short, long, default_value = "8")]
        regions: u32,

        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Draw the region map with one letter per pixel.
        #[arg(long)]
        ascii: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FunctionArg {
    Wave,
    Ripple,
    Crater,
    Saddle,
    Diamond,
}

impl From<FunctionArg> for MapFunction {
    fn from(arg: FunctionArg) -> Self {
        match arg {
            FunctionArg::Wave => MapFunction::Wave,
            FunctionArg::Ripple => MapFunction::Ripple,
            FunctionArg::Crater => MapFunction::Crater,
            FunctionArg::Saddle => MapFunction::Saddle,
            FunctionArg::Diamond => MapFunction::Diamond,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RecipeArg {
    BinaryTree,
    FractalPlant,
    Bush3d,
    Oak,
    Pine,
}

impl From<RecipeArg> for PlantRecipe {
    fn from(arg: RecipeArg) -> Self {
        match arg {
            RecipeArg::BinaryTree => PlantRecipe::binary_tree(),
            RecipeArg::FractalPlant => PlantRecipe::fractal_plant(),
            RecipeArg::Bush3d => PlantRecipe::bush_3d(),
            RecipeArg::Oak => PlantRecipe::oak(),
            RecipeArg::Pine => PlantRecipe::pine(),
        }
    }
}

#[derive(Serialize)]
struct TerrainSummary {
    seed: u32,
    width: u32,
    depth: u32,
    function: Option<String>,
    quads: usize,
    vertices: usize,
    triangles: usize,
    min_height: f32,
    max_height: f32,
    snow: usize,
    deepslate: usize,
    grass: usize,
    dirt: usize,
    stone: usize,
    feature_candidates: usize,
    trees: usize,
}

impl TerrainSummary {
    fn new(terrain: &Terrain) -> Self {
        let config = terrain.config();
        let mesh = terrain.mesh();
        let count = |biome: Biome| mesh.biomes.iter().filter(|b| **b == biome).count();
        let (min_height, max_height) = mesh.heightmap.height_range();

        Self {
            seed: config.seed,
            width: config.mesh.width,
            depth: config.mesh.depth,
            function: config.displacement.map(|d| format!("{} (A={:.3}, B={:.3})", d.function.label(), d.a, d.b)),
            quads: mesh.quad_count(),
            vertices: mesh.mesh.vertex_count(),
            triangles: mesh.mesh.triangle_count(),
            min_height,
            max_height,
            snow: count(Biome::Snow),
            deepslate: count(Biome::Deepslate),
            grass: count(Biome::Grass),
            dirt: count(Biome::Dirt),
            stone: count(Biome::Stone),
            feature_candidates: mesh.features.len(),
            trees: terrain.trees().active_count(),
        }
    }

    fn log(&self) {
        log::info!("Terrain {}x{} (seed {})", self.width, self.depth, self.seed);
        if let Some(function) = &self.function {
            log::info!("  Displacement: {}", function);
        }
        log::info!("  Mesh: {} quads, {} vertices, {} triangles", self.quads, self.vertices, self.triangles);
        log::info!("  Height range: {:.2} .. {:.2}", self.min_height, self.max_height);
        log::info!(
            "  Biomes: snow {}, deepslate {}, grass {}, dirt {}, stone {}",
            self.snow,
            self.deepslate,
            self.grass,
            self.dirt,
            self.stone
        );
        log::info!("  Trees: {} placed of {} candidates", self.trees, self.feature_candidates);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Terrain {
            config,
            seed,
            width,
            depth,
            function,
            a,
            b,
            alpine,
            uv_loop,
            sweep,
            json,
        } => {
            let overrides = TerrainOverrides {
                seed,
                width,
                depth,
                function: function.map(MapFunction::from),
                a,
                b,
                alpine,
                uv_loop,
            };
            run_terrain(config, overrides, sweep, json)
        }
        Commands::Plant {
            recipe,
            config,
            generations,
            print_symbols,
        } => run_plant(recipe.into(), config, generations, print_symbols),
        Commands::Voronoi {
            width,
            height,
            regions,
            seed,
            ascii,
        } => run_voronoi(width, height, regions, seed, ascii),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct TerrainOverrides {
    seed: Option<u32>,
    width: Option<u32>,
    depth: Option<u32>,
    function: Option<MapFunction>,
    a: Option<f32>,
    b: Option<f32>,
    alpine: bool,
    uv_loop: bool,
}

impl TerrainOverrides {
    fn apply(&self, config: &mut TerrainConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.mesh.width = width;
        }
        if let Some(depth) = self.depth {
            config.mesh.depth = depth;
        }
        if self.alpine {
            config.mesh.biome_rules = BiomeRules::alpine();
        }
        if self.uv_loop {
            config.mesh.uv_order = UvCornerOrder::Loop;
        }
    }
}

fn run_terrain(path: Option<PathBuf>, overrides: TerrainOverrides, sweep: u32, json: bool) -> Result<(), Box<dyn Error>> {
    let mut config = match path {
        Some(path) => {
            log::info!("Loading terrain config from {}", path.display());
            TerrainConfig::from_path(path)?
        }
        None => TerrainConfig::default(),
    };
    overrides.apply(&mut config);

    let start = Instant::now();
    let mut terrain = Terrain::build(config)?;

    // Parameter changes go through the same calls a slider would
    if let Some(function) = overrides.function {
        terrain.select_function(function)?;
    }
    if let Some(a) = overrides.a {
        terrain.set_displacement_a(a)?;
    }
    if let Some(b) = overrides.b {
        terrain.set_displacement_b(b)?;
    }
    log::info!("Generated in {:.2?}", start.elapsed());

    if sweep > 0 {
        if let Some(displacement) = terrain.config().displacement {
            let (lo, hi) = displacement.function.a_range();
            for step in 0..=sweep {
                let a = lo + (hi - lo) * step as f32 / sweep as f32;
                let mesh = terrain.set_displacement_a(a)?;
                let (min, max) = mesh.heightmap.height_range();
                log::info!("  A={:.3}: heights {:.2} .. {:.2}, {} candidates", a, min, max, mesh.features.len());
            }
        } else {
            log::warn!("No displacement function configured; nothing to sweep");
        }
    }

    let summary = TerrainSummary::new(&terrain);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.log();
    }
    Ok(())
}

fn run_plant(
    preset: PlantRecipe,
    path: Option<PathBuf>,
    generations: Option<u32>,
    print_symbols: bool,
) -> Result<(), Box<dyn Error>> {
    let mut recipe = match path {
        Some(path) => {
            log::info!("Loading plant recipe from {}", path.display());
            serde_json::from_str::<PlantRecipe>(&std::fs::read_to_string(path)?)?
        }
        None => preset,
    };
    if let Some(generations) = generations {
        recipe.generations = generations;
    }

    let start = Instant::now();
    let plant = generate_plant(&recipe)?;
    log::info!("Generated in {:.2?}", start.elapsed());

    let counters = &plant.output.counters;
    log::info!("Plant {:?}: {} symbols after {} generations", recipe.name, plant.symbols.chars().count(), recipe.generations);
    log::info!(
        "  Turtle: {} draws, {} turns, {} branches, max depth {}, {} skipped symbols",
        counters.draws,
        counters.turns,
        counters.pushes,
        plant.output.max_depth,
        counters.skipped
    );
    log::info!("  {} line runs, {} leaves", plant.output.runs.len(), plant.output.leaves.len());
    if let Some(mesh) = &plant.mesh {
        log::info!("  Mesh: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
        if let Some((min, max)) = mesh.bounds() {
            log::info!("  Bounds: {:?} .. {:?}", min, max);
        }
    }

    if print_symbols {
        println!("{}", plant.symbols);
    }
    Ok(())
}

fn run_voronoi(width: u32, height: u32, regions: u32, seed: u64, ascii: bool) -> Result<(), Box<dyn Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let map = VoronoiMap::generate(width, height, regions, &mut rng)?;

    log::info!("Voronoi {}x{} with {} regions (seed {})", width, height, regions, seed);
    for (i, (site, size)) in map.sites().iter().zip(map.region_sizes()).enumerate() {
        log::info!("  Region {}: site ({}, {}), {} pixels", i, site.x, site.y, size);
    }

    if ascii {
        const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        for row in map.labels().chunks(width as usize) {
            let line: String = row.iter().map(|label| GLYPHS[*label as usize % GLYPHS.len()] as char).collect();
            println!("{}", line);
        }
    }
    Ok(())
}
