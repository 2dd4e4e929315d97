use grove_lsystem::{generate_plant, PlantRecipe};

fn main() {
    println!("=== Grove - Plant Generation Demo ===\n");

    for recipe in PlantRecipe::presets() {
        println!("--- {} ---", recipe.name);
        println!("Axiom: {}", recipe.axiom);
        for (symbol, replacement) in &recipe.rules {
            println!("  {} -> {}", symbol, replacement);
        }
        println!("Generations: {}", recipe.generations);
        println!("Angle step: {:.1}°", recipe.turtle.angle_step);

        let plant = match generate_plant(&recipe) {
            Ok(plant) => plant,
            Err(e) => {
                println!("Failed: {}\n", e);
                continue;
            }
        };

        println!("L-system string length: {} symbols", plant.symbols.chars().count());
        println!(
            "Turtle: {} segments, {} leaves, {} line runs, max depth {}",
            plant.output.segments.len(),
            plant.output.leaves.len(),
            plant.output.runs.len(),
            plant.output.max_depth
        );

        let (min_y, max_y) = plant
            .output
            .segments
            .iter()
            .fold((0.0f32, 0.0f32), |(lo, hi), s| (lo.min(s.end.y), hi.max(s.end.y)));
        println!("Height: {:.2}", max_y - min_y);

        if let Some(mesh) = &plant.mesh {
            println!("Mesh: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
            let bytes = mesh.position_bytes().len() + mesh.index_bytes().len();
            println!("Mesh size: ~{:.2} KB", bytes as f32 / 1024.0);
        }
        println!();
    }

    println!("=== Growth by Generation ===");
    let recipe = PlantRecipe::binary_tree();
    for generations in 0..=6 {
        let recipe = PlantRecipe {
            generations,
            ..recipe.clone()
        };
        if let Ok(plant) = generate_plant(&recipe) {
            println!(
                "Generation {}: {} symbols, {} segments",
                generations,
                plant.symbols.len(),
                plant.output.segments.len()
            );
        }
    }
}
