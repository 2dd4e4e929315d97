use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cylinder::{build_cylinder, CylinderSpec, PlantMesh};
use crate::error::Result;
use crate::rewrite::{rewrite, Alphabet, RuleSet};
use crate::turtle::{interpret, SymbolPreset, TurtleConfig, TurtleOutput};

/// Complete plant description: grammar, generations and turtle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantRecipe {
    pub name: String,
    pub axiom: String,
    /// Restricts rule keys when set
    pub alphabet: Option<String>,
    pub rules: BTreeMap<String, String>,
    pub generations: u32,
    pub symbols: SymbolPreset,
    pub turtle: TurtleConfig,
}

impl Default for PlantRecipe {
    fn default() -> Self {
        PlantRecipe::oak()
    }
}

fn rules(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

impl PlantRecipe {
    /// `0 -> 1[0]0`, `1 -> 11`; leaves on every `0`
    pub fn binary_tree() -> Self {
        PlantRecipe {
            name: "binary_tree".into(),
            axiom: "0".into(),
            alphabet: Some("01[]".into()),
            rules: rules(&[("0", "1[0]0"), ("1", "11")]),
            generations: 5,
            symbols: SymbolPreset::BinaryTree,
            turtle: TurtleConfig::default(),
        }
    }

    /// Branching weed on a placeholder symbol `X`
    pub fn fractal_plant() -> Self {
        PlantRecipe {
            name: "fractal_plant".into(),
            axiom: "X".into(),
            alphabet: Some("XF+-[]".into()),
            rules: rules(&[("X", "F-[[X]+X]+F[+FX]-X"), ("F", "FF")]),
            generations: 4,
            symbols: SymbolPreset::Standard2d,
            turtle: TurtleConfig {
                angle_step: 25.0,
                ..TurtleConfig::default()
            },
        }
    }

    /// Four-way bush turning about both axes, meshed with cylinders
    pub fn bush_3d() -> Self {
        PlantRecipe {
            name: "bush_3d".into(),
            axiom: "F".into(),
            alphabet: None,
            rules: rules(&[("F", "FF![&F][/F][+F][-F]F")]),
            generations: 2,
            symbols: SymbolPreset::Bush3d,
            turtle: TurtleConfig {
                angle_step: 45.0,
                base_angle: 90.0,
                cylinder: Some(CylinderSpec::default()),
                ..TurtleConfig::default()
            },
        }
    }

    pub fn oak() -> Self {
        PlantRecipe {
            name: "oak".into(),
            axiom: "F".into(),
            alphabet: None,
            rules: rules(&[("F", "FF-[-F+F+F]+[+F-F-F]")]),
            generations: 2,
            symbols: SymbolPreset::Standard2d,
            turtle: TurtleConfig {
                segment_length: 2.0,
                angle_step: 22.5,
                cylinder: Some(CylinderSpec {
                    radial_segments: 4,
                    height_segments: 3,
                    radius: 0.3,
                }),
                ..TurtleConfig::default()
            },
        }
    }

    /// Narrow and conical
    pub fn pine() -> Self {
        PlantRecipe {
            name: "pine".into(),
            axiom: "F".into(),
            alphabet: None,
            rules: rules(&[("F", "FF[-F][+F]F")]),
            generations: 3,
            symbols: SymbolPreset::Standard2d,
            turtle: TurtleConfig {
                segment_length: 2.5,
                angle_step: 15.0,
                cylinder: Some(CylinderSpec {
                    radial_segments: 4,
                    height_segments: 2,
                    radius: 0.25,
                }),
                ..TurtleConfig::default()
            },
        }
    }

    pub fn presets() -> Vec<PlantRecipe> {
        vec![
            PlantRecipe::binary_tree(),
            PlantRecipe::fractal_plant(),
            PlantRecipe::bush_3d(),
            PlantRecipe::oak(),
            PlantRecipe::pine(),
        ]
    }

    pub fn by_name(name: &str) -> Option<PlantRecipe> {
        PlantRecipe::presets().into_iter().find(|recipe| recipe.name == name)
    }

    /// Validated productions of this recipe
    pub fn rule_set(&self) -> Result<RuleSet> {
        let alphabet = self.alphabet.as_deref().map(Alphabet::new);
        RuleSet::from_pairs(alphabet, self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn expand(&self) -> Result<String> {
        Ok(rewrite(&self.axiom, &self.rule_set()?, self.generations))
    }
}

/// The expanded string, the turtle geometry and, when a cylinder is set, the mesh
#[derive(Debug, Clone)]
pub struct GeneratedPlant {
    pub symbols: String,
    pub output: TurtleOutput,
    pub mesh: Option<PlantMesh>,
}

/// Generate a plant from a recipe
pub fn generate_plant(recipe: &PlantRecipe) -> Result<GeneratedPlant> {
    let symbols = recipe.expand()?;
    let output = interpret(&symbols, &recipe.symbols.table(), &recipe.turtle)?;

    let mesh = match &recipe.turtle.cylinder {
        Some(spec) => {
            let cylinder = build_cylinder(spec, recipe.turtle.segment_length)?;
            let mut mesh = PlantMesh::new();
            for placement in &output.placements {
                mesh.instance(&cylinder, placement);
            }
            Some(mesh)
        }
        None => None,
    };

    log::info!(
        "Generated plant {:?}: {} symbols, {} segments, {} leaves{}",
        recipe.name,
        symbols.chars().count(),
        output.segments.len(),
        output.leaves.len(),
        mesh.as_ref()
            .map(|m| format!(", {} triangles", m.triangle_count()))
            .unwrap_or_default()
    );

    Ok(GeneratedPlant { symbols, output, mesh })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LSystemError;

    #[test]
    fn test_binary_tree_expansion() {
        let recipe = PlantRecipe {
            generations: 2,
            ..PlantRecipe::binary_tree()
        };
        assert_eq!(recipe.expand().unwrap(), "11[1[0]0]1[0]0");
    }

    #[test]
    fn test_all_presets_generate() {
        for recipe in PlantRecipe::presets() {
            let plant = generate_plant(&recipe).unwrap();
            assert!(!plant.output.segments.is_empty(), "{} drew nothing", recipe.name);
            assert_eq!(plant.mesh.is_some(), recipe.turtle.cylinder.is_some());
        }
    }

    #[test]
    fn test_mesh_has_one_cylinder_per_segment() {
        let recipe = PlantRecipe::bush_3d();
        let plant = generate_plant(&recipe).unwrap();
        let mesh = plant.mesh.unwrap();
        let per_cylinder = CylinderSpec::default().triangle_count();
        assert_eq!(mesh.triangle_count(), per_cylinder * plant.output.segments.len());
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_binary_tree_leaves() {
        let plant = generate_plant(&PlantRecipe::binary_tree()).unwrap();
        let zeros = plant.symbols.chars().filter(|c| *c == '0').count();
        assert_eq!(plant.output.leaves.len(), zeros);
        assert!(plant.mesh.is_none());
    }

    #[test]
    fn test_bad_rule_key_is_rejected_before_rewriting() {
        let mut recipe = PlantRecipe::fractal_plant();
        recipe.rules.insert("Q".into(), "F".into());
        assert!(matches!(generate_plant(&recipe), Err(LSystemError::InvalidRule { .. })));
    }

    #[test]
    fn test_unbalanced_axiom() {
        let recipe = PlantRecipe {
            axiom: "F]".into(),
            generations: 0,
            ..PlantRecipe::pine()
        };
        assert!(matches!(generate_plant(&recipe), Err(LSystemError::UnbalancedStack { .. })));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(PlantRecipe::by_name("pine"), Some(PlantRecipe::pine()));
        assert!(PlantRecipe::by_name("willow").is_none());
    }

    #[test]
    fn test_recipe_json() {
        let json = r#"{
            "name": "weed",
            "axiom": "X",
            "rules": { "X": "F[+X]F[-X]+X", "F": "FF" },
            "generations": 3,
            "symbols": "standard_2d",
            "turtle": { "angle_step": 20.0 }
        }"#;
        let recipe: PlantRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.turtle.angle_step, 20.0);
        assert_eq!(recipe.turtle.segment_length, 2.0);
        assert!(recipe.turtle.cylinder.is_none());
        assert!(generate_plant(&recipe).is_ok());
    }
}
