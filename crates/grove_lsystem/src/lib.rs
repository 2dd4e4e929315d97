pub mod cylinder;
pub mod error;
pub mod recipe;
pub mod rewrite;
pub mod turtle;

pub use cylinder::{build_cylinder, CylinderMesh, CylinderSpec, Placement, PlantMesh};
pub use error::LSystemError;
pub use recipe::{generate_plant, GeneratedPlant, PlantRecipe};
pub use rewrite::{rewrite, Alphabet, LSystem, RuleSet};
pub use turtle::{
    interpret, rotate_about, Action, Axis, Direction, Leaf, Pose, Segment, SymbolPreset, SymbolTable, Turn,
    TurnAngle, TurtleConfig, TurtleCounters, TurtleOutput,
};
