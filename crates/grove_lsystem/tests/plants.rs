use glam::Vec3;
use grove_lsystem::{
    generate_plant, interpret, rewrite, LSystemError, PlantRecipe, RuleSet, SymbolTable, TurtleConfig,
};

#[test]
fn rewrite_then_interpret_binary_tree() {
    let rules = RuleSet::from_pairs(None, [("0", "1[0]0"), ("1", "11")]).unwrap();
    let symbols = rewrite("0", &rules, 3);
    assert_eq!(symbols, "1111[11[1[0]0]1[0]0]11[1[0]0]1[0]0");

    let output = interpret(&symbols, &SymbolTable::binary_tree(), &TurtleConfig::default()).unwrap();
    assert_eq!(output.counters.pushes, output.counters.pops);
    assert_eq!(output.leaves.len(), symbols.matches('0').count());
    assert_eq!(output.segments.len(), symbols.matches(|c| c == '0' || c == '1').count());
}

#[test]
fn trunk_pose_ignores_branches() {
    let config = TurtleConfig {
        segment_length: 1.0,
        angle_step: 45.0,
        ..TurtleConfig::default()
    };
    let with_branches = interpret("F[+F][-F]F", &SymbolTable::standard_2d(), &config).unwrap();
    let trunk_only = interpret("FF", &SymbolTable::standard_2d(), &config).unwrap();
    assert_eq!(with_branches.final_pose, trunk_only.final_pose);
    assert!((with_branches.final_pose.position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
}

#[test]
fn unbalanced_input_is_an_error() {
    let table = SymbolTable::standard_2d();
    let config = TurtleConfig::default();
    assert!(matches!(interpret("F]", &table, &config), Err(LSystemError::UnbalancedStack { .. })));
    assert!(matches!(interpret("[F", &table, &config), Err(LSystemError::UnbalancedStack { .. })));
    assert!(interpret("[F]", &table, &config).is_ok());
}

#[test]
fn plant_generation_is_deterministic() {
    let a = generate_plant(&PlantRecipe::bush_3d()).unwrap();
    let b = generate_plant(&PlantRecipe::bush_3d()).unwrap();
    let (mesh_a, mesh_b) = (a.mesh.unwrap(), b.mesh.unwrap());
    assert_eq!(mesh_a.position_bytes(), mesh_b.position_bytes());
    assert_eq!(mesh_a.index_bytes(), mesh_b.index_bytes());
}

#[test]
fn bush_grows_in_three_dimensions() {
    let plant = generate_plant(&PlantRecipe::bush_3d()).unwrap();
    let (min, max) = plant.mesh.unwrap().bounds().unwrap();
    let size = max - min;
    assert!(size.x > 0.5 && size.y > 0.5 && size.z > 0.5, "bounds {:?}", size);
}
