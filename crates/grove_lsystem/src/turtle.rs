//! Stack-based turtle that turns a symbol string into segments, leaves and
//! cylinder placements.
//!
//! The turtle keeps one angle accumulator per rotation axis. Turn symbols
//! adjust an accumulator and make its axis the active one; a forward step
//! rotates the unit up vector by the active accumulator only. Angles are in
//! degrees and positive turns are clockwise.

use std::collections::HashMap;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::cylinder::{CylinderSpec, Placement};
use crate::error::{LSystemError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Turns in the XY plane (the 2D turtle)
    #[default]
    Z,
    /// Turns in the YZ plane
    X,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::Z => Vec3::Z,
            Axis::X => Vec3::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAngle {
    /// `TurtleConfig::angle_step`
    Step,
    /// `TurtleConfig::base_angle`
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub axis: Axis,
    pub angle: TurnAngle,
    pub direction: Direction,
}

impl Turn {
    pub const fn new(axis: Axis, angle: TurnAngle, direction: Direction) -> Self {
        Self { axis, angle, direction }
    }

    fn degrees(&self, config: &TurtleConfig) -> f32 {
        let magnitude = match self.angle {
            TurnAngle::Step => config.angle_step,
            TurnAngle::Base => config.base_angle,
        };
        match self.direction {
            Direction::Clockwise => magnitude,
            Direction::CounterClockwise => -magnitude,
        }
    }
}

/// What a symbol does to the turtle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Step forward and emit a segment
    Draw,
    /// Step forward without drawing; ends the current line run
    Move,
    Turn(Turn),
    /// Save the pose, then optionally turn
    Push { turn: Option<Turn> },
    /// Restore the pose, then optionally turn; ends the current line run
    Pop { turn: Option<Turn> },
    /// Draw, then emit a leaf polygon around the new position
    Leaf,
}

/// Symbol meanings; symbols without an entry are skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    actions: HashMap<char, Action>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: char, action: Action) -> Self {
        self.actions.insert(symbol, action);
        self
    }

    pub fn insert(&mut self, symbol: char, action: Action) -> Option<Action> {
        self.actions.insert(symbol, action)
    }

    pub fn get(&self, symbol: char) -> Option<Action> {
        self.actions.get(&symbol).copied()
    }

    /// `F`/`G` draw, `f` moves, `+`/`-` turn by the step, `[`/`]` branch, `L` draws a leaf
    pub fn standard_2d() -> Self {
        Self::new()
            .with('F', Action::Draw)
            .with('G', Action::Draw)
            .with('f', Action::Move)
            .with('+', Action::Turn(Turn::new(Axis::Z, TurnAngle::Step, Direction::Clockwise)))
            .with('-', Action::Turn(Turn::new(Axis::Z, TurnAngle::Step, Direction::CounterClockwise)))
            .with('[', Action::Push { turn: None })
            .with(']', Action::Pop { turn: None })
            .with('L', Action::Leaf)
    }

    /// `1` draws, `0` draws a leaf, `[` branches left and `]` returns then turns right
    pub fn binary_tree() -> Self {
        Self::new()
            .with('1', Action::Draw)
            .with('0', Action::Leaf)
            .with(
                '[',
                Action::Push {
                    turn: Some(Turn::new(Axis::Z, TurnAngle::Step, Direction::CounterClockwise)),
                },
            )
            .with(
                ']',
                Action::Pop {
                    turn: Some(Turn::new(Axis::Z, TurnAngle::Step, Direction::Clockwise)),
                },
            )
    }

    /// `+`/`-` turn about Z by the step, `&`/`/` turn about X by the base angle
    pub fn bush_3d() -> Self {
        Self::new()
            .with('F', Action::Draw)
            .with('+', Action::Turn(Turn::new(Axis::Z, TurnAngle::Step, Direction::Clockwise)))
            .with('-', Action::Turn(Turn::new(Axis::Z, TurnAngle::Step, Direction::CounterClockwise)))
            .with('&', Action::Turn(Turn::new(Axis::X, TurnAngle::Base, Direction::Clockwise)))
            .with('/', Action::Turn(Turn::new(Axis::X, TurnAngle::Base, Direction::CounterClockwise)))
            .with('[', Action::Push { turn: None })
            .with(']', Action::Pop { turn: None })
    }
}

/// Named symbol tables for serialized recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPreset {
    #[default]
    #[serde(rename = "standard_2d")]
    Standard2d,
    BinaryTree,
    #[serde(rename = "bush_3d")]
    Bush3d,
}

impl SymbolPreset {
    pub fn table(self) -> SymbolTable {
        match self {
            SymbolPreset::Standard2d => SymbolTable::standard_2d(),
            SymbolPreset::BinaryTree => SymbolTable::binary_tree(),
            SymbolPreset::Bush3d => SymbolTable::bush_3d(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    pub segment_length: f32,
    /// Degrees applied by `TurnAngle::Step`
    pub angle_step: f32,
    /// Degrees applied by `TurnAngle::Base`
    pub base_angle: f32,
    pub leaf_radius: f32,
    pub leaf_segments: u32,
    /// Cylinder used when the plant is meshed; `None` keeps the output as lines
    pub cylinder: Option<CylinderSpec>,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            segment_length: 2.0,
            angle_step: 45.0,
            base_angle: 90.0,
            leaf_radius: 0.45,
            leaf_segments: 15,
            cylinder: None,
        }
    }
}

impl TurtleConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.segment_length, self.angle_step, self.base_angle, self.leaf_radius];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(LSystemError::InvalidConfig("lengths and angles must be finite".into()));
        }
        if self.leaf_segments < 3 {
            return Err(LSystemError::InvalidConfig(format!(
                "a leaf needs at least 3 segments, got {}",
                self.leaf_segments
            )));
        }
        if let Some(cylinder) = &self.cylinder {
            cylinder.validate()?;
        }
        Ok(())
    }
}

/// Position plus the per-axis angle accumulators and the active axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub angle_z: f32,
    pub angle_x: f32,
    pub active_axis: Axis,
}

impl Pose {
    pub fn angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Z => self.angle_z,
            Axis::X => self.angle_x,
        }
    }

    fn turn(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::Z => self.angle_z += degrees,
            Axis::X => self.angle_x += degrees,
        }
        self.active_axis = axis;
    }

    /// Position after stepping `length` along the active heading
    pub fn forward(&self, length: f32) -> Vec3 {
        let p = self.position;
        let theta = self.angle(self.active_axis);
        match self.active_axis {
            Axis::Z => {
                let xy = rotate_about(p.truncate(), Vec2::new(p.x, p.y + length), theta);
                Vec3::new(xy.x, xy.y, p.z)
            }
            Axis::X => {
                let yz = rotate_about(Vec2::new(p.y, p.z), Vec2::new(p.y + length, p.z), theta);
                Vec3::new(p.x, yz.x, yz.y)
            }
        }
    }

    /// Rotation taking +Y onto the active heading
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(self.active_axis.unit(), -self.angle(self.active_axis).to_radians())
    }
}

/// Rotate `point` about `pivot` by `degrees`, positive clockwise
pub fn rotate_about(pivot: Vec2, point: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = (-degrees.to_radians()).sin_cos();
    let d = point - pivot;
    Vec2::new(cos * d.x - sin * d.y + pivot.x, sin * d.x + cos * d.y + pivot.y)
}

/// Closed polygon of `segments` edges around `center` in the XY plane.
///
/// Returns `segments + 1` points; the last repeats the first.
pub fn leaf_polygon(center: Vec3, radius: f32, segments: u32) -> Vec<Vec3> {
    let step = 360.0 / segments as f32;
    (0..=segments)
        .map(|i| {
            let (sin, cos) = (((i + 1) as f32) * step).to_radians().sin_cos();
            Vec3::new(sin * radius + center.x, cos * radius + center.y, center.z)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
    /// Branch depth (open pushes) when drawn
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub center: Vec3,
    pub outline: Vec<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurtleCounters {
    pub draws: usize,
    pub moves: usize,
    pub turns: usize,
    pub pushes: usize,
    pub pops: usize,
    pub leaves: usize,
    /// Symbols without an action
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurtleOutput {
    pub segments: Vec<Segment>,
    /// Connected polylines, split at pops and moves
    pub runs: Vec<Vec<Vec3>>,
    pub leaves: Vec<Leaf>,
    /// One per drawn segment, in draw order
    pub placements: Vec<Placement>,
    pub counters: TurtleCounters,
    pub final_pose: Pose,
    pub max_depth: usize,
}

struct Turtle<'a> {
    config: &'a TurtleConfig,
    pose: Pose,
    stack: Vec<Pose>,
    run: Vec<Vec3>,
    output: TurtleOutput,
}

impl<'a> Turtle<'a> {
    fn new(config: &'a TurtleConfig) -> Self {
        Self {
            config,
            pose: Pose::default(),
            stack: Vec::new(),
            run: Vec::new(),
            output: TurtleOutput::default(),
        }
    }

    fn draw(&mut self) {
        let start = self.pose.position;
        let end = self.pose.forward(self.config.segment_length);

        self.output.segments.push(Segment {
            start,
            end,
            depth: self.stack.len(),
        });
        self.output.placements.push(Placement {
            base: start,
            rotation: self.pose.rotation(),
            length: self.config.segment_length,
        });
        if self.run.is_empty() {
            self.run.push(start);
        }
        self.run.push(end);

        self.pose.position = end;
        self.output.counters.draws += 1;
    }

    fn close_run(&mut self) {
        let run = std::mem::take(&mut self.run);
        if run.len() >= 2 {
            self.output.runs.push(run);
        }
    }

    fn apply_turn(&mut self, turn: &Turn) {
        self.pose.turn(turn.axis, turn.degrees(self.config));
        self.output.counters.turns += 1;
    }

    fn step(&mut self, index: usize, action: Action) -> Result<()> {
        match action {
            Action::Draw => self.draw(),
            Action::Move => {
                self.close_run();
                self.pose.position = self.pose.forward(self.config.segment_length);
                self.output.counters.moves += 1;
            }
            Action::Turn(turn) => self.apply_turn(&turn),
            Action::Push { turn } => {
                self.stack.push(self.pose);
                self.output.max_depth = self.output.max_depth.max(self.stack.len());
                self.output.counters.pushes += 1;
                if let Some(turn) = turn {
                    self.apply_turn(&turn);
                }
            }
            Action::Pop { turn } => {
                self.pose = self.stack.pop().ok_or(LSystemError::UnbalancedStack { index, depth: 0 })?;
                self.close_run();
                self.output.counters.pops += 1;
                if let Some(turn) = turn {
                    self.apply_turn(&turn);
                }
            }
            Action::Leaf => {
                self.draw();
                let center = self.pose.position;
                self.output.leaves.push(Leaf {
                    center,
                    outline: leaf_polygon(center, self.config.leaf_radius, self.config.leaf_segments),
                });
                self.output.counters.leaves += 1;
            }
        }
        Ok(())
    }
}

/// Run the turtle over `symbols`.
///
/// Fails with `UnbalancedStack` on a pop with nothing saved, or when the input
/// ends with branches still open.
pub fn interpret(symbols: &str, table: &SymbolTable, config: &TurtleConfig) -> Result<TurtleOutput> {
    config.validate()?;
    let mut turtle = Turtle::new(config);
    let mut count = 0;

    for (index, ch) in symbols.chars().enumerate() {
        count = index + 1;
        match table.get(ch) {
            Some(action) => turtle.step(index, action)?,
            None => turtle.output.counters.skipped += 1,
        }
    }

    if !turtle.stack.is_empty() {
        return Err(LSystemError::UnbalancedStack {
            index: count,
            depth: turtle.stack.len(),
        });
    }

    turtle.close_run();
    let mut output = turtle.output;
    output.final_pose = turtle.pose;

    log::debug!(
        "Turtle read {} symbols: {} segments, {} leaves, {} runs, max depth {}",
        count,
        output.segments.len(),
        output.leaves.len(),
        output.runs.len(),
        output.max_depth
    );

    Ok(output)
}
