//! Parametric displacement functions `f(x, z, A, B)`.
//!
//! Each function carries the display label and the A/B ranges its sliders were
//! built with; hosts can drive `Displacement` directly instead of sliders.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFunction {
    /// `x cos(A x) sin(B z)`
    Wave,
    /// `A sin(B sqrt(x^2 + z^2))`
    Ripple,
    /// `-A (B - 0.2 sqrt(x^2 + z^2))^2`
    Crater,
    /// `A z sin(B x z)`
    Saddle,
    /// `A cos(B (|x| + |z|))`
    Diamond,
}

impl MapFunction {
    pub const ALL: [MapFunction; 5] = [
        MapFunction::Wave,
        MapFunction::Ripple,
        MapFunction::Crater,
        MapFunction::Saddle,
        MapFunction::Diamond,
    ];

    pub fn evaluate(self, x: f32, z: f32, a: f32, b: f32) -> f32 {
        match self {
            MapFunction::Wave => x * (a * x).cos() * (b * z).sin(),
            MapFunction::Ripple => a * (b * (x * x + z * z).sqrt()).sin(),
            MapFunction::Crater => -a * (b - 0.2 * (x * x + z * z).sqrt()).powi(2),
            MapFunction::Saddle => a * z * (b * x * z).sin(),
            MapFunction::Diamond => a * (b * (x.abs() + z.abs())).cos(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapFunction::Wave => "x cos(A x) sin(B z)",
            MapFunction::Ripple => "A sin(B sqrt(x^2 + z^2))",
            MapFunction::Crater => "-A (B - 0.2 sqrt(x^2 + z^2))^2",
            MapFunction::Saddle => "A z sin(B x z)",
            MapFunction::Diamond => "A cos(B (|x| + |z|))",
        }
    }

    /// Inclusive (min, max) for A
    pub fn a_range(self) -> (f32, f32) {
        match self {
            MapFunction::Wave => (0.0, 0.2),
            MapFunction::Ripple => (0.0, 5.0),
            MapFunction::Crater => (-1.0, 5.0),
            MapFunction::Saddle => (0.0, 1.0),
            MapFunction::Diamond => (0.0, 5.0),
        }
    }

    /// Inclusive (min, max) for B
    pub fn b_range(self) -> (f32, f32) {
        match self {
            MapFunction::Wave => (0.0, 0.2),
            MapFunction::Ripple => (0.0, 1.0),
            MapFunction::Crater => (0.0, 5.0),
            MapFunction::Saddle => (0.0, 0.05),
            MapFunction::Diamond => (0.0, 0.5),
        }
    }

    pub fn a_center(self) -> f32 {
        let (lo, hi) = self.a_range();
        (lo + hi) / 2.0
    }

    pub fn b_center(self) -> f32 {
        let (lo, hi) = self.b_range();
        (lo + hi) / 2.0
    }
}

/// A map function bound to its current A and B
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub function: MapFunction,
    pub a: f32,
    pub b: f32,
}

impl Displacement {
    pub fn new(function: MapFunction, a: f32, b: f32) -> Self {
        Self { function, a, b }
    }

    /// Function with A and B at their range centres
    pub fn centered(function: MapFunction) -> Self {
        Self::new(function, function.a_center(), function.b_center())
    }

    /// Switch function; A and B reset to the new ranges' centres
    pub fn select(&mut self, function: MapFunction) {
        *self = Self::centered(function);
    }

    pub fn set_a(&mut self, a: f32) {
        let (lo, hi) = self.function.a_range();
        self.a = a.clamp(lo, hi);
    }

    pub fn set_b(&mut self, b: f32) {
        let (lo, hi) = self.function.b_range();
        self.b = b.clamp(lo, hi);
    }

    pub fn evaluate(&self, x: f32, z: f32) -> f32 {
        self.function.evaluate(x, z, self.a, self.b)
    }
}
