use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{LSystemError, Result};

/// Subdivision and radius of the branch cylinder; its height is the segment length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderSpec {
    pub radial_segments: u32,
    pub height_segments: u32,
    pub radius: f32,
}

impl Default for CylinderSpec {
    fn default() -> Self {
        Self {
            radial_segments: 8,
            height_segments: 2,
            radius: 0.1,
        }
    }
}

impl CylinderSpec {
    pub fn validate(&self) -> Result<()> {
        if self.radial_segments < 3 {
            return Err(LSystemError::InvalidConfig(format!(
                "cylinder needs at least 3 radial segments, got {}",
                self.radial_segments
            )));
        }
        if self.height_segments == 0 {
            return Err(LSystemError::InvalidConfig("cylinder needs at least 1 height segment".into()));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(LSystemError::InvalidConfig(format!("cylinder radius must be positive, got {}", self.radius)));
        }
        Ok(())
    }

    /// Triangles per cylinder: two fan triangles plus two per side cell, per radial step
    pub fn triangle_count(&self) -> usize {
        self.radial_segments as usize * (2 + 2 * self.height_segments as usize)
    }
}

/// A triangle soup with flat normals, standing on the origin and extending along +Y
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub min: Vec3,
    pub max: Vec3,
}

/// Build the unit branch of height `length`.
///
/// Per radial step: a top fan triangle, a bottom fan triangle and two triangles
/// for every height division of the side. Vertices are not shared.
pub fn build_cylinder(spec: &CylinderSpec, length: f32) -> Result<CylinderMesh> {
    spec.validate()?;
    if !length.is_finite() {
        return Err(LSystemError::InvalidConfig(format!("cylinder length must be finite, got {}", length)));
    }

    let theta_step = TAU / spec.radial_segments as f32;
    let height_step = length / spec.height_segments as f32;
    let ring = |angle: f32, y: f32| Vec3::new(angle.cos() * spec.radius, y, angle.sin() * spec.radius);

    let mut triangles: Vec<[Vec3; 3]> = Vec::with_capacity(spec.triangle_count());
    for i in 0..spec.radial_segments {
        let theta = i as f32 * theta_step;
        let theta_next = (i + 1) as f32 * theta_step;

        triangles.push([ring(theta_next, length), ring(theta, length), Vec3::new(0.0, length, 0.0)]);
        triangles.push([Vec3::ZERO, ring(theta, 0.0), ring(theta_next, 0.0)]);

        for h in 0..spec.height_segments {
            let min_h = h as f32 * height_step;
            let max_h = (h + 1) as f32 * height_step;
            triangles.push([ring(theta, max_h), ring(theta_next, max_h), ring(theta, min_h)]);
            triangles.push([ring(theta_next, max_h), ring(theta_next, min_h), ring(theta, min_h)]);
        }
    }

    let mut positions = Vec::with_capacity(triangles.len() * 3);
    let mut normals = Vec::with_capacity(triangles.len() * 3);
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for [a, b, c] in &triangles {
        let normal = (*b - *a).cross(*c - *a).normalize_or_zero();
        for p in [a, b, c] {
            positions.push(p.to_array());
            normals.push(normal.to_array());
            min = min.min(*p);
            max = max.max(*p);
        }
    }
    let indices = (0..positions.len() as u32).collect();

    Ok(CylinderMesh {
        positions,
        normals,
        indices,
        min,
        max,
    })
}

/// Where one cylinder instance goes: `base` is the segment start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub base: Vec3,
    pub rotation: Quat,
    pub length: f32,
}

impl Placement {
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.base
    }

    /// Far end of the segment this placement covers
    pub fn tip(&self) -> Vec3 {
        self.transform_point(Vec3::new(0.0, self.length, 0.0))
    }
}

/// Every cylinder instance of a plant merged into one buffer set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl PlantMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `cylinder` transformed by `placement`
    pub fn instance(&mut self, cylinder: &CylinderMesh, placement: &Placement) {
        let base_index = self.positions.len() as u32;

        self.positions.extend(
            cylinder
                .positions
                .iter()
                .map(|p| placement.transform_point(Vec3::from_array(*p)).to_array()),
        );
        self.normals.extend(
            cylinder
                .normals
                .iter()
                .map(|n| (placement.rotation * Vec3::from_array(*n)).to_array()),
        );
        self.indices.extend(cylinder.indices.iter().map(|i| base_index + i));
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
