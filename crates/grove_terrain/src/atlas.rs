//! Texture atlas addressing.
//!
//! Tiles are square, `tile_size` texels wide, packed row-major into a
//! `columns x rows` grid. Only the layout lives here; reading and writing the
//! atlas image is the host's concern.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Column/row address of one atlas tile, row 0 at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasCell {
    pub col: u32,
    pub row: u32,
}

impl AtlasCell {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// UV rectangle in [0, 1] atlas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Order in which a quad's four vertices receive their UV corners.
///
/// Quad vertices are emitted as `(x, z), (x, z+1), (x+1, z), (x+1, z+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvCornerOrder {
    /// `(min,min), (min,max), (max,min), (max,max)`, matching the vertex grid
    #[default]
    Grid,
    /// `(min,min), (min,max), (max,max), (max,min)`
    Loop,
}

impl UvRect {
    pub fn corners(&self, order: UvCornerOrder) -> [[f32; 2]; 4] {
        match order {
            UvCornerOrder::Grid => [
                [self.u0, self.v0],
                [self.u0, self.v1],
                [self.u1, self.v0],
                [self.u1, self.v1],
            ],
            UvCornerOrder::Loop => [
                [self.u0, self.v0],
                [self.u0, self.v1],
                [self.u1, self.v1],
                [self.u1, self.v0],
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AtlasSpec", into = "AtlasSpec")]
pub struct AtlasLayout {
    tile_count: u32,
    tile_size: u32,
    columns: u32,
    rows: u32,
}

/// Serialized form of an [`AtlasLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasSpec {
    pub tile_count: u32,
    pub tile_size: u32,
}

impl TryFrom<AtlasSpec> for AtlasLayout {
    type Error = TerrainError;

    fn try_from(spec: AtlasSpec) -> Result<Self> {
        AtlasLayout::new(spec.tile_count, spec.tile_size)
    }
}

impl From<AtlasLayout> for AtlasSpec {
    fn from(layout: AtlasLayout) -> Self {
        AtlasSpec {
            tile_count: layout.tile_count,
            tile_size: layout.tile_size,
        }
    }
}

impl Default for AtlasLayout {
    /// 4x4 grid of 16px block textures
    fn default() -> Self {
        Self {
            tile_count: 16,
            tile_size: 16,
            columns: 4,
            rows: 4,
        }
    }
}

impl AtlasLayout {
    /// Square-ish grid: `ceil(sqrt(n))` columns, one row fewer when that still fits every tile
    pub fn new(tile_count: u32, tile_size: u32) -> Result<Self> {
        if tile_count == 0 {
            return Err(TerrainError::InvalidAtlas("tile count must be at least 1".into()));
        }
        // One texel of inset on each side needs at least 3 texels per tile
        if tile_size < 3 {
            return Err(TerrainError::InvalidAtlas(format!(
                "tile size must be at least 3 texels, got {}",
                tile_size
            )));
        }

        let columns = (tile_count as f64).sqrt().ceil() as u32;
        let rows = if columns as u64 * (columns as u64 - 1) >= tile_count as u64 {
            columns - 1
        } else {
            columns
        };
        if columns.checked_mul(tile_size).is_none() || rows.checked_mul(tile_size).is_none() {
            return Err(TerrainError::InvalidAtlas(format!(
                "{}x{} tiles of {} texels exceed the addressable atlas size",
                columns, rows, tile_size
            )));
        }

        Ok(Self {
            tile_count,
            tile_size,
            columns,
            rows,
        })
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn width_px(&self) -> u32 {
        self.columns * self.tile_size
    }

    pub fn height_px(&self) -> u32 {
        self.rows * self.tile_size
    }

    /// Cell the packer writes the `index`-th tile into
    pub fn cell_for_index(&self, index: u32) -> Option<AtlasCell> {
        if index >= self.tile_count {
            return None;
        }
        Some(AtlasCell::new(index % self.columns, index / self.columns))
    }

    /// Tile rect inset by one texel on every edge so sampling never bleeds into a neighbour
    pub fn uv_rect(&self, cell: AtlasCell) -> Result<UvRect> {
        if cell.col >= self.columns || cell.row >= self.rows {
            return Err(TerrainError::AtlasCellOutOfRange {
                col: cell.col,
                row: cell.row,
                columns: self.columns,
                rows: self.rows,
            });
        }

        let size = self.tile_size as f32;
        let width = self.width_px() as f32;
        let height = self.height_px() as f32;

        Ok(UvRect {
            u0: (cell.col as f32 * size + 1.0) / width,
            v0: (cell.row as f32 * size + 1.0) / height,
            u1: ((cell.col + 1) as f32 * size - 1.0) / width,
            v1: ((cell.row + 1) as f32 * size - 1.0) / height,
        })
    }
}
