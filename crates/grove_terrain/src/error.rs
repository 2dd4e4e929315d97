use thiserror::Error;

/// Errors raised while sampling, classifying or meshing a heightfield.
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid grid dimensions: {width}x{depth} (both must be at least 1)")]
    InvalidGridDimensions { width: u32, depth: u32 },

    #[error("height source returned non-finite value {value} at ({x}, {z})")]
    NonFiniteHeight { x: i32, z: i32, value: f32 },

    #[error("invalid atlas layout: {0}")]
    InvalidAtlas(String),

    #[error("atlas cell ({col}, {row}) is outside the {columns}x{rows} layout")]
    AtlasCellOutOfRange {
        col: u32,
        row: u32,
        columns: u32,
        rows: u32,
    },

    #[error("invalid voronoi request: {0}")]
    InvalidVoronoi(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
