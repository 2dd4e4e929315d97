use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LSystemError {
    /// Rule keys must be exactly one symbol of the declared alphabet
    #[error("invalid rule key {key:?}: {reason}")]
    InvalidRule { key: String, reason: String },

    /// A pop with nothing pushed (`depth == 0`), or pushes left open when the input ends
    #[error("unbalanced branch stack at symbol {index} (open branches: {depth})")]
    UnbalancedStack { index: usize, depth: usize },

    #[error("invalid turtle configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LSystemError>;
