//! Error types for the CullTree spatial index
//!
//! Culling queries never fail — an empty visible set is a valid
//! result. Errors only arise from misconfiguration: building a tree
//! over degenerate world bounds or supplying unusable detail-culling
//! parameters.

use std::fmt;

/// Result type for CullTree operations
pub type Result<T> = std::result::Result<T, Error>;

/// CullTree errors
#[derive(Debug, Clone)]
pub enum Error {
    /// World bounds are degenerate on a subdivided axis (min >= max)
    InvalidWorldBounds(String),

    /// Detail culling parameters are out of range
    InvalidCullingParams(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidWorldBounds(msg) => write!(f, "Invalid world bounds: {}", msg),
            Error::InvalidCullingParams(msg) => write!(f, "Invalid culling params: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
