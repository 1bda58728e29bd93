//! Maze storage, generation and the background generation bridge.
//!
//! - [`chunk`]: fixed-size cell bitsets
//! - [`generator`]: the chunked [`Maze`] and its backtracking carver
//! - [`progress`]: progress/cancel atomics and the threaded [`MazeLoader`]

pub mod chunk;
pub mod generator;
pub mod progress;

use std::fmt;

pub use self::chunk::Chunk;
pub use self::generator::{Cell, Direction, Maze};
pub use self::progress::{GenerationControl, GenerationObserver, LoadState, LogProgress, MazeLoader};

/// Errors raised while constructing or restoring a [`Maze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Room dimensions below 1 (or too large to double).
    InvalidDimensions {
        /// Requested rooms across.
        width: i32,
        /// Requested rooms down.
        height: i32,
    },
    /// Persisted chunk data does not cover the grid.
    ChunkCount {
        /// Chunks required by the dimensions.
        expected: usize,
        /// Chunks supplied.
        found: usize,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { width, height } => {
                write!(f, "invalid maze dimensions {}x{}", width, height)
            }
            MazeError::ChunkCount { expected, found } => {
                write!(f, "expected {} chunks, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for MazeError {}
