/// Error types for engine configuration
use thiserror::Error;

use crate::types::PieceKind;

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig)
///
/// Gameplay itself never fails: illegal moves are rejected silently and game over is a
/// phase, not an error. Only startup configuration can be wrong.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration JSON could not be parsed
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A piece name in the table is not one of I, J, L, O, S, T, Z, FLOAT
    #[error("Unknown piece name: {0}")]
    UnknownPiece(String),

    /// The table has no definition for a piece kind
    #[error("Missing piece definition: {0:?}")]
    MissingPiece(PieceKind),

    /// Shape has no occupied cell
    #[error("Piece {0:?} has an empty shape")]
    EmptyShape(PieceKind),

    /// Shape rows have different lengths
    #[error("Piece {0:?} has a ragged shape matrix")]
    RaggedShape(PieceKind),

    /// Shape does not fit a 4x4 box
    #[error("Piece {kind:?} shape is {rows}x{cols}, larger than 4x4")]
    ShapeTooLarge {
        /// Offending piece
        kind: PieceKind,
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Spawn offset places a cell outside the board columns
    #[error("Piece {kind:?} spawn column {x} puts cells outside the board")]
    SpawnOutOfBounds {
        /// Offending piece
        kind: PieceKind,
        /// Configured spawn column
        x: i8,
    },

    /// Spawn row leaves the lowest filled row below the floor or above the top edge
    #[error("Piece {kind:?} spawn row {y} puts it off the board")]
    SpawnRowOutOfBounds {
        /// Offending piece
        kind: PieceKind,
        /// Configured spawn row
        y: i8,
    },

    /// Two names in the table resolve to the same piece kind
    #[error("Piece {0:?} is defined more than once")]
    DuplicatePiece(PieceKind),

    /// Lock delays must be positive; zero means "no countdown"
    #[error("Lock delay for {0} must be greater than zero")]
    ZeroLockDelay(&'static str),
}
