//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the NeonDrop rules: the board simulation and the daily-seeded mercy
//! system that decides when to hand out an easier FLOAT piece. It has **zero dependencies**
//! on rendering, networking, or I/O:
//!
//! - **Deterministic**: the same daily seed and stack heights give the same mercy decisions,
//!   and the same bag seed gives the same piece order
//! - **Host-driven**: the host feeds elapsed milliseconds and input events; the engine never
//!   sleeps or reads a clock
//! - **Silent**: illegal moves are rejected without errors; game over is a phase
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision, stack height and line clearing
//! - [`config`]: JSON configuration and the validated [`GameConfig`]
//! - [`error`]: configuration errors
//! - [`game_state`]: [`BoardEngine`], the session state machine
//! - [`mercy`]: [`MercySystem`], deterministic FLOAT piece decisions
//! - [`pieces`]: shape matrices and the naive rotation transform
//! - [`rng`]: 7-bag piece generation
//! - [`scoring`]: line clear points, levels and gravity
//! - [`snapshot`]: owned state copies for rendering
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer** for standard pieces, with mercy FLOAT pieces bypassing the bag
//! - **Naive rotation**: transpose-and-reverse, no wall kicks
//! - **Lock Delay**: 500ms for standard pieces, 1000ms for FLOAT pieces (configurable)
//! - **Hold**: store one piece, once per spawned piece
//! - **Scoring**: 100/300/500/800 times the level before the clear
//!
//! # Example
//!
//! ```
//! use neon_drop_core::{BoardEngine, GameConfig, MercySystem};
//! use neon_drop_core::types::{GameAction, Phase};
//!
//! let mut engine = BoardEngine::with_mercy(GameConfig::default(), 7, MercySystem::new(12345));
//! engine.handle_input(GameAction::Start);
//! assert_eq!(engine.phase(), Phase::Playing);
//!
//! engine.handle_input(GameAction::MoveRight);
//! engine.handle_input(GameAction::HardDrop);
//! assert_eq!(engine.statistics().pieces_placed, 1);
//!
//! // Feed elapsed time every frame.
//! engine.update(16);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod mercy;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use neon_drop_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{GameConfig, PieceDefinition, RawConfig};
pub use error::ConfigError;
pub use game_state::{BoardEngine, Statistics, Tetromino};
pub use mercy::{MercyStats, MercySystem};
pub use pieces::{PieceShape, PieceTable};
pub use rng::{BagRng, PieceQueue};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
