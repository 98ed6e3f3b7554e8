//! NeonDrop (workspace facade crate).
//!
//! Re-exports the engine crates under `neon_drop::{core, types}` so hosts depend on a single
//! package while the implementation lives in dedicated crates under `crates/`.

pub use neon_drop_core as core;
pub use neon_drop_types as types;
