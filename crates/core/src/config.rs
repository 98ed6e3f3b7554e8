//! Configuration module - piece table and timing constants
//!
//! The host supplies configuration once at startup. [`RawConfig`] mirrors the JSON layout the
//! web client ships (`LOCK_DELAY`, `LOCK_DELAY_FLOAT`, `PIECES`); [`GameConfig`] is the
//! validated, immutable form the engine runs on. Validation fails fast so a bad piece table
//! never reaches gameplay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::pieces::{
    centered_spawn_x, matrix_from_rows, PieceShape, PieceTable, MAX_SHAPE_DIM,
};
use crate::types::{
    PieceKind, BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_LOCK_DELAY_FLOAT_MS, DEFAULT_LOCK_DELAY_MS,
};

/// One entry of the `PIECES` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDefinition {
    /// Rows of 0/1 cells, top row first
    pub shape: Vec<Vec<u8>>,
    /// Colour token for rendering
    pub color: String,
    /// Spawn position; centred on row 0 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn: Option<[i8; 2]>,
}

/// Configuration as it appears on disk / over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawConfig {
    #[serde(default = "default_lock_delay")]
    pub lock_delay: u32,
    #[serde(default = "default_lock_delay_float")]
    pub lock_delay_float: u32,
    /// Piece name (`"I"` .. `"Z"`, `"FLOAT"`) to definition; built-in table when absent
    #[serde(default)]
    pub pieces: Option<BTreeMap<String, PieceDefinition>>,
}

fn default_lock_delay() -> u32 {
    DEFAULT_LOCK_DELAY_MS
}

fn default_lock_delay_float() -> u32 {
    DEFAULT_LOCK_DELAY_FLOAT_MS
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            lock_delay: DEFAULT_LOCK_DELAY_MS,
            lock_delay_float: DEFAULT_LOCK_DELAY_FLOAT_MS,
            pieces: None,
        }
    }
}

impl RawConfig {
    /// Parse without validating
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and compile into a [`GameConfig`]
    pub fn validate(self) -> Result<GameConfig> {
        if self.lock_delay == 0 {
            return Err(ConfigError::ZeroLockDelay("LOCK_DELAY"));
        }
        if self.lock_delay_float == 0 {
            return Err(ConfigError::ZeroLockDelay("LOCK_DELAY_FLOAT"));
        }

        let pieces = match self.pieces {
            None => PieceTable::standard(),
            Some(defs) => compile_table(defs)?,
        };

        Ok(GameConfig {
            lock_delay_ms: self.lock_delay,
            lock_delay_float_ms: self.lock_delay_float,
            pieces,
        })
    }
}

fn compile_table(defs: BTreeMap<String, PieceDefinition>) -> Result<PieceTable> {
    let mut slots: [Option<PieceShape>; 8] = Default::default();

    for (name, def) in defs {
        let kind = PieceKind::from_str(&name).ok_or(ConfigError::UnknownPiece(name))?;
        let slot = &mut slots[kind.index()];
        if slot.is_some() {
            return Err(ConfigError::DuplicatePiece(kind));
        }
        *slot = Some(compile_piece(kind, def)?);
    }

    let mut shapes = Vec::with_capacity(8);
    for kind in PieceKind::ALL {
        let shape = slots[kind.index()]
            .take()
            .ok_or(ConfigError::MissingPiece(kind))?;
        shapes.push(shape);
    }

    let shapes: [PieceShape; 8] = shapes
        .try_into()
        .map_err(|_| ConfigError::MissingPiece(PieceKind::Float))?;
    Ok(PieceTable::from_shapes(shapes))
}

fn compile_piece(kind: PieceKind, def: PieceDefinition) -> Result<PieceShape> {
    let rows = def.shape.len();
    let cols = def.shape.first().map_or(0, Vec::len);

    if def.shape.iter().any(|row| row.len() != cols) {
        return Err(ConfigError::RaggedShape(kind));
    }
    if rows > MAX_SHAPE_DIM || cols > MAX_SHAPE_DIM {
        return Err(ConfigError::ShapeTooLarge { kind, rows, cols });
    }

    let base = matrix_from_rows(&def.shape);
    if !base.iter().flatten().any(|&filled| filled) {
        return Err(ConfigError::EmptyShape(kind));
    }

    let spawn = match def.spawn {
        Some([x, y]) => (x, y),
        None => (centered_spawn_x(cols), 0),
    };
    if spawn.0 < 0 || spawn.0 as usize + cols > BOARD_WIDTH as usize {
        return Err(ConfigError::SpawnOutOfBounds { kind, x: spawn.0 });
    }

    // The lowest filled row must land on the board.
    let bottom = base.iter().rposition(|row| row.iter().any(|&filled| filled));
    let landing = bottom.map_or(i16::MIN, |row| i16::from(spawn.1) + row as i16);
    if !(0..i16::from(BOARD_HEIGHT)).contains(&landing) {
        return Err(ConfigError::SpawnRowOutOfBounds { kind, y: spawn.1 });
    }

    Ok(PieceShape::compile(kind, base, def.color, spawn))
}

/// Validated, immutable engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    lock_delay_ms: u32,
    lock_delay_float_ms: u32,
    pieces: PieceTable,
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    ///
    /// ```
    /// use neon_drop_core::GameConfig;
    ///
    /// let config = GameConfig::from_json(r#"{"LOCK_DELAY": 400, "LOCK_DELAY_FLOAT": 1200}"#)
    ///     .unwrap();
    /// assert_eq!(config.lock_delay_ms(), 400);
    /// assert_eq!(config.lock_delay_float_ms(), 1200);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        RawConfig::from_json(json)?.validate()
    }

    /// Base lock delay for standard pieces
    pub fn lock_delay_ms(&self) -> u32 {
        self.lock_delay_ms
    }

    /// Lock delay for FLOAT pieces
    pub fn lock_delay_float_ms(&self) -> u32 {
        self.lock_delay_float_ms
    }

    pub fn pieces(&self) -> &PieceTable {
        &self.pieces
    }

    /// Lock delay policy: a lookup keyed on piece kind
    pub fn lock_delay_for(&self, kind: PieceKind) -> u32 {
        if kind.is_standard() {
            self.lock_delay_ms
        } else {
            self.lock_delay_float_ms
        }
    }

    /// Export back to the on-disk layout
    pub fn to_raw(&self) -> RawConfig {
        let pieces = self
            .pieces
            .iter()
            .map(|shape| {
                let def = PieceDefinition {
                    shape: shape
                        .base()
                        .iter()
                        .map(|row| row.iter().map(|&b| u8::from(b)).collect())
                        .collect(),
                    color: shape.color().to_string(),
                    spawn: Some([shape.spawn().0, shape.spawn().1]),
                };
                (shape.kind().as_str().to_string(), def)
            })
            .collect();

        RawConfig {
            lock_delay: self.lock_delay_ms,
            lock_delay_float: self.lock_delay_float_ms,
            pieces: Some(pieces),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lock_delay_ms: DEFAULT_LOCK_DELAY_MS,
            lock_delay_float_ms: DEFAULT_LOCK_DELAY_FLOAT_MS,
            pieces: PieceTable::standard(),
        }
    }
}
