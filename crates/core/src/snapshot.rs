use serde::{Deserialize, Serialize};

use crate::board::BoardRows;
use crate::game_state::{Statistics, Tetromino};
use crate::mercy::MercyStats;
use crate::pieces::PieceTable;
use crate::types::{Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board coordinates of the occupied cells (may include rows above the top)
    pub cells: Vec<(i8, i8)>,
    pub color: String,
}

impl ActiveSnapshot {
    pub fn new(piece: Tetromino, table: &PieceTable) -> Self {
        Self {
            kind: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
            cells: piece
                .cells(table)
                .iter()
                .map(|&(dx, dy)| (piece.x + dx, piece.y + dy))
                .collect(),
            color: table.get(piece.kind).color().to_string(),
        }
    }
}

/// Owned copy of everything a renderer or analytics sink needs
///
/// Mutating a snapshot never touches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: BoardRows,
    pub current: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub phase: Phase,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    pub lock_delay_ms: u32,
    pub stats: Statistics,
    pub mercy: Option<MercyStats>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Number of filled cells on the board
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            ghost_y: None,
            next: None,
            hold: None,
            can_hold: true,
            phase: Phase::Menu,
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: crate::types::BASE_DROP_MS,
            lock_delay_ms: 0,
            stats: Statistics::default(),
            mercy: None,
        }
    }
}
