//! Game state module - the board engine
//!
//! [`BoardEngine`] ties together the board, piece table, 7-bag queue, optional mercy system and
//! scoring. It handles gravity, lock delay, movement, naive rotation, line clears, hold and the
//! session lifecycle. Illegal moves are rejected silently; methods return whether they changed
//! anything.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::mercy::{MercyStats, MercySystem};
use crate::pieces::{MinoOffset, PieceTable};
use crate::rng::PieceQueue;
use crate::scoring::{apply_line_clear, get_drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a piece at its configured spawn position, base orientation
    pub fn spawn(kind: PieceKind, table: &PieceTable) -> Self {
        let (x, y) = table.get(kind).spawn();
        Self {
            kind,
            rotation: Rotation::R0,
            x,
            y,
        }
    }

    /// Cell offsets for the current rotation
    pub fn cells<'a>(&self, table: &'a PieceTable) -> &'a [MinoOffset] {
        table.get(self.kind).cells(self.rotation)
    }
}

/// Cumulative session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub pieces_placed: u32,
    pub float_pieces_spawned: u32,
}

/// Per-session state, replaced wholesale on restart
#[derive(Debug, Clone)]
struct GameState {
    board: Board,
    current: Option<Tetromino>,
    next: Option<PieceKind>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: PieceQueue,
    score: u32,
    lines: u32,
    level: u32,
    phase: Phase,
    drop_interval_ms: u32,
    drop_timer_ms: u32,
    /// Remaining lock delay; 0 means no countdown
    lock_delay_ms: u32,
    stats: Statistics,
}

impl GameState {
    fn new(bag_seed: u32) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            hold: None,
            can_hold: true,
            queue: PieceQueue::new(bag_seed),
            score: 0,
            lines: 0,
            level: 1,
            phase: Phase::Menu,
            drop_interval_ms: get_drop_interval_ms(1),
            drop_timer_ms: 0,
            lock_delay_ms: 0,
            stats: Statistics::default(),
        }
    }
}

/// Authoritative board simulation for one session
#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: GameConfig,
    mercy: Option<MercySystem>,
    state: GameState,
}

impl BoardEngine {
    /// Engine dealing only from the 7-bag
    pub fn new(config: GameConfig, bag_seed: u32) -> Self {
        Self {
            config,
            mercy: None,
            state: GameState::new(bag_seed),
        }
    }

    /// Engine that asks `mercy` before every bag draw
    pub fn with_mercy(config: GameConfig, bag_seed: u32, mercy: MercySystem) -> Self {
        Self {
            config,
            mercy: Some(mercy),
            state: GameState::new(bag_seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lines(&self) -> u32 {
        self.state.lines
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.state.drop_interval_ms
    }

    pub fn lock_delay_remaining_ms(&self) -> u32 {
        self.state.lock_delay_ms
    }

    pub fn current(&self) -> Option<Tetromino> {
        self.state.current
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.state.next
    }

    pub fn held_piece(&self) -> Option<PieceKind> {
        self.state.hold
    }

    pub fn can_hold(&self) -> bool {
        self.state.can_hold
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn statistics(&self) -> Statistics {
        self.state.stats
    }

    pub fn mercy_stats(&self) -> Option<MercyStats> {
        self.mercy.as_ref().map(MercySystem::stats)
    }

    /// Tallest column height, recomputed from the board
    pub fn stack_height(&self) -> u32 {
        self.state.board.stack_height()
    }

    /// Owned snapshot for rendering
    pub fn snapshot(&self) -> GameSnapshot {
        let table = self.config.pieces();
        GameSnapshot {
            board: self.state.board.rows(),
            current: self.state.current.map(|p| ActiveSnapshot::new(p, table)),
            ghost_y: self.ghost_y(),
            next: self.state.next,
            hold: self.state.hold,
            can_hold: self.state.can_hold,
            phase: self.state.phase,
            score: self.state.score,
            lines: self.state.lines,
            level: self.state.level,
            drop_interval_ms: self.state.drop_interval_ms,
            lock_delay_ms: self.state.lock_delay_ms,
            stats: self.state.stats,
            mercy: self.mercy_stats(),
        }
    }

    /// Start a session from the menu, or a fresh one after game over
    pub fn start_game(&mut self) -> bool {
        match self.state.phase {
            Phase::Menu => {}
            Phase::GameOver => self.state = GameState::new(self.state.queue.seed()),
            Phase::Playing | Phase::Paused => return false,
        }

        if let Some(mercy) = self.mercy.as_mut() {
            mercy.reset();
        }

        self.state.phase = Phase::Playing;
        tracing::debug!("game started");
        self.spawn_next();
        true
    }

    /// Throw away the current session and start a new one
    pub fn restart(&mut self) -> bool {
        self.state = GameState::new(self.state.queue.seed());
        self.start_game()
    }

    /// Produce the next piece kind: FLOAT if mercy grants it, otherwise a bag draw
    pub fn generate_piece(&mut self) -> PieceKind {
        if let Some(mercy) = self.mercy.as_mut() {
            let stack_height = self.state.board.stack_height();
            if mercy.should_spawn_float(stack_height) {
                self.state.stats.float_pieces_spawned += 1;
                return PieceKind::Float;
            }
        }
        self.state.queue.draw()
    }

    /// Promote the next piece to current and generate a new next piece
    fn spawn_next(&mut self) -> bool {
        let kind = match self.state.next {
            Some(kind) => kind,
            None => self.generate_piece(),
        };

        if !self.place_spawned(kind) {
            self.state.next = Some(kind);
            return false;
        }

        self.state.next = Some(self.generate_piece());
        self.state.can_hold = true;
        true
    }

    /// Put `kind` at its spawn position, or end the game if it does not fit
    fn place_spawned(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::spawn(kind, self.config.pieces());
        self.state.drop_timer_ms = 0;
        self.state.lock_delay_ms = 0;

        if !self.is_valid_position(piece.kind, piece.x, piece.y, piece.rotation) {
            self.state.current = None;
            self.state.phase = Phase::GameOver;
            tracing::info!(
                score = self.state.score,
                lines = self.state.lines,
                level = self.state.level,
                "game over: {:?} blocked at spawn",
                kind
            );
            return false;
        }

        self.state.current = Some(piece);
        true
    }

    /// Whether `kind` fits at (x, y) with `rotation`
    ///
    /// Cells above the board only need to stay inside the side walls.
    pub fn is_valid_position(&self, kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> bool {
        self.config
            .pieces()
            .get(kind)
            .cells(rotation)
            .iter()
            .all(|&(dx, dy)| match (x.checked_add(dx), y.checked_add(dy)) {
                (Some(cx), Some(cy)) => self.state.board.is_cell_free(cx, cy),
                _ => false,
            })
    }

    /// Whether the current piece rests on the floor or the stack
    fn is_grounded(&self) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };
        match piece.y.checked_add(1) {
            Some(below) => !self.is_valid_position(piece.kind, piece.x, below, piece.rotation),
            None => true,
        }
    }

    /// A countdown only runs while the piece is resting on something
    fn cancel_lock_delay_if_airborne(&mut self) {
        if self.state.lock_delay_ms > 0 && !self.is_grounded() {
            self.state.lock_delay_ms = 0;
        }
    }

    /// Try to move the current piece; returns false (and changes nothing) if blocked
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };

        let (Some(x), Some(y)) = (piece.x.checked_add(dx), piece.y.checked_add(dy)) else {
            return false;
        };
        if !self.is_valid_position(piece.kind, x, y, piece.rotation) {
            return false;
        }

        self.state.current = Some(Tetromino { x, y, ..piece });

        // Moving down means the piece is no longer resting.
        if dy > 0 {
            self.state.lock_delay_ms = 0;
        } else {
            self.cancel_lock_delay_if_airborne();
        }
        true
    }

    /// Try to rotate in place; no kicks are attempted
    pub fn rotate_piece(&mut self, direction: RotateDirection) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };

        let rotation = match direction {
            RotateDirection::Clockwise => piece.rotation.rotate_cw(),
            RotateDirection::CounterClockwise => piece.rotation.rotate_ccw(),
        };
        if !self.is_valid_position(piece.kind, piece.x, piece.y, rotation) {
            return false;
        }

        self.state.current = Some(Tetromino { rotation, ..piece });
        self.cancel_lock_delay_if_airborne();
        true
    }

    /// Move down one row; a blocked soft drop starts the lock countdown
    pub fn soft_drop(&mut self) -> bool {
        if self.move_piece(0, 1) {
            return true;
        }
        self.arm_lock_delay();
        false
    }

    /// Drop to the lowest valid row and lock immediately
    ///
    /// Returns the number of rows dropped.
    pub fn hard_drop(&mut self) -> u32 {
        let Some(piece) = self.state.current else {
            return 0;
        };

        let mut distance: u32 = 0;
        let mut y = piece.y;
        while self.is_valid_position(piece.kind, piece.x, y + 1, piece.rotation) {
            y += 1;
            distance += 1;
        }

        self.state.current = Some(Tetromino { y, ..piece });
        self.lock_piece();
        distance
    }

    /// Lock delay for the current piece kind
    pub fn lock_delay_for(&self, kind: PieceKind) -> u32 {
        self.config.lock_delay_for(kind)
    }

    fn arm_lock_delay(&mut self) {
        if self.state.lock_delay_ms > 0 {
            return;
        }
        if let Some(piece) = self.state.current {
            self.state.lock_delay_ms = self.lock_delay_for(piece.kind);
        }
    }

    /// Stash or swap the current piece, once per spawned piece
    ///
    /// With an empty slot the current kind is stored and the next piece spawns; otherwise the
    /// held kind comes back at its spawn position in base orientation.
    pub fn hold(&mut self) -> bool {
        if !self.state.can_hold {
            return false;
        }
        let Some(piece) = self.state.current else {
            return false;
        };

        match self.state.hold.replace(piece.kind) {
            None => {
                self.state.current = None;
                self.spawn_next();
            }
            Some(held) => {
                self.place_spawned(held);
            }
        }

        self.state.can_hold = false;
        true
    }

    /// Write the current piece into the board, clear lines, score and spawn the next piece
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.state.current.take() else {
            return;
        };

        let cells = piece.cells(self.config.pieces());
        let skipped = self
            .state
            .board
            .lock_cells(cells, piece.x, piece.y, piece.kind);
        if skipped > 0 {
            tracing::warn!(
                kind = ?piece.kind,
                x = piece.x,
                y = piece.y,
                skipped,
                "locked piece partially above the board"
            );
        }

        let cleared = self.state.board.clear_full_rows();
        if !cleared.is_empty() {
            tracing::debug!(rows = ?cleared.as_slice(), "cleared lines");
        }

        self.update_score(cleared.len() as u32);
        self.state.stats.pieces_placed += 1;
        self.spawn_next();
    }

    /// Apply a clear of `lines_cleared` lines to score, lines, level and gravity
    pub fn update_score(&mut self, lines_cleared: u32) {
        let Some(result) = apply_line_clear(lines_cleared, self.state.lines, self.state.level)
        else {
            return;
        };

        if result.level != self.state.level {
            tracing::debug!(level = result.level, "level up");
        }

        self.state.score = self.state.score.saturating_add(result.points);
        self.state.lines = result.lines;
        self.state.level = result.level;
        self.state.drop_interval_ms = result.drop_interval_ms;
    }

    /// Row the current piece would land on
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.state.current?;
        let mut y = piece.y;
        while self.is_valid_position(piece.kind, piece.x, y + 1, piece.rotation) {
            y += 1;
        }
        Some(y)
    }

    /// Advance timers by `delta_ms`: gravity first, then the lock countdown
    ///
    /// Returns true if the piece moved or locked.
    pub fn update(&mut self, delta_ms: u32) -> bool {
        if self.state.phase != Phase::Playing || self.state.current.is_none() {
            return false;
        }

        let mut changed = false;

        self.state.drop_timer_ms = self.state.drop_timer_ms.saturating_add(delta_ms);
        if self.state.drop_timer_ms >= self.state.drop_interval_ms {
            if self.move_piece(0, 1) {
                changed = true;
            } else {
                self.arm_lock_delay();
            }
            self.state.drop_timer_ms = 0;
        }

        self.cancel_lock_delay_if_airborne();
        if self.state.lock_delay_ms > 0 {
            self.state.lock_delay_ms = self.state.lock_delay_ms.saturating_sub(delta_ms);
            if self.state.lock_delay_ms == 0 {
                self.lock_piece();
                changed = true;
            }
        }

        changed
    }

    fn toggle_pause(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::Menu | Phase::GameOver => return false,
        };
        tracing::debug!(phase = ?self.state.phase, "pause toggled");
        true
    }

    /// Apply one input event; returns whether it changed the game
    pub fn handle_input(&mut self, action: GameAction) -> bool {
        match (self.state.phase, action) {
            (Phase::Menu | Phase::GameOver, GameAction::Start) => self.start_game(),
            (Phase::Playing | Phase::Paused, GameAction::Pause) => self.toggle_pause(),
            (Phase::Playing, action) => self.apply_play_action(action),
            _ => false,
        }
    }

    fn apply_play_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(-1, 0),
            GameAction::MoveRight => self.move_piece(1, 0),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => {
                if self.state.current.is_none() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.rotate_piece(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate_piece(RotateDirection::CounterClockwise),
            GameAction::Hold => self.hold(),
            GameAction::Pause | GameAction::Start => false,
        }
    }
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new(GameConfig::default(), 1)
    }
}
