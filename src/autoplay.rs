//! Greedy autoplayer used by the headless simulator.
//!
//! For every spawned piece it tries each rotation and column on a clone of the engine, hard
//! drops, and keeps the placement with the best resulting board.

use neon_drop::core::{Board, BoardEngine};
use neon_drop::types::{GameAction, Phase, BOARD_HEIGHT, BOARD_WIDTH};

/// Inputs that bring the current piece to one placement, ending with a hard drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<GameAction>,
}

/// Empty cells with a filled cell somewhere above them
fn holes(board: &Board) -> u32 {
    let mut holes = 0;
    for x in 0..BOARD_WIDTH as i8 {
        let mut covered = false;
        for y in 0..BOARD_HEIGHT as i8 {
            if board.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

fn placement_actions(rotations: usize, shift: i8) -> Vec<GameAction> {
    let mut actions = vec![GameAction::RotateCw; rotations];
    let step = if shift < 0 {
        GameAction::MoveLeft
    } else {
        GameAction::MoveRight
    };
    actions.extend(std::iter::repeat(step).take(shift.unsigned_abs() as usize));
    actions.push(GameAction::HardDrop);
    actions
}

/// Pick the placement that keeps the stack lowest, then with fewest holes, then most lines
pub fn plan(engine: &BoardEngine) -> Option<Plan> {
    let piece = engine.current()?;
    let mut best: Option<((bool, u32, u32, i64), Vec<GameAction>)> = None;

    for rotations in 0..4 {
        for target in -3..BOARD_WIDTH as i8 {
            let actions = placement_actions(rotations, target - piece.x);

            let mut trial = engine.clone();
            let mut reached = true;
            for &action in &actions[..actions.len() - 1] {
                if !trial.handle_input(action) {
                    reached = false;
                    break;
                }
            }
            if !reached {
                continue;
            }
            trial.handle_input(GameAction::HardDrop);

            let key = (
                trial.phase() == Phase::GameOver,
                trial.stack_height(),
                holes(trial.board()),
                -i64::from(trial.lines()),
            );
            if best.as_ref().map_or(true, |(k, _)| key < *k) {
                best = Some((key, actions));
            }
        }
    }

    best.map(|(_, actions)| Plan { actions })
}
