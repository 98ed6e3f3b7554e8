//! Scoring module - line clear points, levels and gravity
//!
//! A lock that clears N lines scores `LINE_SCORES[min(N, 4)] * level`, using the level in
//! force *before* those lines are counted. Level is `lines / 10 + 1` and the gravity interval
//! is recomputed from the level each time.

use crate::types::{BASE_DROP_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS};

/// Result of applying a line clear to score and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points added by this clear
    pub points: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
}

/// Base points for a single lock clearing `lines` lines (4 or more share the top entry)
pub fn base_line_score(lines: u32) -> u32 {
    LINE_SCORES[lines.min(4) as usize]
}

/// Points for clearing `lines` lines at `level`
pub fn calculate_line_score(lines: u32, level: u32) -> u32 {
    base_line_score(lines).saturating_mul(level)
}

/// Level for a total line count (starts at 1)
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, floored at 50ms
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let step = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS.saturating_sub(step).max(MIN_DROP_MS)
}

/// Apply a clear of `cleared` lines to a running `(lines, level)` pair
///
/// Returns `None` when nothing was cleared.
pub fn apply_line_clear(cleared: u32, lines: u32, level: u32) -> Option<ScoreResult> {
    if cleared == 0 {
        return None;
    }

    let points = calculate_line_score(cleared, level);
    let lines = lines.saturating_add(cleared);
    let level = calculate_level(lines);

    Some(ScoreResult {
        points,
        lines,
        level,
        drop_interval_ms: get_drop_interval_ms(level),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_with_ceiling() {
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);
        assert_eq!(calculate_line_score(5, 1), 800);
        assert_eq!(calculate_line_score(4, 3), 2400);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(105), 11);
    }

    #[test]
    fn test_drop_interval() {
        assert_eq!(get_drop_interval_ms(1), 1000);
        assert_eq!(get_drop_interval_ms(2), 950);
        assert_eq!(get_drop_interval_ms(10), 550);
        assert_eq!(get_drop_interval_ms(19), 100);
        assert_eq!(get_drop_interval_ms(20), 50);
        assert_eq!(get_drop_interval_ms(500), 50);
    }

    #[test]
    fn test_zero_lines_is_noop() {
        assert_eq!(apply_line_clear(0, 7, 1), None);
    }

    #[test]
    fn test_pre_clear_level_multiplies() {
        // 9 lines at level 1, clearing 4 reaches level 2 but scores at level 1.
        let result = apply_line_clear(4, 9, 1).unwrap();
        assert_eq!(result.points, 800);
        assert_eq!(result.lines, 13);
        assert_eq!(result.level, 2);
        assert_eq!(result.drop_interval_ms, 950);

        let next = apply_line_clear(1, result.lines, result.level).unwrap();
        assert_eq!(next.points, 200);
    }
}
