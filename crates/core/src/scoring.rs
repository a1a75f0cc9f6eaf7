//! Scoring module - line awards, bonuses, gravity and level progression.
//!
//! - Line clears award 100/300/500/800 times the level in force.
//! - Back-to-back (consecutive Tetris or T-spin clears) multiplies the line
//!   award by 3/2.
//! - Combo bonus is `50 * combo * level`, starting from the second
//!   consecutive clearing lock.
//! - A T-spin awards `400 * level` when the piece locks, whether or not it
//!   clears lines.

use crate::types::{
    B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BONUS, GRAVITY_FPS, GRAVITY_FRAMES, HARD_DROP_SCORE,
    LINE_SCORES, SOFT_DROP_MULTIPLIER, SOFT_DROP_SCORE, T_SPIN_BONUS,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Level-scaled line award (includes B2B multiplier, excludes combo bonus).
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`.
    pub combo_bonus: u32,
    pub total: u32,
    /// Whether a B2B multiplier was applied to this clear.
    pub b2b_applied: bool,
}

/// Unscaled award for clearing `lines` rows at once.
pub fn line_clear_award(lines: u32) -> u32 {
    LINE_SCORES[(lines as usize).min(LINE_SCORES.len() - 1)]
}

pub fn t_spin_bonus(level: u32) -> u32 {
    T_SPIN_BONUS.saturating_mul(level)
}

/// Calculate combo bonus. `combo` counts consecutive clearing locks
/// including this one; the first clear of a chain earns nothing.
pub fn calculate_combo_bonus(combo: u32, level: u32) -> u32 {
    if combo <= 1 {
        return 0;
    }
    COMBO_BONUS.saturating_mul(combo).saturating_mul(level)
}

/// Tetrises and T-spin clears keep a back-to-back chain alive.
pub fn qualifies_for_b2b(is_tetris: bool, t_spin: bool) -> bool {
    is_tetris || t_spin
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points
        .saturating_mul(B2B_NUMERATOR)
        .saturating_div(B2B_DENOMINATOR)
}

/// Score a completed line clear.
///
/// `award` is the unscaled award from the board, `combo` already includes
/// this clear, `b2b_applied` means the previous clear also qualified.
pub fn calculate_clear_score(award: u32, level: u32, combo: u32, b2b_applied: bool) -> ScoreResult {
    let base = if b2b_applied {
        apply_b2b_multiplier(award)
    } else {
        award
    };
    let line_clear_score = base.saturating_mul(level);
    let combo_bonus = calculate_combo_bonus(combo, level);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
        b2b_applied,
    }
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_SCORE
    } else {
        SOFT_DROP_SCORE
    };
    cells.saturating_mul(per_cell)
}

/// Level after a clear brought the total to `total_lines`.
///
/// Advances at most one level per clear, never past `max_level`.
pub fn level_after_clear(level: u32, total_lines: u32, lines_per_level: u32, max_level: u32) -> u32 {
    if level < max_level && total_lines >= lines_per_level.saturating_mul(level) {
        level + 1
    } else {
        level
    }
}

/// Gravity interval for a (1-based) level, in milliseconds.
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let index = (level.max(1) as usize - 1).min(GRAVITY_FRAMES.len() - 1);
    GRAVITY_FRAMES[index] * 1000 / GRAVITY_FPS
}

/// Gravity interval while soft drop is held. Never below 1ms.
pub fn get_soft_drop_interval_ms(base_interval: u32) -> u32 {
    (base_interval / SOFT_DROP_MULTIPLIER).max(1)
}
