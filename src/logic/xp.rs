//! XP scoring: caps scaled by streak, bonuses and penalties.

use crate::models::CandidateStats;
use serde::{Deserialize, Serialize};

/// Weights for the XP formula. Percentages apply to the caps-based base score.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct XpWeights {
    pub points_per_game: u32,
    pub streak_pct: u32,
    pub bonus_pct: u32,
    pub penalty_pct: u32,
}

impl Default for XpWeights {
    fn default() -> Self {
        Self {
            points_per_game: 10,
            streak_pct: 10,
            bonus_pct: 10,
            penalty_pct: 10,
        }
    }
}

/// Compute XP from stats.
///
/// `base = games_played * points_per_game`, then scaled by
/// `100% + streak*streak_pct + bonuses*bonus_pct - penalties*penalty_pct`.
/// The multiplier floors at 0%, so XP is never negative.
pub fn calculate_xp(stats: &CandidateStats, weights: &XpWeights) -> u32 {
    let base = i128::from(stats.games_played) * i128::from(weights.points_per_game);
    let multiplier_pct = 100
        + i128::from(stats.streak) * i128::from(weights.streak_pct)
        + i128::from(stats.bonuses) * i128::from(weights.bonus_pct)
        - i128::from(stats.penalties) * i128::from(weights.penalty_pct);
    let xp = base * multiplier_pct.max(0) / 100;
    u32::try_from(xp).unwrap_or(u32::MAX)
}
