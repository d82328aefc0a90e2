//! Candidate and CandidateStats data structures.

use crate::logic::xp::{calculate_xp, XpWeights};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a candidate (a player's registration for one game).
pub type CandidateId = Uuid;

/// Stat inputs that produced the XP score. Carried for reporting only.
/// Missing fields deserialize as 0.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateStats {
    /// Caps: games played so far.
    pub games_played: u32,
    /// Consecutive games played up to now.
    pub streak: u32,
    pub bonuses: u32,
    pub penalties: u32,
}

/// A player registered for a game, ranked by `xp`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub xp: u32,
    #[serde(default)]
    pub stats: CandidateStats,
}

impl Candidate {
    /// Create a candidate with a known XP score and empty stats.
    pub fn new(name: impl Into<String>, xp: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            xp,
            stats: CandidateStats::default(),
        }
    }

    /// Create a candidate whose XP is computed from `stats`.
    pub fn from_stats(name: impl Into<String>, stats: CandidateStats, weights: &XpWeights) -> Self {
        Self {
            xp: calculate_xp(&stats, weights),
            stats,
            ..Self::new(name, 0)
        }
    }

    /// Attach reporting stats without touching the XP score.
    pub fn with_stats(mut self, stats: CandidateStats) -> Self {
        self.stats = stats;
        self
    }
}
