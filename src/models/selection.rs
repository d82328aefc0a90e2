//! Slot configuration, selection result, and decision trace.

use crate::models::candidate::{Candidate, CandidateId};
use serde::{Deserialize, Serialize};

/// Errors from validating a selection request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionError {
    NegativeMeritSlots(i64),
    NegativeRandomSlots(i64),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::NegativeMeritSlots(n) => {
                write!(f, "Merit slots must not be negative (got {})", n)
            }
            SelectionError::NegativeRandomSlots(n) => {
                write!(f, "Random slots must not be negative (got {})", n)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// How many roster places go by XP and how many by lottery.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub merit_slots: usize,
    pub random_slots: usize,
}

impl SlotConfig {
    /// Validate signed slot counts (as they arrive from API bodies).
    pub fn new(merit_slots: i64, random_slots: i64) -> Result<Self, SelectionError> {
        let merit_slots =
            usize::try_from(merit_slots).map_err(|_| SelectionError::NegativeMeritSlots(merit_slots))?;
        let random_slots = usize::try_from(random_slots)
            .map_err(|_| SelectionError::NegativeRandomSlots(random_slots))?;
        Ok(Self {
            merit_slots,
            random_slots,
        })
    }

    /// Replace the counts that are given, validating them like [`SlotConfig::new`].
    pub fn with_overrides(
        self,
        merit_slots: Option<i64>,
        random_slots: Option<i64>,
    ) -> Result<Self, SelectionError> {
        let checked = SlotConfig::new(merit_slots.unwrap_or(0), random_slots.unwrap_or(0))?;
        Ok(Self {
            merit_slots: merit_slots.map_or(self.merit_slots, |_| checked.merit_slots),
            random_slots: random_slots.map_or(self.random_slots, |_| checked.random_slots),
        })
    }

    pub fn total(&self) -> usize {
        self.merit_slots.saturating_add(self.random_slots)
    }
}

/// Which stage of the selection decided a candidate's fate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStage {
    /// Whole XP band fit into the merit slots.
    MeritCutoffAbove,
    /// Won a shuffled seat inside the band straddling the merit cutoff.
    MeritTieBreakWon,
    /// Lost the cutoff tie-break and no random draw took place.
    MeritTieBreakLost,
    RandomDrawWon,
    RandomDrawLost,
    /// Below the merit cutoff with no random slots to draw for.
    NoneRemaining,
}

impl DecisionStage {
    pub fn is_selected(self) -> bool {
        matches!(
            self,
            DecisionStage::MeritCutoffAbove | DecisionStage::MeritTieBreakWon | DecisionStage::RandomDrawWon
        )
    }
}

/// One line of the audit trail.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub candidate_id: CandidateId,
    pub name: String,
    pub xp: u32,
    /// Competition rank by XP (tied candidates share a rank).
    pub xp_rank: usize,
    pub stage: DecisionStage,
}

/// A candidate awarded a roster place.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// false = merit slot, true = random slot.
    pub chosen_by_lottery: bool,
}

/// Outcome of one selection run. `selected` and `reserve` partition the input.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Merit picks in XP order, then random picks in draw order.
    pub selected: Vec<SelectedCandidate>,
    /// Not selected, highest XP first.
    pub reserve: Vec<Candidate>,
    /// Every input candidate in XP-rank order.
    pub trace: Vec<TraceEntry>,
}

impl SelectionResult {
    pub fn merit_selected(&self) -> impl Iterator<Item = &Candidate> {
        self.selected
            .iter()
            .filter(|s| !s.chosen_by_lottery)
            .map(|s| &s.candidate)
    }

    pub fn random_selected(&self) -> impl Iterator<Item = &Candidate> {
        self.selected
            .iter()
            .filter(|s| s.chosen_by_lottery)
            .map(|s| &s.candidate)
    }

    /// Lottery flag for a selected candidate; None if the candidate is in reserve or unknown.
    pub fn chosen_by_lottery(&self, id: CandidateId) -> Option<bool> {
        self.selected
            .iter()
            .find(|s| s.candidate.id == id)
            .map(|s| s.chosen_by_lottery)
    }

    pub fn is_selected(&self, id: CandidateId) -> bool {
        self.selected.iter().any(|s| s.candidate.id == id)
    }

    pub fn stage_of(&self, id: CandidateId) -> Option<DecisionStage> {
        self.trace.iter().find(|t| t.candidate_id == id).map(|t| t.stage)
    }

    /// Lowest XP among merit picks, if any merit slot was filled.
    pub fn merit_cutoff_xp(&self) -> Option<u32> {
        self.merit_selected().map(|c| c.xp).min()
    }
}
