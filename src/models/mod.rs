//! Data structures for game selection: candidates, games, slot config, results.

mod candidate;
mod game;
mod selection;

pub use candidate::{Candidate, CandidateId, CandidateStats};
pub use game::{Game, GameError, GameId, GameState, Registration, RegistrationStatus};
pub use selection::{
    DecisionStage, SelectedCandidate, SelectionError, SelectionResult, SlotConfig, TraceEntry,
};
