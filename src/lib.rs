//! WNF game selection web app: library with models and selection logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    calculate_xp, candidates_from_csv, close_registration, reopen_registration, select,
    select_with_config, ImportError, XpWeights,
};
pub use models::{
    Candidate, CandidateId, CandidateStats, DecisionStage, Game, GameError, GameId, GameState,
    Registration, RegistrationStatus, SelectedCandidate, SelectionError, SelectionResult,
    SlotConfig, TraceEntry,
};
