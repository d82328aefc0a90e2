//! Game and Registration: one match night and the players signed up for it.

use crate::models::candidate::{Candidate, CandidateId};
use crate::models::selection::{SelectionError, SlotConfig, TraceEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during game registration operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// Game is not in a state that allows this action.
    InvalidState,
    /// Player name is blank.
    EmptyName,
    /// A player with this name is already registered (case-insensitive).
    DuplicateName,
    /// A candidate with this id is already registered.
    DuplicateCandidate(CandidateId),
    CandidateNotFound(CandidateId),
    Selection(SelectionError),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidState => write!(f, "Invalid state for this action"),
            GameError::EmptyName => write!(f, "Player name must not be empty"),
            GameError::DuplicateName => write!(f, "A player with this name is already registered"),
            GameError::DuplicateCandidate(_) => write!(f, "Player is already registered"),
            GameError::CandidateNotFound(_) => write!(f, "Player not registered for this game"),
            GameError::Selection(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GameError {}

impl From<SelectionError> for GameError {
    fn from(e: SelectionError) -> Self {
        GameError::Selection(e)
    }
}

/// Unique identifier for a game.
pub type GameId = Uuid;

/// Current phase of a game's registration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Players can register and unregister; slots can be changed.
    #[default]
    RegistrationOpen,
    /// Selection has run; every registration is selected or reserve.
    PlayersSelected,
}

/// Outcome written back to a registration after selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Selected,
    Reserve,
}

/// A candidate's entry in one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub candidate: Candidate,
    pub status: RegistrationStatus,
    /// Only meaningful when `status` is `Selected`.
    pub chosen_by_lottery: bool,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            status: RegistrationStatus::Registered,
            chosen_by_lottery: false,
            registered_at: Utc::now(),
        }
    }
}

/// A game with its registration pool and the outcome of selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Kick-off time.
    pub date: DateTime<Utc>,
    pub merit_slots: usize,
    pub random_slots: usize,
    pub state: GameState,
    pub registrations: Vec<Registration>,
    /// When selection last ran (None while registration is open).
    pub selected_at: Option<DateTime<Utc>>,
    /// Decision trace of the last selection, for admins.
    pub selection_trace: Option<Vec<TraceEntry>>,
}

impl Game {
    /// Create a new game with registration open and no players.
    pub fn new(date: DateTime<Utc>, slots: SlotConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            merit_slots: slots.merit_slots,
            random_slots: slots.random_slots,
            state: GameState::RegistrationOpen,
            registrations: Vec::new(),
            selected_at: None,
            selection_trace: None,
        }
    }

    pub fn slots(&self) -> SlotConfig {
        SlotConfig {
            merit_slots: self.merit_slots,
            random_slots: self.random_slots,
        }
    }

    /// Candidates in registration order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.registrations.iter().map(|r| r.candidate.clone()).collect()
    }

    pub fn get_registration(&self, id: CandidateId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.candidate.id == id)
    }

    pub fn get_registration_mut(&mut self, id: CandidateId) -> Option<&mut Registration> {
        self.registrations.iter_mut().find(|r| r.candidate.id == id)
    }

    /// Register a candidate (registration must be open). Names are unique, case-insensitive.
    pub fn register(&mut self, mut candidate: Candidate) -> Result<CandidateId, GameError> {
        if self.state != GameState::RegistrationOpen {
            return Err(GameError::InvalidState);
        }
        let name_trimmed = candidate.name.trim();
        if name_trimmed.is_empty() {
            return Err(GameError::EmptyName);
        }
        if self.get_registration(candidate.id).is_some() {
            return Err(GameError::DuplicateCandidate(candidate.id));
        }
        let folded = name_trimmed.to_lowercase();
        let is_duplicate = self
            .registrations
            .iter()
            .any(|r| r.candidate.name.to_lowercase() == folded);
        if is_duplicate {
            return Err(GameError::DuplicateName);
        }
        candidate.name = name_trimmed.to_string();
        let id = candidate.id;
        self.registrations.push(Registration::new(candidate));
        Ok(id)
    }

    /// Remove a registration by candidate id (registration must be open).
    pub fn unregister(&mut self, id: CandidateId) -> Result<(), GameError> {
        if self.state != GameState::RegistrationOpen {
            return Err(GameError::InvalidState);
        }
        let idx = self
            .registrations
            .iter()
            .position(|r| r.candidate.id == id)
            .ok_or(GameError::CandidateNotFound(id))?;
        self.registrations.remove(idx);
        Ok(())
    }

    /// Change slot counts (registration must be open). Negative counts are rejected.
    pub fn set_slots(&mut self, merit_slots: i64, random_slots: i64) -> Result<(), GameError> {
        if self.state != GameState::RegistrationOpen {
            return Err(GameError::InvalidState);
        }
        let slots = SlotConfig::new(merit_slots, random_slots)?;
        self.merit_slots = slots.merit_slots;
        self.random_slots = slots.random_slots;
        Ok(())
    }

    pub fn selected(&self) -> impl Iterator<Item = &Registration> {
        self.registrations
            .iter()
            .filter(|r| r.status == RegistrationStatus::Selected)
    }

    pub fn reserves(&self) -> impl Iterator<Item = &Registration> {
        self.registrations
            .iter()
            .filter(|r| r.status == RegistrationStatus::Reserve)
    }
}
