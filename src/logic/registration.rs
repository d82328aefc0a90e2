//! Closing and reopening registration: run selection and write the outcome back to the game.

use crate::logic::selector::select_with_config;
use crate::models::{
    CandidateId, Game, GameError, GameState, RegistrationStatus, SelectionResult,
};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;

/// Close registration: select players, then mark every registration selected or reserve.
///
/// Runs at most once per game; a game that already has players selected must be
/// reopened first.
pub fn close_registration<R: Rng + ?Sized>(
    game: &mut Game,
    rng: &mut R,
) -> Result<SelectionResult, GameError> {
    if game.state != GameState::RegistrationOpen {
        return Err(GameError::InvalidState);
    }

    let result = select_with_config(&game.candidates(), game.slots(), rng);

    // Lottery flag per selected candidate; anyone absent is reserve.
    let lottery: HashMap<CandidateId, bool> = result
        .selected
        .iter()
        .map(|s| (s.candidate.id, s.chosen_by_lottery))
        .collect();
    for reg in &mut game.registrations {
        match lottery.get(&reg.candidate.id) {
            Some(&by_lottery) => {
                reg.status = RegistrationStatus::Selected;
                reg.chosen_by_lottery = by_lottery;
            }
            None => {
                reg.status = RegistrationStatus::Reserve;
                reg.chosen_by_lottery = false;
            }
        }
    }

    game.selected_at = Some(Utc::now());
    game.selection_trace = Some(result.trace.clone());
    game.state = GameState::PlayersSelected;

    log::info!(
        "Game {}: selected {} of {} registered ({} by lottery)",
        game.id,
        result.selected.len(),
        game.registrations.len(),
        result.random_selected().count()
    );
    Ok(result)
}

/// Reopen registration after selection: statuses go back to registered, trace is dropped.
pub fn reopen_registration(game: &mut Game) -> Result<(), GameError> {
    if game.state != GameState::PlayersSelected {
        return Err(GameError::InvalidState);
    }
    for reg in &mut game.registrations {
        reg.status = RegistrationStatus::Registered;
        reg.chosen_by_lottery = false;
    }
    game.selected_at = None;
    game.selection_trace = None;
    game.state = GameState::RegistrationOpen;
    Ok(())
}
