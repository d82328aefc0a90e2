//! Integration tests for the game registration lifecycle: register, close, reopen.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;
use wnf_selection_web::{
    close_registration, reopen_registration, Candidate, Game, GameError, GameState,
    RegistrationStatus, SelectionError, SlotConfig,
};

fn game_with_players(xps: &[u32], merit_slots: usize, random_slots: usize) -> Game {
    let mut game = Game::new(
        Utc::now(),
        SlotConfig {
            merit_slots,
            random_slots,
        },
    );
    for (i, &xp) in xps.iter().enumerate() {
        game.register(Candidate::new(format!("Player {i}"), xp)).unwrap();
    }
    game
}

#[test]
fn register_rejects_blank_and_duplicate_names() {
    let mut game = game_with_players(&[10], 5, 2);
    assert_eq!(game.register(Candidate::new("   ", 5)), Err(GameError::EmptyName));
    assert_eq!(
        game.register(Candidate::new("PLAYER 0", 5)),
        Err(GameError::DuplicateName)
    );
    let again = game.registrations[0].candidate.clone();
    assert_eq!(game.register(again.clone()), Err(GameError::DuplicateCandidate(again.id)));
    assert_eq!(game.registrations.len(), 1);
}

#[test]
fn register_trims_name() {
    let mut game = game_with_players(&[], 5, 2);
    let id = game.register(Candidate::new("  Sam  ", 30)).unwrap();
    assert_eq!(game.get_registration(id).unwrap().candidate.name, "Sam");
    assert_eq!(game.get_registration(id).unwrap().status, RegistrationStatus::Registered);
}

#[test]
fn unregister_unknown_player_fails() {
    let mut game = game_with_players(&[10, 20], 5, 2);
    let missing = Uuid::new_v4();
    assert_eq!(game.unregister(missing), Err(GameError::CandidateNotFound(missing)));
    let id = game.registrations[1].candidate.id;
    game.unregister(id).unwrap();
    assert_eq!(game.registrations.len(), 1);
}

#[test]
fn set_slots_validates_counts() {
    let mut game = game_with_players(&[10], 5, 2);
    assert_eq!(
        game.set_slots(-1, 2),
        Err(GameError::Selection(SelectionError::NegativeMeritSlots(-1)))
    );
    game.set_slots(3, 1).unwrap();
    assert_eq!(game.slots(), SlotConfig { merit_slots: 3, random_slots: 1 });
}

#[test]
fn close_writes_statuses_back() {
    let mut game = game_with_players(&[100, 90, 80, 70, 60, 50, 40, 30, 20, 10], 5, 2);
    let mut rng = StdRng::seed_from_u64(17);
    let result = close_registration(&mut game, &mut rng).unwrap();

    assert_eq!(game.state, GameState::PlayersSelected);
    assert!(game.selected_at.is_some());
    assert_eq!(game.selection_trace.as_ref().map(Vec::len), Some(10));
    assert_eq!(game.selected().count(), 7);
    assert_eq!(game.reserves().count(), 3);

    for s in &result.selected {
        let reg = game.get_registration(s.candidate.id).unwrap();
        assert_eq!(reg.status, RegistrationStatus::Selected);
        assert_eq!(reg.chosen_by_lottery, s.chosen_by_lottery);
    }
    for c in &result.reserve {
        let reg = game.get_registration(c.id).unwrap();
        assert_eq!(reg.status, RegistrationStatus::Reserve);
        assert!(!reg.chosen_by_lottery);
    }
    assert_eq!(game.selected().filter(|r| r.chosen_by_lottery).count(), 2);
}

#[test]
fn closed_game_cannot_be_closed_or_changed() {
    let mut game = game_with_players(&[30, 20, 10], 2, 0);
    let mut rng = StdRng::seed_from_u64(1);
    close_registration(&mut game, &mut rng).unwrap();

    assert_eq!(close_registration(&mut game, &mut rng), Err(GameError::InvalidState));
    assert_eq!(game.register(Candidate::new("Late", 99)), Err(GameError::InvalidState));
    assert_eq!(game.set_slots(3, 0), Err(GameError::InvalidState));
    let id = game.registrations[0].candidate.id;
    assert_eq!(game.unregister(id), Err(GameError::InvalidState));
}

#[test]
fn reopen_resets_selection() {
    let mut game = game_with_players(&[30, 20, 10], 1, 1);
    assert_eq!(reopen_registration(&mut game), Err(GameError::InvalidState));

    let mut rng = StdRng::seed_from_u64(2);
    close_registration(&mut game, &mut rng).unwrap();
    reopen_registration(&mut game).unwrap();

    assert_eq!(game.state, GameState::RegistrationOpen);
    assert!(game.selected_at.is_none());
    assert!(game.selection_trace.is_none());
    assert!(game
        .registrations
        .iter()
        .all(|r| r.status == RegistrationStatus::Registered && !r.chosen_by_lottery));

    // Late registration is allowed again and takes part in the next selection.
    game.register(Candidate::new("Late", 99)).unwrap();
    let result = close_registration(&mut game, &mut rng).unwrap();
    assert_eq!(result.merit_selected().next().map(|c| c.name.as_str()), Some("Late"));
}

#[test]
fn closing_empty_game_selects_nobody() {
    let mut game = game_with_players(&[], 16, 2);
    let mut rng = StdRng::seed_from_u64(3);
    let result = close_registration(&mut game, &mut rng).unwrap();
    assert!(result.selected.is_empty());
    assert!(result.reserve.is_empty());
    assert_eq!(game.state, GameState::PlayersSelected);
}

#[test]
fn duplicate_names_match_across_non_ascii_case() {
    let mut game = game_with_players(&[], 5, 2);
    game.register(Candidate::new("Émile", 40)).unwrap();
    assert_eq!(game.register(Candidate::new("émile", 10)), Err(GameError::DuplicateName));
    assert_eq!(game.register(Candidate::new("ÉMILE", 10)), Err(GameError::DuplicateName));
    assert_eq!(game.registrations.len(), 1);
}

#[test]
fn close_leaves_no_registration_undecided() {
    for (merit, random) in [(0, 0), (2, 1), (3, 5), (10, 10)] {
        let mut game = game_with_players(&[60, 50, 50, 40, 30], merit, random);
        let mut rng = StdRng::seed_from_u64(merit as u64 * 31 + random as u64);
        let result = close_registration(&mut game, &mut rng).unwrap();

        assert!(game
            .registrations
            .iter()
            .all(|r| r.status != RegistrationStatus::Registered));
        assert_eq!(game.selected().count(), result.selected.len());
        assert_eq!(game.reserves().count(), result.reserve.len());
        assert!(game.reserves().all(|r| !r.chosen_by_lottery));
        assert_eq!(
            game.selected().filter(|r| r.chosen_by_lottery).count(),
            result.random_selected().count()
        );
    }
}
