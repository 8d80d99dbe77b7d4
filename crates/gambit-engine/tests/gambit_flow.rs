//! Integration tests: full Gambit Chess flows through the public API.
//!
//! Each test drives a match end to end — moves, duels, retreats, viewer
//! projections — and checks the observable outcomes: board, BP pools,
//! history, and what each viewer is allowed to see.

use std::str::FromStr;

use chess::{Board, Color, Piece, Square};
use gambit_core::config::{GameConfig, TieBreak};
use gambit_core::dto::DuelResult;
use gambit_core::GambitError;
use gambit_engine::{filter, GameState, GameStatus, MatchArena, MoveOutcome, StandardRules, Viewer};

const RULES: StandardRules = StandardRules;

/// Rook e4 versus pawn e7, both kings on their home files.
const ROOK_VS_PAWN: &str = "4k3/4p3/8/8/4R3/8/8/4K3 w - - 0 1";

fn game_from(fen: &str) -> GameState {
    let mut state = GameState::new("it", GameConfig::default());
    state.board = Board::from_str(fen).unwrap();
    state
}

#[test]
fn successful_capture_duel_pays_both_bids_and_regenerates() {
    let mut state = game_from(ROOK_VS_PAWN);

    let outcome = state.apply_move(&RULES, Square::E4, Square::E7).unwrap();
    assert!(matches!(outcome, MoveOutcome::DuelStarted));

    assert_eq!(state.allocate(&RULES, Color::White, 6).unwrap(), None);
    let outcome = state
        .allocate(&RULES, Color::Black, 5)
        .unwrap()
        .expect("second allocation resolves");

    assert_eq!(outcome.result, DuelResult::Success);
    assert_eq!(outcome.winner, "white");
    assert_eq!(state.board.piece_on(Square::E7), Some(Piece::Rook));
    assert_eq!(state.history, vec!["e4xe7".to_string()]);
    assert_eq!(state.active(), Color::Black);
    assert_eq!(state.status, GameStatus::InProgress);

    // White paid 6 and earned base 1 + check 2 for Rxe7+; black paid 5
    assert_eq!(state.player(Color::White).bp, 39 - 6 + 3);
    assert_eq!(state.player(Color::Black).bp, 39 - 5);

    let (mover, report) = state.last_regen.as_ref().unwrap();
    assert_eq!(*mover, Color::White);
    assert_eq!(report.total, 3);
    assert!(report.breakdown.iter().any(|e| e.tactic == "check"));
}

#[test]
fn tied_duel_fails_the_capture_then_retreat_completes_the_turn() {
    let mut state = game_from(ROOK_VS_PAWN);
    state.apply_move(&RULES, Square::E4, Square::E7).unwrap();

    state.allocate(&RULES, Color::White, 3).unwrap();
    let outcome = state.allocate(&RULES, Color::Black, 3).unwrap().unwrap();
    assert_eq!(outcome.result, DuelResult::Failed);
    assert_eq!(outcome.winner, "black");

    // Nothing captured, both bids spent, retreat window open
    assert_eq!(state.board.piece_on(Square::E4), Some(Piece::Rook));
    assert_eq!(state.board.piece_on(Square::E7), Some(Piece::Pawn));
    assert_eq!(state.player(Color::White).bp, 36);
    assert_eq!(state.player(Color::Black).bp, 36);
    assert_eq!(state.status, GameStatus::RetreatInProgress);

    // A new capture attempt is refused while the retreat is pending
    assert!(matches!(
        state.apply_move(&RULES, Square::E1, Square::E2).unwrap_err(),
        GambitError::InvalidMove(_)
    ));

    state.apply_retreat(Square::E3).unwrap();
    assert_eq!(state.board.piece_on(Square::E3), Some(Piece::Rook));
    assert_eq!(state.history, vec!["e4>e3".to_string()]);
    assert_eq!(state.active(), Color::Black);
    assert_eq!(state.status, GameStatus::InProgress);
    // 36 - 1 (one square back) + 1 (base) + 2 (e7 pawn pinned from e3)
    assert_eq!(state.player(Color::White).bp, 38);
}

#[test]
fn viewer_projections_never_leak_across_the_whole_flow() {
    let mut state = game_from(ROOK_VS_PAWN);
    state.apply_move(&RULES, Square::E4, Square::E7).unwrap();
    state.allocate(&RULES, Color::White, 3).unwrap();

    // Mid-duel: the submitted bid is visible only to its owner
    for viewer in [Viewer::Player(Color::Black), Viewer::Spectator] {
        let view = filter::for_viewer(&state, viewer);
        let duel = view.pending_duel.unwrap();
        assert_eq!(duel.attacker_allocation, None);
        assert_eq!(duel.defender_allocation, None);
    }
    let own = filter::for_viewer(&state, Viewer::Player(Color::White));
    assert_eq!(own.pending_duel.unwrap().attacker_allocation, Some(3));

    // And the serialized form omits hidden fields outright
    let spectator_json =
        serde_json::to_string(&filter::for_viewer(&state, Viewer::Spectator)).unwrap();
    assert!(!spectator_json.contains("\"bp\""));
    assert!(!spectator_json.contains("allocation"));

    state.allocate(&RULES, Color::Black, 3).unwrap();

    // Retreat phase: options go to the retreating player only
    let white_view = filter::for_viewer(&state, Viewer::Player(Color::White));
    assert_eq!(white_view.status, "retreat_in_progress");
    assert!(white_view.retreat_options.is_some());
    assert!(filter::for_viewer(&state, Viewer::Player(Color::Black))
        .retreat_options
        .is_none());
    assert!(filter::for_viewer(&state, Viewer::Spectator)
        .retreat_options
        .is_none());

    state.apply_retreat(Square::E4).unwrap();

    // The regen breakdown reaches the mover and nobody else
    assert!(filter::for_viewer(&state, Viewer::Player(Color::White))
        .bp_calculation_report
        .is_some());
    assert!(filter::for_viewer(&state, Viewer::Player(Color::Black))
        .bp_calculation_report
        .is_none());
    assert!(filter::for_viewer(&state, Viewer::Spectator)
        .bp_calculation_report
        .is_none());
}

#[test]
fn configuration_changes_formulas_tie_break_and_visibility() {
    let config = GameConfig::from_json(
        r#"{
            "initial_bp": 10,
            "regen": { "check": { "formula": "5" } },
            "duel": { "tie_break": "attacker_wins" },
            "filter": { "hide_battle_points": false }
        }"#,
    )
    .unwrap();
    assert_eq!(config.duel.tie_break, TieBreak::AttackerWins);

    let mut state = GameState::new("it", config);
    state.board = Board::from_str("4k3/8/8/8/8/8/7R/4K3 w - - 0 1").unwrap();

    // Quiet rook lift to h8 gives check: base 1 + overridden check 5
    let outcome = state.apply_move(&RULES, Square::H2, Square::H8).unwrap();
    match outcome {
        MoveOutcome::Completed { regen } => assert_eq!(regen.total, 6),
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(state.player(Color::White).bp, 16);

    // Pools are public when hiding is disabled
    let view = filter::for_viewer(&state, Viewer::Spectator);
    assert_eq!(view.white.bp, Some(16));
    assert_eq!(view.black.bp, Some(10));
}

#[test]
fn attacker_wins_ties_under_the_configured_tie_break() {
    let config =
        GameConfig::from_json(r#"{ "duel": { "tie_break": "attacker_wins" } }"#).unwrap();
    let mut state = GameState::new("it", config);
    state.board = Board::from_str(ROOK_VS_PAWN).unwrap();

    state.apply_move(&RULES, Square::E4, Square::E7).unwrap();
    state.allocate(&RULES, Color::White, 2).unwrap();
    let outcome = state.allocate(&RULES, Color::Black, 2).unwrap().unwrap();
    assert_eq!(outcome.result, DuelResult::Success);
    assert_eq!(state.board.piece_on(Square::E7), Some(Piece::Rook));
}

#[test]
fn checkmate_ends_the_match() {
    let mut state = game_from("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1");
    state.apply_move(&RULES, Square::A1, Square::A8).unwrap();
    assert_eq!(state.status, GameStatus::Over);
    assert_eq!(
        state.apply_move(&RULES, Square::E1, Square::E2).unwrap_err(),
        GambitError::GameOver
    );

    let view = filter::for_viewer(&state, Viewer::Spectator);
    assert_eq!(view.status, "over");
}

#[tokio::test]
async fn arena_runs_independent_matches_end_to_end() {
    let arena = MatchArena::new(GameConfig::default());
    let game = arena.create("match-1").await;
    arena.create("match-2").await;

    {
        let mut state = game.lock().await;
        state.board = Board::from_str(ROOK_VS_PAWN).unwrap();
        state.apply_move(&RULES, Square::E4, Square::E7).unwrap();
        state.allocate(&RULES, Color::White, 6).unwrap();
        state.allocate(&RULES, Color::Black, 5).unwrap();
    }

    let v1 = arena.view("match-1", Viewer::Spectator).await.unwrap();
    assert_eq!(v1.move_history, vec!["e4xe7".to_string()]);
    assert_eq!(v1.active, "black");

    let v2 = arena.view("match-2", Viewer::Spectator).await.unwrap();
    assert!(v2.move_history.is_empty());
    assert_eq!(v2.status, "waiting");

    arena.remove("match-1").await;
    assert!(arena.view("match-1", Viewer::Spectator).await.is_none());
}
