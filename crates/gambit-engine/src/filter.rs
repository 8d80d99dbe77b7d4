//! State filter: per-viewer projections of match state.
//!
//! Each projection is an owned deep copy scoped to one viewing identity.
//! Hidden information is absent from the projection, not nulled: the DTO
//! types simply never carry what the viewer is not entitled to see.

use chess::Color;
use gambit_core::color_name;
use gambit_core::dto::{PendingDuelView, PlayerView, ViewerState};

use crate::retreat;
use crate::state::GameState;

/// Who is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Player(Color),
    Spectator,
}

impl Viewer {
    fn is(self, color: Color) -> bool {
        self == Viewer::Player(color)
    }
}

/// Project the game state for one viewer.
pub fn for_viewer(state: &GameState, viewer: Viewer) -> ViewerState {
    let hide = state.config.filter.hide_battle_points;
    let bp_for = |color: Color| {
        if !hide || viewer.is(color) {
            Some(state.player(color).bp)
        } else {
            None
        }
    };

    let pending_duel = state.pending_duel.as_ref().map(|duel| PendingDuelView {
        from: duel.from.to_string(),
        to: duel.to.to_string(),
        attacker: color_name(duel.attacker).to_string(),
        // Each side sees only its own submitted bid until resolution
        attacker_allocation: duel
            .attacker_allocation
            .filter(|_| viewer.is(duel.attacker)),
        defender_allocation: duel
            .defender_allocation
            .filter(|_| viewer.is(duel.defender)),
    });

    // Retreat options go to the player who must choose
    let retreat_options = state
        .pending_retreat
        .as_ref()
        .filter(|_| viewer.is(state.active()))
        .map(|pending| retreat::to_dto(pending.piece.piece, &pending.options));

    // The regen breakdown belongs to the mover who produced it, for one
    // state push only
    let bp_calculation_report = state
        .last_regen
        .as_ref()
        .filter(|(mover, _)| viewer.is(*mover))
        .map(|(_, report)| report.clone());

    ViewerState {
        game_id: state.id.clone(),
        fen: state.board.to_string(),
        status: state.status.name().to_string(),
        active: color_name(state.active()).to_string(),
        move_history: state.history.clone(),
        white: PlayerView {
            color: "white".to_string(),
            bp: bp_for(Color::White),
        },
        black: PlayerView {
            color: "black".to_string(),
            bp: bp_for(Color::Black),
        },
        pending_duel,
        retreat_options,
        bp_calculation_report,
    }
}
