//! Server-side match state.
//!
//! One `GameState` per match, owned exclusively by the match's lock in the
//! arena; every mutation goes through the operations in `duel.rs`.

use chess::{Board, Color, Square};
use gambit_core::config::GameConfig;
use gambit_core::dto::BpRegenReport;
use gambit_core::PieceAt;

use crate::regen;
use crate::retreat::RetreatOption;
use crate::tactics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Waiting,
    InProgress,
    DuelInProgress,
    RetreatInProgress,
    Over,
}

impl GameStatus {
    pub fn name(self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::InProgress => "in_progress",
            GameStatus::DuelInProgress => "duel_in_progress",
            GameStatus::RetreatInProgress => "retreat_in_progress",
            GameStatus::Over => "over",
        }
    }
}

/// One player's identity and BP pool. The pool is unsigned: it can never
/// go negative, and any allocation that would overdraw is rejected before
/// this is touched.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub color: Color,
    pub bp: u32,
}

/// A capture attempt awaiting both hidden allocations. Created when the
/// rules engine validates a capture; cleared on resolution.
#[derive(Debug, Clone)]
pub struct PendingDuel {
    pub from: Square,
    pub to: Square,
    pub attacker: Color,
    pub defender: Color,
    pub attacking_piece: PieceAt,
    pub defending_piece: PieceAt,
    pub attacker_allocation: Option<u32>,
    pub defender_allocation: Option<u32>,
}

/// A failed capture awaiting the attacker's retreat choice.
#[derive(Debug, Clone)]
pub struct PendingRetreat {
    pub piece: PieceAt,
    pub origin: Square,
    pub failed_target: Square,
    pub options: Vec<RetreatOption>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub id: String,
    pub board: Board,
    pub history: Vec<String>,
    players: [PlayerState; 2],
    pub pending_duel: Option<PendingDuel>,
    pub pending_retreat: Option<PendingRetreat>,
    pub status: GameStatus,
    pub config: GameConfig,
    /// The latest regen report and the color whose move produced it.
    /// Replaced (or cleared) when the next move begins, which bounds its
    /// visibility window.
    pub last_regen: Option<(Color, BpRegenReport)>,
}

impl GameState {
    pub fn new(id: impl Into<String>, config: GameConfig) -> Self {
        let initial_bp = config.initial_bp.0;
        Self {
            id: id.into(),
            board: Board::default(),
            history: Vec::new(),
            players: [
                PlayerState {
                    color: Color::White,
                    bp: initial_bp,
                },
                PlayerState {
                    color: Color::Black,
                    bp: initial_bp,
                },
            ],
            pending_duel: None,
            pending_retreat: None,
            status: GameStatus::Waiting,
            config,
            last_regen: None,
        }
    }

    /// The color to move. During a duel or retreat this is still the
    /// attacker; the turn only passes when the move (or retreat) finalizes.
    pub fn active(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn player(&self, color: Color) -> &PlayerState {
        match color {
            Color::White => &self.players[0],
            Color::Black => &self.players[1],
        }
    }

    pub fn player_mut(&mut self, color: Color) -> &mut PlayerState {
        match color {
            Color::White => &mut self.players[0],
            Color::Black => &mut self.players[1],
        }
    }

    /// Finish a move that changed the board: detect newly created tactics,
    /// regenerate BP for the mover, record history, and advance the status.
    pub(crate) fn finalize_move(
        &mut self,
        before: Board,
        mover: Color,
        notation: String,
        is_checkmate: bool,
    ) -> BpRegenReport {
        let found = tactics::detect(&before, &self.board, mover, &self.config.regen.piece_values);
        let report = regen::regen(&found, &self.config.regen);
        self.player_mut(mover).bp += report.total;
        self.history.push(notation);
        self.last_regen = Some((mover, report.clone()));
        self.status = if is_checkmate {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        };
        report
    }
}
