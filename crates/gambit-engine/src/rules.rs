//! The chess rules engine collaborator.
//!
//! Standard legality, check, and mate detection are outside the gambit
//! core; components consume this trait and never touch `MoveGen` directly.

use chess::{Board, BoardStatus, MoveGen, Piece, Square, EMPTY};
use gambit_core::GambitError;

/// What the rules engine reports for a legal move.
#[derive(Debug, Clone)]
pub struct ValidatedMove {
    pub board_after: Board,
    pub captured: Option<Piece>,
    pub is_check: bool,
    pub is_checkmate: bool,
}

pub trait RulesEngine {
    fn validate_move(
        &self,
        board: &Board,
        from: Square,
        to: Square,
    ) -> Result<ValidatedMove, GambitError>;
}

/// Rules engine backed by the `chess` crate's legal move generator.
/// Promotions default to a queen.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn validate_move(
        &self,
        board: &Board,
        from: Square,
        to: Square,
    ) -> Result<ValidatedMove, GambitError> {
        let mv = MoveGen::new_legal(board)
            .find(|m| {
                m.get_source() == from
                    && m.get_dest() == to
                    && (m.get_promotion().is_none() || m.get_promotion() == Some(Piece::Queen))
            })
            .ok_or_else(|| GambitError::InvalidMove(format!("{from}{to} is not legal")))?;

        let mut captured = board.piece_on(to);
        // En passant: the captured pawn is not on the destination square
        if captured.is_none()
            && board.piece_on(from) == Some(Piece::Pawn)
            && from.get_file() != to.get_file()
        {
            captured = Some(Piece::Pawn);
        }

        let board_after = board.make_move_new(mv);
        Ok(ValidatedMove {
            board_after,
            captured,
            is_check: *board_after.checkers() != EMPTY,
            is_checkmate: board_after.status() == BoardStatus::Checkmate,
        })
    }
}
