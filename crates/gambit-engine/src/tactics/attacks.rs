//! Attack-based detectors: forks and checks.

use chess::{Board, Color};
use gambit_core::{PieceAt, TacticDescriptor};

use crate::board_utils::{attackers, attacks, king_square};

/// Forks: one piece of `color` simultaneously attacking two or more enemy
/// pieces. Any piece can fork and any piece can be forked; the diff against
/// the previous position and the min-value payout keep cheap forks cheap.
pub fn forks(board: &Board, color: Color) -> Vec<TacticDescriptor> {
    let mut out = Vec::new();

    for sq in *board.color_combined(color) {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };

        let mut forked = Vec::new();
        for target in attacks(board, sq) & *board.color_combined(!color) {
            if let Some(target_piece) = board.piece_on(target) {
                forked.push(PieceAt::new(target, target_piece));
            }
        }

        if forked.len() >= 2 {
            out.push(TacticDescriptor::Fork {
                forked,
                by: PieceAt::new(sq, piece),
            });
        }
    }
    out
}

/// Checks delivered by `color`: one entry per checking piece, flagged as a
/// double check when two or more check at once.
pub fn checks(board: &Board, color: Color) -> Vec<TacticDescriptor> {
    let enemy_king = king_square(board, !color);
    let checkers = attackers(board, color, enemy_king);
    let is_double = checkers.popcnt() >= 2;

    let mut out = Vec::new();
    for sq in checkers {
        if let Some(piece) = board.piece_on(sq) {
            out.push(TacticDescriptor::Check {
                checking: PieceAt::new(sq, piece),
                is_double,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{Piece, Square};
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    #[test]
    fn royal_knight_fork() {
        // Knight c7 hits the a8 rook and the e8 king
        let b = board("r3k3/2N5/8/8/8/8/8/4K3 b - - 0 1");
        let tactics = forks(&b, Color::White);
        assert_eq!(tactics.len(), 1);
        match &tactics[0] {
            TacticDescriptor::Fork { forked, by } => {
                assert_eq!(by.square, Square::C7);
                let mut squares: Vec<Square> = forked.iter().map(|p| p.square).collect();
                squares.sort_by_key(|s| s.to_index());
                assert_eq!(squares, vec![Square::A8, Square::E8]);
            }
            other => panic!("expected fork, got {other:?}"),
        }
    }

    #[test]
    fn two_pawn_targets_make_a_fork() {
        // Knight e5 attacks the c6 and g6 pawns
        let b = board("4k3/8/2p3p1/4N3/8/8/8/4K3 w - - 0 1");
        let tactics = forks(&b, Color::White);
        assert_eq!(tactics.len(), 1);
        match &tactics[0] {
            TacticDescriptor::Fork { forked, by } => {
                assert_eq!(by.square, Square::E5);
                assert_eq!(forked.len(), 2);
                assert!(forked.iter().all(|p| p.piece == Piece::Pawn));
            }
            other => panic!("expected fork, got {other:?}"),
        }
    }

    #[test]
    fn king_can_be_the_forking_piece() {
        // White king e4 attacks both black rooks
        let b = board("k7/8/8/3r1r2/4K3/8/8/8 w - - 0 1");
        let tactics = forks(&b, Color::White);
        assert!(matches!(
            tactics.as_slice(),
            [TacticDescriptor::Fork { forked, by }]
                if by.square == Square::E4 && forked.len() == 2
        ));
    }

    #[test]
    fn single_check_single_entry() {
        let b = board("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1");
        let tactics = checks(&b, Color::White);
        assert!(matches!(
            tactics.as_slice(),
            [TacticDescriptor::Check { checking, is_double: false }]
                if checking.square == Square::E7
        ));
    }

    #[test]
    fn double_check_has_two_entries() {
        // Rook e1 and bishop d7 both check the e8 king
        let b = board("4k3/3B4/8/8/8/8/8/K3R3 b - - 0 1");
        let tactics = checks(&b, Color::White);
        assert_eq!(tactics.len(), 2);
        assert!(tactics
            .iter()
            .all(|t| matches!(t, TacticDescriptor::Check { is_double: true, .. })));
    }
}
