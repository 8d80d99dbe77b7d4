//! Retreat calculator: where a piece may fall back after a failed capture,
//! and what each square costs.

pub mod knight_table;

use chess::{Board, Piece, Square};
use gambit_core::dto::RetreatOptionsDto;
use gambit_core::piece_name;

use crate::board_utils::{ray_direction, square_distance};

/// One legal retreat destination and its BP cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetreatOption {
    pub square: Square,
    pub cost: u32,
}

/// Sliding pieces retreat strictly along the origin/failed-target axis:
/// both directions from the origin, truncated at the first occupied square,
/// failed target excluded. Cost is the distance in squares from the origin.
fn slider_options(origin: Square, failed_target: Square, board: &Board) -> Vec<RetreatOption> {
    let mut options = vec![RetreatOption {
        square: origin,
        cost: 0,
    }];
    let (df, dr) = match ray_direction(origin, failed_target) {
        Some(dir) => dir,
        None => return options,
    };

    for (step_file, step_rank) in [(df, dr), (-df, -dr)] {
        let mut sq = origin;
        while let Some(next) = crate::board_utils::offset(sq, step_file, step_rank) {
            sq = next;
            if sq == failed_target || board.piece_on(sq).is_some() {
                break;
            }
            options.push(RetreatOption {
                square: sq,
                cost: square_distance(origin, sq),
            });
        }
    }
    options
}

/// Compute the retreat options for a piece whose capture attempt from
/// `origin` to `failed_target` was defeated. The origin itself is always
/// available at cost 0. Kings and pawns hold their ground; knights come
/// from the precomputed geometry table, filtered against live occupancy.
pub fn options(
    piece: Piece,
    origin: Square,
    failed_target: Square,
    board: &Board,
) -> Vec<RetreatOption> {
    match piece {
        Piece::Bishop | Piece::Rook | Piece::Queen => slider_options(origin, failed_target, board),
        Piece::Knight => knight_table::options(origin, failed_target)
            .into_iter()
            .filter(|o| o.square == origin || board.piece_on(o.square).is_none())
            .collect(),
        Piece::King | Piece::Pawn => vec![RetreatOption {
            square: origin,
            cost: 0,
        }],
    }
}

/// Is `target` among the previously computed options?
pub fn is_valid(options: &[RetreatOption], target: Square) -> bool {
    options.iter().any(|o| o.square == target)
}

/// BP cost of retreating to `target`, if it is a valid option.
pub fn cost(options: &[RetreatOption], target: Square) -> Option<u32> {
    options.iter().find(|o| o.square == target).map(|o| o.cost)
}

/// Parallel-array DTO form of an option list.
pub fn to_dto(piece: Piece, options: &[RetreatOption]) -> RetreatOptionsDto {
    RetreatOptionsDto {
        piece: piece_name(piece).to_string(),
        valid_positions: options.iter().map(|o| o.square.to_string()).collect(),
        costs: options.iter().map(|o| o.cost).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    fn find(options: &[RetreatOption], sq: Square) -> Option<u32> {
        cost(options, sq)
    }

    #[test]
    fn rook_unobstructed_line() {
        // Rook e4 failed to take the e7 pawn; the e-file is otherwise open
        let b = board("4k3/4p3/8/8/4R3/8/8/4K3 w - - 0 1");
        let opts = options(Piece::Rook, Square::E4, Square::E7, &b);

        assert_eq!(find(&opts, Square::E4), Some(0));
        assert_eq!(find(&opts, Square::E3), Some(1));
        assert_eq!(find(&opts, Square::E2), Some(2));
        // e1 is occupied by the king: line truncated
        assert_eq!(find(&opts, Square::E1), None);
        // toward the target
        assert_eq!(find(&opts, Square::E5), Some(1));
        assert_eq!(find(&opts, Square::E6), Some(2));
        // the failed target itself is never a retreat
        assert_eq!(find(&opts, Square::E7), None);
        // off-axis squares are never retreats
        assert_eq!(find(&opts, Square::D4), None);
    }

    #[test]
    fn rook_line_truncated_by_own_pawn() {
        // Same failed capture, but a white pawn on e3 blocks the way back
        let b = board("4k3/4p3/8/8/4R3/4P3/8/4K3 w - - 0 1");
        let opts = options(Piece::Rook, Square::E4, Square::E7, &b);

        assert_eq!(find(&opts, Square::E4), Some(0));
        assert_eq!(find(&opts, Square::E3), None);
        assert_eq!(find(&opts, Square::E2), None);
        assert_eq!(find(&opts, Square::E5), Some(1));
    }

    #[test]
    fn cost_grows_monotonically_with_distance() {
        let b = board("4k3/4p3/8/8/4R3/8/8/4K3 w - - 0 1");
        let opts = options(Piece::Rook, Square::E4, Square::E7, &b);
        for o in &opts {
            assert_eq!(o.cost, square_distance(Square::E4, o.square));
        }
    }

    #[test]
    fn bishop_diagonal_axis() {
        // Bishop c1 failed to take on g5; retreats lie on the c1-g5 diagonal
        let b = board("4k3/8/8/6p1/8/8/8/2B1K3 w - - 0 1");
        let opts = options(Piece::Bishop, Square::C1, Square::G5, &b);
        assert_eq!(find(&opts, Square::C1), Some(0));
        assert_eq!(find(&opts, Square::D2), Some(1));
        assert_eq!(find(&opts, Square::E3), Some(2));
        assert_eq!(find(&opts, Square::F4), Some(3));
        assert_eq!(find(&opts, Square::G5), None);
        assert_eq!(find(&opts, Square::B2), None); // off the c1-g5 axis
    }

    #[test]
    fn king_and_pawn_hold_their_ground() {
        let b = board("4k3/4p3/8/8/8/8/8/4K3 w - - 0 1");
        for piece in [Piece::King, Piece::Pawn] {
            let opts = options(piece, Square::E4, Square::E5, &b);
            assert_eq!(opts.len(), 1);
            assert_eq!(opts[0].square, Square::E4);
            assert_eq!(opts[0].cost, 0);
        }
    }

    #[test]
    fn knight_options_filter_occupied_squares() {
        // Knight b1 failed on c3; white pawn on c2 removes that option
        let b = board("4k3/8/8/8/8/2n5/2P5/1N2K3 w - - 0 1");
        let opts = options(Piece::Knight, Square::B1, Square::C3, &b);
        assert!(is_valid(&opts, Square::B1));
        assert!(!is_valid(&opts, Square::C2));
        assert!(!is_valid(&opts, Square::C3));
        assert!(is_valid(&opts, Square::B2));
    }

    #[test]
    fn dto_arrays_are_parallel() {
        let b = board("4k3/4p3/8/8/4R3/8/8/4K3 w - - 0 1");
        let opts = options(Piece::Rook, Square::E4, Square::E7, &b);
        let dto = to_dto(Piece::Rook, &opts);
        assert_eq!(dto.valid_positions.len(), dto.costs.len());
        assert_eq!(dto.piece, "rook");
        let idx = dto
            .valid_positions
            .iter()
            .position(|p| p == "e3")
            .unwrap();
        assert_eq!(dto.costs[idx], 1);
    }
}
