//! Pin and skewer detection.
//!
//! Both come from the same slider line-walk: the first two occupied squares
//! along a slider's ray. Two enemy pieces in sequence classify as a pin
//! when the back piece is the king or outvalues the front piece (the front
//! piece cannot afford to move), and as a skewer otherwise (the front piece
//! will move, exposing the back one).

use chess::{Board, Color, Piece, Square};
use gambit_core::{PieceAt, PieceValues, TacticDescriptor};

use crate::board_utils::offset;

const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn slider_directions(piece: Piece) -> &'static [(i32, i32)] {
    match piece {
        Piece::Bishop => &DIAGONALS,
        Piece::Rook => &ORTHOGONALS,
        Piece::Queen => &[
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
        ],
        _ => &[],
    }
}

/// First two occupied squares along a ray from `from`.
fn first_two_on_ray(board: &Board, from: Square, dir: (i32, i32)) -> Vec<(Square, Piece, Color)> {
    let mut found = Vec::with_capacity(2);
    let mut sq = from;
    while let Some(next) = offset(sq, dir.0, dir.1) {
        sq = next;
        if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
            found.push((sq, piece, color));
            if found.len() == 2 {
                break;
            }
        }
    }
    found
}

/// All pins and skewers `color`'s sliders hold on the given board.
pub fn pins_and_skewers(board: &Board, color: Color, values: &PieceValues) -> Vec<TacticDescriptor> {
    let mut out = Vec::new();
    let sliders = (*board.pieces(Piece::Bishop)
        | *board.pieces(Piece::Rook)
        | *board.pieces(Piece::Queen))
        & *board.color_combined(color);

    for slider_sq in sliders {
        let slider_piece = match board.piece_on(slider_sq) {
            Some(p) => p,
            None => continue,
        };
        let by = PieceAt::new(slider_sq, slider_piece);

        for &dir in slider_directions(slider_piece) {
            let hits = first_two_on_ray(board, slider_sq, dir);
            let [(front_sq, front_piece, front_color), (back_sq, back_piece, back_color)] =
                match hits.as_slice() {
                    [a, b] => [*a, *b],
                    _ => continue,
                };
            if front_color == color || back_color == color {
                continue;
            }

            let front = PieceAt::new(front_sq, front_piece);
            let back = PieceAt::new(back_sq, back_piece);
            if back_piece == Piece::King
                || values.king_value(back_piece) > values.king_value(front_piece)
            {
                out.push(TacticDescriptor::Pin {
                    pinned: front,
                    pinned_to: back,
                    pinned_by: by,
                });
            } else {
                out.push(TacticDescriptor::Skewer { front, back, by });
            }
        }
    }
    out
}
