//! Discovered-attack detection.
//!
//! A discovered attack is inherently move-relative: a slider that did not
//! move now attacks an enemy piece it could not see before, because the
//! mover vacated a square on the line between them.

use chess::{BitBoard, Board, Color, Piece, EMPTY};
use gambit_core::{PieceAt, TacticDescriptor};

use crate::board_utils::attacks;

/// Attacks by `mover`'s sliders newly revealed between `before` and `after`.
pub fn discovered_attacks(before: &Board, after: &Board, mover: Color) -> Vec<TacticDescriptor> {
    let mut out = Vec::new();

    // Squares the mover's pieces vacated (two for castling)
    let vacated = *before.color_combined(mover) & !*after.color_combined(mover);
    if vacated == EMPTY {
        return out;
    }

    let sliders = (*after.pieces(Piece::Bishop)
        | *after.pieces(Piece::Rook)
        | *after.pieces(Piece::Queen))
        & *after.color_combined(mover);

    for slider_sq in sliders {
        let slider_piece = match after.piece_on(slider_sq) {
            Some(p) => p,
            None => continue,
        };
        // The slider itself must not have moved
        if before.piece_on(slider_sq) != Some(slider_piece)
            || before.color_on(slider_sq) != Some(mover)
        {
            continue;
        }

        let now = attacks(after, slider_sq);
        let then = attacks(before, slider_sq);

        for target_sq in now & *after.color_combined(!mover) {
            let target_piece = match after.piece_on(target_sq) {
                Some(p) => p,
                None => continue,
            };
            // The target must have been sitting there, blocked, all along
            if before.piece_on(target_sq) != Some(target_piece)
                || before.color_on(target_sq) != Some(!mover)
            {
                continue;
            }
            if (then & BitBoard::from_square(target_sq)) != EMPTY {
                continue;
            }
            // The reveal must come from the mover stepping off the line
            if (chess::between(slider_sq, target_sq) & vacated) == EMPTY {
                continue;
            }

            out.push(TacticDescriptor::DiscoveredAttack {
                attacked: PieceAt::new(target_sq, target_piece),
                revealed_by: PieceAt::new(slider_sq, slider_piece),
                is_check: target_piece == Piece::King,
            });
        }
    }
    out
}
