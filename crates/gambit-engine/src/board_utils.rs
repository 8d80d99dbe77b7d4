//! Board geometry helpers for tactical analysis.

use chess::{
    BitBoard, Board, BoardBuilder, CastleRights, Color, File, Piece, Rank, Square, EMPTY,
};
use gambit_core::GambitError;

/// Is this a ray (sliding) piece type?
pub fn is_ray_piece(piece: Piece) -> bool {
    matches!(piece, Piece::Queen | Piece::Rook | Piece::Bishop)
}

/// Squares attacked by the piece on a given square.
pub fn attacks(board: &Board, square: Square) -> BitBoard {
    let piece = match board.piece_on(square) {
        Some(p) => p,
        None => return EMPTY,
    };

    match piece {
        Piece::Pawn => match board.color_on(square) {
            Some(color) => pawn_attacks(square, color),
            None => EMPTY,
        },
        Piece::Knight => chess::get_knight_moves(square),
        Piece::King => chess::get_king_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, *board.combined()),
        Piece::Rook => chess::get_rook_moves(square, *board.combined()),
        Piece::Queen => {
            chess::get_bishop_moves(square, *board.combined())
                | chess::get_rook_moves(square, *board.combined())
        }
    }
}

/// Pawn attack squares (diagonal captures only, not pushes).
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let file = square.get_file().to_index();
    let rank = square.get_rank().to_index();

    let mut result = EMPTY;
    let forward: i32 = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let target_rank = rank as i32 + forward;
    if (0..8).contains(&target_rank) {
        for df in [-1i32, 1] {
            let target_file = file as i32 + df;
            if (0..8).contains(&target_file) {
                result |= BitBoard::from_square(Square::make_square(
                    Rank::from_index(target_rank as usize),
                    File::from_index(target_file as usize),
                ));
            }
        }
    }

    result
}

/// All pieces of a color that attack a square.
pub fn attackers(board: &Board, color: Color, square: Square) -> BitBoard {
    let occupied = *board.combined();
    let color_pieces = *board.color_combined(color);

    let mut result = EMPTY;

    // Pawns: reverse lookup — pawn attacks FROM the target square with the
    // opposite color, intersected with actual pawns
    result |= pawn_attacks(square, !color) & *board.pieces(Piece::Pawn) & color_pieces;
    result |= chess::get_knight_moves(square) & *board.pieces(Piece::Knight) & color_pieces;
    result |= chess::get_king_moves(square) & *board.pieces(Piece::King) & color_pieces;
    result |= chess::get_bishop_moves(square, occupied)
        & (*board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen))
        & color_pieces;
    result |= chess::get_rook_moves(square, occupied)
        & (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen))
        & color_pieces;

    result
}

/// The king square for a color.
pub fn king_square(board: &Board, color: Color) -> Square {
    let king_bb = *board.pieces(Piece::King) & *board.color_combined(color);
    debug_assert_eq!(king_bb.popcnt(), 1);
    king_bb.to_square()
}

/// Chebyshev distance between two squares. Along a ray this equals the
/// number of steps.
pub fn square_distance(s1: Square, s2: Square) -> u32 {
    let r1 = s1.get_rank().to_index() as i32;
    let r2 = s2.get_rank().to_index() as i32;
    let f1 = s1.get_file().to_index() as i32;
    let f2 = s2.get_file().to_index() as i32;
    (r1 - r2).unsigned_abs().max((f1 - f2).unsigned_abs())
}

/// Step one square in a (file, rank) direction; None past the board edge.
pub fn offset(square: Square, df: i32, dr: i32) -> Option<Square> {
    let file = square.get_file().to_index() as i32 + df;
    let rank = square.get_rank().to_index() as i32 + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::make_square(
            Rank::from_index(rank as usize),
            File::from_index(file as usize),
        ))
    } else {
        None
    }
}

/// Unit direction from one square toward another along a shared rank, file,
/// or diagonal; None when they don't share a ray.
pub fn ray_direction(from: Square, to: Square) -> Option<(i32, i32)> {
    let df = to.get_file().to_index() as i32 - from.get_file().to_index() as i32;
    let dr = to.get_rank().to_index() as i32 - from.get_rank().to_index() as i32;
    if (df == 0 && dr == 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
        return None;
    }
    Some((df.signum(), dr.signum()))
}

fn rights_without(rights: CastleRights, kingside: bool) -> CastleRights {
    match (rights, kingside) {
        (CastleRights::Both, true) => CastleRights::QueenSide,
        (CastleRights::Both, false) => CastleRights::KingSide,
        (CastleRights::KingSide, true) => CastleRights::NoRights,
        (CastleRights::QueenSide, false) => CastleRights::NoRights,
        (other, _) => other,
    }
}

/// Move a piece to an arbitrary square and hand the turn to the opponent.
///
/// Retreats are not ordinary legal moves (a knight may retreat to an
/// adjacent square; a failed capture "retreat" to the origin is a null
/// move), so this goes through `BoardBuilder` rather than `MoveGen`.
pub fn relocate(board: &Board, from: Square, to: Square) -> Result<Board, GambitError> {
    let piece = board
        .piece_on(from)
        .ok_or_else(|| GambitError::InvalidPosition(format!("no piece on {from}")))?;
    let color = board
        .color_on(from)
        .ok_or_else(|| GambitError::InvalidPosition(format!("no piece on {from}")))?;

    let mut builder = BoardBuilder::from(board);
    builder.clear_square(from);
    builder.piece(to, piece, color);
    builder.side_to_move(!board.side_to_move());
    builder.en_passant(None);

    // Keep castling rights consistent with the piece that moved
    if from != to {
        match (piece, from) {
            (Piece::King, _) => {
                builder.castle_rights(color, CastleRights::NoRights);
            }
            (Piece::Rook, sq) if sq == Square::A1 || sq == Square::A8 => {
                builder.castle_rights(color, rights_without(board.castle_rights(color), false));
            }
            (Piece::Rook, sq) if sq == Square::H1 || sq == Square::H8 => {
                builder.castle_rights(color, rights_without(board.castle_rights(color), true));
            }
            _ => {}
        }
    }

    Board::try_from(&builder).map_err(|e| GambitError::InvalidPosition(e.to_string()))
}
