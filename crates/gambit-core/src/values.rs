//! Configurable piece values used by regen formulas and tactic classification.

use chess::Piece;
use serde::{Deserialize, Serialize};

/// Sentinel used where the king needs a comparable value (skewer/pin
/// classification). The king is never a tradeable piece, so it outvalues
/// everything.
pub const KING_SENTINEL: u32 = 99;

/// Per-piece-type values, loadable from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceValues {
    pub pawn: u32,
    pub knight: u32,
    pub bishop: u32,
    pub rook: u32,
    pub queen: u32,
}

impl Default for PieceValues {
    fn default() -> Self {
        Self {
            pawn: 1,
            knight: 3,
            bishop: 3,
            rook: 5,
            queen: 9,
        }
    }
}

impl PieceValues {
    /// Exchange value of a piece. The king is worth 0 for material math.
    pub fn value(&self, piece: Piece) -> u32 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => 0,
        }
    }

    /// Value with the king as a large sentinel, for ordering comparisons.
    pub fn king_value(&self, piece: Piece) -> u32 {
        match piece {
            Piece::King => KING_SENTINEL,
            other => self.value(other),
        }
    }
}
