//! Shared domain vocabulary for the Gambit Chess mechanics engine.
//!
//! Pure data: piece values, tactic descriptors, configuration, outward
//! DTOs, and the error taxonomy. No board analysis lives here.

pub mod config;
pub mod dto;
pub mod error;
pub mod tactic;
pub mod values;

pub use config::{DuelConfig, FilterConfig, GameConfig, RegenConfig, TieBreak};
pub use error::GambitError;
pub use tactic::{PieceAt, TacticDescriptor, TacticKind};
pub use values::PieceValues;

/// Lowercase color name used in every outward DTO.
pub fn color_name(color: chess::Color) -> &'static str {
    match color {
        chess::Color::White => "white",
        chess::Color::Black => "black",
    }
}

/// Lowercase piece name used in DTOs and regen breakdowns.
pub fn piece_name(piece: chess::Piece) -> &'static str {
    match piece {
        chess::Piece::Pawn => "pawn",
        chess::Piece::Knight => "knight",
        chess::Piece::Bishop => "bishop",
        chess::Piece::Rook => "rook",
        chess::Piece::Queen => "queen",
        chess::Piece::King => "king",
    }
}
