//! Tactic descriptors produced by the tactical detector.
//!
//! A descriptor records the pieces and squares that make up one tactical
//! advantage. Descriptors are produced fresh per move and survive only as
//! the regen audit trail; identity for before/after diffing comes from
//! [`TacticDescriptor::key`].

use chess::{Piece, Square};

/// A piece observed on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceAt {
    pub square: Square,
    pub piece: Piece,
}

impl PieceAt {
    pub fn new(square: Square, piece: Piece) -> Self {
        Self { square, piece }
    }
}

/// The five tactic categories that regenerate BP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TacticKind {
    Pin,
    Skewer,
    Fork,
    DiscoveredAttack,
    Check,
}

impl TacticKind {
    pub fn name(self) -> &'static str {
        match self {
            TacticKind::Pin => "pin",
            TacticKind::Skewer => "skewer",
            TacticKind::Fork => "fork",
            TacticKind::DiscoveredAttack => "discovered_attack",
            TacticKind::Check => "check",
        }
    }
}

/// One detected tactical advantage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacticDescriptor {
    Pin {
        pinned: PieceAt,
        pinned_to: PieceAt,
        pinned_by: PieceAt,
    },
    Skewer {
        front: PieceAt,
        back: PieceAt,
        by: PieceAt,
    },
    Fork {
        forked: Vec<PieceAt>,
        by: PieceAt,
    },
    DiscoveredAttack {
        attacked: PieceAt,
        revealed_by: PieceAt,
        is_check: bool,
    },
    Check {
        checking: PieceAt,
        is_double: bool,
    },
}

/// Identity of a tactic: variant tag plus principal squares. Two snapshots
/// containing the same key describe the same (pre-existing) tactic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TacticKey {
    Pin(Square, Square, Square),
    Skewer(Square, Square, Square),
    Fork(Square, Vec<Square>),
    DiscoveredAttack(Square, Square),
    Check(Square),
}

impl TacticDescriptor {
    pub fn kind(&self) -> TacticKind {
        match self {
            TacticDescriptor::Pin { .. } => TacticKind::Pin,
            TacticDescriptor::Skewer { .. } => TacticKind::Skewer,
            TacticDescriptor::Fork { .. } => TacticKind::Fork,
            TacticDescriptor::DiscoveredAttack { .. } => TacticKind::DiscoveredAttack,
            TacticDescriptor::Check { .. } => TacticKind::Check,
        }
    }

    /// Diff key: fork squares are sorted so attack order never matters.
    pub fn key(&self) -> TacticKey {
        match self {
            TacticDescriptor::Pin {
                pinned,
                pinned_to,
                pinned_by,
            } => TacticKey::Pin(pinned.square, pinned_to.square, pinned_by.square),
            TacticDescriptor::Skewer { front, back, by } => {
                TacticKey::Skewer(front.square, back.square, by.square)
            }
            TacticDescriptor::Fork { forked, by } => {
                let mut squares: Vec<Square> = forked.iter().map(|p| p.square).collect();
                squares.sort_by_key(|s| s.to_index());
                TacticKey::Fork(by.square, squares)
            }
            TacticDescriptor::DiscoveredAttack {
                attacked,
                revealed_by,
                ..
            } => TacticKey::DiscoveredAttack(attacked.square, revealed_by.square),
            TacticDescriptor::Check { checking, .. } => TacticKey::Check(checking.square),
        }
    }

    /// Human-readable label for the regen breakdown.
    pub fn label(&self) -> String {
        match self {
            TacticDescriptor::Pin {
                pinned,
                pinned_to,
                pinned_by,
            } => format!(
                "pin: {} on {} pinned to {} by {}",
                crate::piece_name(pinned.piece),
                pinned.square,
                pinned_to.square,
                pinned_by.square
            ),
            TacticDescriptor::Skewer { front, back, by } => format!(
                "skewer: {} on {} through to {} by {}",
                crate::piece_name(front.piece),
                front.square,
                back.square,
                by.square
            ),
            TacticDescriptor::Fork { forked, by } => {
                let targets: Vec<String> = forked.iter().map(|p| p.square.to_string()).collect();
                format!(
                    "fork: {} on {} hits {}",
                    crate::piece_name(by.piece),
                    by.square,
                    targets.join(", ")
                )
            }
            TacticDescriptor::DiscoveredAttack {
                attacked,
                revealed_by,
                is_check,
            } => format!(
                "discovered {}: {} on {} revealed from {}",
                if *is_check { "check" } else { "attack" },
                crate::piece_name(attacked.piece),
                attacked.square,
                revealed_by.square
            ),
            TacticDescriptor::Check { checking, is_double } => format!(
                "{}: {} from {}",
                if *is_double { "double check" } else { "check" },
                crate::piece_name(checking.piece),
                checking.square
            ),
        }
    }
}
