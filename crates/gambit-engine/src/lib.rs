//! Gambit Chess mechanics engine.
//!
//! Turns plain legal chess moves into Gambit Chess events: capture
//! attempts resolve through a hidden Battle Point duel, tactical skill
//! (pins, forks, skewers, discovered attacks, checks) regenerates the BP
//! pool, failed captures fall back along piece-specific retreat geometry,
//! and every outward view of state is filtered per viewer.

pub use chess;
pub use gambit_core;

pub mod arena;
pub mod board_utils;
pub mod duel;
pub mod filter;
pub mod regen;
pub mod retreat;
pub mod rules;
pub mod state;
pub mod tactics;

pub use arena::MatchArena;
pub use duel::MoveOutcome;
pub use filter::{for_viewer, Viewer};
pub use rules::{RulesEngine, StandardRules, ValidatedMove};
pub use state::{GameState, GameStatus, PendingDuel, PendingRetreat, PlayerState};
