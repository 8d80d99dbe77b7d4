//! Outward-facing DTOs.
//!
//! Conditional fields are `Option` with `skip_serializing_if` so absence,
//! not null, signals "not entitled to see". The viewer projection types are
//! structurally incapable of carrying hidden information: there is no field
//! for the opponent's allocation on a player's own view.

use serde::Serialize;

/// Outcome of a resolved duel, revealed to both sides simultaneously.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DuelOutcome {
    pub winner: String,
    pub result: DuelResult,
    pub attacker_allocation: u32,
    pub defender_allocation: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuelResult {
    Success,
    Failed,
}

/// Retreat options for a piece whose capture attempt failed.
/// `valid_positions` and `costs` are parallel arrays of the same length.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RetreatOptionsDto {
    pub piece: String,
    pub valid_positions: Vec<String>,
    pub costs: Vec<u32>,
}

/// One line of the regen breakdown: which tactic, which formula, which
/// substituted values, and what it evaluated to.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegenBreakdownEntry {
    pub tactic: String,
    pub formula: String,
    pub substitutions: Vec<(String, f64)>,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full BP regeneration result for one move. Immutable once produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BpRegenReport {
    pub total: u32,
    pub base: u32,
    pub tactic_total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_applied: Option<u32>,
    pub breakdown: Vec<RegenBreakdownEntry>,
}

/// Per-player slice of a viewer projection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerView {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp: Option<u32>,
}

/// Duel-in-progress slice of a viewer projection. At most the viewer's own
/// allocation is ever present; the opposing side's is omitted until the
/// outcome DTO reveals both.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PendingDuelView {
    pub from: String,
    pub to: String,
    pub attacker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker_allocation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defender_allocation: Option<u32>,
}

/// A read-only projection of game state scoped to one viewing identity.
/// Always an independent deep copy of the underlying state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewerState {
    pub game_id: String,
    pub fen: String,
    pub status: String,
    pub active: String,
    pub move_history: Vec<String>,
    pub white: PlayerView,
    pub black: PlayerView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_duel: Option<PendingDuelView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retreat_options: Option<RetreatOptionsDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp_calculation_report: Option<BpRegenReport>,
}
