//! Match configuration: BP pools, regen formulas, duel tie-break, and
//! information-hiding flags. Loadable from JSON; every layer has defaults.

use serde::{Deserialize, Serialize};

use crate::tactic::TacticKind;
use crate::values::PieceValues;

/// Top-level configuration for one match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub initial_bp: InitialBp,
    pub regen: RegenConfig,
    pub duel: DuelConfig,
    pub filter: FilterConfig,
}

/// Starting BP pool per player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitialBp(pub u32);

impl Default for InitialBp {
    fn default() -> Self {
        InitialBp(39)
    }
}

/// How a bid tie is decided. The dominant rule is strict inequality
/// (defender favored), but the policy is an explicit configuration point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    DefenderWins,
    AttackerWins,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DuelConfig {
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Replace the opponent's BP pool with absence in every projection.
    pub hide_battle_points: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            hide_battle_points: true,
        }
    }
}

/// One per-tactic regen rule: an on/off switch plus a formula evaluated
/// against the tactic's named substitutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticRule {
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    pub formula: String,
}

fn enabled_default() -> bool {
    true
}

impl TacticRule {
    fn new(formula: &str) -> Self {
        Self {
            enabled: true,
            formula: formula.to_string(),
        }
    }
}

/// BP regeneration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    pub base_turn_regeneration: u32,
    pub turn_regen_cap: Option<u32>,
    pub piece_values: PieceValues,
    pub pin: TacticRule,
    pub skewer: TacticRule,
    pub fork: TacticRule,
    pub discovered_attack: TacticRule,
    pub check: TacticRule,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            base_turn_regeneration: 1,
            turn_regen_cap: None,
            piece_values: PieceValues::default(),
            pin: TacticRule::new("pinnedPieceValue + isKingPin"),
            skewer: TacticRule::new("max(1, abs(frontPieceValue - backPieceValue))"),
            fork: TacticRule::new("minForkedValue"),
            discovered_attack: TacticRule::new("ceil(attackedPieceValue / 2) + 2 * isCheck"),
            check: TacticRule::new("2 + isDoubleCheck"),
        }
    }
}

impl RegenConfig {
    pub fn rule(&self, kind: TacticKind) -> &TacticRule {
        match kind {
            TacticKind::Pin => &self.pin,
            TacticKind::Skewer => &self.skewer,
            TacticKind::Fork => &self.fork,
            TacticKind::DiscoveredAttack => &self.discovered_attack,
            TacticKind::Check => &self.check,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
