//! BP regeneration: converts detected tactics plus the base turn amount
//! into a total, with a full per-tactic breakdown for transparency.

pub mod formula;

use gambit_core::config::RegenConfig;
use gambit_core::dto::{BpRegenReport, RegenBreakdownEntry};
use gambit_core::{PieceValues, TacticDescriptor};

/// Upper bound on a single tactic's contribution. Formulas come from
/// configuration, so an absurd result is clamped instead of trusted.
const MAX_TACTIC_CONTRIBUTION: u32 = 1_000_000;

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Named substitutions for one tactic's formula.
fn substitutions(tactic: &TacticDescriptor, values: &PieceValues) -> Vec<(String, f64)> {
    match tactic {
        TacticDescriptor::Pin {
            pinned, pinned_to, ..
        } => vec![
            (
                "pinnedPieceValue".to_string(),
                values.value(pinned.piece) as f64,
            ),
            (
                "isKingPin".to_string(),
                flag(pinned_to.piece == chess::Piece::King),
            ),
        ],
        TacticDescriptor::Skewer { front, back, .. } => vec![
            (
                "frontPieceValue".to_string(),
                values.value(front.piece) as f64,
            ),
            ("backPieceValue".to_string(), values.value(back.piece) as f64),
        ],
        TacticDescriptor::Fork { forked, .. } => {
            let mut piece_values: Vec<f64> = forked
                .iter()
                .map(|p| values.king_value(p.piece) as f64)
                .collect();
            piece_values.sort_by(|a, b| a.total_cmp(b));
            vec![
                (
                    "minForkedValue".to_string(),
                    piece_values.first().copied().unwrap_or(0.0),
                ),
                (
                    "maxForkedValue".to_string(),
                    piece_values.last().copied().unwrap_or(0.0),
                ),
                ("forkedCount".to_string(), piece_values.len() as f64),
            ]
        }
        TacticDescriptor::DiscoveredAttack {
            attacked, is_check, ..
        } => vec![
            (
                "attackedPieceValue".to_string(),
                values.value(attacked.piece) as f64,
            ),
            ("isCheck".to_string(), flag(*is_check)),
        ],
        TacticDescriptor::Check { is_double, .. } => {
            vec![("isDoubleCheck".to_string(), flag(*is_double))]
        }
    }
}

/// Compute the BP regeneration for one move.
///
/// Disabled rules contribute 0. A malformed formula contributes 0 and is
/// logged; it never aborts the rest of the calculation. The cap, when
/// configured, clamps the final total and is recorded on the report.
pub fn regen(tactics: &[TacticDescriptor], config: &RegenConfig) -> BpRegenReport {
    let base = config.base_turn_regeneration;
    let mut tactic_total: u32 = 0;
    let mut breakdown = Vec::new();

    for tactic in tactics {
        let rule = config.rule(tactic.kind());
        if !rule.enabled {
            continue;
        }

        let substitutions = substitutions(tactic, &config.piece_values);
        let (value, error) = match formula::evaluate(&rule.formula, &substitutions) {
            Ok(result) if result.is_finite() && result > 0.0 => (
                result.round().min(MAX_TACTIC_CONTRIBUTION as f64) as u32,
                None,
            ),
            Ok(_) => (0, None),
            Err(e) => {
                tracing::warn!(
                    tactic = tactic.kind().name(),
                    formula = %rule.formula,
                    error = %e,
                    "regen formula failed, contributing 0"
                );
                (0, Some(e.to_string()))
            }
        };

        tactic_total = tactic_total.saturating_add(value);
        breakdown.push(RegenBreakdownEntry {
            tactic: tactic.label(),
            formula: rule.formula.clone(),
            substitutions,
            value,
            error,
        });
    }

    let mut total = base.saturating_add(tactic_total);
    let mut cap_applied = None;
    if let Some(cap) = config.turn_regen_cap {
        if total > cap {
            total = cap;
            cap_applied = Some(cap);
        }
    }

    BpRegenReport {
        total,
        base,
        tactic_total,
        cap_applied,
        breakdown,
    }
}
