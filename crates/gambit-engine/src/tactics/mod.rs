//! Tactical detector: newly created pins, skewers, forks, discovered
//! attacks, and checks for one side, derived from a before/after pair of
//! board snapshots.

mod attacks;
mod line_geometry;
mod pins;

use std::collections::HashSet;

use chess::{Board, Color, Square};
use gambit_core::{PieceValues, TacticDescriptor};

pub use attacks::{checks, forks};
pub use line_geometry::discovered_attacks;
pub use pins::pins_and_skewers;

/// Tactics present on one snapshot for one side. Discovered attacks are
/// excluded: they are inherently move-relative, not a property of a single
/// position.
fn snapshot(board: &Board, color: Color, values: &PieceValues) -> Vec<TacticDescriptor> {
    let mut out = pins_and_skewers(board, color, values);
    out.extend(forks(board, color));
    out.extend(checks(board, color));
    out
}

/// Detect the tactics `mover` newly created between `before` and `after`.
///
/// All categories are computed on both snapshots and diffed by identity
/// key, so pre-existing tactics never count twice. A check delivered by the
/// piece a discovered attack revealed is reported once, as the discovered
/// check; an independent checker from another square still counts.
///
/// Pure: neither board is mutated.
pub fn detect(
    before: &Board,
    after: &Board,
    mover: Color,
    values: &PieceValues,
) -> Vec<TacticDescriptor> {
    let before_keys: HashSet<_> = snapshot(before, mover, values)
        .iter()
        .map(|t| t.key())
        .collect();

    let mut found: Vec<TacticDescriptor> = snapshot(after, mover, values)
        .into_iter()
        .filter(|t| !before_keys.contains(&t.key()))
        .collect();

    let discovered = discovered_attacks(before, after, mover);
    let revealed_checkers: HashSet<Square> = discovered
        .iter()
        .filter_map(|t| match t {
            TacticDescriptor::DiscoveredAttack {
                revealed_by,
                is_check: true,
                ..
            } => Some(revealed_by.square),
            _ => None,
        })
        .collect();

    // Suppress the Check entry from the same attacking square as a
    // discovered check
    found.retain(|t| match t {
        TacticDescriptor::Check { checking, .. } => !revealed_checkers.contains(&checking.square),
        _ => true,
    });
    found.extend(discovered);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Piece;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    fn values() -> PieceValues {
        PieceValues::default()
    }

    #[test]
    fn quiet_move_detects_nothing() {
        let before = Board::default();
        let after = board("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        let tactics = detect(&before, &after, Color::White, &values());
        assert!(tactics.is_empty(), "found: {tactics:?}");
    }

    #[test]
    fn pre_existing_pin_is_not_re_reported() {
        // White bishop b5 pins the knight c6 to the king e8 in both
        // snapshots; the unrelated rook shuffle creates nothing new.
        let before = board("4k3/8/2n5/1B6/8/8/8/4K2R w - - 0 1");
        let after = board("4k3/8/2n5/1B6/8/8/8/4K1R1 b - - 1 1");
        let tactics = detect(&before, &after, Color::White, &values());
        assert!(tactics.is_empty(), "found: {tactics:?}");
    }

    #[test]
    fn fresh_pin_is_reported() {
        // Bishop moves from d3 to b5, pinning the c6 knight to the e8 king
        let before = board("4k3/8/2n5/8/8/3B4/8/4K3 w - - 0 1");
        let after = board("4k3/8/2n5/1B6/8/8/8/4K3 b - - 1 1");
        let tactics = detect(&before, &after, Color::White, &values());
        assert_eq!(tactics.len(), 1);
        match &tactics[0] {
            TacticDescriptor::Pin {
                pinned, pinned_to, ..
            } => {
                assert_eq!(pinned.square, Square::C6);
                assert_eq!(pinned_to.piece, Piece::King);
            }
            other => panic!("expected pin, got {other:?}"),
        }
    }

    #[test]
    fn discovered_check_suppresses_duplicate_check_entry() {
        // Bishop e4 steps aside to h7 revealing the e1 rook's check on the
        // e8 king. The revealed check must appear once, as a discovered
        // attack, not again as a plain check.
        let before = board("4k3/8/8/8/4B3/8/8/K3R3 w - - 0 1");
        let after = board("4k3/7B/8/8/8/8/8/K3R3 b - - 1 1");
        let tactics = detect(&before, &after, Color::White, &values());

        let discovered_checks: Vec<_> = tactics
            .iter()
            .filter(|t| {
                matches!(
                    t,
                    TacticDescriptor::DiscoveredAttack { is_check: true, .. }
                )
            })
            .collect();
        assert_eq!(discovered_checks.len(), 1);

        let plain_checks: Vec<_> = tactics
            .iter()
            .filter(|t| matches!(t, TacticDescriptor::Check { .. }))
            .collect();
        assert!(plain_checks.is_empty(), "check double-counted: {tactics:?}");
    }

    #[test]
    fn double_check_from_second_piece_still_counts() {
        // Bishop moves from e6 to d7 giving check itself while revealing
        // the e1 rook: the moved piece's check survives suppression.
        let before = board("4k3/8/4B3/8/8/8/8/K3R3 w - - 0 1");
        let after = board("4k3/3B4/8/8/8/8/8/K3R3 b - - 1 1");
        let tactics = detect(&before, &after, Color::White, &values());

        assert!(tactics.iter().any(|t| matches!(
            t,
            TacticDescriptor::DiscoveredAttack { is_check: true, .. }
        )));
        let moved_check = tactics.iter().any(|t| {
            matches!(t, TacticDescriptor::Check { checking, is_double }
                if checking.square == Square::D7 && *is_double)
        });
        assert!(moved_check, "missing moved-piece check: {tactics:?}");
    }
}
