//! Move application and duel resolution.
//!
//! The per-match state machine: a validated capture attempt suspends
//! normal turn progression while both sides submit hidden BP allocations;
//! resolution spends both bids, completes or refuses the capture, and on
//! refusal opens the tactical-retreat window.
//!
//! Every operation is all-or-nothing: any error leaves the state exactly
//! as it was.

use chess::{BoardStatus, Color, Square};
use gambit_core::color_name;
use gambit_core::config::TieBreak;
use gambit_core::dto::{BpRegenReport, DuelOutcome, DuelResult};
use gambit_core::{GambitError, PieceAt};

use crate::retreat;
use crate::rules::RulesEngine;
use crate::state::{GameState, GameStatus, PendingDuel, PendingRetreat};

/// What applying a move produced.
#[derive(Debug, Clone)]
pub enum MoveOutcome {
    /// A non-capture completed immediately.
    Completed { regen: BpRegenReport },
    /// A capture attempt opened a duel; allocations are now awaited.
    DuelStarted,
}

impl GameState {
    fn ensure_normal_play(&self) -> Result<(), GambitError> {
        match self.status {
            GameStatus::Over => Err(GambitError::GameOver),
            GameStatus::DuelInProgress => Err(GambitError::DuelAlreadyPending),
            GameStatus::RetreatInProgress => Err(GambitError::InvalidMove(
                "a tactical retreat is pending".to_string(),
            )),
            GameStatus::Waiting | GameStatus::InProgress => Ok(()),
        }
    }

    /// Apply a move for the side to move. Captures do not complete here:
    /// they open a duel and wait.
    pub fn apply_move(
        &mut self,
        rules: &dyn RulesEngine,
        from: Square,
        to: Square,
    ) -> Result<MoveOutcome, GambitError> {
        self.ensure_normal_play()?;

        let mover = self.active();
        let validated = rules.validate_move(&self.board, from, to)?;

        if let Some(captured) = validated.captured {
            let attacking_piece = self
                .board
                .piece_on(from)
                .map(|p| PieceAt::new(from, p))
                .ok_or_else(|| GambitError::InvalidMove(format!("no piece on {from}")))?;

            self.pending_duel = Some(PendingDuel {
                from,
                to,
                attacker: mover,
                defender: !mover,
                attacking_piece,
                defending_piece: PieceAt::new(to, captured),
                attacker_allocation: None,
                defender_allocation: None,
            });
            self.status = GameStatus::DuelInProgress;
            self.last_regen = None;
            tracing::debug!(game = %self.id, %from, %to, "capture attempt, duel opened");
            return Ok(MoveOutcome::DuelStarted);
        }

        let before = self.board;
        self.board = validated.board_after;
        let regen = self.finalize_move(before, mover, format!("{from}{to}"), validated.is_checkmate);
        Ok(MoveOutcome::Completed { regen })
    }

    /// Record one side's hidden allocation. BP is not spent here — both
    /// bids are deducted at resolution, so a side that never allocates
    /// keeps its pool. Returns the outcome once both sides have submitted.
    pub fn allocate(
        &mut self,
        rules: &dyn RulesEngine,
        color: Color,
        amount: i64,
    ) -> Result<Option<DuelOutcome>, GambitError> {
        let duel = self.pending_duel.as_ref().ok_or(GambitError::NoPendingDuel)?;
        if color != duel.attacker && color != duel.defender {
            return Err(GambitError::NotADuelParticipant);
        }
        if amount < 0 {
            return Err(GambitError::InvalidAllocation(format!(
                "allocation cannot be negative, got {amount}"
            )));
        }
        let amount = amount as u32;
        let available = self.player(color).bp;
        if amount > available {
            return Err(GambitError::InsufficientBp {
                required: amount,
                available,
            });
        }

        let duel = match self.pending_duel.as_mut() {
            Some(duel) => duel,
            None => return Err(GambitError::NoPendingDuel),
        };
        let slot = if color == duel.attacker {
            &mut duel.attacker_allocation
        } else {
            &mut duel.defender_allocation
        };
        if slot.is_some() {
            return Err(GambitError::AlreadyAllocated(color_name(color).to_string()));
        }
        *slot = Some(amount);

        if duel.attacker_allocation.is_some() && duel.defender_allocation.is_some() {
            return Ok(Some(self.resolve(rules)?));
        }
        Ok(None)
    }

    /// The allocation window expired: any missing allocation defaults to 0
    /// and the duel resolves. A defined default, not an error.
    pub fn resolve_timeout(
        &mut self,
        rules: &dyn RulesEngine,
    ) -> Result<DuelOutcome, GambitError> {
        {
            let duel = self.pending_duel.as_mut().ok_or(GambitError::NoPendingDuel)?;
            duel.attacker_allocation.get_or_insert(0);
            duel.defender_allocation.get_or_insert(0);
        }
        self.resolve(rules)
    }

    /// Both allocations are present: spend them, decide the capture, and
    /// either complete the move or open the retreat window.
    fn resolve(&mut self, rules: &dyn RulesEngine) -> Result<DuelOutcome, GambitError> {
        let (from, to, attacker, defender, attacking_piece, bid_a, bid_d) = {
            let duel = self.pending_duel.as_ref().ok_or(GambitError::NoPendingDuel)?;
            match (duel.attacker_allocation, duel.defender_allocation) {
                (Some(a), Some(d)) => (
                    duel.from,
                    duel.to,
                    duel.attacker,
                    duel.defender,
                    duel.attacking_piece,
                    a,
                    d,
                ),
                _ => {
                    return Err(GambitError::InvalidAllocation(
                        "resolution requires both allocations".to_string(),
                    ))
                }
            }
        };

        let attacker_wins = match self.config.duel.tie_break {
            TieBreak::DefenderWins => bid_a > bid_d,
            TieBreak::AttackerWins => bid_a >= bid_d,
        };

        // Validate the replay before any mutation so a rules failure
        // leaves the duel intact
        let validated = if attacker_wins {
            Some(rules.validate_move(&self.board, from, to)?)
        } else {
            None
        };

        self.pending_duel = None;
        // Bidding costs BP win or lose
        let attacker_pool = &mut self.player_mut(attacker).bp;
        *attacker_pool = attacker_pool.saturating_sub(bid_a);
        let defender_pool = &mut self.player_mut(defender).bp;
        *defender_pool = defender_pool.saturating_sub(bid_d);

        tracing::debug!(
            game = %self.id,
            attacker = color_name(attacker),
            bid_a,
            bid_d,
            attacker_wins,
            "duel resolved"
        );

        let result = match validated {
            Some(validated) => {
                let before = self.board;
                self.board = validated.board_after;
                self.finalize_move(
                    before,
                    attacker,
                    format!("{from}x{to}"),
                    validated.is_checkmate,
                );
                DuelResult::Success
            }
            None => {
                let options = retreat::options(attacking_piece.piece, from, to, &self.board);
                self.pending_retreat = Some(PendingRetreat {
                    piece: attacking_piece,
                    origin: from,
                    failed_target: to,
                    options,
                });
                self.status = GameStatus::RetreatInProgress;
                DuelResult::Failed
            }
        };

        Ok(DuelOutcome {
            winner: color_name(if attacker_wins { attacker } else { defender }).to_string(),
            result,
            attacker_allocation: bid_a,
            defender_allocation: bid_d,
        })
    }

    /// Complete a failed capture by retreating to one of the computed
    /// options, paying its BP cost. Retreating to the origin is free.
    pub fn apply_retreat(&mut self, to: Square) -> Result<BpRegenReport, GambitError> {
        let (origin, cost) = {
            let pending = self
                .pending_retreat
                .as_ref()
                .ok_or(GambitError::NoPendingRetreat)?;
            let cost = retreat::cost(&pending.options, to).ok_or_else(|| {
                GambitError::InvalidRetreat(format!("{to} is not a legal retreat square"))
            })?;
            (pending.origin, cost)
        };

        let mover = self.active();
        let available = self.player(mover).bp;
        if cost > available {
            return Err(GambitError::InsufficientBp {
                required: cost,
                available,
            });
        }

        // Validate the relocation before mutating anything
        let before = self.board;
        let after = crate::board_utils::relocate(&self.board, origin, to)?;
        let is_checkmate = after.status() == BoardStatus::Checkmate;

        self.pending_retreat = None;
        self.player_mut(mover).bp -= cost;
        self.board = after;
        let notation = if origin == to {
            format!("{origin} holds")
        } else {
            format!("{origin}>{to}")
        };
        Ok(self.finalize_move(before, mover, notation, is_checkmate))
    }
}
