use super::*;
use crate::{
    check_match_winner, compute_round_deltas, resolve_round_winner, validate_chip, validate_round,
    Event, RoundDraft, RoundRecord,
};

const UNSPECIFIED_LOCATION: &str = "unspecified";

impl MatchState {
    pub(super) fn choose_start_location(
        &mut self,
        round_id: RoundId,
        label: &str,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        self.require_phase(Phase::StartLocation)?;
        let label = label.trim();
        let start_location = if label.is_empty() {
            UNSPECIFIED_LOCATION.to_string()
        } else {
            label.to_string()
        };
        self.draft = RoundDraft {
            round_id: Some(round_id.clone()),
            start_location: start_location.clone(),
            ..RoundDraft::default()
        };
        self.phase = Phase::OrderConfirm;
        events.push(Event::RoundStarted {
            round: self.round_number,
            round_id,
            start_location,
        });
        Ok(())
    }

    pub(super) fn confirm_order(&mut self) -> Result<(), MatchError> {
        self.require_phase(Phase::OrderConfirm)?;
        self.phase = Phase::Chipping;
        Ok(())
    }

    /// Every attempt is kept. A player who holed any chip counts as holed,
    /// otherwise their first distance counts. Corrections go through `ResetChips`.
    pub(super) fn record_chip(
        &mut self,
        chip: ChipResult,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        self.require_phase(Phase::Chipping)?;
        self.require_in_match(&chip.player_id)?;
        validate_chip(&chip)?;
        if chip.holed {
            self.draft.closest_pick = None;
        }
        events.push(Event::ChipRecorded {
            player_id: chip.player_id.clone(),
            distance: chip.distance,
            holed: chip.holed,
        });
        self.draft.chips.push(chip);
        Ok(())
    }

    pub(super) fn select_closest(
        &mut self,
        player_id: &PlayerId,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        self.require_phase(Phase::Chipping)?;
        self.require_in_match(player_id)?;
        if self.draft.someone_holed() {
            return Err(MatchError::ClosestNotApplicable);
        }
        self.draft.closest_pick = Some(player_id.clone());
        events.push(Event::ClosestSelected {
            player_id: player_id.clone(),
        });
        Ok(())
    }

    pub(super) fn reset_chips(&mut self) -> Result<(), MatchError> {
        self.require_phase(Phase::Chipping)?;
        self.draft.chips.clear();
        self.draft.closest_pick = None;
        Ok(())
    }

    pub(super) fn complete_chipping(&mut self) -> Result<(), MatchError> {
        self.require_phase(Phase::Chipping)?;
        if !self.draft.someone_holed() && self.draft.closest_winner().is_none() {
            return Err(MatchError::ClosestUnresolved {
                tied: self.draft.tied_for_closest(),
            });
        }
        self.phase = Phase::Putting;
        Ok(())
    }

    /// A second putt from the same player replaces the first.
    pub(super) fn record_putt(
        &mut self,
        putt: PuttResult,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        self.require_phase(Phase::Putting)?;
        self.require_in_match(&putt.player_id)?;
        if self.draft.has_holed(&putt.player_id) {
            return Err(MatchError::NotEligibleToPutt(putt.player_id));
        }
        events.push(Event::PuttRecorded {
            player_id: putt.player_id.clone(),
            made: putt.made,
        });
        match self
            .draft
            .putts
            .iter_mut()
            .find(|existing| existing.player_id == putt.player_id)
        {
            Some(existing) => *existing = putt,
            None => self.draft.putts.push(putt),
        }
        Ok(())
    }

    pub(super) fn finalize_round(&mut self, events: &mut EventBus) -> Result<(), MatchError> {
        self.require_phase(Phase::Putting)?;
        let mut putts = self.draft.putts.clone();
        for player_id in self.eligible_putters() {
            if !putts.iter().any(|putt| putt.player_id == player_id) {
                putts.push(PuttResult::missed(player_id));
            }
        }

        let chips = &self.draft.chips;
        let closest = self.draft.closest_winner();
        let deltas = compute_round_deltas(chips, &putts, closest.as_ref());
        let winner_id = resolve_round_winner(chips, closest.as_ref()).ok_or_else(|| {
            MatchError::ClosestUnresolved {
                tied: self.draft.tied_for_closest(),
            }
        })?;
        let round_id = match self.draft.round_id.clone() {
            Some(round_id) => round_id,
            None => return Err(MatchError::InvalidPhase(self.phase)),
        };
        let record = RoundRecord {
            round_id,
            chip_results: chips.clone(),
            putt_results: putts,
            deltas,
            winner_id,
            start_location: self.draft.start_location.clone(),
        };
        validate_round(&record)?;
        self.redo.clear();
        self.commit_round(record, events);
        Ok(())
    }

    pub(super) fn next_round(&mut self) -> Result<(), MatchError> {
        self.require_phase(Phase::RoundSummary)?;
        self.phase = Phase::StartLocation;
        Ok(())
    }

    /// Appends a scored round and settles the match if someone has won.
    pub(super) fn commit_round(&mut self, record: RoundRecord, events: &mut EventBus) {
        self.apply_deltas(&record.deltas);
        events.push(Event::RoundScored {
            round_id: record.round_id.clone(),
            deltas: record.deltas.clone(),
            winner_id: record.winner_id.clone(),
        });
        for delta in &record.deltas {
            if let Some(score) = self.score(&delta.player_id) {
                events.push(Event::ScoreUpdated {
                    player_id: delta.player_id.clone(),
                    total: score.total,
                });
            }
        }
        tracing::debug!(round_id = %record.round_id, winner = %record.winner_id, "round scored");
        self.rounds.push(record);
        self.draft = RoundDraft::default();

        match check_match_winner(
            &self.scores,
            self.rules.target_score,
            self.rules.required_lead,
        ) {
            Some(winner_id) => {
                tracing::info!(winner = %winner_id, rounds = self.rounds.len(), "match completed");
                self.round_number = self.rounds.len() as u32;
                self.match_winner_id = Some(winner_id.clone());
                self.phase = Phase::Finished;
                events.push(Event::MatchCompleted { winner_id });
            }
            None => {
                self.round_number = self.rounds.len() as u32 + 1;
                self.phase = Phase::RoundSummary;
            }
        }
    }
}
