use super::*;
use crate::{Event, RoundDraft};

impl MatchState {
    /// Removes the last finalized round and reverses its score deltas.
    pub(super) fn undo(&mut self, events: &mut EventBus) -> Result<(), MatchError> {
        if !self.phase.between_rounds() {
            return Err(MatchError::InvalidPhase(self.phase));
        }
        let record = self.rounds.pop().ok_or(MatchError::NothingToUndo)?;
        self.revert_deltas(&record.deltas);
        for delta in &record.deltas {
            if let Some(score) = self.score(&delta.player_id) {
                events.push(Event::ScoreUpdated {
                    player_id: delta.player_id.clone(),
                    total: score.total,
                });
            }
        }
        tracing::debug!(round_id = %record.round_id, "round undone");
        events.push(Event::Undone {
            round_id: record.round_id.clone(),
        });
        self.redo.push(record);
        self.match_winner_id = None;
        self.draft = RoundDraft::default();
        self.round_number = self.rounds.len() as u32 + 1;
        self.phase = Phase::StartLocation;
        Ok(())
    }

    pub(super) fn redo(&mut self, events: &mut EventBus) -> Result<(), MatchError> {
        if !matches!(
            self.phase,
            Phase::StartLocation | Phase::OrderConfirm | Phase::RoundSummary
        ) {
            return Err(MatchError::InvalidPhase(self.phase));
        }
        let record = self.redo.pop().ok_or(MatchError::NothingToRedo)?;
        let round_id = record.round_id.clone();
        self.commit_round(record, events);
        events.push(Event::Redone { round_id });
        Ok(())
    }
}
