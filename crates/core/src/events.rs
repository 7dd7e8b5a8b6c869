use crate::{MatchId, PlayerId, RoundId, ScoreDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    MatchStarted {
        match_id: MatchId,
        players: usize,
    },
    RoundStarted {
        round: u32,
        round_id: RoundId,
        start_location: String,
    },
    ChipRecorded {
        player_id: PlayerId,
        distance: f64,
        holed: bool,
    },
    ClosestSelected { player_id: PlayerId },
    PuttRecorded { player_id: PlayerId, made: bool },
    RoundScored {
        round_id: RoundId,
        deltas: Vec<ScoreDelta>,
        winner_id: PlayerId,
    },
    ScoreUpdated { player_id: PlayerId, total: i32 },
    MatchCompleted { winner_id: PlayerId },
    Undone { round_id: RoundId },
    Redone { round_id: RoundId },
    MatchCancelled,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn append(&mut self, other: &mut EventBus) {
        self.queue.append(&mut other.queue);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
