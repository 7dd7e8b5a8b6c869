use crate::{
    compute_turn_order, holed_players, resolve_closest, tied_for_closest, ChipResult, MatchId,
    MatchRecord, MatchRules, Player, PlayerId, PlayerScore, PuttResult, RoundId, RoundRecord,
    ScoreDelta,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Idle,
    StartLocation,
    OrderConfirm,
    Chipping,
    Putting,
    RoundSummary,
    Finished,
}

impl Phase {
    /// A match has started and has no winner yet.
    pub fn in_match(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Finished)
    }

    /// No round inputs are being collected.
    pub fn between_rounds(self) -> bool {
        matches!(
            self,
            Phase::StartLocation | Phase::OrderConfirm | Phase::RoundSummary | Phase::Finished
        )
    }
}

/// Inputs for the round being played. Discarded once the round is finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoundDraft {
    #[serde(default)]
    pub round_id: Option<RoundId>,
    #[serde(default)]
    pub start_location: String,
    #[serde(default)]
    pub chips: Vec<ChipResult>,
    #[serde(default)]
    pub putts: Vec<PuttResult>,
    /// Judge-mode closest selection.
    #[serde(default)]
    pub closest_pick: Option<PlayerId>,
}

impl RoundDraft {
    pub fn holed_players(&self) -> Vec<PlayerId> {
        holed_players(&self.chips)
    }

    pub fn someone_holed(&self) -> bool {
        self.chips.iter().any(|chip| chip.holed)
    }

    pub fn has_holed(&self, player_id: &PlayerId) -> bool {
        self.chips
            .iter()
            .any(|chip| chip.holed && &chip.player_id == player_id)
    }

    pub fn closest_winner(&self) -> Option<PlayerId> {
        if self.someone_holed() {
            return None;
        }
        resolve_closest(&self.chips, self.closest_pick.as_ref())
    }

    pub fn tied_for_closest(&self) -> Vec<PlayerId> {
        tied_for_closest(&self.chips)
    }

    pub fn putt_for(&self, player_id: &PlayerId) -> Option<&PuttResult> {
        self.putts.iter().find(|putt| &putt.player_id == player_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchState {
    #[serde(default)]
    pub rules: MatchRules,
    pub players: Vec<Player>,
    pub scores: Vec<PlayerScore>,
    pub rounds: Vec<RoundRecord>,
    pub phase: Phase,
    #[serde(default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub round_number: u32,
    #[serde(default)]
    pub match_winner_id: Option<PlayerId>,
    #[serde(default)]
    pub draft: RoundDraft,
    /// Undone rounds, most recent last.
    #[serde(default)]
    pub redo: Vec<RoundRecord>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchRules::default())
    }
}

impl MatchState {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            rules,
            players: Vec::new(),
            scores: Vec::new(),
            rounds: Vec::new(),
            phase: Phase::Idle,
            match_id: None,
            round_number: 0,
            match_winner_id: None,
            draft: RoundDraft::default(),
            redo: Vec::new(),
        }
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players
            .iter()
            .find(|player| &player.player_id == player_id)
    }

    pub fn player_name<'a>(&'a self, player_id: &'a PlayerId) -> &'a str {
        if let Some(player) = self.player(player_id) {
            return &player.name;
        }
        self.score(player_id)
            .map(|score| score.name.as_str())
            .unwrap_or(player_id.as_str())
    }

    pub fn score(&self, player_id: &PlayerId) -> Option<&PlayerScore> {
        self.scores
            .iter()
            .find(|score| &score.player_id == player_id)
    }

    /// Players with a score row in the current match.
    pub fn in_match(&self, player_id: &PlayerId) -> bool {
        self.score(player_id).is_some()
    }

    pub fn last_round_winner(&self) -> Option<&PlayerId> {
        self.rounds.last().map(|round| &round.winner_id)
    }

    pub fn turn_order(&self) -> Vec<PlayerId> {
        compute_turn_order(&self.scores, self.last_round_winner())
    }

    /// Turn order minus anyone who holed out this round.
    pub fn eligible_putters(&self) -> Vec<PlayerId> {
        self.turn_order()
            .into_iter()
            .filter(|id| !self.draft.has_holed(id))
            .collect()
    }

    /// Scores sorted by total, highest first.
    pub fn standings(&self) -> Vec<&PlayerScore> {
        let mut ranked: Vec<&PlayerScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.total.cmp(&a.total));
        ranked
    }

    pub fn to_record(&self, timestamp: i64) -> Option<MatchRecord> {
        let match_id = self.match_id.clone()?;
        Some(MatchRecord {
            match_id,
            players: self.scores.clone(),
            rounds: self.rounds.clone(),
            match_winner_id: self.match_winner_id.clone(),
            timestamp,
        })
    }

    pub(crate) fn apply_deltas(&mut self, deltas: &[ScoreDelta]) {
        for delta in deltas {
            if let Some(score) = self
                .scores
                .iter_mut()
                .find(|score| score.player_id == delta.player_id)
            {
                score.apply(delta.delta);
            }
        }
    }

    pub(crate) fn revert_deltas(&mut self, deltas: &[ScoreDelta]) {
        for delta in deltas.iter().rev() {
            if let Some(score) = self
                .scores
                .iter_mut()
                .find(|score| score.player_id == delta.player_id)
            {
                score.revert(delta.delta);
            }
        }
    }
}

/// Rebuilds running scores from zero by applying each round's stored deltas in order.
pub fn replay_rounds(players: &[PlayerScore], rounds: &[RoundRecord]) -> Vec<PlayerScore> {
    let mut scores: Vec<PlayerScore> = players
        .iter()
        .map(|score| PlayerScore::new(score.player_id.clone(), score.name.clone()))
        .collect();
    for round in rounds {
        for delta in &round.deltas {
            if let Some(score) = scores
                .iter_mut()
                .find(|score| score.player_id == delta.player_id)
            {
                score.apply(delta.delta);
            }
        }
    }
    scores
}
