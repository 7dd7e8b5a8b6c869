use super::*;
use crate::{Event, PlayerScore, RoundDraft};

impl MatchState {
    fn roster_editable(&self) -> Result<(), MatchError> {
        if self.phase.in_match() {
            Err(MatchError::MatchInProgress)
        } else {
            Ok(())
        }
    }

    pub(super) fn add_player(&mut self, mut player: Player) -> Result<(), MatchError> {
        self.roster_editable()?;
        player.name = player.name.trim().to_string();
        if player.name.is_empty() {
            return Err(MatchError::EmptyName);
        }
        if self.player(&player.player_id).is_some() {
            return Err(MatchError::DuplicatePlayer(player.player_id));
        }
        if self.players.len() >= self.rules.max_players {
            return Err(MatchError::RosterFull(self.players.len()));
        }
        self.players.push(player);
        Ok(())
    }

    pub(super) fn update_player(&mut self, mut player: Player) -> Result<(), MatchError> {
        player.name = player.name.trim().to_string();
        if player.name.is_empty() {
            return Err(MatchError::EmptyName);
        }
        let slot = self
            .players
            .iter_mut()
            .find(|existing| existing.player_id == player.player_id)
            .ok_or_else(|| MatchError::UnknownPlayer(player.player_id.clone()))?;
        if let Some(score) = self
            .scores
            .iter_mut()
            .find(|score| score.player_id == player.player_id)
        {
            score.name = player.name.clone();
        }
        *slot = player;
        Ok(())
    }

    pub(super) fn remove_player(&mut self, player_id: &PlayerId) -> Result<(), MatchError> {
        self.roster_editable()?;
        let before = self.players.len();
        self.players.retain(|player| &player.player_id != player_id);
        if self.players.len() == before {
            return Err(MatchError::UnknownPlayer(player_id.clone()));
        }
        Ok(())
    }

    pub(super) fn clear_players(&mut self) -> Result<(), MatchError> {
        self.roster_editable()?;
        self.players.clear();
        Ok(())
    }

    pub(super) fn set_rules(&mut self, rules: MatchRules) -> Result<(), MatchError> {
        self.roster_editable()?;
        rules.validate().map_err(MatchError::InvalidRules)?;
        self.rules = rules;
        Ok(())
    }

    pub(super) fn set_shot_clock(&mut self, secs: u32) -> Result<(), MatchError> {
        if secs == 0 {
            return Err(MatchError::InvalidRules("shot_clock_secs must be at least 1"));
        }
        self.rules.shot_clock_secs = secs;
        Ok(())
    }

    pub(super) fn start_match(
        &mut self,
        match_id: MatchId,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        if self.phase.in_match() {
            return Err(MatchError::InvalidPhase(self.phase));
        }
        let have = self.players.len();
        if !self.rules.allows_player_count(have) {
            return Err(MatchError::PlayerCount {
                min: self.rules.min_players,
                max: self.rules.max_players,
                have,
            });
        }
        self.scores = self
            .players
            .iter()
            .map(|player| PlayerScore::new(player.player_id.clone(), player.name.clone()))
            .collect();
        self.rounds.clear();
        self.redo.clear();
        self.draft = RoundDraft::default();
        self.match_winner_id = None;
        self.match_id = Some(match_id.clone());
        self.round_number = 1;
        self.phase = Phase::StartLocation;
        tracing::info!(%match_id, players = have, "match started");
        events.push(Event::MatchStarted {
            match_id,
            players: have,
        });
        Ok(())
    }

    pub(super) fn end_match(&mut self, events: &mut EventBus) -> Result<(), MatchError> {
        if self.phase == Phase::Idle {
            return Err(MatchError::InvalidPhase(self.phase));
        }
        self.scores.clear();
        self.rounds.clear();
        self.redo.clear();
        self.draft = RoundDraft::default();
        self.match_id = None;
        self.match_winner_id = None;
        self.round_number = 0;
        self.phase = Phase::Idle;
        events.push(Event::MatchCancelled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, name: &str) -> Player {
        Player::new(PlayerId::from(id), name, "#3b82f6")
    }

    fn with_players(count: usize) -> MatchState {
        let mut state = MatchState::default();
        let mut events = EventBus::default();
        for idx in 0..count {
            let action = Action::AddPlayer {
                player: player(&format!("p{idx}"), &format!("Player {idx}")),
            };
            state = reduce(&state, &action, &mut events).expect("add");
        }
        state
    }

    #[test]
    fn add_trims_and_rejects_blank_names() {
        let mut events = EventBus::default();
        let state = reduce(
            &MatchState::default(),
            &Action::AddPlayer {
                player: player("a", "  Ann  "),
            },
            &mut events,
        )
        .expect("add");
        assert_eq!(state.players[0].name, "Ann");
        let err = reduce(
            &state,
            &Action::AddPlayer {
                player: player("b", "   "),
            },
            &mut events,
        )
        .unwrap_err();
        assert_eq!(err, MatchError::EmptyName);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let state = with_players(1);
        let mut events = EventBus::default();
        let err = reduce(
            &state,
            &Action::AddPlayer {
                player: player("p0", "Again"),
            },
            &mut events,
        )
        .unwrap_err();
        assert_eq!(err, MatchError::DuplicatePlayer(PlayerId::from("p0")));
    }

    #[test]
    fn roster_caps_at_six() {
        let state = with_players(6);
        let mut events = EventBus::default();
        let err = reduce(
            &state,
            &Action::AddPlayer {
                player: player("p6", "Seventh"),
            },
            &mut events,
        )
        .unwrap_err();
        assert_eq!(err, MatchError::RosterFull(6));
    }

    #[test]
    fn start_requires_two_players() {
        let state = with_players(1);
        let mut events = EventBus::default();
        let err = reduce(
            &state,
            &Action::StartMatch {
                match_id: MatchId::from("m1"),
            },
            &mut events,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MatchError::PlayerCount {
                min: 2,
                max: 6,
                have: 1
            }
        );
    }

    #[test]
    fn start_zeroes_scores_and_locks_roster() {
        let state = with_players(3);
        let mut events = EventBus::default();
        let state = reduce(
            &state,
            &Action::StartMatch {
                match_id: MatchId::from("m1"),
            },
            &mut events,
        )
        .expect("start");
        assert_eq!(state.phase, Phase::StartLocation);
        assert_eq!(state.round_number, 1);
        assert_eq!(state.scores.len(), 3);
        assert!(state.scores.iter().all(|score| score.total == 0));
        let err = reduce(
            &state,
            &Action::RemovePlayer {
                player_id: PlayerId::from("p0"),
            },
            &mut events,
        )
        .unwrap_err();
        assert_eq!(err, MatchError::MatchInProgress);
    }

    #[test]
    fn rename_mid_match_updates_score_row() {
        let state = with_players(2);
        let mut events = EventBus::default();
        let state = reduce(
            &state,
            &Action::StartMatch {
                match_id: MatchId::from("m1"),
            },
            &mut events,
        )
        .expect("start");
        let state = reduce(
            &state,
            &Action::UpdatePlayer {
                player: player("p1", "Renamed"),
            },
            &mut events,
        )
        .expect("rename");
        assert_eq!(state.score(&PlayerId::from("p1")).map(|s| s.name.as_str()), Some("Renamed"));
    }

    #[test]
    fn end_match_resets_to_idle() {
        let state = with_players(2);
        let mut events = EventBus::default();
        let state = reduce(
            &state,
            &Action::StartMatch {
                match_id: MatchId::from("m1"),
            },
            &mut events,
        )
        .expect("start");
        let state = reduce(&state, &Action::EndMatch, &mut events).expect("end");
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.scores.is_empty());
        assert!(state.match_id.is_none());
        assert_eq!(state.players.len(), 2);
    }

    #[test]
    fn set_rules_validates() {
        let mut events = EventBus::default();
        let rules = MatchRules {
            target_score: 0,
            ..MatchRules::default()
        };
        let err = reduce(&MatchState::default(), &Action::SetRules { rules }, &mut events)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidRules(_)));
    }
}
