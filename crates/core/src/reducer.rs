use crate::{
    ChipResult, EventBus, MatchId, MatchRules, MatchState, Phase, Player, PlayerId, PuttResult,
    RoundId, ValidationError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod history;
mod roster;
mod round;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("roster is locked while a match is in progress")]
    MatchInProgress,
    #[error("need {min}-{max} players, have {have}")]
    PlayerCount { min: usize, max: usize, have: usize },
    #[error("roster is full ({0} players)")]
    RosterFull(usize),
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("player name is empty")]
    EmptyName,
    #[error("invalid rules: {0}")]
    InvalidRules(&'static str),
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] ValidationError),
    #[error("closest winner unresolved{}, select one", tie_suffix(.tied))]
    ClosestUnresolved { tied: Vec<PlayerId> },
    #[error("closest is not awarded after a hole-out")]
    ClosestNotApplicable,
    #[error("{0} holed out and does not putt")]
    NotEligibleToPutt(PlayerId),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

fn tie_suffix(tied: &[PlayerId]) -> String {
    if tied.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = tied.iter().map(PlayerId::as_str).collect();
    format!(" (tie: {})", names.join(", "))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    AddPlayer { player: Player },
    UpdatePlayer { player: Player },
    RemovePlayer { player_id: PlayerId },
    ClearPlayers,
    SetRules { rules: MatchRules },
    ToggleHandicap,
    ToggleShotTimer,
    SetShotClock { secs: u32 },
    StartMatch { match_id: MatchId },
    ChooseStartLocation { round_id: RoundId, label: String },
    ConfirmOrder,
    RecordChip { chip: ChipResult },
    SelectClosest { player_id: PlayerId },
    ResetChips,
    CompleteChipping,
    RecordPutt { putt: PuttResult },
    FinalizeRound,
    NextRound,
    Undo,
    Redo,
    EndMatch,
}

/// Applies `action` to a copy of `state`. On error the input is untouched and
/// no events are emitted.
pub fn reduce(
    state: &MatchState,
    action: &Action,
    events: &mut EventBus,
) -> Result<MatchState, MatchError> {
    let mut next = state.clone();
    let mut staged = EventBus::default();
    match next.apply(action, &mut staged) {
        Ok(()) => {
            events.append(&mut staged);
            Ok(next)
        }
        Err(err) => {
            tracing::warn!(?action, %err, "action rejected");
            Err(err)
        }
    }
}

impl MatchState {
    fn apply(&mut self, action: &Action, events: &mut EventBus) -> Result<(), MatchError> {
        tracing::debug!(?action, phase = ?self.phase, "reduce");
        match action {
            Action::AddPlayer { player } => self.add_player(player.clone()),
            Action::UpdatePlayer { player } => self.update_player(player.clone()),
            Action::RemovePlayer { player_id } => self.remove_player(player_id),
            Action::ClearPlayers => self.clear_players(),
            Action::SetRules { rules } => self.set_rules(rules.clone()),
            Action::ToggleHandicap => {
                self.rules.use_handicap = !self.rules.use_handicap;
                Ok(())
            }
            Action::ToggleShotTimer => {
                self.rules.use_shot_timer = !self.rules.use_shot_timer;
                Ok(())
            }
            Action::SetShotClock { secs } => self.set_shot_clock(*secs),
            Action::StartMatch { match_id } => self.start_match(match_id.clone(), events),
            Action::ChooseStartLocation { round_id, label } => {
                self.choose_start_location(round_id.clone(), label, events)
            }
            Action::ConfirmOrder => self.confirm_order(),
            Action::RecordChip { chip } => self.record_chip(chip.clone(), events),
            Action::SelectClosest { player_id } => self.select_closest(player_id, events),
            Action::ResetChips => self.reset_chips(),
            Action::CompleteChipping => self.complete_chipping(),
            Action::RecordPutt { putt } => self.record_putt(putt.clone(), events),
            Action::FinalizeRound => self.finalize_round(events),
            Action::NextRound => self.next_round(),
            Action::Undo => self.undo(events),
            Action::Redo => self.redo(events),
            Action::EndMatch => self.end_match(events),
        }
    }

    fn require_phase(&self, expected: Phase) -> Result<(), MatchError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MatchError::InvalidPhase(self.phase))
        }
    }

    fn require_in_match(&self, player_id: &PlayerId) -> Result<(), MatchError> {
        if self.in_match(player_id) {
            Ok(())
        } else {
            Err(MatchError::UnknownPlayer(player_id.clone()))
        }
    }
}
