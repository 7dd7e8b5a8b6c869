use crate::persistence::{default_state_path, load_state_file, save_state_file};
use crate::LaunchOptions;
use anyhow::{Context, Result};
use chipputt_core::{
    reduce, Action, ChipResult, Event, EventBus, IdGen, MatchError, MatchRules, MatchState, Phase,
    Player, PlayerId, PuttResult,
};
use chipputt_data::{export_csv, export_json};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_EVENT_LOG: usize = 200;
const MIN_SHOT_CLOCK_SECS: i64 = 5;
pub const PALETTE: [&str; 6] = [
    "#ef4444", "#3b82f6", "#22c55e", "#eab308", "#a855f7", "#f97316",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    AddPlayer,
    RenamePlayer,
    StartLocation,
    ChipDistance,
    SavePath,
    LoadPath,
    ExportPath,
}

impl PromptMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::AddPlayer => "Add Player",
            Self::RenamePlayer => "Rename Player",
            Self::StartLocation => "Start Location",
            Self::ChipDistance => "Chip Distance",
            Self::SavePath => "Save Path",
            Self::LoadPath => "Load Path",
            Self::ExportPath => "Export Path",
        }
    }

    pub fn takes_path(self) -> bool {
        matches!(self, Self::SavePath | Self::LoadPath | Self::ExportPath)
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub mode: PromptMode,
    pub input: String,
    /// Player the prompt edits, if any.
    pub target: Option<PlayerId>,
}

pub struct App {
    pub state: MatchState,
    pub events: EventBus,
    pub ids: IdGen,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub cursor: usize,
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub clock_remaining: Option<Duration>,
    pub save_path: Option<PathBuf>,
    pub should_quit: bool,
}

impl App {
    pub fn new(rules: MatchRules, seed: u64, save_path: Option<PathBuf>) -> Self {
        Self {
            state: MatchState::new(rules),
            events: EventBus::default(),
            ids: IdGen::from_seed(seed),
            event_log: VecDeque::new(),
            status_line: "add players with a, start with s".to_string(),
            cursor: 0,
            show_help: false,
            prompt: None,
            clock_remaining: None,
            save_path,
            should_quit: false,
        }
    }

    pub fn bootstrap(options: &LaunchOptions) -> Result<Self> {
        let seed = options
            .seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
        let mut app = Self::new(options.rules.clone(), seed, options.save_path.clone());
        if options.resume {
            let path = app
                .save_path
                .clone()
                .or_else(default_state_path)
                .context("no save path to resume from")?;
            let saved = load_state_file(&path)
                .with_context(|| format!("resume from {}", path.display()))?;
            app.state = saved.state;
            app.reset_clock();
            app.push_status(format!("resumed {}", path.display()));
            tracing::info!(path = %path.display(), phase = ?app.state.phase, "resumed match");
        }
        app.push_event_line(format!("seed {seed}"));
        Ok(app)
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        let Some(remaining) = self.clock_remaining else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        let next = remaining.saturating_sub(elapsed);
        self.clock_remaining = Some(next);
        if next.is_zero() {
            let shooter = self
                .selected_player_id()
                .map(|id| self.state.player_name(&id).to_string())
                .unwrap_or_else(|| "-".to_string());
            self.push_status(format!("time! shot clock expired for {shooter}"));
        }
    }

    pub fn clock_applies(&self) -> bool {
        self.state.rules.use_shot_timer
            && matches!(self.state.phase, Phase::Chipping | Phase::Putting)
    }

    fn reset_clock(&mut self) {
        self.clock_remaining = if self.clock_applies() {
            Some(Duration::from_secs(u64::from(self.state.rules.shot_clock_secs)))
        } else {
            None
        };
    }

    pub fn restart_clock(&mut self) {
        if !self.clock_applies() {
            self.push_status("shot clock is off (t to enable)");
            return;
        }
        self.reset_clock();
        self.push_status("shot clock restarted");
    }

    /// Players the cursor moves over in the current phase.
    pub fn cursor_rows(&self) -> Vec<PlayerId> {
        match self.state.phase {
            Phase::Idle | Phase::Finished => self
                .state
                .players
                .iter()
                .map(|player| player.player_id.clone())
                .collect(),
            Phase::Putting => self.state.eligible_putters(),
            _ => self.state.turn_order(),
        }
    }

    pub fn selected_player_id(&self) -> Option<PlayerId> {
        self.cursor_rows().get(self.cursor).cloned()
    }

    fn selected_player(&self) -> Option<Player> {
        let id = self.selected_player_id()?;
        self.state.player(&id).cloned()
    }

    pub fn move_cursor(&mut self, down: bool) {
        let len = self.cursor_rows().len();
        move_index(&mut self.cursor, len, down);
    }

    fn advance_cursor(&mut self) {
        let len = self.cursor_rows().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Runs `action` through the reducer. The state is replaced only on success.
    pub fn apply(&mut self, action: Action) -> bool {
        let before = self.state.phase;
        match reduce(&self.state, &action, &mut self.events) {
            Ok(next) => {
                self.state = next;
                self.flush_events();
                if self.state.phase != before {
                    self.cursor = 0;
                    self.reset_clock();
                }
                self.normalize_cursor();
                self.autosave();
                true
            }
            Err(err) => {
                self.push_error(err);
                false
            }
        }
    }

    fn autosave(&mut self) {
        let Some(path) = self.save_path.clone() else {
            return;
        };
        if let Err(err) = save_state_file(&self.state, &path) {
            tracing::warn!(path = %path.display(), error = %err, "autosave failed");
            self.push_status(format!("autosave failed: {err:#}"));
        }
    }

    pub fn activate_primary(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match self.state.phase {
            Phase::Idle | Phase::Finished => self.start_match(),
            Phase::StartLocation => self.open_location_prompt(),
            Phase::OrderConfirm => {
                if self.apply(Action::ConfirmOrder) {
                    self.push_status("chipping: d distance, o hole-out");
                }
            }
            Phase::Chipping => self.open_distance_prompt(),
            Phase::Putting => self.finalize_step(),
            Phase::RoundSummary => self.next_step(),
        }
    }

    pub fn open_add_player_prompt(&mut self) {
        if self.state.phase.in_match() {
            self.push_status("roster is locked during a match");
            return;
        }
        if self.state.players.len() >= self.state.rules.max_players {
            self.push_status(format!(
                "roster is full ({} players)",
                self.state.rules.max_players
            ));
            return;
        }
        self.open_prompt(PromptMode::AddPlayer, String::new(), None);
    }

    pub fn remove_selected_player(&mut self) {
        let Some(player_id) = self.selected_player_id() else {
            self.push_status("no player selected");
            return;
        };
        if self.apply(Action::RemovePlayer { player_id }) {
            self.push_status("player removed");
        }
    }

    pub fn open_rename_prompt(&mut self) {
        let Some(player) = self.selected_player() else {
            self.push_status("no player selected");
            return;
        };
        self.open_prompt(PromptMode::RenamePlayer, player.name, Some(player.player_id));
    }

    pub fn cycle_selected_color(&mut self) {
        let Some(mut player) = self.selected_player() else {
            self.push_status("no player selected");
            return;
        };
        let next = PALETTE
            .iter()
            .position(|color| *color == player.color)
            .map(|idx| (idx + 1) % PALETTE.len())
            .unwrap_or(0);
        player.color = PALETTE[next].to_string();
        self.apply(Action::UpdatePlayer { player });
    }

    pub fn adjust_selected_handicap(&mut self, step: i32) {
        if !self.state.rules.use_handicap {
            self.push_status("handicaps are off (g to enable)");
            return;
        }
        let Some(mut player) = self.selected_player() else {
            self.push_status("no player selected");
            return;
        };
        player.handicap = Some(player.handicap.unwrap_or(0) + step);
        self.apply(Action::UpdatePlayer { player });
    }

    pub fn toggle_handicap(&mut self) {
        if self.apply(Action::ToggleHandicap) {
            let label = on_off(self.state.rules.use_handicap);
            self.push_status(format!("handicaps {label}"));
        }
    }

    pub fn toggle_shot_timer(&mut self) {
        if self.apply(Action::ToggleShotTimer) {
            self.reset_clock();
            let label = on_off(self.state.rules.use_shot_timer);
            self.push_status(format!("shot clock {label}"));
        }
    }

    pub fn adjust_shot_clock(&mut self, delta: i64) {
        let secs = (i64::from(self.state.rules.shot_clock_secs) + delta).max(MIN_SHOT_CLOCK_SECS);
        let secs = u32::try_from(secs).unwrap_or(u32::MAX);
        if self.apply(Action::SetShotClock { secs }) {
            self.push_status(format!("shot clock {secs}s"));
        }
    }

    pub fn start_match(&mut self) {
        let match_id = self.ids.match_id();
        if self.apply(Action::StartMatch { match_id }) {
            self.push_status("match started: pick a start location (l)");
        }
    }

    pub fn open_location_prompt(&mut self) {
        if self.state.phase != Phase::StartLocation {
            self.push_status("start location is chosen between rounds");
            return;
        }
        self.open_prompt(PromptMode::StartLocation, String::new(), None);
    }

    pub fn open_distance_prompt(&mut self) {
        if self.state.phase != Phase::Chipping {
            self.push_status("distances are entered while chipping");
            return;
        }
        let Some(player_id) = self.selected_player_id() else {
            self.push_status("no player selected");
            return;
        };
        self.open_prompt(PromptMode::ChipDistance, String::new(), Some(player_id));
    }

    pub fn record_hole_out(&mut self) {
        let Some(player_id) = self.selected_player_id() else {
            self.push_status("no player selected");
            return;
        };
        let chip = ChipResult::holed(player_id);
        if self.apply(Action::RecordChip { chip }) {
            self.advance_cursor();
            self.reset_clock();
        }
    }

    pub fn pick_closest(&mut self) {
        let Some(player_id) = self.selected_player_id() else {
            self.push_status("no player selected");
            return;
        };
        self.apply(Action::SelectClosest { player_id });
    }

    pub fn reset_chips(&mut self) {
        if self.apply(Action::ResetChips) {
            self.push_status("chips cleared");
        }
    }

    pub fn record_putt(&mut self, made: bool) {
        let Some(player_id) = self.selected_player_id() else {
            self.push_status("no player selected");
            return;
        };
        let putt = if made {
            PuttResult::made(player_id)
        } else {
            PuttResult::missed(player_id)
        };
        if self.apply(Action::RecordPutt { putt }) {
            self.advance_cursor();
            self.reset_clock();
        }
    }

    pub fn finalize_step(&mut self) {
        match self.state.phase {
            Phase::Chipping => {
                if self.apply(Action::CompleteChipping) {
                    self.push_status("putting: m made, x missed, f finalize");
                }
            }
            Phase::Putting => {
                if self.apply(Action::FinalizeRound) {
                    let status = match &self.state.match_winner_id {
                        Some(winner) => format!("{} wins the match", self.state.player_name(winner)),
                        None => "round scored: n for the next round".to_string(),
                    };
                    self.push_status(status);
                }
            }
            phase => self.push_status(format!("nothing to finalize in {}", phase_label(phase))),
        }
    }

    pub fn next_step(&mut self) {
        match self.state.phase {
            Phase::RoundSummary => {
                if self.apply(Action::NextRound) {
                    self.push_status("pick a start location (l)");
                }
            }
            Phase::Finished => self.start_match(),
            phase => self.push_status(format!("nothing next in {}", phase_label(phase))),
        }
    }

    pub fn undo(&mut self) {
        if self.apply(Action::Undo) {
            self.push_status("last round undone");
        }
    }

    pub fn redo(&mut self) {
        if self.apply(Action::Redo) {
            self.push_status("round restored");
        }
    }

    pub fn end_match(&mut self) {
        if self.apply(Action::EndMatch) {
            self.push_status("match cancelled");
        }
    }

    pub fn open_save_prompt(&mut self) {
        self.open_prompt(PromptMode::SavePath, String::new(), None);
    }

    pub fn open_load_prompt(&mut self) {
        self.open_prompt(PromptMode::LoadPath, String::new(), None);
    }

    pub fn open_export_prompt(&mut self) {
        if self.state.match_id.is_none() {
            self.push_status("no match to export");
            return;
        }
        self.open_prompt(PromptMode::ExportPath, String::new(), None);
    }

    fn open_prompt(&mut self, mode: PromptMode, input: String, target: Option<PlayerId>) {
        self.show_help = false;
        self.prompt = Some(Prompt {
            mode,
            input,
            target,
        });
    }

    fn default_path(&self, mode: PromptMode) -> Option<PathBuf> {
        match mode {
            PromptMode::ExportPath => {
                let match_id = self.state.match_id.as_ref()?;
                Some(PathBuf::from(format!("chipputt_{match_id}.json")))
            }
            _ => self.save_path.clone().or_else(default_state_path),
        }
    }

    pub fn prompt_default_path_hint(&self) -> String {
        self.prompt
            .as_ref()
            .and_then(|prompt| self.default_path(prompt.mode))
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn handle_prompt_key(&mut self, key: KeyEvent) -> bool {
        let Some(prompt) = self.prompt.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.push_status("cancelled");
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    prompt.input.push(ch);
                }
            }
            _ => {}
        }
        true
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let input = prompt.input.trim();
        match prompt.mode {
            PromptMode::AddPlayer => {
                let color = PALETTE[self.state.players.len() % PALETTE.len()];
                let player = Player::new(self.ids.player_id(), input, color);
                if self.apply(Action::AddPlayer { player }) {
                    self.push_status(format!("added {input}"));
                }
            }
            PromptMode::RenamePlayer => {
                let Some(mut player) = prompt
                    .target
                    .as_ref()
                    .and_then(|id| self.state.player(id))
                    .cloned()
                else {
                    self.push_status("player no longer exists");
                    return;
                };
                player.name = input.to_string();
                self.apply(Action::UpdatePlayer { player });
            }
            PromptMode::StartLocation => {
                let round_id = self.ids.round_id();
                let label = input.to_string();
                if self.apply(Action::ChooseStartLocation { round_id, label }) {
                    self.push_status("confirm the turn order with Enter");
                }
            }
            PromptMode::ChipDistance => {
                let Some(player_id) = prompt.target else {
                    return;
                };
                match parse_distance(input) {
                    Ok(distance) => {
                        let chip = ChipResult::at(player_id, distance);
                        if self.apply(Action::RecordChip { chip }) {
                            self.advance_cursor();
                            self.reset_clock();
                        }
                    }
                    Err(err) => self.push_status(err),
                }
            }
            PromptMode::SavePath | PromptMode::LoadPath | PromptMode::ExportPath => {
                let Ok(path) = resolve_prompt_path(input, self.default_path(prompt.mode)) else {
                    self.push_status("path unavailable");
                    return;
                };
                match prompt.mode {
                    PromptMode::SavePath => self.save_to_path(&path),
                    PromptMode::LoadPath => self.load_from_path(&path),
                    _ => self.export_to_path(&path),
                }
            }
        }
    }

    fn save_to_path(&mut self, path: &Path) {
        match save_state_file(&self.state, path) {
            Ok(_) => self.push_status(format!(
                "saved {} rounds to {}",
                self.state.rounds.len(),
                path.display()
            )),
            Err(err) => self.push_status(format!("save failed: {err:#}")),
        }
    }

    fn load_from_path(&mut self, path: &Path) {
        let saved = match load_state_file(path) {
            Ok(saved) => saved,
            Err(err) => {
                self.push_status(format!("load failed: {err:#}"));
                return;
            }
        };
        self.state = saved.state;
        self.cursor = 0;
        self.reset_clock();
        self.push_event_line(format!("loaded {}", path.display()));
        self.push_status(format!(
            "loaded {} rounds from {}",
            self.state.rounds.len(),
            path.display()
        ));
    }

    fn export_to_path(&mut self, path: &Path) {
        let Some(record) = self
            .state
            .to_record(chrono::Utc::now().timestamp_millis())
        else {
            self.push_status("no match to export");
            return;
        };
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let body = if is_csv {
            export_csv(std::slice::from_ref(&record))
        } else {
            export_json(&record)
        };
        let written = body.and_then(|body| {
            fs::write(path, body).with_context(|| format!("write {}", path.display()))
        });
        match written {
            Ok(()) => self.push_status(format!("exported to {}", path.display())),
            Err(err) => self.push_status(format!("export failed: {err:#}")),
        }
    }

    pub fn next_hint(&self) -> &'static str {
        match self.state.phase {
            Phase::Idle if self.state.players.len() < self.state.rules.min_players => {
                "add players (a)"
            }
            Phase::Idle => "start the match (s)",
            Phase::StartLocation => "choose a start location (l)",
            Phase::OrderConfirm => "confirm the order (Enter)",
            Phase::Chipping if self.state.draft.chips.is_empty() => "record chips (d / o)",
            Phase::Chipping => "finish chipping (f)",
            Phase::Putting => "record putts (m / x), then finalize (f)",
            Phase::RoundSummary => "next round (n) or undo (u)",
            Phase::Finished => "new match (n) or export (X)",
        }
    }

    pub fn chip_label(&self, player_id: &PlayerId) -> String {
        let draft = &self.state.draft;
        if draft.has_holed(player_id) {
            return "HOLED".to_string();
        }
        let mut label = match draft.chips.iter().find(|chip| &chip.player_id == player_id) {
            Some(chip) => format!("{:.2}", chip.distance),
            None => "-".to_string(),
        };
        if draft.closest_pick.as_ref() == Some(player_id) {
            label.push_str(" (judged closest)");
        }
        label
    }

    pub fn putt_label(&self, player_id: &PlayerId) -> &'static str {
        match self.state.draft.putt_for(player_id) {
            Some(putt) if putt.made => "made",
            Some(_) => "missed",
            None => "-",
        }
    }

    fn normalize_cursor(&mut self) {
        let len = self.cursor_rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: MatchError) {
        self.status_line = format!("error: {err}");
    }

    fn flush_events(&mut self) {
        let drained: Vec<Event> = self.events.drain().collect();
        let lines: Vec<String> = drained
            .iter()
            .map(|event| self.format_event(event))
            .collect();
        for line in lines {
            self.push_event_line(line);
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.event_log.push_back(format!("{stamp} {line}"));
    }

    fn format_event(&self, event: &Event) -> String {
        let name = |id: &PlayerId| self.state.player_name(id).to_string();
        match event {
            Event::MatchStarted { match_id, players } => {
                format!("match {match_id} started with {players} players")
            }
            Event::RoundStarted {
                round,
                start_location,
                ..
            } => format!("round {round} from {start_location}"),
            Event::ChipRecorded {
                player_id,
                distance,
                holed,
            } => {
                if *holed {
                    format!("{} holed out", name(player_id))
                } else {
                    format!("{} chipped to {distance:.2}", name(player_id))
                }
            }
            Event::ClosestSelected { player_id } => {
                format!("{} judged closest", name(player_id))
            }
            Event::PuttRecorded { player_id, made } => format!(
                "{} {} the putt",
                name(player_id),
                if *made { "made" } else { "missed" }
            ),
            Event::RoundScored {
                deltas, winner_id, ..
            } => {
                let awards: Vec<String> = deltas
                    .iter()
                    .map(|delta| format!("{} +{}", name(&delta.player_id), delta.delta))
                    .collect();
                format!(
                    "round won by {}: {}",
                    name(winner_id),
                    if awards.is_empty() {
                        "no points".to_string()
                    } else {
                        awards.join(", ")
                    }
                )
            }
            Event::ScoreUpdated { player_id, total } => {
                format!("{} now on {total}", name(player_id))
            }
            Event::MatchCompleted { winner_id } => format!("{} wins the match", name(winner_id)),
            Event::Undone { round_id } => format!("undid round {round_id}"),
            Event::Redone { round_id } => format!("redid round {round_id}"),
            Event::MatchCancelled => "match cancelled".to_string(),
        }
    }
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "setup",
        Phase::StartLocation => "start location",
        Phase::OrderConfirm => "turn order",
        Phase::Chipping => "chipping",
        Phase::Putting => "putting",
        Phase::RoundSummary => "round summary",
        Phase::Finished => "finished",
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1) % len;
    } else if *value == 0 {
        *value = len - 1;
    } else {
        *value -= 1;
    }
}

fn resolve_prompt_path(input: &str, default_path: Option<PathBuf>) -> Result<PathBuf, String> {
    if input.is_empty() {
        return default_path.ok_or_else(|| "path unavailable".to_string());
    }
    Ok(PathBuf::from(input))
}

/// Accepts plain numbers, optionally suffixed with `m`.
fn parse_distance(input: &str) -> Result<f64, String> {
    let trimmed = input.trim().trim_end_matches('m').trim();
    let distance: f64 = trimmed
        .parse()
        .map_err(|_| format!("not a distance: {input:?}"))?;
    if !distance.is_finite() {
        return Err(format!("not a distance: {input:?}"));
    }
    Ok(distance)
}
