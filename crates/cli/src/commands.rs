use anyhow::{bail, Context};
use chipputt_core::{reduce, EventBus, MatchRecord, MatchRules, MatchState, Phase};
use chipputt_data::{
    export_csv, export_json, import_match_file, load_rules, load_rules_or_default, load_script,
};
use std::fs;
use std::path::{Path, PathBuf};

const ASSETS_DIR: &str = "assets";

pub fn resolve_rules(path: Option<&Path>) -> anyhow::Result<MatchRules> {
    match path {
        Some(path) => load_rules(path),
        None => load_rules_or_default(Path::new(ASSETS_DIR)),
    }
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub state: MatchState,
    pub log: Vec<String>,
}

/// Plays every scripted action in order. Stops at the first rejected action.
pub fn replay(script_path: &Path, base_rules: MatchRules) -> anyhow::Result<ReplayOutcome> {
    let script = load_script(script_path)?;
    let rules = script.rules.clone().unwrap_or(base_rules);
    tracing::info!(
        script = %script_path.display(),
        actions = script.actions.len(),
        seed = ?script.seed,
        "replaying"
    );

    let mut state = MatchState::new(rules);
    let mut events = EventBus::default();
    let mut log = Vec::new();
    for (idx, action) in script.actions.iter().enumerate() {
        state = reduce(&state, action, &mut events)
            .with_context(|| format!("action {} ({action:?})", idx + 1))?;
        log.extend(events.drain().map(|event| format!("{event:?}")));
    }
    Ok(ReplayOutcome { state, log })
}

pub fn standings(state: &MatchState) -> Vec<String> {
    let mut lines = Vec::new();
    for score in state.standings() {
        let marker = if state.match_winner_id.as_ref() == Some(&score.player_id) {
            " (winner)"
        } else {
            ""
        };
        lines.push(format!("{:>3}  {}{marker}", score.total, score.name));
    }
    if state.phase != Phase::Finished && state.match_id.is_some() {
        lines.push(format!("match still running after {} rounds", state.rounds.len()));
    }
    lines
}

pub fn record_of(state: &MatchState) -> anyhow::Result<MatchRecord> {
    state
        .to_record(chrono::Utc::now().timestamp_millis())
        .context("no match has been started")
}

pub fn write_export(records: &[MatchRecord], out: &Path) -> anyhow::Result<()> {
    let is_csv = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let body = if is_csv {
        export_csv(records)?
    } else {
        match records {
            [record] => export_json(record)?,
            _ => serde_json::to_string_pretty(records).context("serialize records")?,
        }
    };
    fs::write(out, body).with_context(|| format!("write {}", out.display()))?;
    tracing::info!(path = %out.display(), matches = records.len(), "exported");
    Ok(())
}

pub fn collect_records(
    save: Option<PathBuf>,
    files: &[PathBuf],
) -> anyhow::Result<Vec<MatchRecord>> {
    if !files.is_empty() {
        return files.iter().map(|path| import_match_file(path)).collect();
    }
    let Some(path) = save.or_else(chipputt_cui::default_state_path) else {
        bail!("nothing to export: pass --record or --save");
    };
    let saved = chipputt_cui::load_state_file(&path)?;
    Ok(vec![record_of(&saved.state)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipputt_data::import_match_json;

    const SCRIPT: &str = r##"{
      "seed": 4,
      "actions": [
        {"action": "add_player", "player": {"player_id": "p_ann", "name": "Ann", "color": "#ef4444"}},
        {"action": "add_player", "player": {"player_id": "p_bo", "name": "Bo", "color": "#3b82f6"}},
        {"action": "start_match", "match_id": "m_script"},
        {"action": "choose_start_location", "round_id": "rnd_1", "label": "bunker"},
        {"action": "confirm_order"},
        {"action": "record_chip", "chip": {"player_id": "p_ann", "distance": 0, "holed": true}},
        {"action": "record_chip", "chip": {"player_id": "p_bo", "distance": 1.5}},
        {"action": "complete_chipping"},
        {"action": "record_putt", "putt": {"player_id": "p_bo", "made": true}},
        {"action": "finalize_round"}
      ]
    }"##;

    fn script_file(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("script.json");
        fs::write(&path, body).expect("write script");
        path
    }

    #[test]
    fn replay_scores_the_script() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = replay(&script_file(dir.path(), SCRIPT), MatchRules::default())
            .expect("replay");
        assert_eq!(outcome.state.phase, Phase::RoundSummary);
        assert_eq!(
            standings(&outcome.state),
            vec!["  4  Ann", "  2  Bo", "match still running after 1 rounds"]
        );
        assert!(outcome.log.iter().any(|line| line.starts_with("RoundScored")));
    }

    #[test]
    fn replay_reports_failing_action() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body = r#"[{"action": "confirm_order"}]"#;
        let err = replay(&script_file(dir.path(), body), MatchRules::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("action 1"), "{message}");
        assert!(message.contains("invalid phase"), "{message}");
    }

    #[test]
    fn export_round_trips_through_import() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = replay(&script_file(dir.path(), SCRIPT), MatchRules::default())
            .expect("replay");
        let out = dir.path().join("match.json");
        write_export(&[record_of(&outcome.state).expect("record")], &out).expect("export");
        let record = import_match_json(&fs::read_to_string(&out).expect("read")).expect("import");
        assert_eq!(record.match_id.as_str(), "m_script");

        let csv = dir.path().join("match.csv");
        let records = collect_records(None, &[out]).expect("collect");
        write_export(&records, &csv).expect("csv");
        assert!(fs::read_to_string(&csv)
            .expect("read")
            .starts_with("Match ID,Player,Score"));
    }
}
