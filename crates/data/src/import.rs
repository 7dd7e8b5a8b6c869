use anyhow::{bail, Context};
use chipputt_core::{replay_rounds, validate_round, MatchRecord, PlayerId, RoundRecord};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parses an exported match and checks it against the scoring rules before
/// handing it back.
pub fn import_match_json(raw: &str) -> anyhow::Result<MatchRecord> {
    let record: MatchRecord = serde_json::from_str(raw).context("parse match record")?;
    let roster: HashSet<&PlayerId> = record.players.iter().map(|p| &p.player_id).collect();
    if roster.len() != record.players.len() {
        bail!("match {} lists a player twice", record.match_id);
    }

    let mut round_ids = HashSet::new();
    for (idx, round) in record.rounds.iter().enumerate() {
        if !round_ids.insert(&round.round_id) {
            bail!("round {} reuses round id {}", idx + 1, round.round_id);
        }
        validate_round(round)
            .with_context(|| format!("round {} ({})", idx + 1, round.round_id))?;
        if let Some(stranger) = participants(round).find(|id| !roster.contains(id)) {
            bail!(
                "round {} ({}) references unknown player {stranger}",
                idx + 1,
                round.round_id
            );
        }
    }

    let replayed = replay_rounds(&record.players, &record.rounds);
    for (stored, expected) in record.players.iter().zip(&replayed) {
        if stored.total != expected.total {
            bail!(
                "total for {} is {}, rounds add up to {}",
                stored.player_id,
                stored.total,
                expected.total
            );
        }
    }

    if let Some(winner) = &record.match_winner_id {
        if !roster.contains(winner) {
            bail!("match winner {winner} is not in the roster");
        }
    }
    tracing::debug!(match_id = %record.match_id, rounds = record.rounds.len(), "match imported");
    Ok(record)
}

pub fn import_match_file(path: &Path) -> anyhow::Result<MatchRecord> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    import_match_json(&raw).with_context(|| format!("import {}", path.display()))
}

fn participants(round: &RoundRecord) -> impl Iterator<Item = &PlayerId> {
    round
        .chip_results
        .iter()
        .map(|chip| &chip.player_id)
        .chain(round.putt_results.iter().map(|putt| &putt.player_id))
        .chain(round.deltas.iter().map(|delta| &delta.player_id))
        .chain(std::iter::once(&round.winner_id))
}
