use crate::{ChipResult, DeltaKind, PlayerId, PlayerScore, PuttResult, ScoreDelta};
use std::collections::HashSet;

/// Closest chip from a list already sorted by ascending distance.
///
/// Returns `None` for an empty list or when the leading distance is shared by
/// another entry. Holed chips must be filtered out by the caller (see
/// [`rank_by_proximity`]).
pub fn resolve_closest_chip_winner(chips: &[ChipResult]) -> Option<PlayerId> {
    let (closest, rest) = chips.split_first()?;
    if rest.iter().any(|chip| chip.distance == closest.distance) {
        return None;
    }
    Some(closest.player_id.clone())
}

/// Players who holed out, in order of their first holed chip.
pub fn holed_players(chips: &[ChipResult]) -> Vec<PlayerId> {
    let mut seen = HashSet::new();
    chips
        .iter()
        .filter(|chip| chip.holed)
        .filter(|chip| seen.insert(chip.player_id.clone()))
        .map(|chip| chip.player_id.clone())
        .collect()
}

/// One entry per non-holed player (their first recorded chip), sorted by
/// ascending distance. Equal distances keep input order.
pub fn rank_by_proximity(chips: &[ChipResult]) -> Vec<ChipResult> {
    let holed: HashSet<PlayerId> = holed_players(chips).into_iter().collect();
    let mut seen = HashSet::new();
    let mut ranked: Vec<ChipResult> = chips
        .iter()
        .filter(|chip| !holed.contains(&chip.player_id))
        .filter(|chip| seen.insert(chip.player_id.clone()))
        .cloned()
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

/// Players sharing the smallest distance when that minimum is tied.
pub fn tied_for_closest(chips: &[ChipResult]) -> Vec<PlayerId> {
    let ranked = rank_by_proximity(chips);
    let Some(best) = ranked.first().map(|chip| chip.distance) else {
        return Vec::new();
    };
    let tied: Vec<PlayerId> = ranked
        .iter()
        .take_while(|chip| chip.distance == best)
        .map(|chip| chip.player_id.clone())
        .collect();
    if tied.len() > 1 {
        tied
    } else {
        Vec::new()
    }
}

/// Closest winner for a round: an explicit judge pick wins, otherwise the
/// unique minimum distance among non-holed chips.
pub fn resolve_closest(chips: &[ChipResult], judge_closest_id: Option<&PlayerId>) -> Option<PlayerId> {
    if let Some(id) = judge_closest_id {
        return Some(id.clone());
    }
    resolve_closest_chip_winner(&rank_by_proximity(chips))
}

pub fn compute_round_deltas(
    chips: &[ChipResult],
    putts: &[PuttResult],
    judge_closest_id: Option<&PlayerId>,
) -> Vec<ScoreDelta> {
    let holed = holed_players(chips);
    let mut deltas: Vec<ScoreDelta> = holed
        .iter()
        .map(|id| ScoreDelta::award(id.clone(), DeltaKind::HoleOut))
        .collect();

    if holed.is_empty() {
        if let Some(closest) = resolve_closest(chips, judge_closest_id) {
            deltas.push(ScoreDelta::award(closest, DeltaKind::Closest));
        }
    }

    let mut putted = HashSet::new();
    for putt in putts {
        if !putted.insert(putt.player_id.clone()) {
            continue;
        }
        if putt.made && !holed.contains(&putt.player_id) {
            deltas.push(ScoreDelta::award(putt.player_id.clone(), DeltaKind::Putt));
        }
    }
    deltas
}

/// Who picks the next start location. With several hole-outs the first in
/// input order is taken.
pub fn resolve_round_winner(
    chips: &[ChipResult],
    closest_winner_id: Option<&PlayerId>,
) -> Option<PlayerId> {
    if let Some(chip) = chips.iter().find(|chip| chip.holed) {
        return Some(chip.player_id.clone());
    }
    closest_winner_id.cloned()
}

pub fn check_match_winner(
    scores: &[PlayerScore],
    target_score: i32,
    required_lead: i32,
) -> Option<PlayerId> {
    let mut ranked: Vec<&PlayerScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    let top = ranked.first()?;
    let runner_up = ranked.get(1).map(|score| score.total).unwrap_or(0);
    if top.total >= target_score && top.total - runner_up >= required_lead {
        Some(top.player_id.clone())
    } else {
        None
    }
}
