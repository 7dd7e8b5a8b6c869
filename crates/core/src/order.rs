use crate::{PlayerId, PlayerScore};

/// Chipping order for the next round: highest total first. Among equal totals
/// the previous round's winner goes first; other ties keep input order.
pub fn compute_turn_order(scores: &[PlayerScore], last_round_winner_id: Option<&PlayerId>) -> Vec<PlayerId> {
    let mut ordered: Vec<&PlayerScore> = scores.iter().collect();
    ordered.sort_by(|a, b| {
        b.total.cmp(&a.total).then_with(|| {
            let a_won = Some(&a.player_id) == last_round_winner_id;
            let b_won = Some(&b.player_id) == last_round_winner_id;
            b_won.cmp(&a_won)
        })
    });
    ordered.into_iter().map(|score| score.player_id.clone()).collect()
}
