use crate::{holed_players, ChipResult, DeltaKind, PlayerId, PuttResult, RoundRecord};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("chip for {player_id} has negative distance {distance} without a hole-out")]
    NegativeDistance { player_id: PlayerId, distance: f64 },
    #[error("{0} holed out but has a putt result")]
    HoledPlayerPutted(PlayerId),
    #[error("{0} has more than one putt result")]
    DuplicatePutt(PlayerId),
    #[error("{kind:?} delta for {player_id} is {delta}, expected {expected}")]
    WrongPoints {
        player_id: PlayerId,
        kind: DeltaKind,
        delta: i32,
        expected: i32,
    },
    #[error("unexpected {kind:?} delta for {player_id}")]
    UnexpectedDelta { player_id: PlayerId, kind: DeltaKind },
    #[error("missing {kind:?} delta for {player_id}")]
    MissingDelta { player_id: PlayerId, kind: DeltaKind },
    #[error("round has neither a hole-out nor a closest winner")]
    MissingClosest,
    #[error("round winner {0} did not win the round")]
    WinnerNotParticipant(PlayerId),
}

pub fn is_valid_chip_result(chip: &ChipResult) -> bool {
    chip.holed || chip.distance >= 0.0
}

/// `made` is a `bool` by construction; kept so imported records go through
/// the same gate as chips.
pub fn is_valid_putt_result(_putt: &PuttResult) -> bool {
    true
}

pub fn validate_chip(chip: &ChipResult) -> Result<(), ValidationError> {
    if is_valid_chip_result(chip) {
        Ok(())
    } else {
        Err(ValidationError::NegativeDistance {
            player_id: chip.player_id.clone(),
            distance: chip.distance,
        })
    }
}

/// Checks a finalized round against the scoring invariants. The judge pick
/// is not stored, so the closest award is checked for shape, not identity.
pub fn validate_round(round: &RoundRecord) -> Result<(), ValidationError> {
    for chip in &round.chip_results {
        validate_chip(chip)?;
    }

    let holed = holed_players(&round.chip_results);
    let mut putters = HashSet::new();
    for putt in &round.putt_results {
        if holed.contains(&putt.player_id) {
            return Err(ValidationError::HoledPlayerPutted(putt.player_id.clone()));
        }
        if !putters.insert(putt.player_id.clone()) {
            return Err(ValidationError::DuplicatePutt(putt.player_id.clone()));
        }
    }

    let mut awarded: HashSet<(PlayerId, DeltaKind)> = HashSet::new();
    let mut closest_winner = None;
    for delta in &round.deltas {
        let expected = delta.kind.points();
        if delta.delta != expected {
            return Err(ValidationError::WrongPoints {
                player_id: delta.player_id.clone(),
                kind: delta.kind,
                delta: delta.delta,
                expected,
            });
        }
        let unexpected = match delta.kind {
            DeltaKind::HoleOut => !holed.contains(&delta.player_id),
            DeltaKind::Closest => !holed.is_empty() || closest_winner.is_some(),
            DeltaKind::Putt => !made_putt(&round.putt_results, &delta.player_id),
        };
        if unexpected || !awarded.insert((delta.player_id.clone(), delta.kind)) {
            return Err(ValidationError::UnexpectedDelta {
                player_id: delta.player_id.clone(),
                kind: delta.kind,
            });
        }
        if delta.kind == DeltaKind::Closest {
            closest_winner = Some(delta.player_id.clone());
        }
    }

    for id in &holed {
        require_award(&awarded, id, DeltaKind::HoleOut)?;
    }
    for putt in round.putt_results.iter().filter(|putt| putt.made) {
        require_award(&awarded, &putt.player_id, DeltaKind::Putt)?;
    }

    if holed.is_empty() {
        match closest_winner {
            None => return Err(ValidationError::MissingClosest),
            Some(closest) if closest != round.winner_id => {
                return Err(ValidationError::WinnerNotParticipant(round.winner_id.clone()));
            }
            Some(_) => {}
        }
    } else if !holed.contains(&round.winner_id) {
        return Err(ValidationError::WinnerNotParticipant(round.winner_id.clone()));
    }
    Ok(())
}

fn made_putt(putts: &[PuttResult], player_id: &PlayerId) -> bool {
    putts
        .iter()
        .any(|putt| putt.made && &putt.player_id == player_id)
}

fn require_award(
    awarded: &HashSet<(PlayerId, DeltaKind)>,
    player_id: &PlayerId,
    kind: DeltaKind,
) -> Result<(), ValidationError> {
    if awarded.contains(&(player_id.clone(), kind)) {
        Ok(())
    } else {
        Err(ValidationError::MissingDelta {
            player_id: player_id.clone(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RoundId, ScoreDelta};

    fn id(value: &str) -> PlayerId {
        PlayerId::from(value)
    }

    fn round(
        chips: Vec<ChipResult>,
        putts: Vec<PuttResult>,
        deltas: Vec<ScoreDelta>,
        winner: &str,
    ) -> RoundRecord {
        RoundRecord {
            round_id: RoundId::from("r"),
            chip_results: chips,
            putt_results: putts,
            deltas,
            winner_id: id(winner),
            start_location: "bunker".to_string(),
        }
    }

    #[test]
    fn chip_validity() {
        assert!(is_valid_chip_result(&ChipResult::at(id("a"), 0.0)));
        assert!(!is_valid_chip_result(&ChipResult::at(id("a"), -0.5)));
        let holed = ChipResult {
            player_id: id("a"),
            distance: -3.0,
            holed: true,
        };
        assert!(is_valid_chip_result(&holed));
        assert!(!is_valid_chip_result(&ChipResult::at(id("a"), f64::NAN)));
    }

    #[test]
    fn accepts_engine_shaped_round() {
        let record = round(
            vec![ChipResult::holed(id("a")), ChipResult::at(id("b"), 3.0)],
            vec![PuttResult::made(id("b"))],
            vec![
                ScoreDelta::award(id("a"), DeltaKind::HoleOut),
                ScoreDelta::award(id("b"), DeltaKind::Putt),
            ],
            "a",
        );
        assert_eq!(validate_round(&record), Ok(()));
    }

    #[test]
    fn rejects_putt_from_holed_player() {
        let record = round(
            vec![ChipResult::holed(id("a"))],
            vec![PuttResult::made(id("a"))],
            vec![ScoreDelta::award(id("a"), DeltaKind::HoleOut)],
            "a",
        );
        assert_eq!(
            validate_round(&record),
            Err(ValidationError::HoledPlayerPutted(id("a")))
        );
    }

    #[test]
    fn rejects_closest_alongside_hole_out() {
        let record = round(
            vec![ChipResult::holed(id("a")), ChipResult::at(id("b"), 1.0)],
            vec![],
            vec![
                ScoreDelta::award(id("a"), DeltaKind::HoleOut),
                ScoreDelta::award(id("b"), DeltaKind::Closest),
            ],
            "a",
        );
        assert!(matches!(
            validate_round(&record),
            Err(ValidationError::UnexpectedDelta { kind: DeltaKind::Closest, .. })
        ));
    }

    #[test]
    fn rejects_inflated_points() {
        let record = round(
            vec![ChipResult::at(id("a"), 1.0)],
            vec![],
            vec![ScoreDelta {
                player_id: id("a"),
                delta: 3,
                kind: DeltaKind::Closest,
            }],
            "a",
        );
        assert!(matches!(
            validate_round(&record),
            Err(ValidationError::WrongPoints { expected: 1, .. })
        ));
    }

    #[test]
    fn rejects_missing_putt_award() {
        let record = round(
            vec![ChipResult::at(id("a"), 1.0)],
            vec![PuttResult::made(id("b"))],
            vec![ScoreDelta::award(id("a"), DeltaKind::Closest)],
            "a",
        );
        assert_eq!(
            validate_round(&record),
            Err(ValidationError::MissingDelta {
                player_id: id("b"),
                kind: DeltaKind::Putt
            })
        );
    }

    #[test]
    fn rejects_winner_other_than_closest() {
        let record = round(
            vec![ChipResult::at(id("a"), 1.0), ChipResult::at(id("b"), 2.0)],
            vec![],
            vec![ScoreDelta::award(id("a"), DeltaKind::Closest)],
            "b",
        );
        assert_eq!(
            validate_round(&record),
            Err(ValidationError::WinnerNotParticipant(id("b")))
        );
    }

    #[test]
    fn rejects_round_without_any_winner() {
        let record = round(vec![ChipResult::at(id("a"), 1.0)], vec![], vec![], "a");
        assert_eq!(validate_round(&record), Err(ValidationError::MissingClosest));
    }
}
