use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(PlayerId);
string_id!(RoundId);
string_id!(MatchId);

pub const HOLE_OUT_POINTS: i32 = 4;
pub const CLOSEST_POINTS: i32 = 1;
pub const PUTT_POINTS: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    /// Cosmetic only.
    pub color: String,
    #[serde(default)]
    pub handicap: Option<i32>,
}

impl Player {
    pub fn new(player_id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            color: color.into(),
            handicap: None,
        }
    }
}

/// One chip attempt. Lower `distance` is closer; a holed chip ignores distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChipResult {
    pub player_id: PlayerId,
    pub distance: f64,
    #[serde(default)]
    pub holed: bool,
}

impl ChipResult {
    pub fn at(player_id: PlayerId, distance: f64) -> Self {
        Self {
            player_id,
            distance,
            holed: false,
        }
    }

    pub fn holed(player_id: PlayerId) -> Self {
        Self {
            player_id,
            distance: 0.0,
            holed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuttResult {
    pub player_id: PlayerId,
    pub made: bool,
}

impl PuttResult {
    pub fn made(player_id: PlayerId) -> Self {
        Self {
            player_id,
            made: true,
        }
    }

    pub fn missed(player_id: PlayerId) -> Self {
        Self {
            player_id,
            made: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    HoleOut,
    Closest,
    Putt,
}

impl DeltaKind {
    pub fn points(self) -> i32 {
        match self {
            DeltaKind::HoleOut => HOLE_OUT_POINTS,
            DeltaKind::Closest => CLOSEST_POINTS,
            DeltaKind::Putt => PUTT_POINTS,
        }
    }
}

/// A single scoring event. `delta` always equals `kind.points()` for engine-produced deltas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreDelta {
    pub player_id: PlayerId,
    pub delta: i32,
    pub kind: DeltaKind,
}

impl ScoreDelta {
    pub fn award(player_id: PlayerId, kind: DeltaKind) -> Self {
        Self {
            player_id,
            delta: kind.points(),
            kind,
        }
    }
}

/// Finalized round. Built once when the round closes and never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundRecord {
    pub round_id: RoundId,
    pub chip_results: Vec<ChipResult>,
    pub putt_results: Vec<PuttResult>,
    pub deltas: Vec<ScoreDelta>,
    pub winner_id: PlayerId,
    pub start_location: String,
}

impl RoundRecord {
    pub fn points_for(&self, player_id: &PlayerId) -> i32 {
        self.deltas
            .iter()
            .filter(|delta| &delta.player_id == player_id)
            .map(|delta| delta.delta)
            .sum()
    }

    pub fn holed_player_ids(&self) -> Vec<PlayerId> {
        crate::scoring::holed_players(&self.chip_results)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub name: String,
    pub total: i32,
    /// Every applied delta, oldest first.
    #[serde(default)]
    pub history: Vec<i32>,
}

impl PlayerScore {
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            total: 0,
            history: Vec::new(),
        }
    }

    pub fn with_total(player_id: PlayerId, name: impl Into<String>, total: i32) -> Self {
        Self {
            player_id,
            name: name.into(),
            total,
            history: Vec::new(),
        }
    }

    pub fn apply(&mut self, delta: i32) {
        self.total += delta;
        self.history.push(delta);
    }

    pub fn revert(&mut self, delta: i32) {
        self.total -= delta;
        if let Some(pos) = self.history.iter().rposition(|value| *value == delta) {
            self.history.remove(pos);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub players: Vec<PlayerScore>,
    pub rounds: Vec<RoundRecord>,
    #[serde(default)]
    pub match_winner_id: Option<PlayerId>,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
}
