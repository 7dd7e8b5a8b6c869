use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_SCORE: i32 = 7;
pub const DEFAULT_REQUIRED_LEAD: i32 = 2;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
pub const DEFAULT_SHOT_CLOCK_SECS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchRules {
    pub target_score: i32,
    pub required_lead: i32,
    pub min_players: usize,
    pub max_players: usize,
    pub use_handicap: bool,
    pub use_shot_timer: bool,
    pub shot_clock_secs: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            required_lead: DEFAULT_REQUIRED_LEAD,
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            use_handicap: false,
            use_shot_timer: false,
            shot_clock_secs: DEFAULT_SHOT_CLOCK_SECS,
        }
    }
}

impl MatchRules {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.target_score < 1 {
            return Err("target_score must be at least 1");
        }
        if self.required_lead < 0 {
            return Err("required_lead must not be negative");
        }
        if self.min_players < MIN_PLAYERS {
            return Err("min_players must be at least 2");
        }
        if self.max_players > MAX_PLAYERS {
            return Err("max_players must be at most 6");
        }
        if self.min_players > self.max_players {
            return Err("min_players exceeds max_players");
        }
        if self.shot_clock_secs == 0 {
            return Err("shot_clock_secs must be at least 1");
        }
        Ok(())
    }

    pub fn allows_player_count(&self, count: usize) -> bool {
        (self.min_players..=self.max_players).contains(&count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_seven_with_two_lead() {
        let rules = MatchRules::default();
        assert_eq!(rules.target_score, 7);
        assert_eq!(rules.required_lead, 2);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rules: MatchRules = serde_json::from_str(r#"{"target_score":11}"#).expect("parse");
        assert_eq!(rules.target_score, 11);
        assert_eq!(rules.required_lead, DEFAULT_REQUIRED_LEAD);
        assert_eq!(rules.max_players, MAX_PLAYERS);
    }

    #[test]
    fn rejects_inverted_player_bounds() {
        let rules = MatchRules {
            min_players: 5,
            max_players: 3,
            ..MatchRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn player_count_window() {
        let rules = MatchRules::default();
        assert!(!rules.allows_player_count(1));
        assert!(rules.allows_player_count(2));
        assert!(rules.allows_player_count(6));
        assert!(!rules.allows_player_count(7));
    }
}
