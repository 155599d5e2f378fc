use std::fmt;
use std::str::FromStr;

/// First score that can end a game.
pub const WINNING_SCORE: i32 = 11;
/// A game only ends once the leader is ahead by this margin.
pub const MIN_LEAD_TO_WIN: i32 = 2;

/// The two scoring sides within a single game. Not persistent team
/// identities; every game has its own home and away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Home,
    Away,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Home => write!(f, "home"),
            Team::Away => write!(f, "away"),
        }
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Team::Home),
            "away" => Ok(Team::Away),
            other => Err(format!("{} is not a valid team", other)),
        }
    }
}

/// Only single-point adjustments are accepted from the scoreboard.
pub fn is_valid_score_change(change: i32) -> bool {
    change == 1 || change == -1
}

/// Apply a score change, clamping at zero. Decrementing an empty score
/// is absorbed silently rather than rejected.
pub fn apply_score_change(current: i32, change: i32) -> i32 {
    (current + change).max(0)
}

/// Evaluate the win condition after a score mutation. A side wins iff it
/// has reached the winning score with at least the minimum lead; the two
/// conditions can never hold simultaneously.
pub fn winning_side(home_score: i32, away_score: i32) -> Option<Team> {
    if home_score >= WINNING_SCORE && home_score - away_score >= MIN_LEAD_TO_WIN {
        Some(Team::Home)
    } else if away_score >= WINNING_SCORE && away_score - home_score >= MIN_LEAD_TO_WIN {
        Some(Team::Away)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_parsing_is_case_insensitive() {
        assert_eq!("Home".parse::<Team>(), Ok(Team::Home));
        assert_eq!("AWAY".parse::<Team>(), Ok(Team::Away));
        assert_eq!("away".parse::<Team>(), Ok(Team::Away));
        assert!("left".parse::<Team>().is_err());
        assert!("".parse::<Team>().is_err());
    }

    #[test]
    fn only_unit_changes_are_valid() {
        assert!(is_valid_score_change(1));
        assert!(is_valid_score_change(-1));
        assert!(!is_valid_score_change(0));
        assert!(!is_valid_score_change(2));
        assert!(!is_valid_score_change(-5));
    }

    #[test]
    fn score_never_drops_below_zero() {
        assert_eq!(apply_score_change(0, -1), 0);
        assert_eq!(apply_score_change(1, -1), 0);
        assert_eq!(apply_score_change(0, 1), 1);
        assert_eq!(apply_score_change(10, 1), 11);
    }

    #[test]
    fn eleven_points_with_two_point_lead_wins() {
        assert_eq!(winning_side(11, 9), Some(Team::Home));
        assert_eq!(winning_side(9, 11), Some(Team::Away));
        assert_eq!(winning_side(12, 10), Some(Team::Home));
    }

    #[test]
    fn eleven_points_without_the_lead_does_not_win() {
        assert_eq!(winning_side(11, 10), None);
        assert_eq!(winning_side(10, 11), None);
        assert_eq!(winning_side(11, 11), None);
        assert_eq!(winning_side(12, 11), None);
    }

    #[test]
    fn deuce_resolves_past_eleven() {
        assert_eq!(winning_side(13, 11), Some(Team::Home));
        assert_eq!(winning_side(14, 16), Some(Team::Away));
    }

    #[test]
    fn no_winner_before_eleven() {
        assert_eq!(winning_side(0, 0), None);
        assert_eq!(winning_side(10, 0), None);
        assert_eq!(winning_side(10, 8), None);
    }
}
