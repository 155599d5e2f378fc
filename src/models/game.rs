use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Singles vs doubles is informational only; the scoring rules are identical.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    Singles,
    Doubles,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Singles => write!(f, "singles"),
            GameType::Doubles => write!(f, "doubles"),
        }
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singles" => Ok(GameType::Singles),
            "doubles" => Ok(GameType::Doubles),
            other => Err(format!("{} is not a valid game type", other)),
        }
    }
}

/// One scored match instance, 0-0 through completion, owned by one user.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_type: GameType,
    pub home_score: i32,
    pub away_score: i32,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-user running tally of completed-game wins by side.
/// Created lazily on the first win, removed only by an explicit clear.
#[derive(Debug, Clone)]
pub struct MatchStatistics {
    pub id: Uuid,
    pub user_id: Uuid,
    pub home_wins: i32,
    pub away_wins: i32,
    pub last_updated: DateTime<Utc>,
}

/// Combined read-model of a game plus the owner's current win tallies.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: Uuid,
    pub game_type: GameType,
    pub home_score: i32,
    pub away_score: i32,
    pub home_wins: i32,
    pub away_wins: i32,
    pub is_game_complete: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameState {
    pub fn from_game(game: &Game, home_wins: i32, away_wins: i32) -> Self {
        Self {
            id: game.id,
            game_type: game.game_type,
            home_score: game.home_score,
            away_score: game.away_score,
            home_wins,
            away_wins,
            is_game_complete: game.is_complete,
            created_at: game.created_at,
            completed_at: game.completed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    pub game_type: GameType,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateRequest {
    pub team: String,
    pub change: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsResponse {
    pub total_games_played: i32,
    pub home_wins: i32,
    pub away_wins: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_game: Option<GameState>,
}
