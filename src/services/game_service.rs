use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::game_store::GameStore;
use crate::game::scoring::{self, Team};
use crate::models::game::{GameState, GameStatsResponse, GameType};

#[derive(Debug, Error)]
pub enum GameServiceError {
    #[error("No active game found. Start a new game first.")]
    NoActiveGame,
    #[error("Invalid team name: {0}. Must be 'home' or 'away'")]
    InvalidTeam(String),
    #[error("Score change must be +1 or -1")]
    InvalidScoreChange(i32),
    #[error("Game is already complete. Start a new game to keep scoring.")]
    GameAlreadyComplete,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl GameServiceError {
    /// Validation and state errors are the caller's to fix and map to 400;
    /// storage failures are ours and map to 500.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GameServiceError::Storage(_))
    }
}

/// The game-scoring state machine. Each operation is a single
/// read-mutate-persist round trip against the store, scoped to one user;
/// nothing is cached across calls.
#[derive(Debug, Clone)]
pub struct GameService {
    store: GameStore,
}

impl GameService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: GameStore::new(pool),
        }
    }

    /// The user's active game merged with their win tallies,
    /// or None when no game is open.
    pub async fn current_game(
        &self,
        user_id: Uuid,
    ) -> Result<Option<GameState>, GameServiceError> {
        let game = match self.store.find_current_game(user_id).await? {
            Some(game) => game,
            None => return Ok(None),
        };

        let (home_wins, away_wins) = self.store.get_win_counts(user_id).await?;
        Ok(Some(GameState::from_game(&game, home_wins, away_wins)))
    }

    /// Open a fresh 0-0 game. Any game still open is discarded: marked
    /// complete without crediting a win to either side, so the tallies
    /// carry over unchanged.
    pub async fn start_new_game(
        &self,
        user_id: Uuid,
        game_type: GameType,
    ) -> Result<GameState, GameServiceError> {
        let game = self.store.start_new_game(user_id, game_type).await?;
        let (home_wins, away_wins) = self.store.get_win_counts(user_id).await?;

        info!("Started new {} game for user {}", game_type, user_id);
        Ok(GameState::from_game(&game, home_wins, away_wins))
    }

    /// Apply a ±1 score change to one side of the active game, clamped at
    /// zero, then evaluate the win condition. A win completes the game and
    /// increments the winning side's tally atomically with the score write.
    pub async fn update_score(
        &self,
        user_id: Uuid,
        team: &str,
        change: i32,
    ) -> Result<GameState, GameServiceError> {
        let mut game = self
            .store
            .find_current_game(user_id)
            .await?
            .ok_or(GameServiceError::NoActiveGame)?;

        // The store only hands out incomplete games, but a completed one
        // must never be mutated, whatever path it arrived by.
        if game.is_complete {
            return Err(GameServiceError::GameAlreadyComplete);
        }

        let team: Team = team
            .parse()
            .map_err(|_| GameServiceError::InvalidTeam(team.to_string()))?;

        if !scoring::is_valid_score_change(change) {
            return Err(GameServiceError::InvalidScoreChange(change));
        }

        match team {
            Team::Home => {
                game.home_score = scoring::apply_score_change(game.home_score, change)
            }
            Team::Away => {
                game.away_score = scoring::apply_score_change(game.away_score, change)
            }
        }

        match scoring::winning_side(game.home_score, game.away_score) {
            Some(winner) => {
                game.is_complete = true;
                game.completed_at = Some(chrono::Utc::now());
                self.store.record_win(&game, winner).await?;
                info!(
                    "Game {} complete, {} wins {}-{}",
                    game.id, winner, game.home_score, game.away_score
                );
            }
            None => self.store.save_scores(&game).await?,
        }

        let (home_wins, away_wins) = self.store.get_win_counts(user_id).await?;
        Ok(GameState::from_game(&game, home_wins, away_wins))
    }

    /// Aggregate view over the win tallies plus the active game, if any.
    /// Games discarded by `start_new_game` never counted as wins, so the
    /// total is derived from the tallies rather than the game rows.
    pub async fn game_stats(&self, user_id: Uuid) -> Result<GameStatsResponse, GameServiceError> {
        let (home_wins, away_wins) = self.store.get_win_counts(user_id).await?;
        let current_game = self.current_game(user_id).await?;

        Ok(GameStatsResponse {
            total_games_played: home_wins + away_wins,
            home_wins,
            away_wins,
            current_game,
        })
    }

    /// Hard reset for one user: deletes their games and stats row.
    /// Other users' data is untouched.
    pub async fn clear_stats(&self, user_id: Uuid) -> Result<(), GameServiceError> {
        self.store.clear_user_data(user_id).await?;
        info!("Cleared games and statistics for user {}", user_id);
        Ok(())
    }
}
