use std::str::FromStr;

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::game::scoring::Team;
use crate::models::game::{Game, GameType};

/// All reads and writes for `games` and `match_statistics`. Every
/// multi-statement operation runs inside a single transaction; the
/// scoring service holds no state between calls.
#[derive(Debug, Clone)]
pub struct GameStore {
    pool: PgPool,
}

impl GameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The user's current game: newest incomplete one, if any.
    pub async fn find_current_game(&self, user_id: Uuid) -> Result<Option<Game>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, game_type, home_score, away_score,
                   is_complete, created_at, completed_at
            FROM games
            WHERE user_id = $1 AND is_complete = FALSE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| game_from_row(&r)).transpose()
    }

    /// Close any open game for the user (no win is recorded for it) and
    /// insert a fresh 0-0 game, atomically.
    pub async fn start_new_game(
        &self,
        user_id: Uuid,
        game_type: GameType,
    ) -> Result<Game, sqlx::Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let discarded = sqlx::query(
            r#"
            UPDATE games
            SET is_complete = TRUE, completed_at = $2
            WHERE user_id = $1 AND is_complete = FALSE
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if discarded.rows_affected() > 0 {
            debug!("Discarded unfinished game for user {}", user_id);
        }

        let game = Game {
            id: Uuid::new_v4(),
            user_id,
            game_type,
            home_score: 0,
            away_score: 0,
            is_complete: false,
            created_at: now,
            completed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO games (id, user_id, game_type, home_score, away_score,
                               is_complete, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(game.id)
        .bind(game.user_id)
        .bind(game.game_type.to_string())
        .bind(game.home_score)
        .bind(game.away_score)
        .bind(game.is_complete)
        .bind(game.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(game)
    }

    /// Persist a score mutation on a still-open game.
    pub async fn save_scores(&self, game: &Game) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE games
            SET home_score = $2, away_score = $3
            WHERE id = $1
            "#,
        )
        .bind(game.id)
        .bind(game.home_score)
        .bind(game.away_score)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a winning mutation: final scores, completion, and the
    /// stats increment for the winning side, all in one transaction.
    /// The stats row is created on first win via upsert.
    pub async fn record_win(&self, game: &Game, winner: Team) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE games
            SET home_score = $2, away_score = $3,
                is_complete = TRUE, completed_at = $4
            WHERE id = $1
            "#,
        )
        .bind(game.id)
        .bind(game.home_score)
        .bind(game.away_score)
        .bind(game.completed_at)
        .execute(&mut *tx)
        .await?;

        let (home_inc, away_inc) = match winner {
            Team::Home => (1, 0),
            Team::Away => (0, 1),
        };

        sqlx::query(
            r#"
            INSERT INTO match_statistics (id, user_id, home_wins, away_wins, last_updated)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET home_wins = match_statistics.home_wins + EXCLUDED.home_wins,
                away_wins = match_statistics.away_wins + EXCLUDED.away_wins,
                last_updated = EXCLUDED.last_updated
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(game.user_id)
        .bind(home_inc)
        .bind(away_inc)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Current win tallies for the user, zeroes if no stats row exists yet.
    pub async fn get_win_counts(&self, user_id: Uuid) -> Result<(i32, i32), sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT home_wins, away_wins
            FROM match_statistics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok((row.try_get("home_wins")?, row.try_get("away_wins")?)),
            None => Ok((0, 0)),
        }
    }

    /// Hard reset: every game row (complete or not) and the stats row.
    pub async fn clear_user_data(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM games WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM match_statistics WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn game_from_row(row: &PgRow) -> Result<Game, sqlx::Error> {
    let game_type: String = row.try_get("game_type")?;
    let game_type = GameType::from_str(&game_type).map_err(|e| sqlx::Error::ColumnDecode {
        index: "game_type".into(),
        source: e.into(),
    })?;

    Ok(Game {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        game_type,
        home_score: row.try_get("home_score")?,
        away_score: row.try_get("away_score")?,
        is_complete: row.try_get("is_complete")?,
        created_at: row.try_get("created_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}
