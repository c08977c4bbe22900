//! Query helpers shared by the Postgres repositories.
//!
//! These helpers cover the recurring patterns:
//! - Fetching a required record (NotFound if missing)
//! - Translating constraint violations into domain errors
//! - Rolling a transaction back before surfacing the error

use sqlx::{Postgres, Transaction};

use crate::error::{LeagueError, LeagueResult};

/// Unwrap an optional query result, returning NotFound if None.
///
/// # Example
/// ```ignore
/// let row = require_record(
///     sqlx::query_as::<_, MatchRow>(FIND_MATCH).bind(id).fetch_optional(&pool).await,
///     "failed to find match",
///     "match not found",
/// )?;
/// ```
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    context: &'static str,
    not_found_message: &str,
) -> LeagueResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) | Err(sqlx::Error::RowNotFound) => Err(LeagueError::not_found(not_found_message)),
        Err(e) => Err(LeagueError::storage(context)(e)),
    }
}

/// True when the error is a Postgres unique violation (SQLSTATE 23505).
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

/// Commit when `outcome` is Ok, otherwise roll back explicitly and return the
/// original error.
pub async fn finish_transaction<T>(
    tx: Transaction<'_, Postgres>,
    outcome: LeagueResult<T>,
) -> LeagueResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(LeagueError::storage("failed to commit transaction"))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::error!("Failed to roll back transaction: {}", rollback_error);
            }
            Err(e)
        }
    }
}
