//! PostgreSQL implementation of the event log.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::StoredEvent;
use crate::config::GatewayConfig;
use crate::domain::{GatewayEvent, PoolId};
use crate::error::GatewayError;

/// Upper bound on rows returned by [`PostgresPersistence::load_events`].
pub const MAX_EVENT_PAGE: i64 = 500;

/// PostgreSQL-backed event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be reached.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_event(
        &self,
        pool_id: PoolId,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, GatewayError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO gateway_events (pool_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(pool_id.to_string())
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Serializes and appends a [`GatewayEvent`].
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on serialization or
    /// database failure.
    pub async fn record(&self, event: &GatewayEvent) -> Result<i64, GatewayError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        self.save_event(event.pool_id(), event.event_type_str(), &payload)
            .await
    }

    /// Loads the most recent events, newest first, optionally filtered by
    /// pool.
    ///
    /// `limit` is clamped to `1..=MAX_EVENT_PAGE`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_events(
        &self,
        pool_id: Option<PoolId>,
        limit: i64,
    ) -> Result<Vec<StoredEvent>, GatewayError> {
        let limit = limit.clamp(1, MAX_EVENT_PAGE);
        let rows = if let Some(pid) = pool_id {
            sqlx::query_as::<_, (i64, String, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, pool_id, event_type, payload, created_at FROM gateway_events \
                 WHERE pool_id = $1 ORDER BY id DESC LIMIT $2",
            )
            .bind(pid.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, String, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, pool_id, event_type, payload, created_at FROM gateway_events \
                 ORDER BY id DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, pool_id, event_type, payload, created_at)| StoredEvent {
                    id,
                    pool_id,
                    event_type,
                    payload,
                    created_at,
                },
            )
            .collect())
    }
}
