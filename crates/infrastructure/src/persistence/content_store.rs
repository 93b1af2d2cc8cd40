//! Content store using sqlx
//!
//! One row per topic key. Upserts merge into the stored row: a column the
//! update leaves out keeps its stored value, so writing a script alone keeps
//! previously synthesized audio. An update marked `clear_audio` sets the
//! audio columns to what it carries, possibly NULL.

use std::str::FromStr;

use application::{error::ApplicationError, ports::ContentStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AudioFormat, ContentRecord, ContentUpdate, TopicKey};
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

use super::error::map_sqlx_error;

/// SQLite-backed content store
#[derive(Debug, Clone)]
pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    /// Create a store on an already migrated pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored records
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::PersistenceFailed` if the query fails.
    pub async fn count(&self) -> Result<u64, ApplicationError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content_records")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl ContentStorePort for SqliteContentStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &TopicKey) -> Result<Option<ContentRecord>, ApplicationError> {
        let row: Option<ContentRow> = sqlx::query_as(
            r"
            SELECT script, audio, audio_format, created_at, updated_at
            FROM content_records WHERE key = $1
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            debug!("Content record not found");
            return Ok(None);
        };

        row.into_record(key).map(Some)
    }

    #[instrument(skip(self, update), fields(
        key = %key,
        script = update.script.is_some(),
        audio_bytes = update.audio.as_ref().map_or(0, Vec::len),
        clear_audio = update.clear_audio,
    ))]
    async fn upsert(&self, key: &TopicKey, update: ContentUpdate) -> Result<(), ApplicationError> {
        if update.is_empty() {
            debug!("Skipping empty update");
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO content_records (key, script, audio, audio_format, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(key) DO UPDATE SET
                script = COALESCE(excluded.script, content_records.script),
                audio = CASE WHEN $7 THEN excluded.audio
                    ELSE COALESCE(excluded.audio, content_records.audio) END,
                audio_format = CASE WHEN $7 THEN excluded.audio_format
                    ELSE COALESCE(excluded.audio_format, content_records.audio_format) END,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(update.script)
        .bind(update.audio)
        .bind(update.audio_format.map(|f| f.as_str()))
        .bind(&now)
        .bind(&now)
        .bind(update.clear_audio)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Content record upserted");
        Ok(())
    }
}

/// Row type for content queries
#[derive(sqlx::FromRow)]
struct ContentRow {
    script: Option<String>,
    audio: Option<Vec<u8>>,
    audio_format: Option<String>,
    created_at: String,
    updated_at: Option<String>,
}

impl ContentRow {
    /// The row was matched on the exact key text, so `key` is its identity
    fn into_record(self, key: &TopicKey) -> Result<ContentRecord, ApplicationError> {
        let created_at = parse_datetime(&self.created_at)?;
        // Rows written before updated_at existed carry NULL
        let updated_at = match self.updated_at.as_deref() {
            Some(s) => parse_datetime(s)?,
            None => created_at,
        };

        let audio_format = self
            .audio_format
            .as_deref()
            .and_then(|f| match AudioFormat::from_str(f) {
                Ok(format) => Some(format),
                Err(e) => {
                    warn!(format = %f, error = %e, "Ignoring unknown stored audio format");
                    None
                },
            });

        Ok(ContentRecord {
            key: key.clone(),
            script: self.script,
            audio: self.audio,
            audio_format,
            created_at,
            updated_at,
        })
    }
}

/// Parse an RFC 3339 timestamp
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::PersistenceFailed(format!("Invalid datetime: {e}")))
}
