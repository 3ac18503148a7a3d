use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{EventDraft, EventId, EventRecord};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Events in insertion order.
    pub async fn list_events(&self) -> Result<Vec<EventRecord>> {
        let rows = sqlx::query(
            "SELECT id, event_name, start_date, end_date FROM events ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list events")?;
        Ok(rows.iter().map(event_from_row).collect())
    }

    pub async fn get_event(&self, event_id: EventId) -> Result<Option<EventRecord>> {
        let row = sqlx::query(
            "SELECT id, event_name, start_date, end_date FROM events WHERE id = ?",
        )
        .bind(event_id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load event {event_id}"))?;
        Ok(row.as_ref().map(event_from_row))
    }

    pub async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord> {
        let rec = sqlx::query(
            "INSERT INTO events (event_name, start_date, end_date) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&draft.event_name)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert event")?;
        Ok(EventRecord::from_draft(
            EventId(rec.get::<i64, _>(0)),
            draft.clone(),
        ))
    }

    /// Full replacement; `None` when no event has this id.
    pub async fn replace_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Option<EventRecord>> {
        let result = sqlx::query(
            "UPDATE events SET event_name = ?, start_date = ?, end_date = ? WHERE id = ?",
        )
        .bind(&draft.event_name)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(event_id.0)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to replace event {event_id}"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(EventRecord::from_draft(event_id, draft.clone())))
    }

    /// Returns whether a row was deleted.
    pub async fn delete_event(&self, event_id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete event {event_id}"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_events(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM events")
            .execute(&self.pool)
            .await
            .context("failed to clear events")?;
        Ok(result.rows_affected())
    }
}

fn event_from_row(row: &SqliteRow) -> EventRecord {
    EventRecord {
        id: EventId(row.get::<i64, _>("id")),
        event_name: row.get("event_name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

/// Creates the directory a file-backed sqlite url points into.
pub fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
