//! Destination entries repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::migrator::types::Entry;

/// Store one entry, rewriting the row already imported from the same submission
pub async fn upsert_entry(pool: &SqlitePool, form_id: i64, entry: &Entry) -> Result<i64> {
    let response = serde_json::to_string(&entry.response).context("Failed to encode entry")?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO entries (form_id, source_id, response, created_at, updated_at)
        VALUES (?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP), COALESCE(?, CURRENT_TIMESTAMP))
        ON CONFLICT(form_id, source_id) DO UPDATE SET
            response = excluded.response,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at
        RETURNING id
        "#,
    )
    .bind(form_id)
    .bind(&entry.source_id)
    .bind(&response)
    .bind(&entry.created_at)
    .bind(&entry.updated_at)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to store entry {}", entry.source_id))?;

    Ok(id)
}

/// Entries of a form, oldest first
#[cfg(test)]
pub async fn list_entries(pool: &SqlitePool, form_id: i64) -> Result<Vec<Entry>> {
    use crate::migrator::types::EntryValue;
    use indexmap::IndexMap;
    use sqlx::Row;

    let rows = sqlx::query(
        "SELECT source_id, response, created_at, updated_at FROM entries WHERE form_id = ? ORDER BY id",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await
    .context("Failed to list entries")?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let response: String = row.try_get("response")?;
        let response: IndexMap<String, EntryValue> =
            serde_json::from_str(&response).context("Failed to decode entry")?;

        entries.push(Entry {
            source_id: row.try_get("source_id")?,
            response,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        });
    }

    Ok(entries)
}

#[cfg(test)]
pub async fn count_entries(pool: &SqlitePool, form_id: i64) -> Result<usize> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE form_id = ?")
        .bind(form_id)
        .fetch_one(pool)
        .await
        .context("Failed to count entries")?;

    Ok(count as usize)
}
