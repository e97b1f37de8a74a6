//! Destination forms, form metadata and import log repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::migrator::store::{ImportLog, SourceLink};
use crate::migrator::types::FormMeta;

/// A destination form row
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FormRow {
    pub title: String,
    pub form_fields: Option<String>,
    pub source_id: String,
}

/// Insert an empty form linked to its source form
pub async fn create_form(pool: &SqlitePool, title: &str, link: &SourceLink) -> Result<i64> {
    let result = sqlx::query("INSERT INTO forms (title, source_key, source_id) VALUES (?, ?, ?)")
        .bind(title)
        .bind(&link.source_key)
        .bind(&link.source_id)
        .execute(pool)
        .await
        .context("Failed to create form")?;

    Ok(result.last_insert_rowid())
}

/// Replace a form's title and rendered field document
pub async fn update_form_fields(
    pool: &SqlitePool,
    form_id: i64,
    title: &str,
    form_fields: &str,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE forms SET title = ?, form_fields = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(title)
    .bind(form_fields)
    .bind(form_id)
    .execute(pool)
    .await
    .context("Failed to update form fields")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("Form {} does not exist", form_id);
    }

    Ok(())
}

#[cfg(test)]
pub async fn get_form(pool: &SqlitePool, form_id: i64) -> Result<Option<FormRow>> {
    use sqlx::Row;

    let row = sqlx::query(
        "SELECT title, form_fields, source_id FROM forms WHERE id = ?",
    )
    .bind(form_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get form")?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(FormRow {
        title: row.try_get("title")?,
        form_fields: row.try_get("form_fields")?,
        source_id: row.try_get("source_id")?,
    }))
}

/// Form previously imported from this source form
pub async fn find_form_by_source(pool: &SqlitePool, link: &SourceLink) -> Result<Option<i64>> {
    let id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM forms WHERE source_key = ? AND source_id = ?")
            .bind(&link.source_key)
            .bind(&link.source_id)
            .fetch_optional(pool)
            .await
            .context("Failed to find imported form")?;

    Ok(id)
}

/// Metadata rows in storage order
///
/// One row per settings block, one `notifications` row per notification and
/// one `confirmations` row per additional confirmation.
pub fn meta_rows(meta: &FormMeta) -> Result<Vec<(String, String)>> {
    let mut rows = vec![
        (
            "formSettings".to_string(),
            serde_json::to_string(&meta.form_settings).context("Failed to encode form settings")?,
        ),
        (
            "advancedValidationSettings".to_string(),
            serde_json::to_string(&meta.advanced_validation_settings)
                .context("Failed to encode advanced validation settings")?,
        ),
        (
            "delete_entry_on_submission".to_string(),
            meta.delete_entry_on_submission.clone(),
        ),
    ];

    for notification in &meta.notifications {
        rows.push((
            "notifications".to_string(),
            serde_json::to_string(notification).context("Failed to encode notification")?,
        ));
    }

    for confirmation in &meta.confirmations {
        rows.push((
            "confirmations".to_string(),
            serde_json::to_string(confirmation).context("Failed to encode confirmation")?,
        ));
    }

    Ok(rows)
}

/// Replace all metadata rows of a form
pub async fn replace_form_meta(pool: &SqlitePool, form_id: i64, meta: &FormMeta) -> Result<()> {
    let rows = meta_rows(meta)?;

    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    sqlx::query("DELETE FROM form_meta WHERE form_id = ?")
        .bind(form_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear form metadata")?;

    for (key, value) in rows {
        sqlx::query("INSERT INTO form_meta (form_id, meta_key, value) VALUES (?, ?, ?)")
            .bind(form_id)
            .bind(&key)
            .bind(&value)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert form meta '{}'", key))?;
    }

    tx.commit().await.context("Failed to commit form metadata")?;

    Ok(())
}

/// Metadata rows of a form, in insertion order
#[cfg(test)]
pub async fn list_form_meta(pool: &SqlitePool, form_id: i64) -> Result<Vec<(String, String)>> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT meta_key, value FROM form_meta WHERE form_id = ? ORDER BY id")
            .bind(form_id)
            .fetch_all(pool)
            .await
            .context("Failed to list form metadata")?;

    Ok(rows)
}

pub async fn insert_log(pool: &SqlitePool, log: &ImportLog) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO logs (parent_source_id, source_type, component, status, title, description)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(log.parent_source_id)
    .bind(&log.source_type)
    .bind(&log.component)
    .bind(log.status.as_str())
    .bind(&log.title)
    .bind(&log.description)
    .execute(pool)
    .await
    .context("Failed to write log")?;

    Ok(())
}

/// Log rows as (status, title, description), oldest first
#[cfg(test)]
pub async fn list_logs(pool: &SqlitePool) -> Result<Vec<(String, String, String)>> {
    let rows: Vec<(String, String, String)> =
        sqlx::query_as("SELECT status, title, description FROM logs ORDER BY id")
            .fetch_all(pool)
            .await
            .context("Failed to list logs")?;

    Ok(rows)
}
