use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::OptionalExtension;
use shared_types::UnknownCallLog;

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<UnknownCallLog> {
    Ok(UnknownCallLog {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        timestamp: row.get(2)?,
    })
}

/// Insert a log row, replacing any existing row for the same number
pub async fn insert_unknown_call_log(
    conn: AsyncDbConnection,
    phone_number: &str,
    timestamp: i64,
) -> Result<i64> {
    let conn = conn.lock().await?;

    let id: i64 = conn.query_row(
        "INSERT INTO unknown_call_logs (phone_number, timestamp)
         VALUES (?, ?)
         RETURNING id",
        rusqlite::params![phone_number, timestamp],
        |row| row.get(0),
    )?;

    Ok(id)
}

/// All logs, newest call first
pub async fn list_unknown_call_logs(conn: AsyncDbConnection) -> Result<Vec<UnknownCallLog>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, phone_number, timestamp
         FROM unknown_call_logs
         ORDER BY timestamp DESC, id DESC",
    )?;

    let logs = stmt
        .query_map([], row_to_log)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to list unknown call logs: {}", e))?;

    Ok(logs)
}

pub async fn get_unknown_call_log(conn: AsyncDbConnection, id: i64) -> Result<Option<UnknownCallLog>> {
    let conn = conn.lock().await?;

    let log = conn
        .query_row(
            "SELECT id, phone_number, timestamp FROM unknown_call_logs WHERE id = ?",
            [id],
            row_to_log,
        )
        .optional()?;

    Ok(log)
}

pub async fn get_by_number(conn: AsyncDbConnection, phone_number: &str) -> Result<Option<UnknownCallLog>> {
    let conn = conn.lock().await?;

    let log = conn
        .query_row(
            "SELECT id, phone_number, timestamp FROM unknown_call_logs
             WHERE phone_number = ? LIMIT 1",
            [phone_number],
            row_to_log,
        )
        .optional()?;

    Ok(log)
}

/// Returns the number of rows removed
pub async fn delete_unknown_call_log(conn: AsyncDbConnection, id: i64) -> Result<usize> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM unknown_call_logs WHERE id = ?", [id])?;
    Ok(deleted)
}

pub async fn delete_all_unknown_call_logs(conn: AsyncDbConnection) -> Result<usize> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM unknown_call_logs", [])?;
    Ok(deleted)
}
