use crate::database::AsyncDbConnection;
use anyhow::Result;
use shared_types::ReportedSpamNumber;

pub async fn insert_reported_spam_number(conn: AsyncDbConnection, phone_number: &str) -> Result<()> {
    let conn = conn.lock().await?;
    conn.execute(
        "INSERT OR REPLACE INTO reported_spam_numbers (phone_number) VALUES (?)",
        [phone_number],
    )?;
    Ok(())
}

pub async fn is_spam(conn: AsyncDbConnection, phone_number: &str) -> Result<bool> {
    let conn = conn.lock().await?;
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM reported_spam_numbers WHERE phone_number = ?)",
        [phone_number],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub async fn list_reported_spam_numbers(conn: AsyncDbConnection) -> Result<Vec<ReportedSpamNumber>> {
    let conn = conn.lock().await?;

    let mut stmt =
        conn.prepare("SELECT phone_number FROM reported_spam_numbers ORDER BY phone_number")?;
    let numbers = stmt
        .query_map([], |row| {
            Ok(ReportedSpamNumber {
                phone_number: row.get(0)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to list reported spam numbers: {}", e))?;

    Ok(numbers)
}

pub async fn delete_reported_spam_number(conn: AsyncDbConnection, phone_number: &str) -> Result<usize> {
    let conn = conn.lock().await?;
    let deleted = conn.execute(
        "DELETE FROM reported_spam_numbers WHERE phone_number = ?",
        [phone_number],
    )?;
    Ok(deleted)
}
