use crate::database::AsyncDbConnection;
use anyhow::Result;
use shared_types::BlockedNumber;

pub async fn insert_blocked_number(conn: AsyncDbConnection, phone_number: &str) -> Result<()> {
    let conn = conn.lock().await?;
    conn.execute(
        "INSERT OR REPLACE INTO blocked_numbers (phone_number) VALUES (?)",
        [phone_number],
    )?;
    Ok(())
}

pub async fn is_blocked(conn: AsyncDbConnection, phone_number: &str) -> Result<bool> {
    let conn = conn.lock().await?;
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM blocked_numbers WHERE phone_number = ?)",
        [phone_number],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub async fn list_blocked_numbers(conn: AsyncDbConnection) -> Result<Vec<BlockedNumber>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare("SELECT phone_number FROM blocked_numbers ORDER BY phone_number")?;
    let numbers = stmt
        .query_map([], |row| {
            Ok(BlockedNumber {
                phone_number: row.get(0)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to list blocked numbers: {}", e))?;

    Ok(numbers)
}

pub async fn delete_blocked_number(conn: AsyncDbConnection, phone_number: &str) -> Result<usize> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM blocked_numbers WHERE phone_number = ?", [phone_number])?;
    Ok(deleted)
}
