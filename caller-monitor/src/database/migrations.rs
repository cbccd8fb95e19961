use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // One row per unknown number; a second insert for the same number replaces the first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS unknown_call_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            phone_number VARCHAR NOT NULL UNIQUE ON CONFLICT REPLACE,
            timestamp BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_unknown_call_logs_timestamp
            ON unknown_call_logs(timestamp DESC)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS blocked_numbers (
            phone_number VARCHAR PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reported_spam_numbers (
            phone_number VARCHAR PRIMARY KEY
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                    AND name IN ('unknown_call_logs', 'blocked_numbers', 'reported_spam_numbers')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[test]
    fn test_duplicate_number_replaces_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO unknown_call_logs (phone_number, timestamp) VALUES ('555', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO unknown_call_logs (phone_number, timestamp) VALUES ('555', 2)",
            [],
        )
        .unwrap();

        let (count, timestamp): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), MAX(timestamp) FROM unknown_call_logs",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(timestamp, 2);
    }
}
