use anyhow::Result;
use sqlx::SqlitePool;

/// Create the index schema. Idempotent; safe to run on every startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            ticker TEXT NOT NULL,
            filing_type TEXT NOT NULL,
            accession_number TEXT NOT NULL,
            filename TEXT NOT NULL,
            chunk_id INTEGER NOT NULL,
            start_word INTEGER NOT NULL,
            end_word INTEGER NOT NULL,
            text TEXT NOT NULL,
            embedding BLOB NOT NULL,
            ingested_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_ticker ON chunks(ticker)")
        .execute(pool)
        .await?;

    Ok(())
}
