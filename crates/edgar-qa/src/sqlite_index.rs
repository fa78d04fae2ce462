//! SQLite-backed [`VectorIndex`] implementation.
//!
//! Vectors are stored as little-endian f32 BLOBs alongside chunk text
//! and metadata. Queries push the ticker equality filter into SQL and
//! compute cosine similarity in Rust over the candidate rows.
//! Brute-force search is exact and entirely adequate at this corpus
//! scale (tens of thousands of chunks).

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use edgar_qa_core::embedding::{blob_to_vec, cosine_similarity, vec_to_blob};
use edgar_qa_core::index::VectorIndex;
use edgar_qa_core::models::{ChunkFilter, ChunkMeta, IndexedRecord, ScoredChunk};

/// Durable vector index over a [`SqlitePool`].
pub struct SqliteIndex {
    pool: SqlitePool,
}

impl SqliteIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_hit(row: &sqlx::sqlite::SqliteRow, query_vec: &[f32]) -> ScoredChunk {
    let blob: Vec<u8> = row.get("embedding");
    let vector = blob_to_vec(&blob);
    let chunk_id: i64 = row.get("chunk_id");
    let start_word: i64 = row.get("start_word");
    let end_word: i64 = row.get("end_word");

    ScoredChunk {
        text: row.get("text"),
        meta: ChunkMeta {
            ticker: row.get("ticker"),
            filing_type: row.get("filing_type"),
            accession_number: row.get("accession_number"),
            filename: row.get("filename"),
            chunk_id: chunk_id as u32,
            start_word: start_word as usize,
            end_word: end_word as usize,
        },
        score: cosine_similarity(query_vec, &vector),
    }
}

#[async_trait]
impl VectorIndex for SqliteIndex {
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let now = chrono::Utc::now().timestamp();

        for record in records {
            let blob = vec_to_blob(&record.vector);
            sqlx::query(
                r#"
                INSERT INTO chunks (id, ticker, filing_type, accession_number, filename,
                                    chunk_id, start_word, end_word, text, embedding, ingested_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    ticker = excluded.ticker,
                    filing_type = excluded.filing_type,
                    accession_number = excluded.accession_number,
                    filename = excluded.filename,
                    chunk_id = excluded.chunk_id,
                    start_word = excluded.start_word,
                    end_word = excluded.end_word,
                    text = excluded.text,
                    embedding = excluded.embedding,
                    ingested_at = excluded.ingested_at
                "#,
            )
            .bind(&record.id)
            .bind(&record.meta.ticker)
            .bind(&record.meta.filing_type)
            .bind(&record.meta.accession_number)
            .bind(&record.meta.filename)
            .bind(record.meta.chunk_id as i64)
            .bind(record.meta.start_word as i64)
            .bind(record.meta.end_word as i64)
            .bind(&record.text)
            .bind(&blob)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<ScoredChunk>> {
        const COLS: &str = "ticker, filing_type, accession_number, filename, \
                            chunk_id, start_word, end_word, text, embedding";

        let rows = match &filter.ticker {
            Some(ticker) => {
                sqlx::query(&format!("SELECT {COLS} FROM chunks WHERE ticker = ?"))
                    .bind(ticker)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(&format!("SELECT {COLS} FROM chunks"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut hits: Vec<ScoredChunk> = rows.iter().map(|row| row_to_hit(row, vector)).collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
