//! Integration tests for the SQLite vector index: ordering, filtering,
//! id-based overwrite, and durability across connections.

use tempfile::TempDir;

use edgar_qa::{db, migrate, sqlite_index::SqliteIndex};
use edgar_qa_core::index::VectorIndex;
use edgar_qa_core::models::{ChunkFilter, ChunkMeta, IndexedRecord};

fn record(id: &str, ticker: &str, vector: Vec<f32>, text: &str) -> IndexedRecord {
    IndexedRecord {
        id: id.to_string(),
        vector,
        text: text.to_string(),
        meta: ChunkMeta {
            ticker: ticker.to_string(),
            filing_type: "10-K".to_string(),
            accession_number: "0000320193-24-000123".to_string(),
            filename: "filing.html".to_string(),
            chunk_id: 0,
            start_word: 0,
            end_word: 4,
        },
    }
}

async fn open_index(dir: &TempDir) -> SqliteIndex {
    let pool = db::connect(&dir.path().join("index.sqlite")).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    SqliteIndex::new(pool)
}

#[tokio::test]
async fn query_returns_descending_similarity() {
    let dir = TempDir::new().unwrap();
    let index = open_index(&dir).await;

    index
        .upsert(&[
            record("a", "AAPL", vec![0.0, 1.0], "orthogonal"),
            record("b", "AAPL", vec![1.0, 0.0], "exact"),
            record("c", "AAPL", vec![0.7, 0.7], "diagonal"),
        ])
        .await
        .unwrap();

    let hits = index
        .query(&[1.0, 0.0], 10, &ChunkFilter::default())
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].text, "exact");
    assert_eq!(hits[1].text, "diagonal");
    assert_eq!(hits[2].text, "orthogonal");
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn ticker_filter_is_exact_and_empty_is_ok() {
    let dir = TempDir::new().unwrap();
    let index = open_index(&dir).await;

    index
        .upsert(&[
            record("a", "AAPL", vec![1.0, 0.0], "apple"),
            record("b", "MSFT", vec![1.0, 0.0], "microsoft"),
        ])
        .await
        .unwrap();

    let aapl = index
        .query(&[1.0, 0.0], 10, &ChunkFilter::for_ticker(Some("AAPL")))
        .await
        .unwrap();
    assert_eq!(aapl.len(), 1);
    assert_eq!(aapl[0].meta.ticker, "AAPL");

    let none = index
        .query(&[1.0, 0.0], 10, &ChunkFilter::for_ticker(Some("NVDA")))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn query_respects_k() {
    let dir = TempDir::new().unwrap();
    let index = open_index(&dir).await;

    let records: Vec<IndexedRecord> = (0..8)
        .map(|i| {
            record(
                &format!("r{i}"),
                "AAPL",
                vec![1.0, i as f32 / 10.0],
                &format!("chunk {i}"),
            )
        })
        .collect();
    index.upsert(&records).await.unwrap();

    let hits = index
        .query(&[1.0, 0.0], 3, &ChunkFilter::default())
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn upsert_overwrites_by_id() {
    let dir = TempDir::new().unwrap();
    let index = open_index(&dir).await;

    index
        .upsert(&[record("AAPL_10-K_0", "AAPL", vec![1.0, 0.0], "old")])
        .await
        .unwrap();
    index
        .upsert(&[record("AAPL_10-K_0", "AAPL", vec![1.0, 0.0], "new")])
        .await
        .unwrap();

    assert_eq!(index.count().await.unwrap(), 1);
    let hits = index
        .query(&[1.0, 0.0], 10, &ChunkFilter::default())
        .await
        .unwrap();
    assert_eq!(hits[0].text, "new");
}

#[tokio::test]
async fn metadata_round_trips_through_the_index() {
    let dir = TempDir::new().unwrap();
    let index = open_index(&dir).await;

    let mut r = record("a", "AAPL", vec![1.0], "text");
    r.meta.chunk_id = 7;
    r.meta.start_word = 800;
    r.meta.end_word = 1800;
    index.upsert(&[r]).await.unwrap();

    let hits = index
        .query(&[1.0], 1, &ChunkFilter::default())
        .await
        .unwrap();
    assert_eq!(hits[0].meta.chunk_id, 7);
    assert_eq!(hits[0].meta.start_word, 800);
    assert_eq!(hits[0].meta.end_word, 1800);
    assert_eq!(hits[0].meta.accession_number, "0000320193-24-000123");
}

#[tokio::test]
async fn count_survives_reopening_the_database() {
    let dir = TempDir::new().unwrap();

    {
        let index = open_index(&dir).await;
        index
            .upsert(&[
                record("a", "AAPL", vec![1.0, 0.0], "one"),
                record("b", "MSFT", vec![0.0, 1.0], "two"),
            ])
            .await
            .unwrap();
        index.pool().close().await;
    }

    let reopened = open_index(&dir).await;
    assert_eq!(reopened.count().await.unwrap(), 2);

    let hits = reopened
        .query(&[1.0, 0.0], 10, &ChunkFilter::default())
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].text, "one");
}
