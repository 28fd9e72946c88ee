//! Persistent inverted index over PostgreSQL: documents, words, and
//! (document, word, frequency) triples, plus the ranked conjunctive query.

mod snippet;

pub use snippet::generate_snippet;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::info;

use crate::core::config::DatabaseConfig;
use crate::core::error::QuarryError;

/// An indexed page as stored in `documents`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Document {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub content: String,
    pub created_at: chrono::NaiveDateTime,
}

/// One ranked hit returned by [`SearchIndex::search`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub relevance: i64,
}

/// Row counts across the three tables.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexStats {
    pub documents: i64,
    pub words: i64,
    pub document_words: i64,
}

/// The store operations the crawl engine needs; the seam that lets the
/// engine run against an in-memory index in tests.
#[async_trait]
pub trait IndexWriter: Send + Sync {
    /// Idempotent on `url`: returns the existing id when present.
    async fn add_document(&self, url: &str, title: &str, content: &str)
        -> Result<i32, QuarryError>;

    async fn document_exists(&self, url: &str) -> Result<bool, QuarryError>;

    /// Overwrite title and content of an existing url; no-op when absent.
    async fn update_document(&self, url: &str, title: &str, content: &str)
        -> Result<(), QuarryError>;

    /// Atomically rewrite the whole word map of a document.
    async fn replace_document_words(
        &self,
        document_id: i32,
        frequencies: &HashMap<String, i32>,
    ) -> Result<(), QuarryError>;
}

/// The query operation the search front-end needs.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, terms: &[String], limit: i64)
        -> Result<Vec<SearchResult>, QuarryError>;
}

#[derive(Clone)]
pub struct SearchIndex {
    pool: PgPool,
}

impl SearchIndex {
    /// Connect to PostgreSQL. Callers treat failure here as fatal.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, QuarryError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.dbname)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect_with(options)
            .await?;

        info!(
            "connected to postgres database {} at {}:{}",
            config.dbname, config.host, config.port
        );
        Ok(Self { pool })
    }

    /// Idempotent schema setup: the three tables and their lookup indexes.
    pub async fn create_tables(&self) -> Result<(), QuarryError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS documents (\
                id SERIAL PRIMARY KEY,\
                url TEXT UNIQUE NOT NULL,\
                title TEXT,\
                content TEXT,\
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\
            )",
            "CREATE TABLE IF NOT EXISTS words (\
                id SERIAL PRIMARY KEY,\
                token TEXT UNIQUE NOT NULL\
            )",
            "CREATE TABLE IF NOT EXISTS document_words (\
                document_id INTEGER REFERENCES documents(id) ON DELETE CASCADE,\
                word_id INTEGER REFERENCES words(id) ON DELETE CASCADE,\
                frequency INTEGER NOT NULL,\
                PRIMARY KEY (document_id, word_id)\
            )",
            "CREATE INDEX IF NOT EXISTS idx_words_token ON words(token)",
            "CREATE INDEX IF NOT EXISTS idx_document_words_word_id ON document_words(word_id)",
            "CREATE INDEX IF NOT EXISTS idx_document_words_document_id \
                ON document_words(document_id)",
            "CREATE INDEX IF NOT EXISTS idx_documents_url ON documents(url)",
        ];
        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("database tables ready");
        Ok(())
    }

    pub async fn get_all_documents(&self) -> Result<Vec<Document>, QuarryError> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, url, title, content, created_at FROM documents",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    /// Idempotent on token: inserts or returns the existing id.
    pub async fn upsert_word(&self, token: &str) -> Result<i32, QuarryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO words (token) VALUES ($1) \
             ON CONFLICT (token) DO UPDATE SET token = EXCLUDED.token \
             RETURNING id",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get_word_id(&self, token: &str) -> Result<Option<i32>, QuarryError> {
        let id = sqlx::query_scalar("SELECT id FROM words WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn get_all_words(&self) -> Result<Vec<String>, QuarryError> {
        let words = sqlx::query_scalar("SELECT token FROM words")
            .fetch_all(&self.pool)
            .await?;
        Ok(words)
    }

    pub async fn clear_document_words(&self, document_id: i32) -> Result<(), QuarryError> {
        sqlx::query("DELETE FROM document_words WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Accumulating insert: an existing (document, word) pair gains `frequency`.
    /// Callers wanting replacement go through [`IndexWriter::replace_document_words`].
    pub async fn add_document_word(
        &self,
        document_id: i32,
        word_id: i32,
        frequency: i32,
    ) -> Result<(), QuarryError> {
        sqlx::query(
            "INSERT INTO document_words (document_id, word_id, frequency) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (document_id, word_id) \
             DO UPDATE SET frequency = document_words.frequency + EXCLUDED.frequency",
        )
        .bind(document_id)
        .bind(word_id)
        .bind(frequency)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<IndexStats, QuarryError> {
        let documents = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;
        let words = sqlx::query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&self.pool)
            .await?;
        let document_words = sqlx::query_scalar("SELECT COUNT(*) FROM document_words")
            .fetch_one(&self.pool)
            .await?;
        Ok(IndexStats {
            documents,
            words,
            document_words,
        })
    }
}

#[async_trait]
impl IndexWriter for SearchIndex {
    async fn add_document(
        &self,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<i32, QuarryError> {
        // The no-op conflict update makes RETURNING yield the existing row's id.
        let id = sqlx::query_scalar(
            "INSERT INTO documents (url, title, content) VALUES ($1, $2, $3) \
             ON CONFLICT (url) DO UPDATE SET url = EXCLUDED.url \
             RETURNING id",
        )
        .bind(url)
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn document_exists(&self, url: &str) -> Result<bool, QuarryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM documents WHERE url = $1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn update_document(
        &self,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<(), QuarryError> {
        sqlx::query("UPDATE documents SET title = $1, content = $2 WHERE url = $3")
            .bind(title)
            .bind(content)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_document_words(
        &self,
        document_id: i32,
        frequencies: &HashMap<String, i32>,
    ) -> Result<(), QuarryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM document_words WHERE document_id = $1")
            .bind(document_id)
            .execute(&mut *tx)
            .await?;

        for (token, frequency) in frequencies {
            let word_id: i32 = sqlx::query_scalar(
                "INSERT INTO words (token) VALUES ($1) \
                 ON CONFLICT (token) DO UPDATE SET token = EXCLUDED.token \
                 RETURNING id",
            )
            .bind(token)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO document_words (document_id, word_id, frequency) \
                 VALUES ($1, $2, $3)",
            )
            .bind(document_id)
            .bind(word_id)
            .bind(*frequency)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for SearchIndex {
    /// Conjunctive ranked query: only documents containing every distinct
    /// term match, ranked by summed frequency. Ties break on document id so
    /// the order is stable within one invocation.
    async fn search(&self, terms: &[String], limit: i64)
        -> Result<Vec<SearchResult>, QuarryError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        // Repeated query terms must not inflate the DISTINCT match count.
        let mut distinct: Vec<String> = terms.to_vec();
        distinct.sort();
        distinct.dedup();

        let rows = sqlx::query(
            "SELECT d.url, d.title, d.content, SUM(dw.frequency)::BIGINT AS relevance \
             FROM documents d \
             JOIN document_words dw ON d.id = dw.document_id \
             JOIN words w ON dw.word_id = w.id \
             WHERE w.token = ANY($1) \
             GROUP BY d.id, d.url, d.title, d.content \
             HAVING COUNT(DISTINCT w.token) = $2 \
             ORDER BY relevance DESC, d.id \
             LIMIT $3",
        )
        .bind(&distinct)
        .bind(distinct.len() as i64)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let results = rows
            .into_iter()
            .map(|row| {
                let content: String = row.get("content");
                SearchResult {
                    url: row.get("url"),
                    title: row.get("title"),
                    snippet: generate_snippet(&content, terms),
                    relevance: row.get("relevance"),
                }
            })
            .collect();
        Ok(results)
    }
}
