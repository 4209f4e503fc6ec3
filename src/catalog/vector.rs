/*
 * src/catalog/vector.rs
 *
 * File for the Vector Index contract and its pgvector-backed implementation
 *
 * Purpose:
 *   Nearest-neighbor search over place embeddings, fronted by the same
 *   `places` table the Catalog Repository reads (the embedding column
 *   doubles as the index), using pgvector's cosine-distance operator.
 */

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;

use crate::error::{AppError, PrivateError};

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f64)>, AppError>;
}

pub struct PostgresVectorIndex {
    pool: PgPool,
}

impl PostgresVectorIndex {
    pub fn new(pool: PgPool) -> Self {
        PostgresVectorIndex { pool }
    }
}

#[async_trait]
impl VectorIndex for PostgresVectorIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f64)>, AppError> {
        let query_vec = Vector::from(query.to_vec());

        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"
            SELECT id, 1.0 - (embedding <=> $1) AS similarity
            FROM places
            WHERE embedding IS NOT NULL
            ORDER BY embedding <=> $1
            LIMIT $2
            "#,
        )
        .bind(query_vec)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from(PrivateError::Db(e)))?;

        Ok(rows)
    }
}
