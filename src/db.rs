/*
 * src/db.rs
 *
 * File for database pool construction
 *
 * Purpose:
 *   Build the shared Postgres connection pool from DATABASE_URL. Places,
 *   opening hours, conversation sessions, and feedback events all live in
 *   this database; see migrations/ for schema.
 */

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::global::DATABASE_URL;

/// Creates the connection pool. Panics if `DATABASE_URL` is unset or the
/// pool cannot be established; there is no sensible degraded mode for a
/// service whose catalog, vector index, and session store are all one
/// database.
pub async fn create_pool() -> PgPool {
    let database_url = std::env::var(DATABASE_URL).expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("failed to connect to Postgres")
}
