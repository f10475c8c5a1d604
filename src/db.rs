use std::str::FromStr;

use serde::Serialize;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, FromRow, SqlitePool};

pub mod collections;
pub mod gifs;
pub mod terms;
pub mod users;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,

    // unique: username
    // unique: email
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Gif {
    pub id: i64,
    pub title: String,
    pub embed_url: String,

    // unique: title
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SearchTerm {
    pub id: i64,
    pub term: String,

    // unique: term
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub user_id: i64,

    // unique: name, user_id
}

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}

/// A migrated in-memory database. Every connection to `sqlite::memory:` is a
/// separate database, so the pool is pinned to one connection that never
/// expires.
pub async fn in_memory() -> anyhow::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}
