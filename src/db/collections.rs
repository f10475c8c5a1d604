use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::{Collection, Gif, User};

pub const NAME_MAX_CHARS: usize = 255;

#[derive(Debug, FromRow, Serialize)]
pub struct CollectionSummary {
    pub id: i64,
    pub name: String,
    pub gif_count: i64,
}

/// Returns `owner`'s collection called `name`, creating it with `gifs` as
/// members if it does not exist yet.
///
/// An existing collection comes back untouched: `gifs` only seeds a new one.
/// Repeated gifs keep their first position.
pub async fn get_or_create_collection(
    db_pool: &SqlitePool,
    name: &str,
    owner: &User,
    gifs: &[Gif],
) -> sqlx::Result<Collection> {
    let mut tx = db_pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO collections (name,user_id) VALUES (?,?) ON CONFLICT(name,user_id) DO NOTHING")
        .bind(name)
        .bind(owner.id)
        .execute(&mut *tx)
        .await?;

    let collection: Collection = sqlx::query_as("SELECT id,name,user_id FROM collections WHERE name=? AND user_id=?")
        .bind(name)
        .bind(owner.id)
        .fetch_one(&mut *tx)
        .await?;

    if inserted.rows_affected() == 1 {
        for (position, gif) in gifs.iter().enumerate() {
            sqlx::query("INSERT OR IGNORE INTO user_collection (collection_id,gif_id,position) VALUES (?,?,?)")
                .bind(collection.id)
                .bind(gif.id)
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
        }
        tracing::info!("{} created collection {name:?} with {} gifs", owner.username, gifs.len());
    }

    tx.commit().await?;
    Ok(collection)
}

pub async fn get_collection(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Collection>> {
    sqlx::query_as("SELECT id,name,user_id FROM collections WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn gifs_in_collection(db_pool: &SqlitePool, collection_id: i64) -> sqlx::Result<Vec<Gif>> {
    sqlx::query_as(
        "SELECT gifs.id,gifs.title,gifs.embed_url FROM gifs \
         JOIN user_collection ON user_collection.gif_id=gifs.id \
         WHERE user_collection.collection_id=? ORDER BY user_collection.position",
    )
        .bind(collection_id)
        .fetch_all(db_pool)
        .await
}

pub async fn collections_for_user(db_pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<CollectionSummary>> {
    sqlx::query_as(
        "SELECT collections.id,collections.name,COUNT(user_collection.gif_id) AS gif_count \
         FROM collections LEFT JOIN user_collection ON user_collection.collection_id=collections.id \
         WHERE collections.user_id=? GROUP BY collections.id ORDER BY collections.id",
    )
        .bind(user_id)
        .fetch_all(db_pool)
        .await
}
