use sqlx::{SqliteConnection, SqlitePool};

use super::Gif;

pub const TITLE_MAX_CHARS: usize = 128;

/// Returns the gif stored under `title`, inserting it with `embed_url` first
/// if there is none. An existing row keeps its own url.
pub async fn get_or_create_gif(
    conn: &mut SqliteConnection,
    title: &str,
    embed_url: &str,
) -> sqlx::Result<Gif> {
    let inserted = sqlx::query("INSERT INTO gifs (title,embed_url) VALUES (?,?) ON CONFLICT(title) DO NOTHING")
        .bind(title)
        .bind(embed_url)
        .execute(&mut *conn)
        .await?;

    if inserted.rows_affected() == 1 {
        tracing::debug!("stored gif {title:?}");
    }

    sqlx::query_as("SELECT id,title,embed_url FROM gifs WHERE title=?")
        .bind(title)
        .fetch_one(&mut *conn)
        .await
}

pub async fn get_gif_by_id(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Gif>> {
    sqlx::query_as("SELECT id,title,embed_url FROM gifs WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn all_gifs(db_pool: &SqlitePool) -> sqlx::Result<Vec<Gif>> {
    sqlx::query_as("SELECT id,title,embed_url FROM gifs ORDER BY id")
        .fetch_all(db_pool)
        .await
}
