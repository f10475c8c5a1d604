use sqlx::SqlitePool;

use crate::{giphy::Giphy, AppResult};

use super::{gifs::get_or_create_gif, Gif, SearchTerm};

pub const TERM_MAX_CHARS: usize = 32;

pub async fn find_term(db_pool: &SqlitePool, term: &str) -> sqlx::Result<Option<SearchTerm>> {
    sqlx::query_as("SELECT id,term FROM search_terms WHERE term=?")
        .bind(term)
        .fetch_optional(db_pool)
        .await
}

/// Returns the stored search term, or asks Giphy once and stores the term
/// together with the gifs it returned.
///
/// The provider is only consulted when the term is new. The term row, any new
/// gif rows and the associations are written in one transaction, so a failed
/// provider call or a failed write leaves nothing behind. If another request
/// stores the same term first, its row wins and ours is rolled back.
pub async fn get_or_create_search_term(
    db_pool: &SqlitePool,
    giphy: &Giphy,
    term: &str,
) -> AppResult<SearchTerm> {
    if let Some(search_term) = find_term(db_pool, term).await? {
        tracing::debug!("found term {term:?}");
        return Ok(search_term);
    }

    let records = giphy.search(term).await?;

    let mut tx = db_pool.begin().await?;
    let inserted = sqlx::query("INSERT INTO search_terms (term) VALUES (?) ON CONFLICT(term) DO NOTHING")
        .bind(term)
        .execute(&mut *tx)
        .await?;

    if inserted.rows_affected() == 0 {
        drop(tx);
        return find_term(db_pool, term)
            .await?
            .ok_or("search term vanished after conflicting insert".into());
    }

    let search_term: SearchTerm = sqlx::query_as("SELECT id,term FROM search_terms WHERE term=?")
        .bind(term)
        .fetch_one(&mut *tx)
        .await?;

    for (position, record) in records.iter().enumerate() {
        let gif = get_or_create_gif(&mut *tx, &record.title, &record.embed_url).await?;
        sqlx::query("INSERT OR IGNORE INTO search_gifs (search_id,gif_id,position) VALUES (?,?,?)")
            .bind(search_term.id)
            .bind(gif.id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!("added term {term:?} with {} gifs", records.len());

    Ok(search_term)
}

/// Gifs stored for a term, in the order the provider returned them.
pub async fn gifs_for_term(db_pool: &SqlitePool, search_id: i64) -> sqlx::Result<Vec<Gif>> {
    sqlx::query_as(
        "SELECT gifs.id,gifs.title,gifs.embed_url FROM gifs \
         JOIN search_gifs ON search_gifs.gif_id=gifs.id \
         WHERE search_gifs.search_id=? ORDER BY search_gifs.position",
    )
        .bind(search_id)
        .fetch_all(db_pool)
        .await
}

pub async fn all_terms(db_pool: &SqlitePool) -> sqlx::Result<Vec<SearchTerm>> {
    sqlx::query_as("SELECT id,term FROM search_terms ORDER BY term")
        .fetch_all(db_pool)
        .await
}
