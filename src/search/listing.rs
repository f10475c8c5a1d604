use axum::{debug_handler, extract::State, response::Response};
use serde::Serialize;
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::{gifs, terms}, res, AppResult};

#[derive(Serialize)]
struct TermLink {
    term: String,
    url: String,
}

#[debug_handler]
pub(crate) async fn search_terms(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let all_terms: Vec<TermLink> = terms::all_terms(&db_pool)
        .await?
        .into_iter()
        .map(|t| TermLink {
            url: res::local_path(&["gifs_searched", &t.term]),
            term: t.term,
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("all_terms", &all_terms);
    res::render("search_terms.html", ctx, &session, &db_pool).await
}

#[debug_handler]
pub(crate) async fn all_gifs(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("all_gifs", &gifs::all_gifs(&db_pool).await?);
    res::render("all_gifs.html", ctx, &session, &db_pool).await
}
