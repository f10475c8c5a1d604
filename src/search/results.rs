use axum::{debug_handler, extract::{Path, State}, response::Response};
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::terms, res, AppError, AppResult};

#[debug_handler]
pub(crate) async fn search_results(
    Path(term): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(term) = terms::find_term(&db_pool, &term).await? else {
        return Err(AppError::NotFound("search term"));
    };

    let gifs = terms::gifs_for_term(&db_pool, term.id).await?;

    let mut ctx = Context::new();
    ctx.insert("term", &term);
    ctx.insert("gifs", &gifs);
    res::render("searched_gifs.html", ctx, &session, &db_pool).await
}
