use axum::{debug_handler, extract::{Path, State}, response::Response};
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::{collections, users}, res, AppError, AppResult};

#[debug_handler]
pub(crate) async fn collection(
    Path(id): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let not_found = AppError::NotFound("collection");

    let Ok(id) = id.parse::<i64>() else {
        return Err(not_found);
    };
    let Some(collection) = collections::get_collection(&db_pool, id).await? else {
        return Err(not_found);
    };
    let Some(owner) = users::get_user(&db_pool, collection.user_id).await? else {
        return Err(not_found);
    };

    let gifs = collections::gifs_in_collection(&db_pool, collection.id).await?;

    let mut ctx = Context::new();
    ctx.insert("collection", &collection);
    ctx.insert("owner", &owner);
    ctx.insert("gifs", &gifs);
    res::render("collection.html", ctx, &session, &db_pool).await
}
