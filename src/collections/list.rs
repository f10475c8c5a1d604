use axum::{debug_handler, extract::State, response::Response};
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::collections::collections_for_user, res, session::CurrentUser, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn collections(
    CurrentUser(user): CurrentUser,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("collections", &collections_for_user(&db_pool, user.id).await?);
    res::render("collections.html", ctx, &session, &db_pool).await
}
