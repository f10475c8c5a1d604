use axum::{debug_handler, response::IntoResponse};

use crate::{include_res, session::CurrentUser, AppState, Markdown};

#[debug_handler(state = AppState)]
pub async fn secret(CurrentUser(_): CurrentUser) -> impl IntoResponse {
    Markdown(include_res!(str, "/pages/secret.md"))
}
