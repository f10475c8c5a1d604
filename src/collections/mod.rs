mod list;
mod new;
mod page;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_collection", get(new::new_collection_page).post(new::new_collection))
        .route("/collections", get(list::collections).post(list::collections))
        .route("/collection/{id}", get(page::collection))
}
