mod form;
mod listing;
mod results;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::index_page).post(form::index))
        .route("/gifs_searched/{term}", get(results::search_results))
        .route("/search_terms", get(listing::search_terms))
        .route("/all_gifs", get(listing::all_gifs))
}
