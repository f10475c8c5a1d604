use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::terms::{get_or_create_search_term, TERM_MAX_CHARS}, forms::FieldErrors, giphy::Giphy, res, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchForm {
    #[serde(default)]
    search: String,
}

#[debug_handler]
pub(crate) async fn index_page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    search_page(String::new(), FieldErrors::default(), &session, &db_pool).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    State(giphy): State<Giphy>,
    session: Session,

    Form(SearchForm { search }): Form<SearchForm>,
) -> AppResult<Response> {
    let term = search.trim();

    let mut errors = FieldErrors::default();
    errors.required("search", term, TERM_MAX_CHARS);
    errors.path_segment("search", term);
    if !errors.is_empty() {
        return search_page(search, errors, &session, &db_pool).await;
    }

    let search_term = get_or_create_search_term(&db_pool, &giphy, term).await?;

    Ok(Redirect::to(
        &res::local_path(&["gifs_searched", &search_term.term])
    ).into_response())
}

async fn search_page(
    search: String,
    errors: FieldErrors,
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("search", &search);
    ctx.insert("errors", &errors);
    res::render("index.html", ctx, session, db_pool).await
}
