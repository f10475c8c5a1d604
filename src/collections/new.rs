use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Form};
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::{collections::{get_or_create_collection, NAME_MAX_CHARS}, gifs::{all_gifs, get_gif_by_id}}, forms::FieldErrors, res, session::CurrentUser, AppError, AppResult, AppState};

/// The collection form. `gif_picks` comes from a multi-select, so it repeats.
#[derive(Debug, Default)]
pub(crate) struct NewCollectionForm {
    name: String,
    gif_picks: Vec<String>,
}

impl From<Vec<(String, String)>> for NewCollectionForm {
    fn from(fields: Vec<(String, String)>) -> Self {
        let mut form = NewCollectionForm::default();
        for (key, value) in fields {
            match key.as_str() {
                "name" => form.name = value,
                "gif_picks" => form.gif_picks.push(value),
                _ => {}
            }
        }
        form
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_collection_page(
    CurrentUser(_): CurrentUser,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    collection_form("", FieldErrors::default(), &session, &db_pool).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_collection(
    CurrentUser(user): CurrentUser,
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let NewCollectionForm { name, gif_picks } = fields.into();
    let name = name.trim();

    let mut errors = FieldErrors::default();
    errors.required("name", name, NAME_MAX_CHARS);
    let ids = gif_picks
        .iter()
        .map(|id| id.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|_| {
            errors.add("gif_picks", "Not a valid choice");
            Vec::new()
        });
    if !errors.is_empty() {
        return collection_form(name, errors, &session, &db_pool).await;
    }

    let mut gifs = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(gif) = get_gif_by_id(&db_pool, id).await? else {
            return Err(AppError::NotFound("gif"));
        };
        gifs.push(gif);
    }

    let collection = get_or_create_collection(&db_pool, name, &user, &gifs).await?;

    Ok(Redirect::to(
        &res::local_path(&["collection", &collection.id.to_string()])
    ).into_response())
}

async fn collection_form(
    name: &str,
    errors: FieldErrors,
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("name", name);
    ctx.insert("gifs", &all_gifs(db_pool).await?);
    ctx.insert("errors", &errors);
    res::render("create_collection.html", ctx, session, db_pool).await
}
