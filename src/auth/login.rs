use axum::{debug_handler, extract::{Query, State}, response::{IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::{Expiry, Session};

use crate::{db::users, forms::FieldErrors, res, session::{self, USER_ID}, AppResult, AppState};

use super::Passwords;

/// Inactivity window for sessions created with "keep me logged in".
const REMEMBER_ME: time::Duration = time::Duration::days(30);

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    remember_me: Option<String>,
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    login_form("", return_url.as_deref(), FieldErrors::default(), &session, &db_pool).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(db_pool): State<SqlitePool>,
    State(passwords): State<Passwords>,
    session: Session,

    Form(LoginForm { email, password, remember_me }): Form<LoginForm>,
) -> AppResult<Response> {
    let mut errors = FieldErrors::default();
    errors.required("email", &email, 64);
    errors.email("email", &email);
    errors.required("password", &password, 72);
    if !errors.is_empty() {
        return login_form(&email, return_url.as_deref(), errors, &session, &db_pool).await;
    }

    let user = match users::find_user_by_email(&db_pool, &email).await? {
        Some(user) => passwords
            .verify(password, user.password_hash.clone())
            .await?
            .then_some(user),
        None => None,
    };

    // same answer for an unknown email and a wrong password
    let Some(user) = user else {
        session::flash(&session, "We cannot find this account, please register.").await?;
        return login_form(&email, return_url.as_deref(), errors, &session, &db_pool).await;
    };

    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;
    if remember_me.is_some() {
        session.set_expiry(Some(Expiry::OnInactivity(REMEMBER_ME)));
    }

    tracing::info!("welcome @{}#{}", user.username, user.id);

    let return_url = return_url
        .filter(|url| res::is_local_path(url))
        .unwrap_or("/".to_string());
    Ok(Redirect::to(&return_url).into_response())
}

async fn login_form(
    email: &str,
    return_url: Option<&str>,
    errors: FieldErrors,
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("email", email);
    ctx.insert("return_url", &return_url);
    ctx.insert("errors", &errors);
    res::render("login.html", ctx, session, db_pool).await
}
