use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tera::Context;
use tower_sessions::Session;

use crate::{db::users, forms::FieldErrors, res, session, AppResult, AppState};

use super::Passwords;

const EMAIL_MAX_CHARS: usize = 64;
const USERNAME_MAX_CHARS: usize = 64;
const PASSWORD_MAX_CHARS: usize = 72;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegisterForm {
    email: String,
    username: String,
    password: String,
    password2: String,
}

impl RegisterForm {
    fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.required("email", &self.email, EMAIL_MAX_CHARS);
        errors.email("email", &self.email);
        errors.required("username", &self.username, USERNAME_MAX_CHARS);
        errors.username("username", &self.username);
        errors.required("password", &self.password, PASSWORD_MAX_CHARS);
        errors.required("password2", &self.password2, PASSWORD_MAX_CHARS);
        if self.password != self.password2 {
            errors.add("password", "Passwords must match");
        }
        errors
    }
}

#[debug_handler]
pub(crate) async fn register_page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    register_form(&RegisterForm::default(), FieldErrors::default(), &session, &db_pool).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    State(passwords): State<Passwords>,
    session: Session,

    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let mut errors = form.check();
    if errors.get("email").is_none() && users::email_taken(&db_pool, &form.email).await? {
        errors.add("email", "Email already registered.");
    }
    if errors.get("username").is_none() && users::username_taken(&db_pool, &form.username).await? {
        errors.add("username", "Username already taken");
    }
    if !errors.is_empty() {
        return register_form(&form, errors, &session, &db_pool).await;
    }

    let password_hash = passwords.hash(form.password.clone()).await?;
    match users::create_user(&db_pool, &form.username, &form.email, &password_hash).await {
        Ok(user) => {
            tracing::info!("registered @{}#{}", user.username, user.id);
        }
        // lost a race with another registration between the checks and the insert
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let mut errors = FieldErrors::default();
            if e.message().contains("users.email") {
                errors.add("email", "Email already registered.");
            } else {
                errors.add("username", "Username already taken");
            }
            return register_form(&form, errors, &session, &db_pool).await;
        }
        Err(e) => return Err(e.into()),
    }

    session::flash(&session, "You can now log in!").await?;
    Ok(Redirect::to("/login").into_response())
}

async fn register_form(
    form: &RegisterForm,
    errors: FieldErrors,
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("email", &form.email);
    ctx.insert("username", &form.username);
    ctx.insert("errors", &errors);
    res::render("register.html", ctx, session, db_pool).await
}
