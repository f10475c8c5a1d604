pub mod auth;
pub mod collections;
pub mod config;
pub mod db;
pub mod forms;
pub mod giphy;
pub mod res;
pub mod search;
pub mod secret;
pub mod session;

use std::ops::Deref;

use axum::{extract::FromRef, http::StatusCode, response::{Html, IntoResponse, Response}, routing::get, Router};
use serde_json::Value;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub giphy: giphy::Giphy,
    pub passwords: auth::Passwords,
}

/// Builds the whole application: feature routers, sessions, request tracing
/// and the 404 fallback.
pub fn app(app_state: AppState, session_ttl: time::Duration) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(session_ttl));

    Router::new()
        .merge(search::router())
        .merge(auth::router())
        .merge(collections::router())
        .route("/secret", get(secret::secret))
        .fallback(res::not_found)

        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> AppResult<String>;
    fn get_obj_field(&self, field: &str) -> AppResult<&Value>;
    fn get_array_field(&self, field: &str) -> AppResult<&[Value]>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> AppResult<String> {
        Ok(
            self.get(field)
            .ok_or(format!("expected {field} in {self}"))?
            .as_str()
            .ok_or(format!("expected {field} in {self} to be string"))?
            .to_owned()
        )
    }

    fn get_obj_field(&self, field: &str) -> AppResult<&Value> {
        self.get(field)
        .ok_or(format!("expected {field} in {self}").into())
    }

    fn get_array_field(&self, field: &str) -> AppResult<&[Value]> {
        self.get_obj_field(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or(format!("expected {field} in {self} to be array").into())
    }
}


pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// A referenced entity does not exist. Carries what was looked for.
    NotFound(&'static str),
    /// The GIF search provider failed or answered with something unusable.
    Upstream(anyhow::Error),
    Internal(anyhow::Error),
}

impl AppError {
    /// Reclassifies an internal failure as the search provider's fault.
    pub fn upstream(self) -> Self {
        match self {
            AppError::Internal(err) => AppError::Upstream(err),
            other => other,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Upstream(err) => write!(f, "search provider failed: {err:#}"),
            AppError::Internal(err) => write!(f, "{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                res::error_page(StatusCode::NOT_FOUND, "404.html", Some(what))
            }
            AppError::Upstream(err) => {
                tracing::warn!("search provider failed: {err:#}");
                res::error_page(StatusCode::BAD_GATEWAY, "502.html", None)
            }
            AppError::Internal(err) => {
                tracing::error!("{err:?}");
                res::error_page(StatusCode::INTERNAL_SERVER_ERROR, "500.html", None)
            }
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(axum::Error);
apperr_impl!(reqwest::Error);
apperr_impl!(tera::Error);
apperr_impl!(bcrypt::BcryptError);
apperr_impl!(tokio::task::JoinError);

pub struct Markdown<T>(pub T);

impl<T> IntoResponse for Markdown<T>
where
    T: Deref<Target = str>
{
    fn into_response(self) -> axum::response::Response {
        use pulldown_cmark::{Parser, Options};

        let parser = Parser::new_ext(&*self.0, Options::ENABLE_TABLES);

        let mut html_output = String::new();
        pulldown_cmark::html::push_html(&mut html_output, parser);
        Html(html_output).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn array_fields() {
        let body = json!({ "data": [{ "title": "a" }, { "title": "b" }], "meta": {} });

        let data = body.get_array_field("data").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].get_str_field("title").unwrap(), "b");

        assert!(body.get_array_field("meta").is_err());
        assert!(body.get_array_field("missing").is_err());
    }
}
