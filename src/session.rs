use axum::{extract::{FromRef, FromRequestParts}, http::request::Parts, response::{IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db::{self, User}, res, AppResult};

pub const USER_ID: &str = "user_id";
pub const FLASHES: &str = "flashes";

/// The logged-in user, if the session names one that still exists.
pub async fn current_user(session: &Session, db_pool: &SqlitePool) -> AppResult<Option<User>> {
    let Some(user_id) = session.get::<i64>(USER_ID).await? else {
        return Ok(None);
    };

    Ok(db::users::get_user(db_pool, user_id).await?)
}

/// Queues a message for the next rendered page.
pub async fn flash(session: &Session, message: impl Into<String>) -> AppResult<()> {
    let mut flashes: Vec<String> = session.get(FLASHES).await?.unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASHES, flashes).await?;
    Ok(())
}

pub async fn take_flashes(session: &Session) -> AppResult<Vec<String>> {
    Ok(session.remove::<Vec<String>>(FLASHES).await?.unwrap_or_default())
}

/// Extractor for pages that need a login. Anonymous callers are sent to the
/// login page, which brings them back here afterwards.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let db_pool = SqlitePool::from_ref(state);

        match current_user(&session, &db_pool).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                let return_url = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
                Err(Redirect::to(&res::login_url(return_url)).into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
