use axum::{debug_handler, response::Redirect};
use tower_sessions::Session;

use crate::{session::{self, CurrentUser}, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    CurrentUser(user): CurrentUser,
    session: Session,
) -> AppResult<Redirect> {
    session.flush().await?;
    session::flash(&session, "You have been logged out").await?;

    tracing::info!("goodbye @{}#{}", user.username, user.id);
    Ok(Redirect::to("/"))
}
