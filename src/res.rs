use std::sync::LazyLock;

use axum::{extract::State, http::StatusCode, response::{Html, IntoResponse, Response}};
use reqwest::Url;
use sqlx::SqlitePool;
use tera::{Context, Tera};
use tower_sessions::Session;

use crate::{session, AppResult};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

macro_rules! templates {
    ($($name:literal),* $(,)?) => {
        [$(($name, include_res!(str, concat!("/templates/", $name)))),*]
    };
}

static TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(templates![
        "base.html",
        "index.html",
        "searched_gifs.html",
        "search_terms.html",
        "all_gifs.html",
        "register.html",
        "login.html",
        "create_collection.html",
        "collections.html",
        "collection.html",
        "404.html",
        "500.html",
        "502.html",
    ])
    .expect("bundled templates must parse");
    tera
});

/// Renders a page template. Every page also gets the logged-in user and any
/// pending flash messages.
pub async fn render(
    template: &str,
    mut ctx: Context,
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Response> {
    ctx.insert("current_user", &session::current_user(session, db_pool).await?);
    ctx.insert("flashes", &session::take_flashes(session).await?);

    Ok(Html(TEMPLATES.render(template, &ctx)?).into_response())
}

pub(crate) fn error_page(status: StatusCode, template: &str, what: Option<&str>) -> Response {
    let mut ctx = Context::new();
    ctx.insert("what", &what);
    ctx.insert("current_user", &None::<()>);
    ctx.insert("flashes", &Vec::<String>::new());

    match TEMPLATES.render(template, &ctx) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!("rendering {template}: {err:?}");
            (status, status.canonical_reason().unwrap_or("error")).into_response()
        }
    }
}

/// Fallback for unrouted paths. Unlike [`error_page`] it knows the session,
/// so the navigation still shows who is logged in.
pub async fn not_found(State(db_pool): State<SqlitePool>, session: Session) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("what", &None::<&str>);

    let mut response = render("404.html", ctx, &session, &db_pool).await?;
    *response.status_mut() = StatusCode::NOT_FOUND;
    Ok(response)
}

/// An absolute path built from raw segments, each percent-encoded.
pub fn local_path(segments: &[&str]) -> String {
    let mut url = base_url();
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_owned()
}

/// Login page that sends the user on to `return_url` afterwards.
pub fn login_url(return_url: &str) -> String {
    let mut url = base_url();
    url.set_path("/login");
    url.query_pairs_mut().append_pair("return_url", return_url);
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

/// Only paths on this site are followed after login.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

fn base_url() -> Url {
    Url::parse("http://localhost/").expect("constant url parses")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_encodes_segments() {
        assert_eq!(local_path(&["gifs_searched", "cats"]), "/gifs_searched/cats");
        assert_eq!(local_path(&["gifs_searched", "cats & dogs"]), "/gifs_searched/cats%20&%20dogs");
        assert_eq!(local_path(&["gifs_searched", "a/b?"]), "/gifs_searched/a%2Fb%3F");
        assert_eq!(local_path(&["collection", "7"]), "/collection/7");
    }

    #[test]
    fn login_url_keeps_destination() {
        assert_eq!(login_url("/create_collection"), "/login?return_url=%2Fcreate_collection");
        assert_eq!(login_url("/collections?x=1"), "/login?return_url=%2Fcollections%3Fx%3D1");
    }

    #[test]
    fn only_local_paths_are_followed() {
        assert!(is_local_path("/collections"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }

    #[test]
    fn every_template_parses() {
        for page in ["404.html", "500.html", "502.html"] {
            let response = error_page(StatusCode::NOT_FOUND, page, None);
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        assert!(TEMPLATES.get_template_names().count() >= 13);
    }
}
