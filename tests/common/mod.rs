#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use gifstash::{auth::Passwords, db, giphy::Giphy, AppState};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tokio::net::TcpListener;

/// Stand-in for the Giphy search endpoint.
///
/// `q=empty` answers with no results, `q=broken` with a 500, `q=garbled`
/// with JSON lacking `data`. `q=many` returns eight results. Anything else
/// returns five gifs titled `<q> 0` to `<q> 4`.
#[derive(Clone, Default)]
pub struct MockGiphy {
    pub calls: Arc<AtomicUsize>,
}

#[derive(Deserialize)]
struct SearchParams {
    api_key: String,
    q: String,
    limit: usize,
}

impl MockGiphy {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Serves the mock and returns a client pointed at it.
    pub async fn start(&self) -> Giphy {
        let app = Router::new()
            .route("/v1/gifs/search", get(mock_search))
            .with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Giphy::new(
            "test-key".to_owned(),
            format!("http://{addr}/v1/gifs/search"),
            Duration::from_secs(5),
        )
        .unwrap()
    }
}

async fn mock_search(
    State(mock): State<MockGiphy>,
    Query(SearchParams { api_key, q, limit }): Query<SearchParams>,
) -> impl IntoResponse {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(api_key, "test-key");
    assert_eq!(limit, 5);

    let gif = |i: usize| json!({
        "title": format!("{q} {i}"),
        "embed_url": format!("https://giphy.example/embed/{q}-{i}"),
    });

    match q.as_str() {
        "empty" => Json(json!({ "data": [] })).into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbled" => Json(json!({ "meta": { "status": 200 } })).into_response(),
        "many" => Json(json!({ "data": (0..8).map(gif).collect::<Vec<_>>() })).into_response(),
        _ => Json(json!({ "data": (0..5).map(gif).collect::<Vec<_>>() })).into_response(),
    }
}

pub async fn test_state() -> (AppState, MockGiphy) {
    let mock = MockGiphy::default();
    let giphy = mock.start().await;
    let app_state = AppState {
        db_pool: db::in_memory().await.unwrap(),
        giphy,
        passwords: Passwords::new(4),
    };
    (app_state, mock)
}

pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub db_pool: SqlitePool,
    pub giphy: MockGiphy,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let (app_state, giphy) = test_state().await;
        let db_pool = app_state.db_pool.clone();

        let app = gifstash::app(app_state, time::Duration::minutes(5));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        TestApp {
            base: format!("http://{addr}"),
            client: new_client(),
            db_pool,
            giphy,
        }
    }

    /// A second browser: same server, separate cookies.
    pub fn other_client(&self) -> reqwest::Client {
        new_client()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client.post(self.url(path)).form(form).send().await.unwrap()
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/register", &[
            ("email", email),
            ("username", username),
            ("password", password),
            ("password2", password),
        ]).await
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/login", &[("email", email), ("password", password)]).await
    }
}

fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}
