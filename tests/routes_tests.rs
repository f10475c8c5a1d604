mod common;

use common::{location, TestApp};
use gifstash::db::{collections::gifs_in_collection, terms::{find_term, gifs_for_term}};

async fn logged_in_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.register("alice", "alice@x.com", "pw123").await;
    app.login("alice@x.com", "pw123").await;
    app
}

// ==================== Search ====================

#[tokio::test]
async fn test_search_redirects_to_results() {
    let app = TestApp::spawn().await;

    let resp = app.post("/", &[("search", "cats")]).await;
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/gifs_searched/cats");
    assert_eq!(app.giphy.calls(), 1);

    let page = app.get("/gifs_searched/cats").await;
    assert_eq!(page.status(), 200);
    let page = page.text().await.unwrap();
    for i in 0..5 {
        assert!(page.contains(&format!("cats {i}")));
        assert!(page.contains(&format!("cats-{i}")));
    }

    app.post("/", &[("search", "cats")]).await;
    assert_eq!(app.giphy.calls(), 1);
}

#[tokio::test]
async fn test_search_term_with_spaces_round_trips() {
    let app = TestApp::spawn().await;

    let resp = app.post("/", &[("search", "  cats & dogs ")]).await;
    assert_eq!(location(&resp), "/gifs_searched/cats%20&%20dogs");

    let page = app.get(location(&resp)).await;
    assert_eq!(page.status(), 200);
    assert!(page.text().await.unwrap().contains("cats &amp; dogs 0"));
    assert!(find_term(&app.db_pool, "cats & dogs").await.unwrap().is_some());
}

#[tokio::test]
async fn test_search_validation() {
    let app = TestApp::spawn().await;

    let resp = app.post("/", &[("search", "   ")]).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("This field is required."));

    let long = "x".repeat(33);
    let resp = app.post("/", &[("search", long.as_str())]).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("at most 32 characters"));

    assert_eq!(app.giphy.calls(), 0);
}

#[tokio::test]
async fn test_dot_terms_are_rejected() {
    let app = TestApp::spawn().await;

    for term in [".", " .. "] {
        let resp = app.post("/", &[("search", term)]).await;
        assert_eq!(resp.status(), 200, "{term:?}");
        assert!(resp.text().await.unwrap().contains("Not a valid search term."));
        assert!(find_term(&app.db_pool, term.trim()).await.unwrap().is_none());
    }
    assert_eq!(app.giphy.calls(), 0);

    // longer runs of dots are ordinary segments
    let resp = app.post("/", &[("search", "...")]).await;
    assert_eq!(location(&resp), "/gifs_searched/...");
    assert_eq!(app.get(location(&resp)).await.status(), 200);
}

#[tokio::test]
async fn test_provider_failure_is_a_bad_gateway() {
    let app = TestApp::spawn().await;

    let resp = app.post("/", &[("search", "broken")]).await;
    assert_eq!(resp.status(), 502);
    assert!(resp.text().await.unwrap().contains("GIF search is unavailable"));
    assert!(find_term(&app.db_pool, "broken").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_term_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/gifs_searched/never-searched").await;
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().contains("That search term does not exist."));
    assert_eq!(app.giphy.calls(), 0);
}

#[tokio::test]
async fn test_listings() {
    let app = TestApp::spawn().await;
    app.post("/", &[("search", "cats")]).await;
    app.post("/", &[("search", "dogs")]).await;

    let terms = app.get("/search_terms").await.text().await.unwrap();
    assert!(terms.contains(">cats</a>"));
    assert!(terms.contains(">dogs</a>"));

    let gifs = app.get("/all_gifs").await.text().await.unwrap();
    assert!(gifs.contains("cats 4"));
    assert!(gifs.contains("dogs 0"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::spawn().await;
    let resp = app.get("/nowhere").await;
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().contains("Page not found"));
}

#[tokio::test]
async fn test_unknown_route_keeps_the_login() {
    let app = logged_in_app().await;
    let resp = app.get("/nowhere").await;
    assert_eq!(resp.status(), 404);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Page not found"));
    assert!(page.contains("@alice"));
    assert!(!page.contains(r#"<a href="/login">"#));
}

// ==================== Collections ====================

#[tokio::test]
async fn test_create_collection_scenario() {
    let app = logged_in_app().await;
    app.post("/", &[("search", "cats")]).await;
    let term = find_term(&app.db_pool, "cats").await.unwrap().unwrap();
    let gifs = gifs_for_term(&app.db_pool, term.id).await.unwrap();

    let form = app.get("/create_collection").await.text().await.unwrap();
    assert!(form.contains(&format!(r#"<option value="{}">cats 0</option>"#, gifs[0].id)));

    let first = gifs[0].id.to_string();
    let second = gifs[1].id.to_string();
    let resp = app.post("/create_collection", &[
        ("name", "Favorites"),
        ("gif_picks", first.as_str()),
        ("gif_picks", second.as_str()),
    ]).await;
    assert_eq!(resp.status(), 303);
    let collection_url = location(&resp).to_owned();
    assert!(collection_url.starts_with("/collection/"));

    let third = gifs[2].id.to_string();
    let resp = app.post("/create_collection", &[
        ("name", "Favorites"),
        ("gif_picks", third.as_str()),
    ]).await;
    assert_eq!(location(&resp), collection_url);

    let id: i64 = collection_url.trim_start_matches("/collection/").parse().unwrap();
    assert_eq!(gifs_in_collection(&app.db_pool, id).await.unwrap(), gifs[..2]);

    let page = app.get(&collection_url).await.text().await.unwrap();
    assert!(page.contains("Favorites"));
    assert!(page.contains("Collected by @alice"));
    assert!(page.contains("cats 0") && page.contains("cats 1"));
    assert!(!page.contains("cats 2"));

    let list = app.get("/collections").await.text().await.unwrap();
    assert!(list.contains(&format!(r#"<a href="{collection_url}">Favorites</a> (2 GIFs)"#)));
}

#[tokio::test]
async fn test_collection_form_validation() {
    let app = logged_in_app().await;

    let resp = app.post("/create_collection", &[("name", ""), ("gif_picks", "abc")]).await;
    assert_eq!(resp.status(), 200);
    let page = resp.text().await.unwrap();
    assert!(page.contains("This field is required."));
    assert!(page.contains("Not a valid choice"));

    let resp = app.post("/create_collection", &[("name", "Ghosts"), ("gif_picks", "999")]).await;
    assert_eq!(resp.status(), 404);

    assert!(!app.get("/collections").await.text().await.unwrap().contains("Ghosts"));
}

#[tokio::test]
async fn test_collections_list_only_the_owners() {
    let app = logged_in_app().await;
    app.post("/create_collection", &[("name", "Alice's picks")]).await;

    let bob = app.other_client();
    bob.post(app.url("/register"))
        .form(&[("email", "bob@x.com"), ("username", "bob"), ("password", "pw"), ("password2", "pw")])
        .send()
        .await
        .unwrap();
    bob.post(app.url("/login"))
        .form(&[("email", "bob@x.com"), ("password", "pw")])
        .send()
        .await
        .unwrap();
    let resp = bob.post(app.url("/create_collection"))
        .form(&[("name", "Bob's picks")])
        .send()
        .await
        .unwrap();
    let bobs_collection = location(&resp).to_owned();

    let list = bob.get(app.url("/collections")).send().await.unwrap().text().await.unwrap();
    assert!(list.contains("Bob&#x27;s picks"));
    assert!(!list.contains("Alice&#x27;s picks"));

    // single collections are public
    let page = app.get(&bobs_collection).await;
    assert_eq!(page.status(), 200);
    assert!(page.text().await.unwrap().contains("Collected by @bob"));
}

#[tokio::test]
async fn test_unknown_collection_is_not_found() {
    let app = TestApp::spawn().await;

    for path in ["/collection/42", "/collection/abc", "/collection/99999999999999999999"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), 404, "{path}");
        assert!(resp.text().await.unwrap().contains("That collection does not exist."), "{path}");
    }
}
