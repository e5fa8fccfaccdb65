use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use seosearch_core::{AuthorityTable, SearchService};
use seosearch_server::{build_app, rebuild, AppState};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_tiny_corpus(dir: &Path) {
    fs::write(
        dir.join("healthy-recipes.html"),
        r#"<html><head><title>Healthy Recipes</title></head>
           <body>A recipe for soup and a recipe for salad.</body></html>"#,
    )
    .unwrap();
    fs::write(
        dir.join("quick-meals.html"),
        r#"<html><head><title>Quick Meals</title>
           <meta name="description" content="Fast dinners"></head>
           <body>Browse our recipes.</body></html>"#,
    )
    .unwrap();
}

fn state(dir: &Path, admin_token: Option<&str>) -> AppState {
    AppState {
        service: Arc::new(SearchService::new(AuthorityTable::builtin())),
        pages_dir: dir.to_path_buf(),
        admin_token: admin_token.map(String::from),
        rebuild_lock: Default::default(),
    }
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let st = state(dir.path(), None);
    rebuild(&st).await.unwrap();
    let app = build_app(st);

    let (status, json) = get(app, "/search?q=recipe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr[0]["id"], "healthy-recipes.html");
    assert_eq!(arr[0]["totalScore"], 27);
    assert_eq!(arr[0]["breakdown"]["titleScore"], 15);
    assert_eq!(arr[0]["breakdown"]["frequencyScore"], 2);
    assert_eq!(arr[0]["breakdown"]["backlinkScore"], 10);
    assert_eq!(arr[1]["id"], "quick-meals.html");
    assert_eq!(arr[1]["description"], "Fast dinners");
    assert_eq!(arr[1]["matchedVariations"], serde_json::json!(["recipe", "recipes"]));
}

#[tokio::test]
async fn k_truncates_but_keeps_total() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let st = state(dir.path(), None);
    rebuild(&st).await.unwrap();

    let (status, json) = get(build_app(st), "/search?q=recipes&k=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_and_missing_queries() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let st = state(dir.path(), None);
    rebuild(&st).await.unwrap();

    let (status, json) = get(build_app(st.clone()), "/search?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);

    let (status, json) = get(build_app(st), "/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], r#"Query parameter "q" is required"#);
}

#[tokio::test]
async fn unavailable_before_first_build() {
    let dir = tempdir().unwrap();
    let st = state(dir.path(), None);

    let (status, json) = get(build_app(st.clone()), "/search?q=recipe").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "index not ready");

    let (status, _) = get(build_app(st.clone()), "/api/index-info").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let resp = build_app(st).oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_info_after_build() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let st = state(dir.path(), None);
    rebuild(&st).await.unwrap();

    let (status, json) = get(build_app(st), "/api/index-info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["pages"], serde_json::json!(["healthy-recipes.html", "quick-meals.html"]));
}

#[tokio::test]
async fn rebuild_requires_admin_token() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());

    let req = || Request::post("/index/rebuild").body(Body::empty()).unwrap();
    let (status, _) = call(build_app(state(dir.path(), None)), req()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let st = state(dir.path(), Some("secret"));
    let (status, _) = call(build_app(st.clone()), req()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let authed = Request::post("/index/rebuild").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, json) = call(build_app(st.clone()), authed).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["indexed"], 2);

    // A page added on disk becomes searchable after the next rebuild.
    fs::write(dir.path().join("soup.html"), "<title>Lentil Soup</title><body>soup</body>").unwrap();
    let authed = Request::post("/index/rebuild").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, json) = call(build_app(st.clone()), authed).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["indexed"], 3);

    let (_, json) = get(build_app(st), "/search?q=soup").await;
    assert_eq!(json["results"][0]["id"], "soup.html");
}

#[tokio::test]
async fn concurrent_rebuilds_publish_latest_snapshot() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let st = state(dir.path(), None);

    let (first, second) = tokio::join!(rebuild(&st), rebuild(&st));
    assert_eq!(first.unwrap().indexed, 2);
    assert_eq!(second.unwrap().indexed, 2);

    // Once the lock is held elsewhere a rebuild waits instead of racing.
    let guard = st.rebuild_lock.clone().lock_owned().await;
    fs::write(dir.path().join("soup.html"), "<title>Lentil Soup</title><body>soup</body>").unwrap();
    let pending = tokio::spawn({
        let st = st.clone();
        async move { rebuild(&st).await }
    });
    tokio::task::yield_now().await;
    assert!(!pending.is_finished());
    drop(guard);

    assert_eq!(pending.await.unwrap().unwrap().indexed, 3);
    let (_, json) = get(build_app(st), "/api/index-info").await;
    assert_eq!(json["totalPages"], 3);
}
