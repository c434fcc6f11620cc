//! Endpoint behavior tests driving the real router with in-process requests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use parlor_server::db;
use parlor_server::routes;
use parlor_server::state::AppState;
use parlor_server::ws;

fn test_state(dir: &tempfile::TempDir) -> AppState {
    AppState {
        db: db::init_db_in_memory().expect("in-memory db"),
        jwt_secret: b"integration-secret".to_vec(),
        clients: ws::new_client_registry(),
        uploads_dir: dir.path().join("uploads"),
        public_dir: dir.path().join("public"),
    }
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = routes::build_router(test_state(&dir));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn register_api_issues_token_then_conflicts_on_duplicate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app: Router = routes::build_router(test_state(&dir));

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/register",
            r#"{"username":"alice","password":"password123"}"#,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .expect("cookie header")
        .to_string();
    assert!(set_cookie.starts_with("jwt="));

    let body = body_json(response).await;
    assert!(body["user_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // Same username again: the find hits, the insert is never reached.
    let response = app
        .oneshot(json_post(
            "/api/register",
            r#"{"username":"alice","password":"other"}"#,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "User exists");
}

#[tokio::test]
async fn register_api_missing_fields_is_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = routes::build_router(test_state(&dir));

    let response = app
        .oneshot(json_post("/api/register", r#"{"username":"alice"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_post_without_cookie_is_401_and_inserts_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(&dir);
    let app = routes::build_router(state.clone());

    let response = app
        .oneshot(json_post(
            "/api/posts",
            r#"{"title":"t","content":"c"}"#,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let conn = state.db.lock().expect("db lock");
    assert_eq!(db::posts::count(&conn).expect("count"), 0);
}

#[tokio::test]
async fn create_post_with_session_cookie_shows_up_on_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app: Router = routes::build_router(test_state(&dir));

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/register",
            r#"{"username":"alice","password":"password123"}"#,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let token = body_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("jwt={token}"))
        .body(Body::from(
            r#"{"title":"First post","content":"hello world"}"#,
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("First post"));
    assert!(html.contains("by alice"));
}

#[tokio::test]
async fn create_post_missing_fields_is_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app: Router = routes::build_router(test_state(&dir));

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/register",
            r#"{"username":"alice","password":"password123"}"#,
        ))
        .await
        .expect("response");
    let token = body_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("jwt={token}"))
        .body(Body::from(r#"{"title":"  "}"#))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn form_register_redirects_home_and_flags_duplicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app: Router = routes::build_router(test_state(&dir));

    let response = app
        .clone()
        .oneshot(form_post("/register", "username=bob&password=pw"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let response = app
        .clone()
        .oneshot(form_post("/register", "username=bob&password=pw"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?error=User+exists");

    let response = app
        .oneshot(form_post("/register", "username=&password="))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/?error=Missing+fields"
    );
}

#[tokio::test]
async fn invalid_cookie_degrades_to_anonymous_and_is_cleared() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = routes::build_router(test_state(&dir));

    let request = Request::get("/")
        .header(header::COOKIE, "jwt=garbage")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    // Not rejected: anonymous browsing, with the bad cookie removed.
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("removal cookie")
        .to_str()
        .expect("cookie header");
    assert!(set_cookie.starts_with("jwt="));
    assert!(set_cookie.contains("Max-Age=0"));

    let html = body_string(response).await;
    assert!(!html.contains("Signed in as"));
}

#[tokio::test]
async fn chat_page_renders_for_anonymous_visitors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = routes::build_router(test_state(&dir));

    let response = app
        .oneshot(Request::get("/chat").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Chatting anonymously"));
    assert!(html.contains("/ws"));
}

fn multipart_post(uri: &str, boundary: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn upload_saves_file_and_serves_it_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(&dir);
    std::fs::create_dir_all(&state.uploads_dir).expect("uploads dir");
    let app: Router = routes::build_router(state.clone());

    let boundary = "testboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         hello upload\r\n\
         --{boundary}--\r\n"
    );
    let response = app
        .clone()
        .oneshot(multipart_post("/api/uploads", boundary, body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["saved"][0], "note.txt");

    let on_disk =
        std::fs::read_to_string(state.uploads_dir.join("note.txt")).expect("saved file");
    assert_eq!(on_disk, "hello upload");

    // Saved files are served back from the uploads directory.
    let response = app
        .oneshot(
            Request::get("/uploads/note.txt")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "hello upload");
}

#[tokio::test]
async fn upload_without_file_parts_is_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(&dir);
    std::fs::create_dir_all(&state.uploads_dir).expect("uploads dir");
    let app = routes::build_router(state);

    // A plain form field carries no filename, so nothing is saved.
    let boundary = "testboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"comment\"\r\n\
         \r\n\
         just text\r\n\
         --{boundary}--\r\n"
    );
    let response = app
        .oneshot(multipart_post("/api/uploads", boundary, body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_falls_through_to_404() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = routes::build_router(test_state(&dir));

    let response = app
        .oneshot(
            Request::get("/no/such/page")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
