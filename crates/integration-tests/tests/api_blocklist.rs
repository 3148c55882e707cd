use axum::http::StatusCode;
use integration_tests::{TestApp, BLOCKED_TERM};
use serde_json::json;

#[tokio::test]
async fn admin_lists_the_seeded_terms() {
    let app = TestApp::new();
    let res = app.get("/admin/blocklist", Some(&app.session_cookie())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["terms"], json!([BLOCKED_TERM]));
}

#[tokio::test]
async fn added_term_is_normalized_and_enforced() {
    let app = TestApp::new();
    let res = app
        .post(
            "/admin/blocklist",
            json!({ "term": "  SPAM " }),
            Some(&app.session_cookie()),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["terms"], json!([BLOCKED_TERM, "spam"]));

    let id = app.posts.open.id;
    let comment = app
        .post(&format!("/blogs/{id}/comments"), json!({ "comment": "buy Spam now" }), None)
        .await;
    assert_eq!(comment.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_term_is_a_conflict_regardless_of_case() {
    let app = TestApp::new();
    let res = app
        .post(
            "/admin/blocklist",
            json!({ "term": "KELIME" }),
            Some(&app.session_cookie()),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn blank_term_is_rejected() {
    let app = TestApp::new();
    let res = app
        .post("/admin/blocklist", json!({ "term": " " }), Some(&app.session_cookie()))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn removing_a_term_lets_comments_through() {
    let app = TestApp::new();
    let cookie = app.session_cookie();

    let res = app
        .delete(&format!("/admin/blocklist/{BLOCKED_TERM}"), Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["terms"], json!([]));

    let id = app.posts.open.id;
    let comment = app
        .post(&format!("/blogs/{id}/comments"), json!({ "comment": "kelime" }), None)
        .await;
    assert_eq!(comment.status, StatusCode::OK);

    let again = app
        .delete(&format!("/admin/blocklist/{BLOCKED_TERM}"), Some(&cookie))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
