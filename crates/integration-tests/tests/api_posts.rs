use axum::http::StatusCode;
use integration_tests::{TestApp, LEGACY_ID};
use serde_json::json;

#[tokio::test]
async fn public_listing_hides_invisible_posts() {
    let app = TestApp::new();
    let res = app.get("/blogs", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<&str> = res.body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&app.posts.hidden.id.to_string().as_str()));
}

#[tokio::test]
async fn public_read_resolves_both_identifier_forms() {
    let app = TestApp::new();
    let native = app.get(&format!("/blogs/{}", app.posts.open.id), None).await;
    let legacy = app.get(&format!("/blogs/{LEGACY_ID}"), None).await;

    assert_eq!(native.status, StatusCode::OK);
    assert_eq!(legacy.status, StatusCode::OK);
    assert_eq!(native.body["post"]["id"], legacy.body["post"]["id"]);
    assert_eq!(legacy.body["post"]["legacyId"], LEGACY_ID);
}

#[tokio::test]
async fn hidden_post_reads_as_missing_to_the_public() {
    let app = TestApp::new();
    let res = app.get(&format!("/blogs/{}", app.posts.hidden.id), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_listing_includes_hidden_posts() {
    let app = TestApp::new();
    let res = app.get("/admin/posts", Some(&app.session_cookie())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["posts"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn admin_creates_updates_and_deletes_a_post() {
    let app = TestApp::new();
    let cookie = app.session_cookie();

    let created = app
        .post(
            "/admin/posts",
            json!({ "title": "  Exam schedule ", "body": "Room 101", "commentsAllowed": false }),
            Some(&cookie),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["post"]["title"], "Exam schedule");
    assert_eq!(created.body["post"]["visible"], true);
    assert_eq!(created.body["post"]["commentsAllowed"], false);
    let id = created.body["post"]["id"].as_str().unwrap().to_string();

    let updated = app
        .patch(
            &format!("/admin/posts/{id}"),
            json!({ "commentsAllowed": true }),
            Some(&cookie),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["post"]["commentsAllowed"], true);
    assert_eq!(updated.body["post"]["title"], "Exam schedule");

    let comment = app
        .post(&format!("/blogs/{id}/comments"), json!({ "comment": "see you" }), None)
        .await;
    assert_eq!(comment.status, StatusCode::OK);

    let deleted = app.delete(&format!("/admin/posts/{id}"), Some(&cookie)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["deleted"], id);

    let gone = app.get(&format!("/blogs/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = TestApp::new();
    let res = app
        .post("/admin/posts", json!({ "title": "   " }), Some(&app.session_cookie()))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_an_unknown_post_is_not_found() {
    let app = TestApp::new();
    let res = app
        .patch(
            "/admin/posts/nope",
            json!({ "title": "x" }),
            Some(&app.session_cookie()),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
