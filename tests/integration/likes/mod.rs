//! Like toggle and liked-artifact listing integration tests

use axum::http::{Method, StatusCode};
use histotrack_artifacts::toggle_like_tx;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{artifact_id, authed_request, parse_body, TestApp};

async fn toggle(app: &TestApp, token: &str, id: Uuid) -> (StatusCode, Value) {
    let resp = app
        .send(authed_request(
            Method::PATCH,
            &format!("/artifacts/toggle-like/{id}"),
            token,
            None,
        ))
        .await;
    let status = resp.status();
    (status, parse_body(resp).await)
}

async fn liked(app: &TestApp, token: &str) -> Vec<Value> {
    let resp = app
        .send(authed_request(Method::GET, "/liked-artifacts", token, None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    parse_body(resp).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_ming_vase_toggle_round_trip() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("a");
    let (_, fan) = app.user("fan");

    let created = app
        .create_artifact(&owner, json!({"name": "Ming Vase"}))
        .await;
    assert_eq!(created["likes"], 0);
    let id = artifact_id(&created);

    let (status, body) = toggle(&app, &fan, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["liked"], true);
    assert_eq!(body["message"], "Artifact liked");
    assert_eq!(app.likes_of(id).await, 1);

    let (status, body) = toggle(&app, &fan, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["liked"], false);
    assert_eq!(body["message"], "Artifact disliked");
    assert_eq!(app.likes_of(id).await, 0);

    assert!(liked(&app, &fan).await.is_empty());

    app.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_liked_list_empty_for_new_user() {
    let app = TestApp::new().await.unwrap();
    let (_, token) = app.user("newcomer");

    assert!(liked(&app, &token).await.is_empty());
}

#[tokio::test]
async fn test_liked_list_returns_liked_artifacts() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("owner");
    let (fan_email, fan) = app.user("fan");

    let first = artifact_id(&app.create_artifact(&owner, json!({"name": "Lacquer box"})).await);
    let second = artifact_id(&app.create_artifact(&owner, json!({"name": "Celadon bowl"})).await);
    let _unliked = app.create_artifact(&owner, json!({"name": "Iron sword"})).await;

    toggle(&app, &fan, first).await;
    toggle(&app, &fan, second).await;

    let mut ids: Vec<Uuid> = liked(&app, &fan).await.iter().map(artifact_id).collect();
    ids.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(ids, expected);

    let resp = app
        .send(authed_request(
            Method::GET,
            &format!("/liked-artifacts?email={fan_email}"),
            &fan,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    app.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_toggle_missing_artifact_is_not_found() {
    let app = TestApp::new().await.unwrap();
    let (_, token) = app.user("fan");

    let (status, body) = toggle(&app, &token, Uuid::new_v4()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(liked(&app, &token).await.is_empty());
}

#[tokio::test]
async fn test_deleting_artifact_removes_it_from_liked_sets() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("owner");
    let (_, fan) = app.user("fan");

    let id = artifact_id(&app.create_artifact(&owner, json!({"name": "Terracotta head"})).await);
    toggle(&app, &fan, id).await;
    assert_eq!(liked(&app, &fan).await.len(), 1);

    let resp = app
        .send(authed_request(
            Method::DELETE,
            &format!("/artifacts/{id}"),
            &owner,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(liked(&app, &fan).await.is_empty());

    app.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_likes_are_all_counted() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("owner");
    let id = artifact_id(&app.create_artifact(&owner, json!({"name": "Bronze drum"})).await);

    let fans: Vec<String> = (0..8).map(|i| app.user(&format!("fan{i}")).1).collect();

    let results = toggle_concurrently(&app, &fans, id).await;
    assert!(results
        .iter()
        .all(|(status, body)| *status == StatusCode::OK && body["liked"] == true));

    assert_eq!(app.likes_of(id).await, fans.len() as i64);

    app.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_toggles_by_one_user_keep_count_consistent() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("owner");
    let (fan_email, fan) = app.user("fan");
    let id = artifact_id(&app.create_artifact(&owner, json!({"name": "Jade pendant"})).await);

    let tokens = vec![fan; 9];
    let results = toggle_concurrently(&app, &tokens, id).await;
    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

    let memberships: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM liked_artifacts WHERE email = $1 AND artifact_id = $2",
    )
    .bind(&fan_email)
    .bind(id)
    .fetch_one(&app.pool)
    .await
    .unwrap();

    // An odd number of toggles leaves the artifact liked
    assert_eq!(memberships, 1);
    assert_eq!(app.likes_of(id).await, memberships);

    app.cleanup().await.unwrap();
}

async fn toggle_concurrently(app: &TestApp, tokens: &[String], id: Uuid) -> Vec<(StatusCode, Value)> {
    let mut handles = Vec::new();
    for token in tokens {
        let router = app.router();
        let request = authed_request(
            Method::PATCH,
            &format!("/artifacts/toggle-like/{id}"),
            token,
            None,
        );
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            let resp = router.oneshot(request).await.unwrap();
            let status = resp.status();
            (status, parse_body(resp).await)
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test]
async fn test_rolled_back_toggle_leaves_no_trace() {
    let app = TestApp::new().await.unwrap();
    let (_, owner) = app.user("owner");
    let (fan_email, fan) = app.user("fan");
    let id = artifact_id(&app.create_artifact(&owner, json!({"name": "Gilt buckle"})).await);

    let mut tx = app.repos.begin().await.unwrap();
    let toggled = toggle_like_tx(&mut tx, &fan_email, id).await.unwrap();
    assert!(toggled.liked);
    assert_eq!(toggled.likes, 1);
    tx.rollback().await.unwrap();

    assert_eq!(app.likes_of(id).await, 0);
    assert!(liked(&app, &fan).await.is_empty());

    app.cleanup().await.unwrap();
}
