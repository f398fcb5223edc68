//! Authentication API Tests

use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use uuid::Uuid;

use chat_auth::application::services::{Claims, TokenIssuer, TokenVerifier};
use chat_auth::domain::DEFAULT_GROUP_ID;

use crate::common::{
    body_json, fake_registration, jwt_settings, InMemoryAuthStore, TestApp, TEST_SECRET,
};

fn verifier() -> TokenVerifier {
    TokenVerifier::new(&jwt_settings(TEST_SECRET))
}

async fn register(app: &TestApp, body: serde_json::Value) -> Uuid {
    let response = app.post_json("/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["user_id"].as_str().unwrap().parse().unwrap()
}

async fn login_token(app: &TestApp, login: &str, password: &str) -> String {
    let response = app
        .post_json("/auth/login", json!({ "login": login, "password": password }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_then_login_issues_token_for_identity() {
    let app = TestApp::auth();

    let response = app
        .post_json(
            "/auth/register",
            json!({ "username": "alice", "login": "alice1", "password": "secret1" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered = body_json(response).await;
    assert_eq!(registered["username"], "alice");
    let user_id: Uuid = registered["user_id"].as_str().unwrap().parse().unwrap();

    let response = app
        .post_json("/auth/login", json!({ "login": "alice1", "password": "secret1" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["groups"], json!([DEFAULT_GROUP_ID]));

    let claims = verifier().verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.groups, vec![DEFAULT_GROUP_ID]);
    assert_eq!(
        serde_json::to_value(&claims.groups).unwrap(),
        json!(["00000000-0000-0000-0000-000000000000"])
    );
}

#[tokio::test]
async fn test_register_does_not_issue_token() {
    let app = TestApp::auth();
    let response = app.post_json("/auth/register", fake_registration()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await.get("token").is_none());
}

#[tokio::test]
async fn test_duplicate_login_conflicts() {
    let app = TestApp::auth();
    let body = fake_registration();
    register(&app, body.clone()).await;

    let response = app.post_json("/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 10005);
}

#[tokio::test]
async fn test_concurrent_registration_with_same_login() {
    let app = TestApp::auth();
    let body = fake_registration();

    let (first, second) = tokio::join!(
        app.post_json("/auth/register", body.clone()),
        app.post_json("/auth/register", body.clone()),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_duplicate_insert_past_login_check_is_conflict() {
    let app = TestApp::auth_with_store(InMemoryAuthStore::with_stale_login_check());
    let body = fake_registration();

    let first = app.post_json("/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // The pre-check lets it through; the store's uniqueness rejects it.
    let second = app.post_json("/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error = body_json(second).await;
    assert_eq!(error["code"], 10005);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_login_look_identical() {
    let app = TestApp::auth();
    let body = fake_registration();
    register(&app, body.clone()).await;

    let wrong_password = app
        .post_json(
            "/auth/login",
            json!({ "login": body["login"], "password": "definitely-wrong" }),
        )
        .await;
    let unknown_login = app
        .post_json(
            "/auth/login",
            json!({ "login": "nobody-here", "password": "definitely-wrong" }),
        )
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_login.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_login).await;
    assert_eq!(a, b);
    assert_eq!(a["code"], 10008);
    assert_eq!(a["message"], "Invalid credentials");
}

#[test_case(json!({ "username": "", "login": "x", "password": "p" }) ; "empty username")]
#[test_case(json!({ "username": "a", "login": "", "password": "p" }) ; "empty login")]
#[test_case(json!({ "username": "a", "login": "x", "password": "" }) ; "empty password")]
#[tokio::test]
async fn test_register_validation(body: serde_json::Value) {
    let app = TestApp::auth();
    let response = app.post_json("/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 10007);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::auth();
    let response = app.post_json("/auth/login", json!({ "login": 5 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 10002);
}

#[test_case(None ; "missing header")]
#[test_case(Some("abc.def.ghi") ; "no scheme")]
#[test_case(Some("Bearer ") ; "empty token")]
#[test_case(Some("Basic dXNlcjpwYXNz") ; "basic auth")]
#[test_case(Some("bearer abc.def.ghi") ; "lowercase scheme")]
#[test_case(Some("Bearer not-a-jwt") ; "garbage token")]
#[tokio::test]
async fn test_protected_route_rejects_bad_authorization(header: Option<&str>) {
    let app = TestApp::auth();
    let uri = format!("/auth/user/{}", Uuid::new_v4());

    let response = app.send("GET", &uri, None, header).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 10003);
    assert_eq!(body["message"], "Invalid or missing token");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::auth();
    let mut claims = Claims::new(Uuid::new_v4(), "alice", vec![], Duration::hours(1)).unwrap();
    claims.exp = chrono::Utc::now().timestamp() - 5;
    let token = app.issuer.sign(&claims).unwrap();

    let response = app
        .get_auth(&format!("/auth/user/{}", claims.user_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = TestApp::auth();
    let foreign = TokenIssuer::new(&jwt_settings("a-completely-different-secret-of-32-bytes"));
    let token = foreign
        .issue(Uuid::new_v4(), "mallory", vec![DEFAULT_GROUP_ID])
        .unwrap()
        .token;

    let response = app
        .get_auth(&format!("/auth/user/{}", Uuid::new_v4()), &token)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_profile() {
    let app = TestApp::auth();
    let body = fake_registration();
    let user_id = register(&app, body.clone()).await;
    let token = login_token(
        &app,
        body["login"].as_str().unwrap(),
        body["password"].as_str().unwrap(),
    )
    .await;

    let response = app.get_auth(&format!("/auth/user/{}", user_id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["id"], user_id.to_string());
    assert_eq!(profile["username"], body["username"]);
    assert!(profile.get("login").is_none());

    let response = app
        .get_auth(&format!("/auth/user/{}", Uuid::new_v4()), &token)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_user_id_is_bad_request() {
    let app = TestApp::auth();
    let token = app.token_for(Uuid::new_v4());
    let response = app.get_auth("/auth/user/not-a-uuid", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_only_self() {
    let app = TestApp::auth();
    let body = fake_registration();
    let user_id = register(&app, body.clone()).await;
    let other_id = register(&app, fake_registration()).await;
    let login = body["login"].as_str().unwrap();
    let password = body["password"].as_str().unwrap();
    let token = login_token(&app, login, password).await;

    let response = app
        .delete_auth(&format!("/auth/user/{}", other_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete_auth(&format!("/auth/user/{}", user_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user_id"], user_id.to_string());

    let response = app
        .post_json("/auth/login", json!({ "login": login, "password": password }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
