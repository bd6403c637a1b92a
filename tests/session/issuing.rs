use axum::http::{header::SET_COOKIE, Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::support::{
    send_json, send_request, setup_issuing_app, setup_test_app, Credential, ISSUER_KEY,
};

fn verified_identity(user_id: Uuid) -> serde_json::Value {
    json!({
        "userId": user_id.to_string(),
        "email": "Ada@Example.com",
        "name": "Ada Lovelace"
    })
}

#[tokio::test]
async fn issuer_opens_session_and_sets_cookie() {
    let app = setup_issuing_app();
    let user_id = Uuid::new_v4();

    let response = send_json(
        app.router(),
        Method::POST,
        "/api/v1/session",
        Credential::None,
        Some(ISSUER_KEY),
        verified_identity(user_id),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let token = response.body["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);
    assert!(response.body["expiresAt"].as_i64().unwrap() > 0);

    let cookie = response.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with(&format!("tasklane_session={}", token)));
    assert!(cookie.contains("HttpOnly"));

    let session = app.sessions.get_session(&token).await.unwrap().unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.email, "ada@example.com");

    let me = send_request(app.router(), Method::GET, "/api/v1/session", Credential::Cookie(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["name"], "Ada Lovelace");
}

#[tokio::test]
async fn issuing_requires_the_issuer_key() {
    let app = setup_issuing_app();

    for key in [None, Some("wrong-key-wrong-key-wrong-key-wrong")] {
        let response = send_json(
            app.router(),
            Method::POST,
            "/api/v1/session",
            Credential::None,
            key,
            verified_identity(Uuid::new_v4()),
        )
        .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.headers.get(SET_COOKIE).is_none());
    }
    assert_eq!(app.store.writes(), 0);
}

#[tokio::test]
async fn issuing_validates_the_identity() {
    let app = setup_issuing_app();

    let response = send_json(
        app.router(),
        Method::POST,
        "/api/v1/session",
        Credential::None,
        Some(ISSUER_KEY),
        json!({ "userId": "not-a-uuid", "email": "nope" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_failed");
    assert_eq!(app.store.writes(), 0);
}

#[tokio::test]
async fn issuing_is_not_mounted_without_a_key() {
    let app = setup_test_app();

    let response = send_json(
        app.router(),
        Method::POST,
        "/api/v1/session",
        Credential::None,
        Some(ISSUER_KEY),
        verified_identity(Uuid::new_v4()),
    )
    .await;

    assert!(!response.status.is_success());
    assert_eq!(app.store.writes(), 0);
}
