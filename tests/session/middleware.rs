use axum::http::{header::SET_COOKIE, Method, StatusCode};

use serde_json::json;

use crate::support::{
    identity, send_json, send_request, setup_test_app, setup_unreachable_app, unknown_token,
    Credential,
};

#[tokio::test]
async fn health_needs_no_session() {
    let app = setup_test_app();
    let response = send_request(app.router(), Method::GET, "/health", Credential::None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = setup_test_app();
    let response =
        send_request(app.router(), Method::GET, "/api/v1/session", Credential::None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthorized");
}

#[tokio::test]
async fn bearer_token_resolves_identity() {
    let app = setup_test_app();
    let who = identity();
    let issued = app.sessions.create_session(who.clone()).await.unwrap();

    let response = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&issued.token),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userId"], who.user_id.to_string());
    assert_eq!(response.body["email"], who.email);
    assert_eq!(response.body["name"], who.name);
    assert_eq!(response.body["expiresAt"], issued.expires_at);
}

#[tokio::test]
async fn session_cookie_resolves_identity() {
    let app = setup_test_app();
    let issued = app.sessions.create_session(identity()).await.unwrap();

    let response = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Cookie(&issued.token),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn rejections_do_not_reveal_why() {
    let app = setup_test_app();
    let issued = app.sessions.create_session(identity()).await.unwrap();
    app.sessions.delete_session(&issued.token).await.unwrap();

    let revoked = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&issued.token),
    )
    .await;
    let unknown = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&unknown_token()),
    )
    .await;
    let malformed =
        send_request(app.router(), Method::GET, "/api/v1/session", Credential::Bearer("nope"))
            .await;

    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
    assert_eq!(revoked.body, unknown.body);
    assert_eq!(unknown.body, malformed.body);
}

#[tokio::test]
async fn refresh_route_rotates_and_sets_cookie() {
    let app = setup_test_app();
    let issued = app.sessions.create_session(identity()).await.unwrap();

    let response = send_request(
        app.router(),
        Method::POST,
        "/api/v1/session/refresh",
        Credential::Bearer(&issued.token),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let new_token = response.body["token"].as_str().unwrap().to_string();
    assert_ne!(new_token, issued.token);
    assert!(response.body["expiresAt"].as_i64().is_some());

    let cookie = response.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with(&format!("tasklane_session={}", new_token)));
    assert!(cookie.contains("HttpOnly"));

    let old = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&issued.token),
    )
    .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = send_request(
        app.router(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&new_token),
    )
    .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn logout_revokes_and_clears_cookie() {
    let app = setup_test_app();
    let issued = app.sessions.create_session(identity()).await.unwrap();

    let response = send_request(
        app.router(),
        Method::DELETE,
        "/api/v1/session",
        Credential::Cookie(&issued.token),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["revoked"], 1);
    let cookie = response.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("tasklane_session="));
    assert!(app.sessions.get_session(&issued.token).await.unwrap().is_none());
}

#[tokio::test]
async fn logout_without_flag_keeps_other_sessions() {
    let app = setup_test_app();
    let who = identity();
    let current = app.sessions.create_session(who.clone()).await.unwrap();
    let other = app.sessions.create_session(who).await.unwrap();

    let response = send_json(
        app.router(),
        Method::DELETE,
        "/api/v1/session",
        Credential::Bearer(&current.token),
        None,
        json!({ "all_sessions": false }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["revoked"], 1);
    assert!(app.sessions.get_session(&other.token).await.unwrap().is_some());
}

#[tokio::test]
async fn logout_from_all_sessions_revokes_every_token() {
    let app = setup_test_app();
    let who = identity();
    let mut tokens = Vec::new();
    for _ in 0..3 {
        tokens.push(app.sessions.create_session(who.clone()).await.unwrap().token);
    }
    let bystander = app.sessions.create_session(identity()).await.unwrap();

    let response = send_json(
        app.router(),
        Method::DELETE,
        "/api/v1/session",
        Credential::Bearer(&tokens[1]),
        None,
        json!({ "all_sessions": true }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["revoked"], 3);
    assert_eq!(response.body["message"], "Logged out from 3 session(s)");
    for token in &tokens {
        assert!(app.sessions.get_session(token).await.unwrap().is_none());
        let again =
            send_request(app.router(), Method::GET, "/api/v1/session", Credential::Bearer(token))
                .await;
        assert_eq!(again.status, StatusCode::UNAUTHORIZED);
    }
    assert!(app.sessions.get_session(&bystander.token).await.unwrap().is_some());
}

#[tokio::test]
async fn logout_rejects_non_boolean_flag() {
    let app = setup_test_app();
    let issued = app.sessions.create_session(identity()).await.unwrap();

    let response = send_json(
        app.router(),
        Method::DELETE,
        "/api/v1/session",
        Credential::Bearer(&issued.token),
        None,
        json!({ "all_sessions": "yes" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["fields"][0]["path"], "all_sessions");
    assert!(app.sessions.get_session(&issued.token).await.unwrap().is_some());
}

#[tokio::test]
async fn unreachable_store_is_service_unavailable() {
    let response = send_request(
        setup_unreachable_app(),
        Method::GET,
        "/api/v1/session",
        Credential::Bearer(&unknown_token()),
    )
    .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "service_unavailable");
}
