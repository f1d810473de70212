#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use staynest_api::auth::generate_token;
use staynest_api::models::{NewUser, Role};
use staynest_api::store::UserStore;
use staynest_api::{app, AppState};

/// Fresh app over an empty in-memory store. The state handle is kept so
/// tests can reach behind the API (e.g. to read an issued OTP).
pub fn test_app() -> (Router, AppState) {
    let state = AppState::in_memory();
    (app(state.clone()), state)
}

/// Drive one request through the router and decode the JSON envelope.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Read the OTP currently pending for an email, straight from the store.
pub async fn pending_otp(state: &AppState, email: &str) -> String {
    state
        .users
        .get_by_email(email)
        .await
        .unwrap()
        .expect("user exists")
        .otp
        .expect("otp pending")
}

/// Signup, redeem the OTP, and signin. Returns (user id, session token).
pub async fn create_verified_user(
    app: &Router,
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> (i64, String) {
    let role_name = match role {
        Role::User => "USER",
        Role::Owner => "OWNER",
        Role::Admin => panic!("admin accounts are not self-registered; use create_admin"),
    };
    let (status, _) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "phone": "9503783937",
            "password": password,
            "role": role_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let otp = pending_otp(state, email).await;
    let (status, _) = send(
        app,
        "POST",
        "/verify",
        None,
        Some(json!({ "email": email, "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/signin",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let id = body["data"]["user"]["id"].as_i64().unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (id, token)
}

/// Seed an admin account directly in the store; admins cannot be created
/// through the public signup surface.
pub async fn create_admin(state: &AppState, email: &str) -> (i64, String) {
    let user = state
        .users
        .create(NewUser {
            name: "Admin".into(),
            email: email.into(),
            phone: None,
            password_hash: None,
            role: Role::Admin,
            profile_pic: None,
            email_verified: true,
            otp: None,
            otp_expiry: None,
        })
        .await
        .unwrap();
    let token = generate_token(&user).unwrap();
    (user.id, token)
}
