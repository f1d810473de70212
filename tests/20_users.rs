//! Account management: self-only access, admin listing, partial updates.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use staynest_api::models::Role;

use common::{create_admin, create_verified_user, send, test_app};

#[tokio::test]
async fn users_can_only_read_their_own_account() {
    let (app, state) = test_app();
    let (asha, asha_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (ravi, ravi_token) =
        create_verified_user(&app, &state, "Ravi", "ravi@b.com", "hunter22", Role::User).await;

    let (status, body) = send(&app, "GET", &format!("/users/{asha}"), Some(&asha_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "asha@b.com");
    assert!(body["data"].get("otp").is_none());

    // Someone else's id is a 403, even though the row exists.
    let (status, _) = send(&app, "GET", &format!("/users/{asha}"), Some(&ravi_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", &format!("/users/{ravi}"), Some(&asha_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Malformed ids never reach the store.
    let (status, _) = send(&app, "GET", "/users/abc", Some(&asha_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_users_is_admin_only() {
    let (app, state) = test_app();
    let (_, user_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (_, admin_token) = create_admin(&state, "admin@b.com").await;

    let (status, _) = send(&app, "GET", "/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn profile_update_is_partial_and_requires_a_field() {
    let (app, state) = test_app();
    let (asha, token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{asha}"),
        Some(&token),
        Some(json!({ "name": "Asha P" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha P");
    // Untouched fields survive.
    assert_eq!(body["data"]["email"], "asha@b.com");
    assert_eq!(body["data"]["phone"], "9503783937");

    // A body with no recognized field is rejected before the store.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{asha}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_change_to_a_taken_address_conflicts() {
    let (app, state) = test_app();
    let (asha, token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    create_verified_user(&app, &state, "Ravi", "ravi@b.com", "hunter22", Role::User).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{asha}"),
        Some(&token),
        Some(json!({ "email": "ravi@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn users_can_delete_only_their_own_account() {
    let (app, state) = test_app();
    let (asha, asha_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (ravi, _ravi_token) =
        create_verified_user(&app, &state, "Ravi", "ravi@b.com", "hunter22", Role::User).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{ravi}"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{asha}"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "asha@b.com");

    // The row is gone.
    let (status, _) = send(&app, "GET", &format!("/users/{asha}"), Some(&asha_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_owner_account_takes_their_stays_along() {
    let (app, state) = test_app();
    let (owner, owner_token) =
        create_verified_user(&app, &state, "Ravi", "ravi@b.com", "hunter22", Role::Owner).await;

    let (status, body) = send(
        &app,
        "POST",
        "/stays",
        Some(&owner_token),
        Some(json!({
            "name": "Sunrise Hostel",
            "address": "Hyderabad, Telangana",
            "latitude": 17.385,
            "longitude": 78.4867,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let stay = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{owner}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The orphan never becomes publicly readable.
    let (status, _) = send(&app, "GET", &format!("/stays/{stay}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/stays", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
