//! Reviews and roommate posts, including the admin moderation surface.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use staynest_api::models::Role;

use common::{create_admin, create_verified_user, send, test_app};

fn stay_body() -> Value {
    json!({
        "name": "Sunrise Hostel",
        "address": "Hyderabad, Telangana",
        "latitude": 17.385,
        "longitude": 78.4867,
    })
}

/// Seed one owner + one stay; returns the stay id.
async fn seed_stay(app: &axum::Router, state: &staynest_api::AppState) -> i64 {
    let (_, owner_token) =
        create_verified_user(app, state, "Ravi", "owner@b.com", "hunter22", Role::Owner).await;
    let (status, body) = send(app, "POST", "/stays", Some(&owner_token), Some(stay_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn reviews_are_authored_by_the_token_bearer() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (asha, token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;

    let (status, body) = send(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        Some(json!({ "stay_id": stay, "comment": "clean and quiet", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], asha);
    assert_eq!(body["data"]["rating"], 4);

    // A review against a missing stay never lands.
    let (status, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        Some(json!({ "stay_id": 999, "comment": "ghost", "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Ratings outside [1, 5] are rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        Some(json!({ "stay_id": stay, "comment": "too good", "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_can_edit_or_delete_a_review() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (_, author_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (_, other_token) =
        create_verified_user(&app, &state, "Maya", "maya@b.com", "hunter22", Role::User).await;

    let (_, body) = send(
        &app,
        "POST",
        "/reviews",
        Some(&author_token),
        Some(json!({ "stay_id": stay, "comment": "clean and quiet", "rating": 4 })),
    )
    .await;
    let review = body["data"]["id"].as_i64().unwrap();

    // Reads by id are public.
    let (status, _) = send(&app, "GET", &format!("/reviews/{review}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/reviews/{review}"),
        Some(&other_token),
        Some(json!({ "rating": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/reviews/{review}"),
        Some(&author_token),
        Some(json!({ "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["comment"], "clean and quiet");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/reviews/{review}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/reviews/{review}"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The whole catalogue is empty again (listing requires a signin).
    let (status, _) = send(&app, "GET", "/reviews", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/reviews", Some(&author_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviews_and_posts_can_be_listed_per_stay_and_per_user() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (asha, asha_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (_, maya_token) =
        create_verified_user(&app, &state, "Maya", "maya@b.com", "hunter22", Role::User).await;

    // Nothing reviewed yet.
    let (status, _) = send(&app, "GET", &format!("/stays/{stay}/reviews"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // A missing stay is distinguishable from an unreviewed one.
    let (status, body) = send(&app, "GET", "/stays/999/reviews", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "stay not found");

    send(
        &app,
        "POST",
        "/reviews",
        Some(&asha_token),
        Some(json!({ "stay_id": stay, "comment": "clean and quiet", "rating": 4 })),
    )
    .await;
    send(
        &app,
        "POST",
        "/reviews",
        Some(&maya_token),
        Some(json!({ "stay_id": stay, "comment": "noisy at night", "rating": 2 })),
    )
    .await;
    send(
        &app,
        "POST",
        "/roommate_post",
        Some(&asha_token),
        Some(json!({ "stay_id": stay, "description": "Roommate wanted" })),
    )
    .await;

    // Per-stay reviews are public and carry both authors' entries.
    let (status, body) = send(&app, "GET", &format!("/stays/{stay}/reviews"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Per-user reviews are self-only.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{asha}/reviews"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["data"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "clean and quiet");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/users/{asha}/reviews"),
        Some(&maya_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Per-stay roommate posts are public.
    let (status, body) = send(&app, "GET", &format!("/stays/{stay}/posts"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["user_id"], asha);
}

#[tokio::test]
async fn roommate_posts_open_by_default_and_can_be_reopened() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (asha, token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;

    let (status, body) = send(
        &app,
        "POST",
        "/roommate_post",
        Some(&token),
        Some(json!({
            "stay_id": stay,
            "description": "Looking for a non-smoker roommate",
            "preferences": { "gender": "ANY", "non_smoker": true },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "OPENED");
    assert_eq!(body["data"]["user_id"], asha);
    let post = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/roommate_post/{post}"),
        Some(&token),
        Some(json!({ "status": "CLOSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CLOSED");

    // Closing is not terminal.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/roommate_post/{post}"),
        Some(&token),
        Some(json!({ "status": "OPENED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "OPENED");
    assert_eq!(body["data"]["description"], "Looking for a non-smoker roommate");
}

#[tokio::test]
async fn nested_post_surface_is_self_only() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (asha, asha_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (_, maya_token) =
        create_verified_user(&app, &state, "Maya", "maya@b.com", "hunter22", Role::User).await;

    let (_, body) = send(
        &app,
        "POST",
        "/roommate_post",
        Some(&asha_token),
        Some(json!({ "stay_id": stay, "description": "Roommate wanted" })),
    )
    .await;
    let post = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{asha}/posts"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/users/{asha}/posts"),
        Some(&maya_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{asha}/posts/{post}"),
        Some(&asha_token),
        Some(json!({ "description": "Roommate found, closing soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{asha}/posts/{post}"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No posts left for this user.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/users/{asha}/posts"),
        Some(&asha_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moderation_surface_is_admin_only() {
    let (app, state) = test_app();
    let stay = seed_stay(&app, &state).await;
    let (asha, asha_token) =
        create_verified_user(&app, &state, "Asha", "asha@b.com", "hunter22", Role::User).await;
    let (_, admin_token) = create_admin(&state, "admin@b.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/roommate_post",
        Some(&asha_token),
        Some(json!({ "stay_id": stay, "description": "Roommate wanted" })),
    )
    .await;
    let post = body["data"]["id"].as_i64().unwrap();

    // Plain users cannot reach /posts at all.
    let (status, _) = send(&app, "GET", "/posts", Some(&asha_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/posts", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Admins can create on behalf of a named author.
    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(&admin_token),
        Some(json!({
            "user_id": asha,
            "stay_id": stay,
            "description": "Reposted by moderation",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], asha);

    // Admins can moderate any post, author notwithstanding.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/posts/{post}"),
        Some(&admin_token),
        Some(json!({ "status": "CLOSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CLOSED");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/posts/{post}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A named author that does not exist is rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/posts",
        Some(&admin_token),
        Some(json!({ "user_id": 999, "stay_id": stay, "description": "ghost author" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
