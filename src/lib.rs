use axum::routing::get;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod authz;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod otp;
pub mod schema;
pub mod store;

pub use handlers::AppState;

/// Assemble the full router over an already-constructed state. Tests
/// drive this directly with `tower::ServiceExt::oneshot`.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(user_routes())
        .merge(stay_routes())
        .merge(review_routes())
        .merge(roommate_post_routes())
        .merge(admin_post_routes())
        .layer(TraceLayer::new_for_http());

    let router = if config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn user_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::{signin, users, verify};

    Router::new()
        .route("/users", post(users::signup).get(users::list))
        // Same param name as the nested /users/:userId/... routes; the
        // router requires consistent names at a shared position.
        .route(
            "/users/:userId",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/verify", post(verify::verify))
        .route("/signin", post(signin::signin))
}

fn stay_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::{rooms, stays};

    Router::new()
        .route("/stays", post(stays::create).get(stays::list))
        .route(
            "/stays/:stayId",
            get(stays::get).put(stays::update).delete(stays::remove),
        )
        .route(
            "/stays/:stayId/rooms",
            post(rooms::create).get(rooms::list),
        )
        .route(
            "/stays/:stayId/rooms/:roomId",
            get(rooms::get).put(rooms::update).delete(rooms::remove),
        )
}

fn review_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::reviews;

    Router::new()
        .route("/reviews", post(reviews::create).get(reviews::list))
        .route(
            "/reviews/:id",
            get(reviews::get).put(reviews::update).delete(reviews::remove),
        )
        .route("/stays/:stayId/reviews", get(reviews::list_for_stay))
        .route("/users/:userId/reviews", get(reviews::list_for_user))
}

fn roommate_post_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::posts;

    Router::new()
        .route("/roommate_post", post(posts::create).get(posts::list))
        .route(
            "/roommate_post/:id",
            get(posts::get).put(posts::update).delete(posts::remove),
        )
        .route("/stays/:stayId/posts", get(posts::list_for_stay))
        .route("/users/:userId/posts", get(posts::list_for_user))
        .route(
            "/users/:userId/posts/:postId",
            get(posts::get_for_user)
                .put(posts::update_for_user)
                .delete(posts::remove_for_user),
        )
}

fn admin_post_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::admin_posts;

    Router::new()
        .route("/posts", post(admin_posts::create).get(admin_posts::list))
        .route(
            "/posts/:id",
            get(admin_posts::get)
                .put(admin_posts::update)
                .delete(admin_posts::remove),
        )
}
