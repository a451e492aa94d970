//! Route definitions for the Dripmate sync API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public + validate)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - coffee list sync
        .nest("/coffees", coffee_routes(state.clone()))
        // Protected routes - account preferences
        .nest("/user", preference_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/validate", get(handlers::validate))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Coffee list routes (protected)
fn coffee_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_coffees).post(handlers::save_coffees))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Preference routes (protected)
fn preference_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/grinder", get(handlers::get_grinder).post(handlers::set_grinder))
        .route(
            "/water-hardness",
            get(handlers::get_water_hardness).post(handlers::set_water_hardness),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
