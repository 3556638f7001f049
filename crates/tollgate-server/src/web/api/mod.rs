pub mod middleware;
pub mod users;

use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    // Everything registered here sits behind the access guard
    let protected: Router<Arc<AppState>> = Router::new()
        .route("/me", get(users::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let user_routes: Router<Arc<AppState>> = Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .merge(protected);

    Router::new().nest("/v1/users", user_routes).with_state(state)
}
