use axum::Router;

use crate::middleware::AuthState;

pub mod products;
pub mod system;

/// Router for every resource. Session checks are applied per action.
pub fn router(auth: AuthState) -> Router {
    Router::new().nest("/products", products::router(auth))
}
