//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage wiring (in-memory or Postgres) behind the catalog
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: view documents and redirect responses
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use storefront_auth::{Hs256JwtValidator, JwtValidator};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services, config))
}

/// Assemble the router around already-built services.
pub fn router(services: Arc<services::AppServices>, config: &ApiConfig) -> Router {
    let jwt: Arc<dyn JwtValidator> =
        Arc::new(Hs256JwtValidator::new(config.jwt_secret.clone().into_bytes()));
    let auth_state = middleware::AuthState { jwt };
    let locale_state = middleware::LocaleState {
        default_locale: config.default_locale,
    };

    // Locale wraps everything below it, including session rejections.
    routes::router(auth_state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    locale_state,
                    middleware::locale_middleware,
                ))
                .layer(Extension(services)),
        )
        .route("/health", get(routes::system::health))
}
