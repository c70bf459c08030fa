use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::Instrument;

use storefront_auth::JwtValidator;
use storefront_i18n::Locale;

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Reject requests without a valid bearer session.
pub async fn require_session(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "session rejected");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(PrincipalContext::new(claims.sub));

    let span = tracing::info_span!("session", principal_id = %claims.sub);
    Ok(next.run(req).instrument(span).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[derive(Debug, Clone, Copy)]
pub struct LocaleState {
    pub default_locale: Locale,
}

/// Run the rest of the request with the requested (or default) locale active.
///
/// The previous locale is restored when the inner future finishes, whether
/// it produced a success, an error response, or was dropped.
pub async fn locale_middleware(
    State(state): State<LocaleState>,
    Query(query): Query<Vec<(String, String)>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let locale = match resolve_locale(locale_param(&query), state.default_locale) {
        Ok(locale) => locale,
        Err(raw) => {
            return storefront_i18n::sync_scope(state.default_locale, || {
                ApiError::UnsupportedLocale(raw).into_response()
            });
        }
    };

    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        locale = %locale,
    );
    storefront_i18n::scope(locale, next.run(req))
        .instrument(span)
        .await
}

/// The `locale` query parameter. When it is repeated the last one wins.
fn locale_param(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .rev()
        .find(|(key, _)| key == "locale")
        .map(|(_, value)| value.as_str())
}

/// Explicit parameter if present and non-empty, otherwise the default.
///
/// Returns the raw parameter when it names an unsupported locale.
pub fn resolve_locale(param: Option<&str>, default: Locale) -> Result<Locale, String> {
    match param.map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => Locale::parse(raw).ok_or_else(|| raw.to_string()),
        None => Ok(default),
    }
}
