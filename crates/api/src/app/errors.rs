use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use storefront_core::DomainError;
use storefront_i18n::{t, t_with};
use storefront_infra::{CatalogError, StoreError};
use storefront_products::ParamsError;

/// Failures a handler can end with.
///
/// Rendering happens in `into_response`, inside the request's locale scope,
/// so messages come out in the caller's language.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("parameter missing: {0}")]
    ParameterMissing(&'static str),

    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Domain(DomainError::NotFound | DomainError::InvalidId(_)) => {
                ApiError::NotFound
            }
            CatalogError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        CatalogError::Domain(err).into()
    }
}

impl From<ParamsError> for ApiError {
    fn from(err: ParamsError) -> Self {
        match err {
            ParamsError::Missing(param) => ApiError::ParameterMissing(param),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", t("errors.not_found")),
            ApiError::Unauthorized => {
                let mut res = json_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    t("errors.unauthorized"),
                );
                res.headers_mut()
                    .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
                res
            }
            ApiError::ParameterMissing(param) => json_error(
                StatusCode::BAD_REQUEST,
                "parameter_missing",
                t_with("errors.parameter_missing", &[("param", param.to_string())]),
            ),
            ApiError::UnsupportedLocale(locale) => json_error(
                StatusCode::BAD_REQUEST,
                "unsupported_locale",
                t_with("errors.unsupported_locale", &[("locale", locale)]),
            ),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", t("errors.internal"))
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", t("errors.internal"))
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
