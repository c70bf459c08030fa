use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{MethodRouter, delete, get, patch, post},
};
use serde_json::Value;

use storefront_products::{Product, ProductId, ProductParams, SaveOutcome};

use crate::app::dto::{self, Form};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::{AuthState, require_session};

/// Controller actions, named for the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Index,
    Show,
    New,
    Create,
    Edit,
    Update,
    Destroy,
}

/// Actions reachable without a session. Everything else is guarded.
pub const PUBLIC_ACTIONS: &[Action] = &[Action::Index, Action::Show];

pub fn router(auth: AuthState) -> Router {
    let guard = |action: Action, route: MethodRouter| -> MethodRouter {
        if PUBLIC_ACTIONS.contains(&action) {
            route
        } else {
            route.route_layer(axum::middleware::from_fn_with_state(
                auth.clone(),
                require_session,
            ))
        }
    };

    Router::new()
        .route(
            "/",
            guard(Action::Index, get(index)).merge(guard(Action::Create, post(create))),
        )
        .route("/new", guard(Action::New, get(new_form)))
        .route(
            "/:id",
            guard(Action::Show, get(show))
                .merge(guard(Action::Update, patch(update).put(update)))
                .merge(guard(Action::Destroy, delete(destroy))),
        )
        .route("/:id/edit", guard(Action::Edit, get(edit)))
}

/// The product named by the `:id` path segment.
///
/// Identifiers that are not UUIDs resolve the same way as unknown ones.
pub struct LoadedProduct(pub Product);

#[axum::async_trait]
impl<S> FromRequestParts<S> for LoadedProduct
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(services) = Extension::<Arc<AppServices>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;

        let id: ProductId = raw.parse()?;
        let product = services.catalog().load(id).await?;
        Ok(Self(product))
    }
}

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Value>, ApiError> {
    let products = services.catalog().all().await?;
    Ok(Json(dto::index_view(&products)))
}

pub async fn show(LoadedProduct(product): LoadedProduct) -> Json<Value> {
    Json(dto::show_view(&product))
}

pub async fn new_form(Extension(services): Extension<Arc<AppServices>>) -> Json<Value> {
    let candidate = services.catalog().build();
    Json(dto::form_view(Form::New, &candidate, &Default::default()))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params = permit(&body)?;

    match services.catalog().create(params).await? {
        SaveOutcome::Saved(product) => {
            tracing::info!(
                product_id = %product.id_typed(),
                principal_id = %principal.principal_id(),
                "product created"
            );
            Ok(dto::redirect(
                &dto::product_path(product.id_typed()),
                "products.create.notice",
            ))
        }
        SaveOutcome::Invalid { candidate, errors } => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(dto::form_view(Form::New, &candidate, &errors)),
        )
            .into_response()),
    }
}

pub async fn edit(LoadedProduct(product): LoadedProduct) -> Json<Value> {
    Json(dto::form_view(
        Form::Edit(product.id_typed()),
        product.attributes(),
        &Default::default(),
    ))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    LoadedProduct(product): LoadedProduct,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params = permit(&body)?;

    match services.catalog().update(product, params).await? {
        SaveOutcome::Saved(product) => {
            tracing::info!(
                product_id = %product.id_typed(),
                principal_id = %principal.principal_id(),
                "product updated"
            );
            Ok(dto::redirect(
                &dto::product_path(product.id_typed()),
                "products.update.notice",
            ))
        }
        SaveOutcome::Invalid { candidate, errors } => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(dto::form_view(
                Form::Edit(candidate.id_typed()),
                candidate.attributes(),
                &errors,
            )),
        )
            .into_response()),
    }
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    LoadedProduct(product): LoadedProduct,
) -> Result<Response, ApiError> {
    let id = product.id_typed();
    services.catalog().destroy(product).await?;
    tracing::info!(
        product_id = %id,
        principal_id = %principal.principal_id(),
        "product destroyed"
    );
    Ok(dto::redirect(dto::PRODUCTS_PATH, "products.destroy.notice"))
}

// An unreadable body has no envelope either.
fn permit(body: &[u8]) -> Result<ProductParams, ApiError> {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let ignored = ProductParams::unpermitted_keys(&body);
    if !ignored.is_empty() {
        tracing::debug!(?ignored, "unpermitted product parameters");
    }
    Ok(ProductParams::permit(&body)?)
}
