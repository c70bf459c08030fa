use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::{Map, Value, json};

use storefront_i18n::{current, t, t_with};
use storefront_products::{
    FeaturedImage, Product, ProductAttributes, ProductId, ValidationErrors,
};

// -------------------------
// Paths
// -------------------------

pub const PRODUCTS_PATH: &str = "/products";

pub fn product_path(id: ProductId) -> String {
    format!("{PRODUCTS_PATH}/{id}")
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id_typed().to_string(),
        "name": product.name(),
        "description": product.description(),
        "featured_image": product.featured_image().map(FeaturedImage::as_str),
        "created_at": product.created_at().to_rfc3339(),
        "updated_at": product.updated_at().to_rfc3339(),
        "url": product_path(product.id_typed()),
    })
}

/// Form binding for a (possibly unsaved) candidate.
pub fn candidate_to_json(id: Option<ProductId>, attributes: &ProductAttributes) -> Value {
    json!({
        "id": id.map(|id| id.to_string()),
        "name": attributes.name,
        "description": attributes.description,
        "featured_image": attributes.featured_image.as_ref().map(FeaturedImage::as_str),
    })
}

/// `{field: [localized message, ...]}` in violation order.
pub fn errors_to_json(errors: &ValidationErrors) -> Value {
    let mut out = Map::new();
    for violation in errors.iter() {
        let message = t_with(violation.kind.message_key(), &violation.kind.message_args());
        let entry = out
            .entry(violation.field.as_str())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(message));
        }
    }
    Value::Object(out)
}

// -------------------------
// Views
// -------------------------

fn view(name: &str, title_key: &str, body: Value) -> Value {
    let mut doc = json!({
        "view": name,
        "locale": current().as_str(),
        "title": t(title_key),
    });
    if let (Value::Object(doc), Value::Object(body)) = (&mut doc, body) {
        doc.extend(body);
    }
    doc
}

pub fn index_view(products: &[Product]) -> Value {
    let products = products.iter().map(product_to_json).collect::<Vec<_>>();
    view(
        "products/index",
        "products.index.title",
        json!({ "products": products }),
    )
}

pub fn show_view(product: &Product) -> Value {
    view(
        "products/show",
        "products.show.title",
        json!({ "product": product_to_json(product) }),
    )
}

/// Which form a candidate is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    New,
    Edit(ProductId),
}

pub fn form_view(form: Form, attributes: &ProductAttributes, errors: &ValidationErrors) -> Value {
    let (name, title_key, id, action, method) = match form {
        Form::New => ("products/new", "products.new.title", None, PRODUCTS_PATH.to_string(), "POST"),
        Form::Edit(id) => ("products/edit", "products.edit.title", Some(id), product_path(id), "PATCH"),
    };
    view(
        name,
        title_key,
        json!({
            "product": candidate_to_json(id, attributes),
            "errors": errors_to_json(errors),
            "form": { "action": action, "method": method },
        }),
    )
}

/// `303 See Other` to `location`, with a localized notice in the body.
pub fn redirect(location: &str, notice_key: &str) -> axum::response::Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.to_string())],
        Json(json!({
            "location": location,
            "notice": t(notice_key),
        })),
    )
        .into_response()
}
