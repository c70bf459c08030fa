use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use storefront_api::app::{self, services::AppServices};
use storefront_api::config::ApiConfig;
use storefront_auth::{JwtClaims, PrincipalId};
use storefront_i18n::Locale;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig::default()).await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        let config = ApiConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..config
        };
        // Same router as prod, in-memory store, ephemeral port.
        let app = app::router(Arc::new(AppServices::in_memory()), &config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are asserted on, not followed.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/products"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// Create a valid product and return its path.
    async fn create_ok(&self, token: &str, name: &str, description: &str) -> String {
        let res = self
            .create(
                token,
                json!({ "product": { "name": name, "description": description } }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        location(&res)
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn location(res: &reqwest::Response) -> String {
    res.headers()[header::LOCATION].to_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_and_show_are_public() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "A widget").await;

    let (status, index) = srv.get_json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(index["view"], "products/index");
    assert_eq!(index["products"].as_array().unwrap().len(), 1);

    let (status, show) = srv.get_json(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(show["view"], "products/show");
    assert_eq!(show["product"]["name"], "Widget");
    assert_eq!(show["product"]["description"], "A widget");
}

#[tokio::test]
async fn mutating_actions_require_a_session() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "").await;
    let body = json!({ "product": { "name": "Changed" } });

    let requests = [
        srv.client.get(srv.url("/products/new")),
        srv.client.post(srv.url("/products")).json(&body),
        srv.client.get(srv.url(&format!("{path}/edit"))),
        srv.client.patch(srv.url(&path)).json(&body),
        srv.client.put(srv.url(&path)).json(&body),
        srv.client.delete(srv.url(&path)),
    ];
    for req in requests {
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "unauthorized");
    }

    // Wrong signing secret.
    let res = srv
        .client
        .get(srv.url("/products/new"))
        .bearer_auth(mint_jwt("other-secret"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (_, show) = srv.get_json(&path).await;
    assert_eq!(show["product"]["name"], "Widget");
}

#[tokio::test]
async fn new_form_binds_an_empty_candidate() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv
        .client
        .get(srv.url("/products/new"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"], "products/new");
    assert_eq!(body["product"]["id"], Value::Null);
    assert_eq!(body["product"]["name"], "");
    assert_eq!(body["errors"], json!({}));
}

#[tokio::test]
async fn create_redirects_to_the_new_product() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv
        .create(
            &token,
            json!({ "product": {
                "name": "Widget",
                "description": "A widget",
                "featured_image": "widget.png",
            }}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let path = location(&res);
    assert!(path.starts_with("/products/"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["notice"], "Product was successfully created.");

    let (status, show) = srv.get_json(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(show["product"]["featured_image"], "widget.png");
    assert_eq!(show["product"]["url"], path);
}

#[tokio::test]
async fn invalid_create_rerenders_the_form() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv
        .create(&token, json!({ "product": { "name": "", "description": "x" } }))
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"], "products/new");
    assert_eq!(body["product"]["description"], "x");
    assert_eq!(body["errors"]["name"][0], "can't be blank");

    let (_, index) = srv.get_json("/products").await;
    assert!(index["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn overlong_name_is_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv
        .create(&token, json!({ "product": { "name": "a".repeat(256) } }))
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"]["name"][0],
        "is too long (maximum is 255 characters)"
    );
}

#[tokio::test]
async fn unpermitted_fields_are_ignored() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv
        .create(
            &token,
            json!({ "product": {
                "name": "Widget",
                "id": "00000000-0000-0000-0000-000000000000",
                "created_at": "1999-01-01T00:00:00Z",
                "admin": true,
            }}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let path = location(&res);
    assert_ne!(path, "/products/00000000-0000-0000-0000-000000000000");

    let (_, show) = srv.get_json(&path).await;
    assert_eq!(show["product"]["name"], "Widget");
    assert!(show["product"].get("admin").is_none());
    assert_ne!(show["product"]["created_at"], "1999-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn unpermitted_fields_are_ignored_on_update() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "A widget").await;
    let (_, before) = srv.get_json(&path).await;

    let other_id = uuid::Uuid::now_v7().to_string();
    for req in [srv.client.patch(srv.url(&path)), srv.client.put(srv.url(&path))] {
        let res = req
            .bearer_auth(&token)
            .json(&json!({ "product": {
                "name": "Gadget",
                "id": other_id,
                "created_at": "1999-01-01T00:00:00Z",
                "updated_at": "1999-01-01T00:00:00Z",
            }}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), path);
    }

    let (status, _) = srv.get_json(&format!("/products/{other_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, after) = srv.get_json(&path).await;
    assert_eq!(after["product"]["name"], "Gadget");
    assert_eq!(after["product"]["description"], "A widget");
    assert_eq!(after["product"]["id"], before["product"]["id"]);
    assert_eq!(after["product"]["created_at"], before["product"]["created_at"]);
    assert_ne!(after["product"]["updated_at"], "1999-01-01T00:00:00+00:00");

    let (_, index) = srv.get_json("/products").await;
    assert_eq!(index["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_envelope_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let res = srv.create(&token, json!({ "name": "Widget" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "parameter_missing");
}

#[tokio::test]
async fn edit_form_binds_the_stored_product() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "A widget").await;

    let res = srv
        .client
        .get(srv.url(&format!("{path}/edit")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"], "products/edit");
    assert_eq!(body["product"]["name"], "Widget");
    assert_eq!(body["form"]["action"], path);
}

#[tokio::test]
async fn update_changes_fields_and_keeps_identity() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "A widget").await;

    let res = srv
        .client
        .patch(srv.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "product": { "description": "Better" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), path);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["notice"], "Product was successfully updated.");

    let (_, show) = srv.get_json(&path).await;
    assert_eq!(show["product"]["name"], "Widget");
    assert_eq!(show["product"]["description"], "Better");

    let res = srv
        .client
        .put(srv.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "product": { "name": "Gadget" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let (_, show) = srv.get_json(&path).await;
    assert_eq!(show["product"]["name"], "Gadget");
}

#[tokio::test]
async fn invalid_update_leaves_the_product_untouched() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "A widget").await;

    let res = srv
        .client
        .patch(srv.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "product": { "name": " ", "description": "changed" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"], "products/edit");
    assert_eq!(body["product"]["description"], "changed");
    assert_eq!(body["errors"]["name"][0], "can't be blank");

    let (_, show) = srv.get_json(&path).await;
    assert_eq!(show["product"]["name"], "Widget");
    assert_eq!(show["product"]["description"], "A widget");
}

#[tokio::test]
async fn delete_then_show_is_not_found() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    let path = srv.create_ok(&token, "Widget", "").await;

    let res = srv
        .client
        .delete(srv.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/products");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["notice"], "Product was successfully destroyed.");

    let (status, body) = srv.get_json(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn unknown_ids_are_not_found_without_side_effects() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    srv.create_ok(&token, "Widget", "").await;

    let unknown = format!("/products/{}", uuid::Uuid::now_v7());
    for path in [unknown.as_str(), "/products/not-a-uuid", "/products/42"] {
        let (status, _) = srv.get_json(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {path}");

        let res = srv
            .client
            .get(srv.url(&format!("{path}/edit")))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {path}/edit");

        let res = srv
            .client
            .patch(srv.url(path))
            .bearer_auth(&token)
            .json(&json!({ "product": { "name": "Ghost" } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "PATCH {path}");

        let res = srv
            .client
            .delete(srv.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "DELETE {path}");
    }

    let (_, index) = srv.get_json("/products").await;
    let products = index["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Widget");
}

#[tokio::test]
async fn list_is_in_creation_order() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);
    for name in ["first", "second", "third"] {
        srv.create_ok(&token, name, "").await;
    }

    let (_, index) = srv.get_json("/products").await;
    let names: Vec<_> = index["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn locale_parameter_localizes_views_and_errors() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET);

    let (_, index) = srv.get_json("/products?locale=es").await;
    assert_eq!(index["locale"], "es");
    assert_eq!(index["title"], "Productos");

    let (_, index) = srv.get_json("/products").await;
    assert_eq!(index["locale"], "en");
    assert_eq!(index["title"], "Products");

    let res = srv
        .client
        .post(srv.url("/products?locale=es"))
        .bearer_auth(&token)
        .json(&json!({ "product": { "name": "" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["name"][0], "no puede estar en blanco");

    let res = srv
        .client
        .post(srv.url("/products?locale=es"))
        .bearer_auth(&token)
        .json(&json!({ "product": { "name": "Widget" } }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["notice"], "El producto se creó correctamente.");

    let (status, body) = srv
        .get_json(&format!("/products/{}?locale=es", uuid::Uuid::now_v7()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Producto no encontrado");

    let res = srv
        .client
        .get(srv.url("/products/new?locale=es"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Tienes que iniciar sesión para continuar.");
}

#[tokio::test]
async fn unsupported_locale_is_rejected_and_empty_is_default() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get_json("/products?locale=xx").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported_locale");
    assert_eq!(body["message"], "unsupported locale: xx");

    let (status, body) = srv.get_json("/products?locale=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locale"], "en");
}

#[tokio::test]
async fn repeated_locale_parameter_uses_the_last_value() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get_json("/products?locale=es&locale=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locale"], "en");
    assert_eq!(body["title"], "Products");

    let (status, body) = srv.get_json("/products?locale=es&locale=es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Productos");

    let (status, body) = srv.get_json("/products?locale=en&locale=xx").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported_locale");
}

#[tokio::test]
async fn configured_default_locale_applies_without_a_parameter() {
    let srv = TestServer::spawn_with(ApiConfig {
        default_locale: Locale::Es,
        ..ApiConfig::default()
    })
    .await;

    let (status, body) = srv.get_json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locale"], "es");
    assert_eq!(body["title"], "Productos");

    let (_, body) = srv.get_json("/products?locale=en").await;
    assert_eq!(body["title"], "Products");

    let (status, body) = srv.get_json("/products?locale=xx").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "idioma no soportado: xx");
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_locale() {
    let srv = Arc::new(TestServer::spawn().await);

    let mut tasks = Vec::new();
    for i in 0..40 {
        let srv = srv.clone();
        tasks.push(tokio::spawn(async move {
            let (locale, title) = if i % 2 == 0 {
                ("es", "Productos")
            } else {
                ("en", "Products")
            };
            let (status, body) = srv.get_json(&format!("/products?locale={locale}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["locale"], locale);
            assert_eq!(body["title"], title);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Nothing leaks into a request that did not ask for a locale.
    let (_, body) = srv.get_json("/products").await;
    assert_eq!(body["locale"], "en");
}
