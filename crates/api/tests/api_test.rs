//! Router tests driving the HTTP boundary end to end on an in-memory database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use hearts_api::{AppState, create_router};
use hearts_db::migration::{Migrator, MigratorTrait};
use hearts_db::repositories::{ProductRepository, UpsertProductInput};
use hearts_shared::{BillingConfig, JwtConfig, JwtService};

const SECRET: &str = "api-test-secret";

struct TestApp {
    router: Router,
    jwt: JwtService,
}

impl TestApp {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db: DatabaseConnection = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        ProductRepository::new(db.clone())
            .upsert_product(UpsertProductInput {
                code: "HEART_10".to_string(),
                name: "10 Hearts".to_string(),
                description: None,
                hearts: 10,
                bonus_hearts: 0,
                price: 10_000,
                sort_order: 1,
                is_active: true,
            })
            .await
            .unwrap();

        let jwt = JwtService::new(JwtConfig {
            secret: SECRET.to_string(),
            access_token_expires_minutes: 15,
        });
        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt.clone()),
            billing: Arc::new(BillingConfig::default()),
            admin_role: Arc::from("admin"),
        };

        Self {
            router: create_router(state),
            jwt,
        }
    }

    fn token(&self, user_id: Uuid, role: &str) -> String {
        self.jwt.generate_access_token(user_id, role).unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_wallet_requires_token() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/api/v1/wallets/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app
        .call(Method::GET, "/api/v1/wallets/me", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_purchase_flow() {
    let app = TestApp::new().await;
    let user_id = Uuid::new_v4();
    let token = app.token(user_id, "user");

    let (status, products) = app
        .call(Method::GET, "/api/v1/billing/products", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products[0]["code"], "HEART_10");
    assert_eq!(products[0]["total_hearts"], 10);

    let (status, order) = app
        .call(
            Method::POST,
            "/api/v1/billing/orders",
            Some(&token),
            Some(json!({ "product_code": "HEART_10", "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["total_amount"], 20_000);
    let order_id = order["id"].as_str().unwrap().to_string();

    let confirm_uri = format!("/api/v1/billing/orders/{order_id}/confirm");
    let (status, confirmed) = app
        .call(Method::POST, &confirm_uri, Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["order"]["status"], "PAID");
    assert_eq!(confirmed["transaction"]["transaction_type"], "CHARGE");
    assert_eq!(confirmed["transaction"]["amount"], 20);
    assert_eq!(confirmed["transaction"]["balance_after"], 20);
    assert_eq!(confirmed["balance"], 20);
    assert_eq!(confirmed["balance"], confirmed["transaction"]["balance_after"]);

    let (status, body) = app
        .call(Method::POST, &confirm_uri, Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ALREADY_PROCESSED");

    let (status, wallet) = app
        .call(Method::GET, "/api/v1/wallets/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet["balance"], 20);
    assert_eq!(wallet["recent_transactions"].as_array().unwrap().len(), 1);

    let (status, page) = app
        .call(
            Method::GET,
            "/api/v1/wallets/me/transactions?page=1&per_page=500",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["meta"]["per_page"], 50);

    let (status, orders) = app
        .call(Method::GET, "/api/v1/billing/orders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders["data"][0]["status"], "PAID");
}

#[tokio::test]
async fn test_order_errors() {
    let app = TestApp::new().await;
    let token = app.token(Uuid::new_v4(), "user");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/billing/orders",
            Some(&token),
            Some(json!({ "product_code": "HEART_404" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/billing/orders",
            Some(&token),
            Some(json!({ "product_code": "  " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, order) = app
        .call(
            Method::POST,
            "/api/v1/billing/orders",
            Some(&token),
            Some(json!({ "product_code": "HEART_10" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/billing/orders/{order_id}/confirm"),
            Some(&token),
            Some(json!({ "payment_key": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, canceled) = app
        .call(
            Method::POST,
            &format!("/api/v1/billing/orders/{order_id}/cancel"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["status"], "CANCELED");

    let other = app.token(Uuid::new_v4(), "user");
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/billing/orders/{order_id}/confirm"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_adjustment() {
    let app = TestApp::new().await;
    let target = Uuid::new_v4();
    let admin = app.token(Uuid::new_v4(), "admin");
    let user = app.token(Uuid::new_v4(), "user");
    let adjust_uri = format!("/api/v1/admin/wallets/{target}/adjust");

    let (status, body) = app
        .call(
            Method::POST,
            &adjust_uri,
            Some(&user),
            Some(json!({ "delta": 20, "reason": "self-service" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = app
        .call(
            Method::POST,
            &adjust_uri,
            Some(&admin),
            Some(json!({ "delta": 20, "reason": "migration credit" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 20);

    let (status, body) = app
        .call(
            Method::POST,
            &adjust_uri,
            Some(&admin),
            Some(json!({ "delta": -3, "reason": "duplicate grant" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transaction"]["transaction_type"], "ADMIN_ADJUST");
    assert_eq!(body["transaction"]["amount"], -3);
    assert_eq!(body["balance"], 17);

    let (status, body) = app
        .call(
            Method::POST,
            &adjust_uri,
            Some(&admin),
            Some(json!({ "delta": -100, "reason": "too much" })),
        )
        .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "INSUFFICIENT_HEARTS");

    let (status, body) = app
        .call(
            Method::POST,
            &adjust_uri,
            Some(&admin),
            Some(json!({ "delta": 0, "reason": "noop" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let reconcile_uri = format!("/api/v1/admin/wallets/{target}/reconciliation");
    let (status, _) = app
        .call(Method::GET, &reconcile_uri, Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, report) = app
        .call(Method::GET, &reconcile_uri, Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["balance"], 17);
    assert_eq!(report["ledger_sum"], 17);
    assert_eq!(report["entry_count"], 2);
    assert_eq!(report["consistent"], true);
}
