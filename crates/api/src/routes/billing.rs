//! Billing routes: catalog, orders, payment confirmation.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearts_db::repositories::{
    ConfirmPaymentInput, CreateOrderInput, OrderRepository, ProductRepository,
};
use hearts_shared::AppError;
use hearts_shared::types::{PageRequest, PageResponse};

use super::dto::{OrderResponse, ProductResponse, TransactionResponse};
use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the billing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billing/products", get(list_products))
        .route("/billing/orders", get(list_orders).post(create_order))
        .route("/billing/orders/{order_id}/confirm", post(confirm_order))
        .route("/billing/orders/{order_id}/cancel", post(cancel_order))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Product to buy.
    pub product_code: String,
    /// Units; defaults to 1, values below 1 are treated as 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Optional request body for confirming a payment.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmOrderRequest {
    /// Gateway payment key.
    pub payment_key: Option<String>,
    /// Payment provider.
    pub pg_provider: Option<String>,
}

/// Response for a confirmed order.
#[derive(Debug, Serialize)]
pub struct ConfirmOrderResponse {
    /// The paid order.
    pub order: OrderResponse,
    /// The CHARGE entry it produced.
    pub transaction: TransactionResponse,
    /// Wallet balance right after the credit, as recorded on the entry.
    pub balance: i64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/billing/products` - Active products in display order.
async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new((*state.db).clone())
        .list_active()
        .await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// POST `/billing/orders` - Create a PENDING order.
async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let order = OrderRepository::new((*state.db).clone())
        .create_order(CreateOrderInput {
            user_id: auth.user_id(),
            product_code: body.product_code,
            quantity: body.quantity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET `/billing/orders` - Paged orders of the caller, newest first.
async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<OrderResponse>>> {
    let page = page.clamped(state.billing.max_page_size);
    let (orders, total) = OrderRepository::new((*state.db).clone())
        .list_orders(auth.user_id(), page)
        .await?;

    Ok(Json(PageResponse::new(
        orders.into_iter().map(Into::into).collect(),
        page.page,
        page.per_page,
        total,
    )))
}

/// POST `/billing/orders/{order_id}/confirm` - Mark paid and credit hearts.
///
/// The body is optional; without it the test payment defaults apply.
async fn confirm_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Json<ConfirmOrderResponse>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ConfirmOrderRequest::default()
    } else {
        serde_json::from_slice::<ConfirmOrderRequest>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
    };

    let confirmed = OrderRepository::new((*state.db).clone())
        .confirm_payment(ConfirmPaymentInput {
            user_id: auth.user_id(),
            order_id,
            payment_key: request.payment_key,
            pg_provider: request.pg_provider,
        })
        .await?;

    let balance = confirmed.transaction.balance_after;

    Ok(Json(ConfirmOrderResponse {
        order: confirmed.order.into(),
        transaction: confirmed.transaction.into(),
        balance,
    }))
}

/// POST `/billing/orders/{order_id}/cancel` - Cancel a PENDING order.
async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let order = OrderRepository::new((*state.db).clone())
        .cancel_order(auth.user_id(), order_id)
        .await?;
    Ok(Json(order.into()))
}
