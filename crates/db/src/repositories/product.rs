//! Product catalog repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use thiserror::Error;
use tracing::info;

use hearts_core::billing::{BillingError, BillingService, ProductInfo};
use hearts_shared::AppError;

use crate::entities::heart_products;

/// Error types for catalog operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Catalog values rejected.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Billing(e) => super::billing_app_error(e),
            ProductError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a catalog entry.
#[derive(Debug, Clone)]
pub struct UpsertProductInput {
    /// Product code (key).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Base hearts per unit.
    pub hearts: i64,
    /// Bonus hearts per unit.
    pub bonus_hearts: i64,
    /// Price per unit.
    pub price: i64,
    /// Display order.
    pub sort_order: i32,
    /// Whether the product can be ordered.
    pub is_active: bool,
}

/// Product catalog repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active products ordered by `sort_order`.
    pub async fn list_active(&self) -> Result<Vec<heart_products::Model>, ProductError> {
        let products = heart_products::Entity::find()
            .filter(heart_products::Column::IsActive.eq(true))
            .order_by_asc(heart_products::Column::SortOrder)
            .order_by_asc(heart_products::Column::Code)
            .all(&self.db)
            .await?;
        Ok(products)
    }

    /// Finds a product by code.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has this code.
    pub async fn get_product(&self, code: &str) -> Result<heart_products::Model, ProductError> {
        heart_products::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ProductError::NotFound(code.to_string()))
    }

    /// Creates a product or replaces the catalog values of an existing one.
    ///
    /// Existing orders keep their snapshots.
    pub async fn upsert_product(
        &self,
        input: UpsertProductInput,
    ) -> Result<heart_products::Model, ProductError> {
        BillingService::validate_product(&ProductInfo {
            code: input.code.clone(),
            hearts: input.hearts,
            bonus_hearts: input.bonus_hearts,
            price: input.price,
            is_active: input.is_active,
        })?;

        let now = Utc::now().into();
        let existing = heart_products::Entity::find_by_id(input.code.clone())
            .one(&self.db)
            .await?;

        let product = if let Some(existing) = existing {
            let mut product = existing.into_active_model();
            product.name = Set(input.name);
            product.description = Set(input.description);
            product.hearts = Set(input.hearts);
            product.bonus_hearts = Set(input.bonus_hearts);
            product.price = Set(input.price);
            product.sort_order = Set(input.sort_order);
            product.is_active = Set(input.is_active);
            product.updated_at = Set(now);
            product.update(&self.db).await?
        } else {
            heart_products::ActiveModel {
                code: Set(input.code),
                name: Set(input.name),
                description: Set(input.description),
                hearts: Set(input.hearts),
                bonus_hearts: Set(input.bonus_hearts),
                price: Set(input.price),
                sort_order: Set(input.sort_order),
                is_active: Set(input.is_active),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?
        };

        info!(code = %product.code, hearts = product.hearts, bonus_hearts = product.bonus_hearts, price = product.price, "Product saved");
        Ok(product)
    }

    /// Activates or deactivates a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has this code.
    pub async fn set_product_active(
        &self,
        code: &str,
        is_active: bool,
    ) -> Result<heart_products::Model, ProductError> {
        let mut product = self.get_product(code).await?.into_active_model();
        product.is_active = Set(is_active);
        product.updated_at = Set(Utc::now().into());
        let product = product.update(&self.db).await?;

        info!(code = %product.code, is_active, "Product availability changed");
        Ok(product)
    }
}
