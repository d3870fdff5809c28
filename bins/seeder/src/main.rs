//! Database seeder for the heart product catalog.
//!
//! Upserts the standard top-up packages so local environments can place
//! orders right after migrating. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use tracing::info;

use hearts_db::repositories::{ProductRepository, UpsertProductInput};

/// `(code, name, hearts, bonus_hearts, price, sort_order)`
const PACKAGES: [(&str, &str, i64, i64, i64, i32); 3] = [
    ("HEART_10", "10 Hearts", 10, 0, 10_000, 1),
    ("HEART_30", "30 Hearts + 3 bonus", 30, 3, 29_000, 2),
    ("HEART_50", "50 Hearts + 10 bonus", 50, 10, 45_000, 3),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearts=info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    info!("Connecting to database");
    let db = hearts_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let products = ProductRepository::new(db);
    for (code, name, hearts, bonus_hearts, price, sort_order) in PACKAGES {
        products
            .upsert_product(UpsertProductInput {
                code: code.to_string(),
                name: name.to_string(),
                description: None,
                hearts,
                bonus_hearts,
                price,
                sort_order,
                is_active: true,
            })
            .await
            .with_context(|| format!("failed to seed product {code}"))?;
        info!(code, hearts, bonus_hearts, price, "Seeded product");
    }

    info!(count = PACKAGES.len(), "Seeding complete");
    Ok(())
}
