use chrono::Utc;
use rocket_catalog::{InventoryCatalog, InventoryRepository};
use rocket_core::{Category, Manufacturer, Part, PaymentMethod, RequestContext};
use rocket_order::{OrchestratorSettings, OrderOrchestrator, PaymentProcessor};
use rocket_store::InMemoryOrderRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rocket_order=debug,rocket_store=debug,rocket_catalog=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rocket_store::Config::load()?;
    tracing::info!(
        catalog_timeout_ms = config.timeouts.catalog_lookup_ms,
        payment_timeout_ms = config.timeouts.payment_ms,
        "Starting {}",
        config.service.name
    );

    let inventory = Arc::new(InventoryRepository::seeded(demo_parts())?);
    let orchestrator = OrderOrchestrator::new(
        Arc::new(InventoryCatalog::new(inventory)),
        Arc::new(PaymentProcessor::new()),
        Arc::new(InMemoryOrderRepository::new()),
        OrchestratorSettings::from(&config),
    );

    let ctx = RequestContext::background().with_timeout(Duration::from_secs(30));
    let order = orchestrator
        .create_order(
            &ctx,
            "demo-user",
            vec!["main-engine".into(), "porthole".into(), "porthole".into()],
        )
        .await?;

    let paid = orchestrator.pay_order(&ctx, order.order_id, PaymentMethod::Card).await?;
    println!("{}", serde_json::to_string_pretty(&paid)?);

    if let Err(e) = orchestrator.cancel_order(paid.order_id).await {
        tracing::info!(kind = %e.kind(), "cancel rejected: {e}");
    }

    let history = orchestrator.list_user_orders("demo-user").await?;
    tracing::info!(orders = history.len(), "demo finished");
    Ok(())
}

fn demo_parts() -> Vec<Part> {
    let part = |id: &str, name: &str, cents: i64, category: Category, country: &str| Part {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::new(cents, 2),
        stock_quantity: 10,
        category,
        dimensions: Default::default(),
        manufacturer: Manufacturer {
            name: "Orbital Works".to_string(),
            country: country.to_string(),
            website: None,
        },
        tags: vec![],
        metadata: Default::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    vec![
        part("main-engine", "Main Engine", 1_250_000, Category::Engine, "Germany"),
        part("fuel-tank", "Fuel Tank", 480_050, Category::Fuel, "USA"),
        part("porthole", "Porthole", 12_999, Category::Porthole, "Japan"),
        part("wing", "Stabilizer Wing", 99_900, Category::Wing, "France"),
    ]
}
