#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use rocket_core::{
    Category, Manufacturer, OrderIdSource, Part, PartCatalog, PartFilter, PaymentGateway,
    PaymentMethod,
};
use rocket_order::{OrchestratorSettings, OrderOrchestrator};
use rocket_store::InMemoryOrderRepository;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub fn part(id: &str, price: Decimal) -> Part {
    Part {
        id: id.to_string(),
        name: format!("Part {id}"),
        description: String::new(),
        price,
        stock_quantity: 1,
        category: Category::Engine,
        dimensions: Default::default(),
        manufacturer: Manufacturer {
            name: "Test Works".to_string(),
            country: "USA".to_string(),
            website: None,
        },
        tags: vec![],
        metadata: Default::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Catalog over a fixed part list, optionally slow or failing.
#[derive(Default)]
pub struct FakeCatalog {
    parts: Vec<Part>,
    delay: Option<Duration>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PartCatalog for FakeCatalog {
    async fn lookup_parts(&self, filter: &PartFilter) -> Result<Vec<Part>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err("catalog unavailable".into());
        }
        Ok(self
            .parts
            .iter()
            .filter(|p| filter.ids.is_empty() || filter.ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

/// Gateway that answers with a scripted transaction id and counts charges.
pub struct FakeGateway {
    transaction_id: String,
    delay: Option<Duration>,
    fail: bool,
    pub calls: AtomicUsize,
    pub charged: Mutex<Vec<Uuid>>,
}

impl FakeGateway {
    pub fn returning(transaction_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
            charged: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning("")
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn pay(
        &self,
        order_id: Uuid,
        _user_id: &str,
        _method: PaymentMethod,
    ) -> Result<String, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err("card declined".into());
        }
        self.charged.lock().unwrap().push(order_id);
        Ok(self.transaction_id.clone())
    }
}

/// Hands out the same id every time.
pub struct FixedIds(pub Uuid);

impl OrderIdSource for FixedIds {
    fn next_id(&self) -> Uuid {
        self.0
    }
}

pub struct Harness {
    pub orchestrator: Arc<OrderOrchestrator>,
    pub catalog: Arc<FakeCatalog>,
    pub gateway: Arc<FakeGateway>,
    pub repo: Arc<InMemoryOrderRepository>,
}

pub fn harness(catalog: FakeCatalog, gateway: FakeGateway) -> Harness {
    harness_with(catalog, gateway, OrchestratorSettings::default(), None)
}

pub fn harness_with(
    catalog: FakeCatalog,
    gateway: FakeGateway,
    settings: OrchestratorSettings,
    ids: Option<Arc<dyn OrderIdSource>>,
) -> Harness {
    let catalog = Arc::new(catalog);
    let gateway = Arc::new(gateway);
    let repo = Arc::new(InMemoryOrderRepository::new());
    let mut orchestrator =
        OrderOrchestrator::new(catalog.clone(), gateway.clone(), repo.clone(), settings);
    if let Some(ids) = ids {
        orchestrator = orchestrator.with_id_source(ids);
    }
    Harness {
        orchestrator: Arc::new(orchestrator),
        catalog,
        gateway,
        repo,
    }
}

pub fn standard_parts() -> Vec<Part> {
    vec![
        part("p1", Decimal::new(2000, 2)),
        part("p2", Decimal::new(550, 2)),
    ]
}
