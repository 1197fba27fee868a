mod common;

use async_trait::async_trait;
use common::{standard_parts, FakeCatalog, FakeGateway};
use rocket_core::{
    ErrorKind, Order, OrderFilter, OrderRepository, OrderStatus, PaymentInfo, PaymentMethod,
    RequestContext, StoreError,
};
use rocket_order::{OrchestratorSettings, OrderError, OrderOrchestrator};
use rocket_store::InMemoryOrderRepository;
use std::sync::Arc;
use uuid::Uuid;

/// What happens to the order between the orchestrator's load and its commit.
#[derive(Clone, Copy)]
enum CommitFault {
    /// The record is removed, so the commit finds nothing.
    Vanish,
    /// Another writer marks the order paid first.
    PaidElsewhere,
}

/// In-memory store that interferes with `update_order_if`.
struct FaultyRepository {
    inner: InMemoryOrderRepository,
    fault: CommitFault,
}

#[async_trait]
impl OrderRepository for FaultyRepository {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        self.inner.create_order(order).await
    }

    async fn get_order(&self, id: Uuid) -> Result<Order, StoreError> {
        self.inner.get_order(id).await
    }

    async fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        self.inner.update_order(order).await
    }

    async fn update_order_if(
        &self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<(), StoreError> {
        match self.fault {
            CommitFault::Vanish => {
                self.inner.delete_order(order.order_id).await?;
            }
            CommitFault::PaidElsewhere => {
                let mut paid = self.inner.get_order(order.order_id).await?;
                paid.mark_paid(PaymentInfo {
                    transaction_id: "tx-elsewhere".to_string(),
                    payment_method: PaymentMethod::Sbp,
                });
                self.inner.update_order(&paid).await?;
            }
        }
        self.inner.update_order_if(order, expected).await
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_order(id).await
    }

    async fn list_orders_by_owner(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        self.inner.list_orders_by_owner(user_id).await
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        self.inner.list_orders(filter).await
    }
}

async fn pending_order(
    fault: CommitFault,
    gateway: FakeGateway,
) -> (OrderOrchestrator, Arc<FaultyRepository>, Order) {
    let repo = Arc::new(FaultyRepository {
        inner: InMemoryOrderRepository::new(),
        fault,
    });
    let orchestrator = OrderOrchestrator::new(
        Arc::new(FakeCatalog::with_parts(standard_parts())),
        Arc::new(gateway),
        repo.clone(),
        OrchestratorSettings::default(),
    );
    let order = orchestrator
        .create_order(&RequestContext::background(), "u1", vec!["p1".to_string()])
        .await
        .unwrap();
    (orchestrator, repo, order)
}

#[tokio::test]
async fn test_charge_lost_by_store_keeps_transaction_id() {
    let (orchestrator, _, order) =
        pending_order(CommitFault::Vanish, FakeGateway::returning("tx-9")).await;

    let err = orchestrator
        .pay_order(&RequestContext::background(), order.order_id, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Dependency);
    match err {
        OrderError::PaymentNotRecorded { order_id, transaction_id, .. } => {
            assert_eq!(order_id, order.order_id);
            assert_eq!(transaction_id, "tx-9");
        }
        other => panic!("expected PaymentNotRecorded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_charge_racing_outside_writer_keeps_transaction_id() {
    let (orchestrator, repo, order) =
        pending_order(CommitFault::PaidElsewhere, FakeGateway::returning("tx-10")).await;

    let err = orchestrator
        .pay_order(&RequestContext::background(), order.order_id, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Dependency);
    assert!(matches!(
        &err,
        OrderError::PaymentNotRecorded { transaction_id, .. } if transaction_id == "tx-10"
    ));
    let stored = repo.get_order(order.order_id).await.unwrap();
    assert_eq!(stored.payment_info.unwrap().transaction_id, "tx-elsewhere");
}

#[tokio::test]
async fn test_cancel_when_order_vanishes_is_dependency() {
    let (orchestrator, _, order) =
        pending_order(CommitFault::Vanish, FakeGateway::returning("tx")).await;

    let err = orchestrator.cancel_order(order.order_id).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Dependency);
    assert!(matches!(err, OrderError::Store(StoreError::NotFound(id)) if id == order.order_id));
}

#[tokio::test]
async fn test_cancel_after_outside_payment_conflicts() {
    let (orchestrator, repo, order) =
        pending_order(CommitFault::PaidElsewhere, FakeGateway::returning("tx")).await;

    let err = orchestrator.cancel_order(order.order_id).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, OrderError::Conflict { status: OrderStatus::Paid, .. }));
    assert_eq!(repo.get_order(order.order_id).await.unwrap().status, OrderStatus::Paid);
}

#[tokio::test]
async fn test_empty_transaction_id_is_dependency() {
    let (orchestrator, repo, order) =
        pending_order(CommitFault::Vanish, FakeGateway::returning("")).await;

    let err = orchestrator
        .pay_order(&RequestContext::background(), order.order_id, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Dependency { service: "payment", .. }));
    let stored = repo.get_order(order.order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert!(stored.payment_info.is_none());
}
