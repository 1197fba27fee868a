use crate::error::OrderError;
use rocket_catalog::{price_order, PricingError};
use rocket_core::{
    Order, OrderIdSource, OrderRepository, OrderStatus, Part, PartCatalog, PartFilter,
    PaymentGateway, PaymentInfo, PaymentMethod, RandomOrderIds, RequestContext, StoreError,
};
use rocket_store::Config;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Knobs the orchestrator takes from configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub catalog_timeout: Duration,
    pub payment_timeout: Duration,
    pub accepted_methods: Vec<PaymentMethod>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OrchestratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            catalog_timeout: config.timeouts.catalog_lookup(),
            payment_timeout: config.timeouts.payment(),
            accepted_methods: config.payment.accepted_methods.clone(),
        }
    }
}

/// Drives orders through Pending -> Paid | Cancelled.
///
/// Pricing comes from the catalog, charging from the payment gateway and
/// persistence from the repository. Pay and cancel on the same order are
/// serialized through a per-order claim, and every transition is committed
/// with a compare-and-swap on `Pending`.
pub struct OrderOrchestrator {
    catalog: Arc<dyn PartCatalog>,
    payments: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
    ids: Arc<dyn OrderIdSource>,
    settings: OrchestratorSettings,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl OrderOrchestrator {
    pub fn new(
        catalog: Arc<dyn PartCatalog>,
        payments: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderRepository>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            catalog,
            payments,
            orders,
            ids: Arc::new(RandomOrderIds),
            settings,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_id_source(mut self, ids: Arc<dyn OrderIdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Price `part_ids` against the catalog and persist a new pending order.
    ///
    /// Repeated ids are charged once per occurrence. Nothing is written when
    /// any id is unknown, the catalog fails, or `ctx` fires first.
    #[tracing::instrument(skip(self, ctx, part_ids), fields(parts = part_ids.len()))]
    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        part_ids: Vec<String>,
    ) -> Result<Order, OrderError> {
        if user_id.trim().is_empty() {
            return Err(OrderError::InvalidInput("user id is required".to_string()));
        }
        if part_ids.is_empty() {
            return Err(OrderError::InvalidInput(
                "at least one part id is required".to_string(),
            ));
        }
        if part_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(OrderError::InvalidInput("part ids must not be blank".to_string()));
        }

        let mut distinct: Vec<&str> = Vec::with_capacity(part_ids.len());
        for id in &part_ids {
            if !distinct.contains(&id.as_str()) {
                distinct.push(id);
            }
        }
        let parts = self.lookup_parts(ctx, &PartFilter::by_ids(distinct)).await?;

        let total = price_order(&part_ids, &parts).map_err(|e| match e {
            PricingError::UnknownParts(ids) => {
                warn!(unknown = ?ids, "order references unknown parts");
                OrderError::UnknownParts(ids)
            }
            other => OrderError::dependency("catalog", other.to_string()),
        })?;

        if ctx.is_cancelled() {
            return Err(OrderError::Cancelled);
        }

        let order = Order::new_pending(self.ids.next_id(), user_id.to_string(), part_ids, total);
        match self.orders.create_order(&order).await {
            Ok(()) => {
                info!(order_id = %order.order_id, total = %order.total_price, "order created");
                Ok(order)
            }
            Err(StoreError::AlreadyExists(id)) => {
                warn!(order_id = %id, "generated order id already taken");
                Err(OrderError::AlreadyExists(id))
            }
            Err(e) => Err(OrderError::Store(e)),
        }
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.orders.get_order(order_id).await.map_err(|e| match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::Store(other),
        })
    }

    /// Charge a pending order and record the payment.
    ///
    /// Once the gateway has been called the outcome is always awaited and,
    /// on success, committed, even if the caller stops waiting. A charge the
    /// store refuses to record comes back as
    /// [`OrderError::PaymentNotRecorded`] with the transaction id.
    #[tracing::instrument(skip(self, ctx, method), fields(method = %method))]
    pub async fn pay_order(
        &self,
        ctx: &RequestContext,
        order_id: Uuid,
        method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        let claim = self.claim(order_id)?;
        let order = self.get_order(order_id).await?;

        if order.status != OrderStatus::Pending {
            warn!(status = %order.status, "payment rejected");
            return Err(OrderError::Conflict {
                order_id,
                status: order.status,
                reason: "only pending orders can be paid",
            });
        }
        if !method.is_valid() {
            return Err(OrderError::InvalidInput(format!(
                "unrecognized payment method {method}"
            )));
        }
        if !self.settings.accepted_methods.contains(&method) {
            return Err(OrderError::InvalidInput(format!(
                "payment method {method} is not accepted"
            )));
        }
        if ctx.is_cancelled() {
            return Err(OrderError::Cancelled);
        }

        let settlement = Settlement {
            payments: Arc::clone(&self.payments),
            orders: Arc::clone(&self.orders),
            timeout: self.settings.payment_timeout,
        };
        let task = tokio::spawn(
            async move {
                let _claim = claim;
                settlement.settle(order, method).await
            }
            .in_current_span(),
        );

        task.await.map_err(|e| {
            OrderError::dependency("payment", format!("settlement task failed: {e}"))
        })?
    }

    /// Move a pending order to `Cancelled`. Paid and cancelled orders are
    /// rejected with [`OrderError::Conflict`].
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        let _claim = self.claim(order_id)?;
        let mut order = self.get_order(order_id).await?;

        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            let reason = match order.status {
                OrderStatus::Paid => "paid orders cannot be cancelled",
                OrderStatus::Cancelled => "order is already cancelled",
                _ => "order is not pending",
            };
            warn!(status = %order.status, "cancellation rejected");
            return Err(OrderError::Conflict {
                order_id,
                status: order.status,
                reason,
            });
        }

        order.mark_cancelled();
        self.orders
            .update_order_if(&order, OrderStatus::Pending)
            .await
            .map_err(|e| match e {
                StoreError::StatusMismatch { actual, .. } => OrderError::Conflict {
                    order_id,
                    status: actual,
                    reason: "order changed while cancelling",
                },
                other => OrderError::Store(other),
            })?;

        info!(user_id = %order.user_id, "order cancelled");
        Ok(order)
    }

    /// Orders owned by `user_id`, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_user_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderError> {
        if user_id.trim().is_empty() {
            return Err(OrderError::InvalidInput("user id is required".to_string()));
        }
        self.orders
            .list_orders_by_owner(user_id)
            .await
            .map_err(OrderError::Store)
    }

    /// Administrative removal. No lifecycle rules apply.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), OrderError> {
        self.orders.delete_order(order_id).await.map_err(|e| match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::Store(other),
        })?;
        info!("order deleted");
        Ok(())
    }

    async fn lookup_parts(
        &self,
        ctx: &RequestContext,
        filter: &PartFilter,
    ) -> Result<Vec<Part>, OrderError> {
        let timeout = self.settings.catalog_timeout;
        let lookup = tokio::time::timeout(timeout, self.catalog.lookup_parts(filter));
        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(OrderError::Cancelled),
            result = lookup => match result {
                Ok(Ok(parts)) => Ok(parts),
                Ok(Err(e)) => {
                    warn!(error = %e, "catalog lookup failed");
                    Err(OrderError::dependency("catalog", e.to_string()))
                }
                Err(_) => {
                    warn!(?timeout, "catalog lookup timed out");
                    let message = format!("no response within {timeout:?}");
                    Err(OrderError::dependency("catalog", message))
                }
            },
        }
    }

    fn claim(&self, order_id: Uuid) -> Result<OrderClaim, OrderError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(order_id) {
            warn!(%order_id, "operation already in progress");
            return Err(OrderError::OperationInProgress(order_id));
        }
        Ok(OrderClaim {
            in_flight: Arc::clone(&self.in_flight),
            order_id,
        })
    }
}

/// Exclusive right to run pay or cancel on one order; released on drop.
struct OrderClaim {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    order_id: Uuid,
}

impl Drop for OrderClaim {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.order_id);
    }
}

/// Charge-then-commit half of `pay_order`, detached from the caller.
struct Settlement {
    payments: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
    timeout: Duration,
}

impl Settlement {
    async fn settle(self, mut order: Order, method: PaymentMethod) -> Result<Order, OrderError> {
        let order_id = order.order_id;
        let charge = self.payments.pay(order_id, &order.user_id, method);
        let transaction_id = match tokio::time::timeout(self.timeout, charge).await {
            Ok(Ok(tx)) if !tx.is_empty() => tx,
            Ok(Ok(_)) => {
                warn!("payment gateway returned an empty transaction id");
                return Err(OrderError::dependency(
                    "payment",
                    "empty transaction id",
                ));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "payment failed");
                return Err(OrderError::dependency("payment", e.to_string()));
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "payment timed out");
                return Err(OrderError::dependency(
                    "payment",
                    format!("no response within {:?}", self.timeout),
                ));
            }
        };

        order.mark_paid(PaymentInfo {
            transaction_id: transaction_id.clone(),
            payment_method: method,
        });
        if let Err(e) = self.orders.update_order_if(&order, OrderStatus::Pending).await {
            error!(%transaction_id, error = %e, "confirmed payment could not be recorded");
            return Err(OrderError::PaymentNotRecorded {
                order_id,
                transaction_id,
                reason: e.to_string(),
            });
        }

        info!(%transaction_id, user_id = %order.user_id, "order paid");
        Ok(order)
    }
}
