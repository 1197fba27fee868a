use async_trait::async_trait;
use rocket_core::{PaymentGateway, PaymentMethod};
use uuid::Uuid;

/// In-process payment processor.
///
/// Accepts any recognized method and issues a fresh transaction id. Stands in
/// for the remote payment service when everything runs in one process.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentProcessor;

impl PaymentProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for PaymentProcessor {
    async fn pay(
        &self,
        order_id: Uuid,
        user_id: &str,
        method: PaymentMethod,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        if !method.is_valid() {
            return Err(format!("unsupported payment method {method}").into());
        }

        let transaction_id = Uuid::new_v4().to_string();
        tracing::info!(%order_id, %user_id, %method, %transaction_id, "payment processed");
        Ok(transaction_id)
    }
}
