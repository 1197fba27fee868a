use async_trait::async_trait;
use uuid::Uuid;
use crate::order::PaymentMethod;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge an order. Returns the processor's transaction identifier.
    async fn pay(
        &self,
        order_id: Uuid,
        user_id: &str,
        method: PaymentMethod,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
