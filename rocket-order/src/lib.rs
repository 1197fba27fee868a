pub mod error;
pub mod orchestrator;
pub mod payment;

pub use error::OrderError;
pub use orchestrator::{OrchestratorSettings, OrderOrchestrator};
pub use payment::PaymentProcessor;
