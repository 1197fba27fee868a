use rocket_core::PaymentMethod;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { name: default_service_name() }
    }
}

fn default_service_name() -> String { "rocket-order".to_string() }

/// Upper bounds the orchestrator puts on its own remote calls.
#[derive(Debug, Deserialize, Clone)]
pub struct TimeoutConfig {
    #[serde(default = "default_catalog_lookup_ms")]
    pub catalog_lookup_ms: u64,
    #[serde(default = "default_payment_ms")]
    pub payment_ms: u64,
}

impl TimeoutConfig {
    pub fn catalog_lookup(&self) -> Duration {
        Duration::from_millis(self.catalog_lookup_ms)
    }

    pub fn payment(&self) -> Duration {
        Duration::from_millis(self.payment_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            catalog_lookup_ms: default_catalog_lookup_ms(),
            payment_ms: default_payment_ms(),
        }
    }
}

fn default_catalog_lookup_ms() -> u64 { 5_000 }
fn default_payment_ms() -> u64 { 10_000 }

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    #[serde(default = "default_accepted_methods")]
    pub accepted_methods: Vec<PaymentMethod>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self { accepted_methods: default_accepted_methods() }
    }
}

fn default_accepted_methods() -> Vec<PaymentMethod> { PaymentMethod::ALL.to_vec() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `ROCKET__TIMEOUTS__PAYMENT_MS=2000`
            .add_source(
                config::Environment::with_prefix("ROCKET")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("payment.accepted_methods"),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.timeouts.catalog_lookup_ms == 0 || self.timeouts.payment_ms == 0 {
            return Err(config::ConfigError::Message("timeouts must be positive".into()));
        }
        if self.payment.accepted_methods.is_empty() {
            return Err(config::ConfigError::Message(
                "payment.accepted_methods must not be empty".into(),
            ));
        }
        if let Some(bad) = self.payment.accepted_methods.iter().find(|m| !m.is_valid()) {
            return Err(config::ConfigError::Message(format!(
                "unrecognized payment method in payment.accepted_methods: {bad}"
            )));
        }
        Ok(())
    }
}
