use chrono::{DateTime, Utc};
use rocket_shared::filter::{matches_exact, matches_text, FieldFilter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order status in the lifecycle
///
/// `Pending` is the only entry point; `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[serde(rename = "PENDING_PAYMENT")]
    Pending,
    Paid,
    Cancelled,
    /// Any value the wire format does not recognize.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, OrderStatus::Unknown)
    }

    /// Pending → Paid and Pending → Cancelled are the only edges.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment options accepted for orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Sbp,
    CreditCard,
    InvestorMoney,
    BankTransfer,
    #[serde(other)]
    Unknown,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Card,
        PaymentMethod::Sbp,
        PaymentMethod::CreditCard,
        PaymentMethod::InvestorMoney,
        PaymentMethod::BankTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Sbp => "SBP",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::InvestorMoney => "INVESTOR_MONEY",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Unknown => "UNKNOWN",
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, PaymentMethod::Unknown)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse used at the transport edge: `"Card"`, `"CARD"` and
/// `"credit_card"` are all understood, anything else becomes `Unknown`.
impl From<&str> for PaymentMethod {
    fn from(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "card" => PaymentMethod::Card,
            "sbp" => PaymentMethod::Sbp,
            "creditcard" => PaymentMethod::CreditCard,
            "investormoney" => PaymentMethod::InvestorMoney,
            "banktransfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Unknown,
        }
    }
}

/// Proof of a confirmed charge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentInfo {
    pub transaction_id: String,
    pub payment_method: PaymentMethod,
}

/// A customer's purchase of one or more catalog parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: Uuid,
    pub user_id: String,
    /// Repetition expresses quantity.
    pub part_ids: Vec<String>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_info: Option<PaymentInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new_pending(
        order_id: Uuid,
        user_id: String,
        part_ids: Vec<String>,
        total_price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            order_id,
            user_id,
            part_ids,
            total_price,
            status: OrderStatus::Pending,
            payment_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a confirmed payment.
    pub fn mark_paid(&mut self, payment: PaymentInfo) {
        self.payment_info = Some(payment);
        self.status = OrderStatus::Paid;
        self.updated_at = Utc::now();
    }

    pub fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    /// Record-level invariants, checked by stores before every write.
    pub fn validate(&self) -> Result<(), String> {
        if !self.status.is_valid() {
            return Err(format!("invalid order status: {}", self.status));
        }
        if let Some(payment) = &self.payment_info {
            if !payment.payment_method.is_valid() {
                return Err(format!("invalid payment method: {}", payment.payment_method));
            }
        }
        if self.user_id.is_empty() {
            return Err("order has no owner".to_string());
        }
        if self.part_ids.is_empty() {
            return Err("order has no parts".to_string());
        }
        if self.total_price < Decimal::ZERO {
            return Err(format!("negative total price: {}", self.total_price));
        }
        match (self.status, &self.payment_info) {
            (OrderStatus::Paid, None) => Err("paid order without payment info".to_string()),
            (OrderStatus::Pending | OrderStatus::Cancelled, Some(_)) => {
                Err(format!("{} order carries payment info", self.status))
            }
            _ => Ok(()),
        }
    }
}

/// Query over stored orders
///
/// `order_ids` selects candidates up front; the other fields are AND-ed on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub order_ids: Vec<Uuid>,
    pub user_ids: Vec<String>,
    pub statuses: Vec<OrderStatus>,
    pub payment_methods: Vec<PaymentMethod>,
}

impl FieldFilter<Order> for OrderFilter {
    fn is_unconstrained(&self) -> bool {
        self.order_ids.is_empty()
            && self.user_ids.is_empty()
            && self.statuses.is_empty()
            && self.payment_methods.is_empty()
    }

    fn matches(&self, order: &Order) -> bool {
        let method_matches = self.payment_methods.is_empty()
            || order
                .payment_info
                .as_ref()
                .is_some_and(|p| self.payment_methods.contains(&p.payment_method));

        matches_text(&self.user_ids, &order.user_id)
            && matches_exact(&self.statuses, &order.status)
            && method_matches
    }
}
