use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of an order.
///
/// Status only ever advances `AwaitingPayment -> Processing -> Done`.
/// The transition into `Processing` is driven by payment confirmation
/// (it is the only point where `paid_at` is set); the transition into
/// `Done` is a cashier action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, QR issued, waiting for the customer to pay.
    AwaitingPayment,
    /// Payment confirmed, order being prepared.
    Processing,
    /// Handed over, terminal.
    Done,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::AwaitingPayment => write!(f, "AWAITING_PAYMENT"),
            OrderStatus::Processing => write!(f, "PROCESSING"),
            OrderStatus::Done => write!(f, "DONE"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWAITING_PAYMENT" => Ok(OrderStatus::AwaitingPayment),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "DONE" => Ok(OrderStatus::Done),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Status filter for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusFilter {
    #[default]
    All,
    AwaitingPayment,
    Processing,
    Done,
}

impl OrderStatusFilter {
    /// The concrete status this filter narrows to, if any.
    pub fn as_status(&self) -> Option<OrderStatus> {
        match self {
            OrderStatusFilter::All => None,
            OrderStatusFilter::AwaitingPayment => Some(OrderStatus::AwaitingPayment),
            OrderStatusFilter::Processing => Some(OrderStatus::Processing),
            OrderStatusFilter::Done => Some(OrderStatus::Done),
        }
    }
}

/// Monetary amount in whole rupiah (no fractional unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: i64,
}

impl Money {
    pub const ZERO: Money = Money { amount: 0 };

    pub fn from_rupiah(amount: i64) -> Self {
        Self { amount }
    }

    pub fn as_rupiah(&self) -> i64 {
        self.amount
    }

    /// 10% tax on this amount, rounded half-up to the nearest rupiah.
    pub fn tax_10_percent(&self) -> Money {
        Money {
            amount: (self.amount + 5) / 10,
        }
    }

    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money { amount })
    }

    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money { amount })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp{}", self.amount)
    }
}
