use crate::domain::entities::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event trait.
pub trait DomainEvent {
    fn event_type(&self) -> &'static str;
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// An order was created and a QR payment request issued for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub grand_total: i64,
    pub item_count: usize,
}

impl DomainEvent for OrderCreated {
    fn event_type(&self) -> &'static str {
        "OrderCreated"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl OrderCreated {
    pub fn from_order(order: &Order, item_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id: order.id,
            grand_total: order.grand_total.as_rupiah(),
            item_count,
        }
    }
}

/// Payment for an order was confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaid {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub grand_total: i64,
    pub paid_at: Option<DateTime<Utc>>,
}

impl DomainEvent for OrderPaid {
    fn event_type(&self) -> &'static str {
        "OrderPaid"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl OrderPaid {
    pub fn from_order(order: &Order) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id: order.id,
            grand_total: order.grand_total.as_rupiah(),
            paid_at: order.paid_at,
        }
    }
}

/// An order reached its terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub grand_total: i64,
}

impl DomainEvent for OrderCompleted {
    fn event_type(&self) -> &'static str {
        "OrderCompleted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl OrderCompleted {
    pub fn from_order(order: &Order) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id: order.id,
            grand_total: order.grand_total.as_rupiah(),
        }
    }
}
