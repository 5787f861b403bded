use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced collection of line items submitted for payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,

    /// Sum of line-item prices at creation time.
    pub sub_total: Money,

    /// Fixed 10% of the subtotal, rounded to the nearest rupiah.
    pub tax: Money,

    /// Subtotal plus tax; the amount requested from the payment provider.
    pub grand_total: Money,

    pub status: OrderStatus,

    /// Provider transaction id, set once the QR request is issued.
    pub external_transaction_id: Option<String>,

    /// Provider payment-method id backing the QR code.
    pub payment_method_id: Option<String>,

    /// Set exactly when the order enters `Processing`.
    pub paid_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order awaiting payment. Tax and grand total are
    /// derived from the subtotal here and never recomputed.
    pub fn new(sub_total: Money) -> DomainResult<Self> {
        if sub_total.as_rupiah() <= 0 {
            return Err(DomainError::InvalidAmount(
                "Order subtotal must be greater than 0".to_string(),
            ));
        }

        let tax = sub_total.tax_10_percent();
        let grand_total = sub_total.checked_add(tax).ok_or_else(|| {
            DomainError::InvalidAmount("Order total overflows".to_string())
        })?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            sub_total,
            tax,
            grand_total,
            status: OrderStatus::AwaitingPayment,
            external_transaction_id: None,
            payment_method_id: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Records the provider linkage returned by the QR payment request.
    pub fn attach_payment(&mut self, transaction_id: String, payment_method_id: String) {
        self.external_transaction_id = Some(transaction_id);
        self.payment_method_id = Some(payment_method_id);
        self.updated_at = Utc::now();
    }

    /// Advances `AwaitingPayment -> Processing` and stamps `paid_at`.
    pub fn mark_paid(&mut self) -> DomainResult<()> {
        if self.status != OrderStatus::AwaitingPayment {
            return Err(DomainError::InvalidState {
                expected: OrderStatus::AwaitingPayment.to_string(),
                actual: self.status.to_string(),
            });
        }

        let now = Utc::now();
        self.status = OrderStatus::Processing;
        self.paid_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Advances `Processing -> Done`. Valid only on a paid, processing
    /// order; the state is untouched on failure.
    pub fn finish(&mut self) -> DomainResult<()> {
        if self.paid_at.is_none() {
            return Err(DomainError::ValidationError(
                "Order has not been paid yet".to_string(),
            ));
        }

        if self.status != OrderStatus::Processing {
            return Err(DomainError::InvalidState {
                expected: OrderStatus::Processing.to_string(),
                actual: self.status.to_string(),
            });
        }

        self.status = OrderStatus::Done;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }
}

/// A single order line: immutable price snapshot of a product at the
/// time the order was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,

    /// Unit price at order time, decoupled from the live product price.
    pub price: Money,

    pub quantity: i32,
}

impl OrderItem {
    pub fn new(order_id: Uuid, product_id: Uuid, price: Money, quantity: i32) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::ValidationError(
                "Order item quantity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            price,
            quantity,
        })
    }

    /// Line total (unit price times quantity).
    pub fn total(&self) -> DomainResult<Money> {
        self.price.checked_mul(i64::from(self.quantity)).ok_or_else(|| {
            DomainError::InvalidAmount("Order item total overflows".to_string())
        })
    }
}

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 50;
const PRICE_MIN: i64 = 1000;

fn validate_name(kind: &str, name: &str) -> DomainResult<()> {
    let len = name.chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        return Err(DomainError::ValidationError(format!(
            "{kind} name must be {NAME_MIN}-{NAME_MAX} characters"
        )));
    }
    Ok(())
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Money,
    pub category_id: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        price: Money,
        category_id: Uuid,
        image_url: Option<String>,
    ) -> DomainResult<Self> {
        validate_name("Product", &name)?;
        Self::validate_price(price)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            price,
            category_id,
            image_url,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an edit, re-running the creation validations.
    pub fn update(
        &mut self,
        name: String,
        price: Money,
        category_id: Uuid,
        image_url: Option<String>,
    ) -> DomainResult<()> {
        validate_name("Product", &name)?;
        Self::validate_price(price)?;

        self.name = name;
        self.price = price;
        self.category_id = category_id;
        self.image_url = image_url;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn validate_price(price: Money) -> DomainResult<()> {
        if price.as_rupiah() < PRICE_MIN {
            return Err(DomainError::InvalidAmount(format!(
                "Product price must be at least {PRICE_MIN}"
            )));
        }
        Ok(())
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String) -> DomainResult<Self> {
        validate_name("Category", &name)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: String) -> DomainResult<()> {
        validate_name("Category", &name)?;
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }
}
