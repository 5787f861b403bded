use thiserror::Error;
use uuid::Uuid;

/// Domain-level error taxonomy.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Caller-fixable input error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A category still referenced by products cannot be deleted.
    #[error("Category {0} still has products")]
    CategoryInUse(String),

    /// Order items referencing products missing from the catalog.
    #[error("Unknown product ids: {0:?}")]
    UnknownProducts(Vec<Uuid>),

    #[error("Invalid order state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Callback signature verification failed")]
    SignatureVerificationFailed,

    #[error("Payment provider error: {0}")]
    PaymentProviderError(String),

    #[error("Object storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
