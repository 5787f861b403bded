pub mod catalog_repository_port;
pub mod object_storage_port;
pub mod order_repository_port;
pub mod payment_provider_port;

pub use catalog_repository_port::{CatalogRepositoryPort, CategoryWithCount, ProductFilter};
pub use object_storage_port::{ObjectStoragePort, SignedUpload};
pub use order_repository_port::{OrderRepositoryPort, OrderSummary};
pub use payment_provider_port::{
    PaymentCallback, PaymentCallbackData, PaymentProviderPort, QrPayment, QrPaymentRequest,
};
