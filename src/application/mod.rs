pub mod cart_store;
pub mod catalog_service;
pub mod dto;
pub mod order_service;
pub mod report_service;

#[cfg(test)]
pub mod test_support;

pub use cart_store::CartStore;
pub use catalog_service::CatalogService;
pub use dto::*;
pub use order_service::OrderService;
pub use report_service::ReportService;
