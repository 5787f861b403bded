pub mod adapters;
pub mod config;

pub use adapters::{
    MySqlCatalogRepository, MySqlOrderRepository, SupabaseStorageAdapter, XenditAdapter,
};
pub use config::{AuthConfig, SupabaseConfig, XenditConfig};
