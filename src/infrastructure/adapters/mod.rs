pub mod mysql_catalog_repository;
pub mod mysql_order_repository;
pub mod supabase_storage_adapter;
pub mod xendit_adapter;

pub use mysql_catalog_repository::MySqlCatalogRepository;
pub use mysql_order_repository::MySqlOrderRepository;
pub use supabase_storage_adapter::SupabaseStorageAdapter;
pub use xendit_adapter::XenditAdapter;
