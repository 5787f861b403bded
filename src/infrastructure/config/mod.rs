pub mod auth_config;
pub mod supabase_config;
pub mod xendit_config;

pub use auth_config::AuthConfig;
pub use supabase_config::SupabaseConfig;
pub use xendit_config::XenditConfig;
