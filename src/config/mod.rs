/// Database configuration and connection management
pub mod database;

/// Store configuration (seeded event types, reference policy) from config.toml
pub mod store;

pub use store::{ReferencePolicy, StoreConfig};
