//! Item persistence boundary.
//!
//! Single-key point operations plus a full scan; no secondary indexes and no
//! multi-item transactions.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;
pub use r#trait::{ItemStore, StoreError};
