//! Kernel module - storage infrastructure shared by the domains.

pub mod documents;
pub mod memory_store;
pub mod postgres_store;
pub mod traits;

pub use documents::{
    Document, DocumentQuery, FieldFilter, FilterOp, FilterValue, OrderBy, SortDirection,
    StoreError, WriteResult,
};
pub use memory_store::MemoryDocumentStore;
pub use postgres_store::PostgresDocumentStore;
pub use traits::*;
