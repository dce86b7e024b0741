//! SQLite storage backend.
//!
//! One store type owns the pool and executes the plans the query
//! builder produces. There is no write API; the register is loaded
//! out of band and served read-only.

mod store;

#[cfg(test)]
mod store_test;

pub use store::{DEFAULT_QUERY_TIMEOUT, SqliteStore, TableColumn};
