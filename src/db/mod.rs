//! Register data layer.
//!
//! Split by responsibility:
//!
//! - `error`: store error types
//! - `filter`: the predicate model tools build from caller arguments
//! - `query`: renders a filter set into a paired result/count plan
//! - `catalog`: the static entity and identifier allow-list
//! - `models`: row types
//! - `sqlite`: the backend that executes plans

pub mod catalog;
mod error;
pub mod filter;
mod models;
pub mod query;
pub mod sqlite;


pub use error::{DbError, DbResult};
pub use filter::{FilterSet, normalize_tag};
pub use models::{Asset, Document, Page, Project};
pub use query::{QueryPlan, build_plan, effective_limit};
pub use sqlite::{DEFAULT_QUERY_TIMEOUT, SqliteStore, TableColumn};
