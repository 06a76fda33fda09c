//! SQLite document storage

pub mod schema;
pub mod store;

pub use schema::init_schema;
pub use store::{DocumentStore, StoredDocument};
