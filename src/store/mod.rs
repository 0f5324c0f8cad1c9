//! Content store access: the ContentStore trait and its SQLite implementation

mod repository;
mod schema;
mod sqlite;

pub use repository::{ContentStore, StoreError, StoreResult};
pub use schema::create_schema;
pub use sqlite::{NewPost, SqliteStore};
