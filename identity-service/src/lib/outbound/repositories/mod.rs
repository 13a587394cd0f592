pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;
