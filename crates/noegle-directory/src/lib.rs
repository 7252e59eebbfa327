pub mod memory;
pub mod record;

// Re-export commonly used items
pub use memory::MemoryDirectory;
pub use record::UserRecord;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user '{0}' already exists")]
    AlreadyExists(String),
    #[error("user '{0}' not found")]
    NotFound(String),
}

/// Read side of the directory. The session core consumes only this;
/// implementations hand back an owned snapshot of the record.
pub trait UserDirectory: Send + Sync {
    fn lookup(&self, email: &str) -> Option<UserRecord>;
}
