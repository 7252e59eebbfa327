use parking_lot::RwLock;
use std::collections::HashMap;

use crate::record::UserRecord;
use crate::{DirectoryError, UserDirectory};

/// In-memory directory keyed by email. Reads take the lock shared, writes
/// are serialized, last write wins. No transactions.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record, failing if the email is already taken.
    pub fn insert(&self, record: UserRecord) -> Result<(), DirectoryError> {
        let mut users = self.users.write();
        if users.contains_key(&record.email) {
            return Err(DirectoryError::AlreadyExists(record.email));
        }
        users.insert(record.email.clone(), record);
        Ok(())
    }

    /// Replace an existing record, failing if the email is unknown.
    pub fn update(&self, record: UserRecord) -> Result<(), DirectoryError> {
        let mut users = self.users.write();
        if !users.contains_key(&record.email) {
            return Err(DirectoryError::NotFound(record.email));
        }
        users.insert(record.email.clone(), record);
        Ok(())
    }

    /// Remove a record, returning it.
    pub fn remove(&self, email: &str) -> Result<UserRecord, DirectoryError> {
        self.users
            .write()
            .remove(email)
            .ok_or_else(|| DirectoryError::NotFound(email.to_string()))
    }

    /// All records, ordered by email for stable listings.
    pub fn list(&self) -> Vec<UserRecord> {
        let mut records: Vec<_> = self.users.read().values().cloned().collect();
        records.sort_by(|a, b| a.email.cmp(&b.email));
        records
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl UserDirectory for MemoryDirectory {
    fn lookup(&self, email: &str) -> Option<UserRecord> {
        self.users.read().get(email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn record(email: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            email: email.to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let dir = MemoryDirectory::new();
        dir.insert(record("john@ecn.com")).unwrap();

        let found = dir.lookup("john@ecn.com").unwrap();
        assert_eq!(found.email, "john@ecn.com");
        assert!(dir.lookup("nobody@ecn.com").is_none());
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let dir = MemoryDirectory::new();
        dir.insert(record("john@ecn.com")).unwrap();

        let err = dir.insert(record("john@ecn.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists(_)));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_update_unknown_fails() {
        let dir = MemoryDirectory::new();
        let err = dir.update(record("ghost@ecn.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn test_update_replaces_record() {
        let dir = MemoryDirectory::new();
        dir.insert(record("john@ecn.com")).unwrap();

        let mut changed = record("john@ecn.com");
        changed.first_name = Some("Johnny".to_string());
        dir.update(changed).unwrap();

        let found = dir.lookup("john@ecn.com").unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Johnny"));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_remove() {
        let dir = MemoryDirectory::new();
        dir.insert(record("john@ecn.com")).unwrap();

        let removed = dir.remove("john@ecn.com").unwrap();
        assert_eq!(removed.email, "john@ecn.com");
        assert!(dir.is_empty());

        let err = dir.remove("john@ecn.com").unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn test_list_sorted_by_email() {
        let dir = MemoryDirectory::new();
        dir.insert(record("carol@ecn.com")).unwrap();
        dir.insert(record("alice@ecn.com")).unwrap();
        dir.insert(record("bob@ecn.com")).unwrap();

        let emails: Vec<_> = dir.list().into_iter().map(|r| r.email).collect();
        assert_eq!(emails, vec!["alice@ecn.com", "bob@ecn.com", "carol@ecn.com"]);
    }

    #[test]
    fn test_lookup_returns_snapshot() {
        let dir = MemoryDirectory::new();
        dir.insert(record("john@ecn.com")).unwrap();

        let before = dir.lookup("john@ecn.com").unwrap();
        let mut changed = record("john@ecn.com");
        changed.last_name = Some("Changed".to_string());
        dir.update(changed).unwrap();

        // The earlier snapshot is unaffected by the write
        assert_eq!(before.last_name.as_deref(), Some("User"));
    }

    #[test]
    fn test_concurrent_lookups() {
        let dir = Arc::new(MemoryDirectory::new());
        for i in 0..16 {
            dir.insert(record(&format!("user{}@ecn.com", i))).unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    for i in 0..16 {
                        assert!(dir.lookup(&format!("user{}@ecn.com", i)).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
