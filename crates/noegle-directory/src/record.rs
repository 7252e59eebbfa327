use chrono::{DateTime, Utc};
use noegle_common::models::user::User;

/// Stored account record. `password_hash` is an argon2id PHC string and
/// never crosses the wire; convert to [`User`] for responses.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        User {
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}
