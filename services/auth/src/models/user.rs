//! Stored credentials

use uuid::Uuid;

/// A registered user as the credential store sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: Uuid,
    pub login: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl CredentialRecord {
    /// A regular, non-admin user with a freshly generated identity
    pub fn new(login: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            login: login.into(),
            password_hash: password_hash.into(),
            is_admin: false,
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
