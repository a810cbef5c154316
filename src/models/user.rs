//! User model
//!
//! Users exist only as the target of internal authorship. There is no login
//! or session handling in this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal staff account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            display_name: self.display_name().to_string(),
        }
    }
}

/// Lightweight handle to a user, carried by content that a user authored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, full_name: &str) -> User {
        User {
            id: "u1".to_string(),
            username: username.to_string(),
            email: String::new(),
            full_name: full_name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user("admin", "Site Admin").display_name(), "Site Admin");
        assert_eq!(user("admin", "").display_name(), "admin");
        assert_eq!(user("admin", "   ").display_name(), "admin");
    }

    #[test]
    fn test_to_ref() {
        let r = user("admin", "Site Admin").to_ref();
        assert_eq!(r.id, "u1");
        assert_eq!(r.display_name, "Site Admin");
    }
}
