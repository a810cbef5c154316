//! Authorship of editorial content
//!
//! A post or event is written either by an internal user or by a guest
//! identified only by free-text fields. The two never coexist on one record.

use serde::{Deserialize, Serialize};

use super::UserRef;

/// Display name for posts without any author information
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Display name for events without any author information
pub const ORGANIZATION_AUTHOR: &str = "GCADR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    /// Written by a staff account
    Internal(UserRef),
    /// Written by a guest
    External {
        name: String,
        #[serde(default)]
        bio: String,
        #[serde(default)]
        email: String,
    },
}

/// Column values used to persist an [`Author`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorColumns<'a> {
    pub user_id: Option<&'a str>,
    pub name: &'a str,
    pub bio: &'a str,
    pub email: &'a str,
}

impl Author {
    pub fn external(name: impl Into<String>) -> Self {
        Author::External {
            name: name.into(),
            bio: String::new(),
            email: String::new(),
        }
    }

    /// Name to show readers; `fallback` is used when a guest left the name blank.
    pub fn display_name(&self, fallback: &str) -> String {
        match self {
            Author::Internal(user) => user.display_name.clone(),
            Author::External { name, .. } if !name.trim().is_empty() => name.clone(),
            Author::External { .. } => fallback.to_string(),
        }
    }

    /// Split into storage columns. Internal authors leave the guest columns
    /// blank and guests leave the user column null.
    pub fn columns(&self) -> AuthorColumns<'_> {
        match self {
            Author::Internal(user) => AuthorColumns {
                user_id: Some(&user.id),
                name: "",
                bio: "",
                email: "",
            },
            Author::External { name, bio, email } => AuthorColumns {
                user_id: None,
                name,
                bio,
                email,
            },
        }
    }

    /// Rebuild from storage columns. `user` is the joined user row, if any.
    pub fn from_columns(user: Option<UserRef>, name: String, bio: String, email: String) -> Self {
        match user {
            Some(user) => Author::Internal(user),
            None => Author::External { name, bio, email },
        }
    }
}
