use serde::{Deserialize, Serialize};

/// Authenticated caller; `user_id` is the owner key for every workspace operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub user_id: String,
    /// Username for display purposes
    pub username: String,
}

impl User {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}
