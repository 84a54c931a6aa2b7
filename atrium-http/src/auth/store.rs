use crate::models::user::User;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store for API keys and users
#[derive(Clone, Debug)]
pub struct AuthStore {
    /// Maps API keys to user IDs
    api_keys: Arc<DashMap<String, String>>,
    /// Maps user IDs to User objects
    users: Arc<DashMap<String, User>>,
}

impl AuthStore {
    /// Create a new empty auth store
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(DashMap::new()),
            users: Arc::new(DashMap::new()),
        }
    }

    /// Development users `user1` and `user2` with keys `user1-key` and `user2-key`
    pub fn with_defaults() -> Self {
        let store = Self::new();

        let user1 = User::new("user1", "Regular User 1");
        let user2 = User::new("user2", "Regular User 2");

        store.add_user(user1.clone());
        store.add_user(user2.clone());

        store.add_api_key("user1-key", user1.user_id);
        store.add_api_key("user2-key", user2.user_id);

        store
    }

    pub fn add_user(&self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.clone())
    }

    pub fn add_api_key(&self, api_key: impl Into<String>, user_id: impl Into<String>) {
        self.api_keys.insert(api_key.into(), user_id.into());
    }

    /// Resolve an API key; keys pointing at a removed user resolve to nothing
    pub fn get_user_by_api_key(&self, api_key: &str) -> Option<User> {
        let user_id = self.api_keys.get(api_key)?;
        self.get_user(&user_id)
    }

    /// Remove a user and all associated API keys
    pub fn remove_user(&self, user_id: &str) {
        self.users.remove(user_id);
        self.api_keys.retain(|_, owner| owner != user_id);
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
