use crate::auth::AuthStore;
use crate::models::user::User;
use crate::server::{AppState, Backends};
use atrium_core::WorkspaceConfig;
use atrium_core::model::{ConversationRef, FileRecord};
use atrium_core::store::{InMemoryConversationStore, InMemoryFileStore};

/// Test state plus handles on the collaborator stores behind it
pub struct TestContext {
    pub state: AppState,
    pub files: InMemoryFileStore,
    pub conversations: InMemoryConversationStore,
}

impl TestContext {
    pub fn add_file(&self, file: FileRecord) {
        self.files.insert(file);
    }

    pub fn add_conversation(&self, conversation: ConversationRef) {
        self.conversations.insert(conversation);
    }
}

/// Create a test AppState backed by in-memory stores and the default API keys
pub fn create_test_state() -> AppState {
    create_test_context().state
}

/// Like [`create_test_state`], keeping the file and conversation stores reachable
pub fn create_test_context() -> TestContext {
    let files = InMemoryFileStore::new();
    let conversations = InMemoryConversationStore::new();
    let state = AppState::new(
        Backends::in_memory(files.clone(), conversations.clone()),
        &WorkspaceConfig::default(),
        AuthStore::with_defaults(),
    );

    TestContext {
        state,
        files,
        conversations,
    }
}

/// Create a test user with the given API key
pub fn create_test_user_with_api_key(
    app_state: &AppState,
    user_id: &str,
    username: &str,
    api_key: &str,
) {
    let user = User::new(user_id, username);
    app_state.auth_store.add_user(user.clone());
    app_state.auth_store.add_api_key(api_key, user.user_id);
}
