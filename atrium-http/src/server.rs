use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use atrium_core::WorkspaceConfig;
use atrium_core::error::ConfigError;
use atrium_core::services::{
    ContextAssembler, ConversationQuery, FileMembership, HeuristicTokenCounter, TokenAccountant,
    TokenCounter, WorkspaceService,
};
use atrium_core::store::{
    ConversationStore, FileStore, InMemoryConversationStore, InMemoryFileStore,
    InMemoryWorkspaceStore, WorkspaceStore,
};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{AuthStore, auth_middleware};
use crate::models::user::User;
use crate::routes::create_api_router;
use crate::seed::SeedData;

/// API key entry in the server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiKeyConfig {
    pub key: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Workspace limits and estimation constants
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// API keys; the development keys are used when empty
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,

    /// JSON file with files and conversations to preload
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    /// Largest chat body the context middleware will buffer
    #[serde(default = "default_chat_body_limit")]
    pub chat_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            workspace: WorkspaceConfig::default(),
            api_keys: Vec::new(),
            seed_file: None,
            chat_body_limit: default_chat_body_limit(),
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        atrium_core::config::from_file(path)
    }

    /// Build the auth store from configured keys, or the development defaults
    pub fn auth_store(&self) -> AuthStore {
        if self.api_keys.is_empty() {
            return AuthStore::with_defaults();
        }
        let store = AuthStore::new();
        for entry in &self.api_keys {
            let username = entry.username.as_deref().unwrap_or(&entry.user_id);
            store.add_user(User::new(entry.user_id.as_str(), username));
            store.add_api_key(entry.key.as_str(), entry.user_id.as_str());
        }
        store
    }

    /// Replace every field the overrides set
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if let Some(seed_file) = overrides.seed_file {
            self.seed_file = Some(seed_file);
        }
        self
    }
}

/// Command-line values applied on top of a loaded or default configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub seed_file: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chat_body_limit() -> usize {
    16 * 1024 * 1024
}

/// Storage collaborators behind the workspace components
#[derive(Clone)]
pub struct Backends {
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub files: Arc<dyn FileStore>,
    pub conversations: Arc<dyn ConversationStore>,
    pub token_counter: Arc<dyn TokenCounter>,
}

impl Backends {
    pub fn in_memory(files: InMemoryFileStore, conversations: InMemoryConversationStore) -> Self {
        Self {
            workspaces: Arc::new(InMemoryWorkspaceStore::new()),
            files: Arc::new(files),
            conversations: Arc::new(conversations),
            token_counter: Arc::new(HeuristicTokenCounter::default()),
        }
    }
}

impl Default for Backends {
    fn default() -> Self {
        Self::in_memory(InMemoryFileStore::new(), InMemoryConversationStore::new())
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub workspaces: WorkspaceService,
    pub context: ContextAssembler,
    pub tokens: TokenAccountant,
    pub membership: FileMembership,
    pub conversations: ConversationQuery,
    pub auth_store: AuthStore,
    pub chat_body_limit: usize,
}

impl AppState {
    pub fn new(backends: Backends, config: &WorkspaceConfig, auth_store: AuthStore) -> Self {
        Self {
            workspaces: WorkspaceService::new(
                backends.workspaces.clone(),
                backends.files.clone(),
                config.clone(),
            ),
            context: ContextAssembler::new(backends.workspaces.clone(), backends.files.clone()),
            tokens: TokenAccountant::new(
                backends.workspaces.clone(),
                backends.files.clone(),
                backends.token_counter.clone(),
                config.image_tokens,
            ),
            membership: FileMembership::new(backends.workspaces.clone(), backends.files.clone()),
            conversations: ConversationQuery::new(backends.workspaces, backends.conversations),
            auth_store,
            chat_body_limit: default_chat_body_limit(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Backends::default(),
            &WorkspaceConfig::default(),
            AuthStore::default(),
        )
    }
}

/// Create the full application: routes, state, authentication and tracing
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_api_router(&state)
        .with_state(state.clone())
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(state.auth_store.clone()),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let files = InMemoryFileStore::new();
    let conversations = InMemoryConversationStore::new();

    if let Some(path) = &config.seed_file {
        let seed = SeedData::load(path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?;
        let (file_count, conversation_count) = seed.apply(&files, &conversations);
        info!(
            "Loaded {} files and {} conversations from {}",
            file_count,
            conversation_count,
            path.display()
        );
    }

    let mut state = AppState::new(
        Backends::in_memory(files, conversations),
        &config.workspace,
        config.auth_store(),
    );
    state.chat_body_limit = config.chat_body_limit;

    info!("Initialized workspace services");

    let app = create_app(state);

    let addr = format!("{}:{}", config.host, config.port)
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
