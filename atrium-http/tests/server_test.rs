use atrium_core::store::{ConversationStore, FileStore, InMemoryConversationStore, InMemoryFileStore};
use atrium_core::model::{ConversationFilter, FileProjection};
use atrium_http::seed::SeedData;
use atrium_http::server::{ConfigOverrides, ServerConfig, start_server};
use std::io::Write;
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::timeout;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_server_config_default() {
    let config = ServerConfig::default();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.workspace.default_list_limit, 20);
    assert_eq!(config.workspace.max_conversation_limit, 100);
    assert!(config.api_keys.is_empty());
    assert!(config.seed_file.is_none());
}

#[test]
fn test_server_config_from_file() {
    let file = write_temp(
        r#"{
            "port": 8080,
            "workspace": {"max_list_limit": 50},
            "api_keys": [{"key": "team-key", "user_id": "team"}]
        }"#,
    );

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.workspace.max_list_limit, 50);
    assert_eq!(config.workspace.default_list_limit, 20);
    assert_eq!(config.workspace.image_tokens.max_tokens, 1600);

    let auth = config.auth_store();
    let user = auth.get_user_by_api_key("team-key").unwrap();
    assert_eq!(user.user_id, "team");
    assert_eq!(user.username, "team");
    assert!(auth.get_user_by_api_key("user1-key").is_none());
}

#[test]
fn test_overrides_apply_on_top_of_file() {
    let file = write_temp(r#"{"port": 8080, "log_level": "warn", "seed_file": "from-file.json"}"#);

    let config = ServerConfig::from_file(file.path())
        .unwrap()
        .with_overrides(ConfigOverrides {
            log_level: Some("debug".into()),
            seed_file: Some("from-cli.json".into()),
            ..Default::default()
        });

    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.seed_file.as_deref(), Some(std::path::Path::new("from-cli.json")));

    let untouched = ServerConfig::default().with_overrides(ConfigOverrides::default());
    assert_eq!(untouched.port, 3000);
    assert_eq!(untouched.log_level, "info");
    assert!(untouched.seed_file.is_none());
}

#[test]
fn test_server_config_rejects_malformed_file() {
    let file = write_temp("{ port: ");
    assert!(ServerConfig::from_file(file.path()).is_err());
    assert!(ServerConfig::from_file("/definitely/not/here.json").is_err());
}

#[tokio::test]
async fn test_seed_file_populates_stores() {
    let file = write_temp(
        r#"{
            "files": [
                {"file_id": "f1", "user": "user1", "filename": "a.txt", "type": "text/plain",
                 "bytes": 10, "text": "hello"}
            ],
            "conversations": [
                {"conversationId": "c1", "title": "First", "user": "user1", "workspace_id": "ws",
                 "createdAt": "2025-03-01T12:00:00Z", "updatedAt": "2025-03-01T12:05:00Z"}
            ]
        }"#,
    );

    let seed = SeedData::load(file.path()).unwrap();
    let files = InMemoryFileStore::new();
    let conversations = InMemoryConversationStore::new();
    assert_eq!(seed.apply(&files, &conversations), (1, 1));

    let loaded = files
        .get_files(&["f1".to_string()], FileProjection::WithText)
        .await
        .unwrap();
    assert_eq!(loaded[0].text.as_deref(), Some("hello"));

    let found = conversations
        .find(&ConversationFilter {
            owner: "user1".into(),
            workspace_id: "ws".into(),
            until: None,
            limit: 10,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_server_address_parsing() {
    let config = ServerConfig {
        port: 8081,
        ..Default::default()
    };

    let addr = format!("{}:{}", config.host, config.port)
        .parse::<SocketAddr>()
        .unwrap();

    assert_eq!(addr.ip().to_string(), "127.0.0.1");
    assert_eq!(addr.port(), 8081);
}

#[tokio::test]
#[ignore] // Binds a real port
async fn test_server_startup() {
    let port = find_available_port().expect("Failed to find an available port");
    let config = ServerConfig {
        port,
        ..Default::default()
    };

    let addr = format!("{}:{}", config.host, config.port);
    let server = tokio::spawn(start_server(config));
    tokio::time::sleep(Duration::from_millis(200)).await;

    let client = reqwest::Client::new();
    let response = timeout(
        Duration::from_secs(1),
        client.get(format!("http://{}/health", addr)).send(),
    )
    .await
    .expect("Server did not answer in time")
    .expect("Failed to connect to the server");
    assert!(response.status().is_success());

    let response = client
        .get(format!("http://{}/api/v1/workspaces", addr))
        .header("X-API-Key", "user1-key")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    server.abort();
}

fn find_available_port() -> Option<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    Some(listener.local_addr().ok()?.port())
}
