pub mod chat;
pub mod conversation;
pub mod file;
pub mod workspace;

// Re-export all models for easier imports
pub use chat::*;
pub use conversation::*;
pub use file::*;
pub use workspace::*;

pub type WorkspaceId = String;
pub type UserId = String;
pub type FileId = String;
pub type ConversationId = String;
