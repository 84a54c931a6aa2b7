//! Preloaded files and conversations.
//!
//! Uploads and chats are produced elsewhere in the application; a seed file
//! stands in for those collaborators when running the server on its own.

use std::path::Path;

use atrium_core::config;
use atrium_core::error::ConfigError;
use atrium_core::model::{ConversationRef, FileRecord};
use atrium_core::store::{InMemoryConversationStore, InMemoryFileStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub files: Vec<FileRecord>,

    #[serde(default)]
    pub conversations: Vec<ConversationRef>,
}

impl SeedData {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        config::from_file(path)
    }

    /// Insert everything into the given stores; returns (files, conversations) counts
    pub fn apply(
        self,
        files: &InMemoryFileStore,
        conversations: &InMemoryConversationStore,
    ) -> (usize, usize) {
        let counts = (self.files.len(), self.conversations.len());
        for file in self.files {
            files.insert(file);
        }
        for conversation in self.conversations {
            conversations.insert(conversation);
        }
        counts
    }
}
