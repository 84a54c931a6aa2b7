//! Token accounting for a workspace's instructions and files.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;

use super::require_workspace;
use crate::config::ImageTokenConfig;
use crate::error::WorkspaceResult;
use crate::model::{FileId, FileProjection, FileRecord, Workspace};
use crate::store::{FileStore, OwnerScope, WorkspaceStore};

/// Counts language-model input tokens for a piece of text.
#[async_trait]
pub trait TokenCounter: Send + Sync {
    async fn count_tokens(&self, text: &str) -> u64;
}

/// Tokenizer-free approximation.
///
/// Splits text into words and punctuation marks; a word costs one token per
/// four characters (at least one), each punctuation mark costs one.
#[derive(Debug, Clone)]
pub struct HeuristicTokenCounter {
    re_piece: Regex,
}

impl Default for HeuristicTokenCounter {
    fn default() -> Self {
        Self {
            re_piece: Regex::new(r"\w+|[^\w\s]").unwrap(),
        }
    }
}

impl HeuristicTokenCounter {
    pub fn count(&self, text: &str) -> u64 {
        self.re_piece
            .find_iter(text)
            .map(|piece| (piece.as_str().chars().count() as u64).div_ceil(4).max(1))
            .sum()
    }
}

#[async_trait]
impl TokenCounter for HeuristicTokenCounter {
    async fn count_tokens(&self, text: &str) -> u64 {
        self.count(text)
    }
}

/// Token estimate for a workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUsage {
    pub total_tokens: u64,
    pub instructions_tokens: u64,
    pub files_tokens: u64,
    /// Only files with a positive estimate
    pub per_file_tokens: BTreeMap<FileId, u64>,
    /// Bytes of files that could not be estimated
    pub unknown_bytes: u64,
}

/// Per-file outcome of estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEstimate {
    Tokens(u64),
    UnknownBytes(u64),
}

/// `min(ceil(width * height / pixels_per_token), max_tokens)`
pub fn estimate_image_tokens(width: u32, height: u32, config: &ImageTokenConfig) -> u64 {
    let pixels = u64::from(width) * u64::from(height);
    pixels
        .div_ceil(config.pixels_per_token.max(1))
        .min(config.max_tokens)
}

#[derive(Clone)]
pub struct TokenAccountant {
    store: Arc<dyn WorkspaceStore>,
    files: Arc<dyn FileStore>,
    counter: Arc<dyn TokenCounter>,
    image: ImageTokenConfig,
}

impl TokenAccountant {
    pub fn new(
        store: Arc<dyn WorkspaceStore>,
        files: Arc<dyn FileStore>,
        counter: Arc<dyn TokenCounter>,
        image: ImageTokenConfig,
    ) -> Self {
        Self {
            store,
            files,
            counter,
            image,
        }
    }

    /// Estimate the context of a workspace owned by `owner`.
    pub async fn context_for(
        &self,
        workspace_id: &str,
        owner: &str,
    ) -> WorkspaceResult<ContextUsage> {
        let workspace =
            require_workspace(self.store.as_ref(), OwnerScope::new(workspace_id, owner)).await?;
        self.compute_context(&workspace).await
    }

    pub async fn compute_context(&self, workspace: &Workspace) -> WorkspaceResult<ContextUsage> {
        let instructions_tokens = match workspace.instructions.as_deref() {
            Some(instructions) if !instructions.is_empty() => {
                self.counter.count_tokens(instructions).await
            }
            _ => 0,
        };

        let mut usage = ContextUsage {
            instructions_tokens,
            ..Default::default()
        };

        if !workspace.files.is_empty() {
            let files = self
                .files
                .get_files(&workspace.files, FileProjection::WithText)
                .await?;
            let estimates = join_all(files.iter().map(|file| self.estimate_file(file))).await;

            for (file, estimate) in files.iter().zip(estimates) {
                match estimate {
                    FileEstimate::Tokens(0) => {}
                    FileEstimate::Tokens(tokens) => {
                        usage.per_file_tokens.insert(file.file_id.clone(), tokens);
                        usage.files_tokens += tokens;
                    }
                    FileEstimate::UnknownBytes(bytes) => usage.unknown_bytes += bytes,
                }
            }
        }

        usage.total_tokens = usage.instructions_tokens + usage.files_tokens;
        Ok(usage)
    }

    /// Text is counted exactly, images by pixel area, anything else by size only.
    pub async fn estimate_file(&self, file: &FileRecord) -> FileEstimate {
        if let Some(text) = file.text.as_deref().filter(|t| !t.is_empty()) {
            return FileEstimate::Tokens(self.counter.count_tokens(text).await);
        }
        match file.dimensions() {
            Some((width, height)) if file.is_image() => {
                FileEstimate::Tokens(estimate_image_tokens(width, height, &self.image))
            }
            _ => FileEstimate::UnknownBytes(file.bytes),
        }
    }
}
