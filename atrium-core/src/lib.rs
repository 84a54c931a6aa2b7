//! # Atrium core
//!
//! Workspaces group a user's reusable conversation context: a name, optional
//! instructions that become a system-prompt prefix, and a set of attached files.
//!
//! ## Layout
//!
//! - Domain records ([`model`]): workspaces, file records and conversation references
//! - Persistence ([`store`]): owner-scoped store traits and in-memory backends
//! - Components ([`services`]):
//!   - [`services::workspaces`]: validated CRUD over the workspace store
//!   - [`services::context`]: context injection for the first message of a chat
//!   - [`services::tokens`]: token accounting for instructions and files
//!   - [`services::files`]: add/remove file references
//!   - [`services::conversations`]: cursor pagination over linked conversations
//!
//! ## Ownership
//!
//! Every store lookup passes through [`store::OwnerScope`]. A record owned by
//! another user is indistinguishable from one that does not exist.

pub mod config;
pub mod error;
pub mod model;
pub mod services;
pub mod store;

// Re-exports
pub use config::WorkspaceConfig;
pub use error::*;
pub use model::*;
