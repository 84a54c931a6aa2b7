pub mod chat;
pub mod test_helpers;
pub mod workspaces;

pub use chat::*;
pub use workspaces::*;
