pub mod user;
pub mod workspaces;

pub use user::*;
pub use workspaces::*;
