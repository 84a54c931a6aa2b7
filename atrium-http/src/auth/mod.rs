pub mod extractor;
pub mod middleware;
pub mod store;

pub use extractor::*;
pub use middleware::*;
pub use store::*;
