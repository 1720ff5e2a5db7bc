// HTTP routes
pub mod cleanup;
pub mod extract;
pub mod files;
pub mod health;

pub use cleanup::*;
pub use extract::*;
pub use files::*;
pub use health::*;
