pub mod file_system;
pub mod ingest_api;
pub mod oauth_api;

pub use file_system::*;
pub use ingest_api::*;
pub use oauth_api::*;
