pub mod session_builder;
pub mod templates;

pub use session_builder::*;
pub use templates::*;
