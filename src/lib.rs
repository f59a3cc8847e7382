#[cfg(test)]
mod test_utils;

pub mod abstractions;
pub mod constants;
pub mod credential_store;
pub mod logger;
pub mod models;
pub mod uploader;

pub use uploader::UploadOutcome;
pub use uploader::upload;
