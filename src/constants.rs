use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.snow.xyz";
pub const DEFAULT_INGEST_URL: &str = "https://ingest.snow.xyz";
pub const UPLOADS_DIR: &str = "uploads";
pub const OAUTH_RETRIES: u32 = 5;
pub const OAUTH_RETRY_DELAY: Duration = Duration::from_millis(1000);
