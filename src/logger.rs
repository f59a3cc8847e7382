use std::path::Path;

use anyhow::Result;
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle};

/// Starts file logging in the given directory, duplicating warnings and
/// errors to stderr. `RUST_LOG` overrides the default level.
pub fn init(directory: &Path) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(directory).basename("uploader"))
        .duplicate_to_stderr(Duplicate::Warn)
        .start()?;

    Ok(handle)
}
