pub mod compress;
pub mod document;
pub mod error;
pub mod outcome;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use log::{debug, error};
use uuid::Uuid;

use crate::abstractions::{FileSystem, IngestApi};
use crate::models::{SessionState, UploadSettings};

use compress::compress;
use document::UploadDocument;
use error::UploaderError;
pub use outcome::UploadOutcome;

/// Uploads a session snapshot to the ingest service.
///
/// The snapshot is sanitized and validated, serialized, compressed and
/// submitted with the configured bearer token. Optionally a copy of the
/// compressed payload is kept in the uploads directory. Every failure mode
/// comes back classified as an [`UploadOutcome`], never as a panic or an
/// opaque error.
///
/// Callers must not invoke this concurrently for the same session; there
/// is no internal de-duplication.
pub async fn upload<FS, IA>(
    session: &SessionState,
    settings: &UploadSettings,
    file_system: Arc<FS>,
    ingest_api: Arc<IA>,
) -> UploadOutcome
where
    FS: FileSystem,
    IA: IngestApi,
{
    UploadOutcome::from_result(try_upload(session, settings, file_system, ingest_api).await)
}

async fn try_upload<FS, IA>(
    session: &SessionState,
    settings: &UploadSettings,
    file_system: Arc<FS>,
    ingest_api: Arc<IA>,
) -> Result<String, UploaderError>
where
    FS: FileSystem,
    IA: IngestApi,
{
    if settings.jwt.is_empty() {
        return Err(UploaderError::NoAuthToken);
    }

    if settings.ingest_url.is_empty() {
        return Err(UploaderError::InvalidIngestUrl);
    }

    let document = UploadDocument::from_session(session)?;
    let serialized =
        serde_json::to_vec(&document).map_err(|e| UploaderError::Unexpected(e.into()))?;
    let inflated_length = serialized.len();
    let compressed = compress(&serialized)?;

    if settings.save_copy {
        save_copy(
            file_system,
            settings,
            document.current_boss,
            compressed.clone(),
        )?;
    }

    debug!(
        "uploading encounter for {} to {}",
        document.current_boss, settings.ingest_url
    );

    ingest_api
        .upload(compressed, inflated_length, &settings.jwt, &settings.ingest_url)
        .await
}

/// Keeps a local copy of the compressed payload. The directory is created
/// on demand; the write itself is detached and must never gate the upload.
fn save_copy<FS: FileSystem>(
    file_system: Arc<FS>,
    settings: &UploadSettings,
    boss_id: u64,
    compressed: Vec<u8>,
) -> Result<(), UploaderError> {
    if !file_system.exists(&settings.uploads_directory) {
        file_system
            .create_dir(&settings.uploads_directory)
            .map_err(UploaderError::CreateUploadDir)?;
    }

    let path = settings
        .uploads_directory
        .join(format!("{boss_id}-{}.json.gz", Uuid::new_v4()));

    tokio::task::spawn(async move {
        if let Err(err) = write_copy(&*file_system, &path, &compressed) {
            error!("failed to save copy of upload: {err:?}");
        }
    });

    Ok(())
}

fn write_copy<FS: FileSystem>(file_system: &FS, path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut writer = file_system.get_writer(path)?;
    writer.write_all(data)?;
    Ok(())
}
