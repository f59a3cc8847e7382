use std::io;

use thiserror::Error;

/// Closed set of reasons an upload can fail before or after reaching the
/// ingest service.
///
/// Variants raised by local validation keep stable numeric codes so the UI
/// and saved logs stay comparable across versions. `notify` decides whether
/// the user gets a toast: structural conditions the tracker runs into all
/// the time (trash fight, boss still alive) stay silent, genuine failures
/// are surfaced.
#[derive(Debug, Error)]
pub enum UploaderError {
    #[error("An unexpected error occurred while uploading data to the server.")]
    Unexpected(#[source] anyhow::Error),

    #[error("The ingest URL is invalid.")]
    InvalidIngestUrl,

    #[error("No auth token was provided.")]
    NoAuthToken,

    #[error("{}", .0.message)]
    Rejected(IngestRejection),

    #[error("No boss entity was found.")]
    NoBossEntity,

    #[error("The boss is not dead.")]
    BossNotDead,

    #[error("Failed to compress the upload data.")]
    CompressionFailed(#[source] io::Error),

    #[error("Failed to create the upload directory.")]
    CreateUploadDir(#[source] anyhow::Error),

    #[error("The fight has not started.")]
    FightNotStarted,

    #[error("One or more players don't have a gear score.")]
    MissingGearScore,

    #[error("No local player was found.")]
    NoLocalPlayer,
}

impl UploaderError {
    pub fn code(&self) -> u32 {
        match self {
            UploaderError::Unexpected(_) => 0,
            UploaderError::InvalidIngestUrl => 2,
            UploaderError::NoAuthToken => 3,
            UploaderError::Rejected(_) => 4,
            UploaderError::NoBossEntity => 6,
            UploaderError::BossNotDead => 7,
            UploaderError::CompressionFailed(_) => 9,
            UploaderError::CreateUploadDir(_) => 10,
            UploaderError::FightNotStarted => 11,
            UploaderError::MissingGearScore => 12,
            UploaderError::NoLocalPlayer => 13,
        }
    }

    pub fn notify(&self) -> bool {
        match self {
            UploaderError::NoBossEntity
            | UploaderError::BossNotDead
            | UploaderError::CompressionFailed(_)
            | UploaderError::CreateUploadDir(_)
            | UploaderError::FightNotStarted => false,
            UploaderError::Rejected(rejection) => rejection.kind.notify(),
            _ => true,
        }
    }
}

/// Error decoded from an ingest response body.
///
/// The raw `code` and `message` are kept verbatim for logging; `id` is only
/// present on the duplicate-encounter rejection and names the encounter the
/// server already accepted.
#[derive(Debug)]
pub struct IngestRejection {
    pub kind: RejectionKind,
    pub code: i32,
    pub message: String,
    pub id: Option<String>,
}

impl IngestRejection {
    pub fn new(code: i32, message: String, id: Option<String>) -> Self {
        Self {
            kind: RejectionKind::from_code(code),
            code,
            message,
            id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    BadRequest,
    UnsupportedUpload,
    InvalidPayload,
    TooOld,
    QuotaExceeded,
    UploadsDisabled,
    SystemLimit,
    InvalidToken,
    TooManyConcurrent,
    InternalError,
    Unexpected,
}

impl RejectionKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => RejectionKind::BadRequest,
            2 => RejectionKind::UnsupportedUpload,
            3 => RejectionKind::InvalidPayload,
            4 => RejectionKind::TooOld,
            5 => RejectionKind::QuotaExceeded,
            6 => RejectionKind::UploadsDisabled,
            7 => RejectionKind::SystemLimit,
            8 => RejectionKind::InvalidToken,
            9 => RejectionKind::TooManyConcurrent,
            10 => RejectionKind::InternalError,
            _ => RejectionKind::Unexpected,
        }
    }

    /// Duplicate and unsupported encounters are everyday occurrences and
    /// stay silent; everything else is worth a toast.
    pub fn notify(&self) -> bool {
        !matches!(self, RejectionKind::TooOld | RejectionKind::UnsupportedUpload)
    }
}
