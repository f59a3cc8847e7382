use super::error::UploaderError;

/// Final classification of an upload attempt.
///
/// This is the only surface callers should branch on for UI notification,
/// never the error variants themselves.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The ingest service accepted the encounter (or already had it) and
    /// returned its id.
    Success { id: String },
    /// The upload was dropped for an expected, structural reason. Logged,
    /// never shown to the user.
    Ignored { reason: UploaderError },
    /// Something actually went wrong and the user should hear about it.
    Error { cause: UploaderError },
}

impl UploadOutcome {
    pub fn from_error(error: UploaderError) -> Self {
        if error.notify() {
            UploadOutcome::Error { cause: error }
        } else {
            UploadOutcome::Ignored { reason: error }
        }
    }

    pub fn from_result(result: Result<String, UploaderError>) -> Self {
        match result {
            Ok(id) => UploadOutcome::Success { id },
            Err(error) => Self::from_error(error),
        }
    }

    pub fn notify_user(&self) -> bool {
        !matches!(self, UploadOutcome::Ignored { .. })
    }
}

#[cfg(test)]
mod tests {
    use crate::uploader::error::IngestRejection;

    use super::*;

    #[test]
    fn should_classify_resource_id_as_success() {
        let outcome = UploadOutcome::from_result(Ok("64f0cde1".into()));

        assert!(matches!(outcome, UploadOutcome::Success { ref id } if id == "64f0cde1"));
        assert!(outcome.notify_user());
    }

    #[test]
    fn should_ignore_silent_errors() {
        let outcome = UploadOutcome::from_error(UploaderError::BossNotDead);

        assert!(matches!(
            outcome,
            UploadOutcome::Ignored {
                reason: UploaderError::BossNotDead
            }
        ));
        assert!(!outcome.notify_user());
    }

    #[test]
    fn should_surface_notifying_errors() {
        let rejection = IngestRejection::new(5, "Upload quota has been exceeded.".into(), None);
        let outcome = UploadOutcome::from_error(UploaderError::Rejected(rejection));

        match outcome {
            UploadOutcome::Error { cause } => {
                assert_eq!(cause.to_string(), "Upload quota has been exceeded.");
                assert!(cause.notify());
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }
}
