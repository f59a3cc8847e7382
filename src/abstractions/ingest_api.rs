use log::{info, warn};
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::uploader::error::{IngestRejection, RejectionKind, UploaderError};

#[cfg(test)]
use mockall::automock;

/// Submits a compressed encounter document to the ingest service.
///
/// The upload is executed exactly once, there is no retry here. Transient
/// network failures are cheap to recover from by re-uploading the saved
/// session, unlike a double-accepted encounter.
#[cfg_attr(test, automock)]
pub trait IngestApi: Send + Sync + 'static {
    async fn upload(
        &self,
        body: Vec<u8>,
        inflated_length: usize,
        token: &str,
        ingest_url: &str,
    ) -> Result<String, UploaderError>;
}

/// Response body of the ingest service. A fresh accept carries only `id`,
/// a rejection carries `code` and `message`, and the duplicate-encounter
/// rejection additionally carries the id of the already-accepted record.
#[derive(Debug, Deserialize)]
struct IngestResponse {
    id: Option<String>,
    code: Option<i32>,
    message: Option<String>,
}

pub struct DefaultIngestApi {
    client: Client,
}

impl IngestApi for DefaultIngestApi {
    async fn upload(
        &self,
        body: Vec<u8>,
        inflated_length: usize,
        token: &str,
        ingest_url: &str,
    ) -> Result<String, UploaderError> {
        let url = format!("{ingest_url}/logs");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_ENCODING, "gzip")
            // The server inflates the body itself and cannot trust the
            // transport layer's decompression for the length.
            .header("X-Inflated-Length", inflated_length.to_string())
            .bearer_auth(token)
            .body(body)
            .send()
            .await
            .map_err(|e| UploaderError::Unexpected(e.into()))?;

        let status = response.status();
        let decoded = response
            .json::<IngestResponse>()
            .await
            .map_err(|e| UploaderError::Unexpected(e.into()))?;

        match decoded.id {
            Some(id) if status.is_success() || status == StatusCode::CONFLICT => {
                info!("uploaded encounter {id}");
                Ok(id)
            }
            id => {
                let rejection = IngestRejection::new(
                    decoded.code.unwrap_or(-1),
                    decoded.message.unwrap_or_default(),
                    id,
                );

                if rejection.kind == RejectionKind::TooOld {
                    if let Some(id) = rejection.id {
                        info!("encounter already uploaded as {id}");
                        return Ok(id);
                    }
                }

                warn!(
                    "upload rejected: code={} message={}",
                    rejection.code, rejection.message
                );
                Err(UploaderError::Rejected(rejection))
            }
        }
    }
}

impl DefaultIngestApi {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}
