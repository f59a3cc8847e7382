use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::error::UploaderError;

/// Gzip-compresses a serialized document before transport.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, UploaderError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(UploaderError::CompressionFailed)?;
    encoder.finish().map_err(UploaderError::CompressionFailed)
}

/// Inverse of [`compress`], used by tooling that reads saved upload copies.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, UploaderError> {
    let mut decoder = GzDecoder::new(data);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(UploaderError::CompressionFailed)?;
    Ok(inflated)
}
