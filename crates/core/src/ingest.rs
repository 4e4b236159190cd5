//! Upload ingestion: turn an uploaded file or pasted text into a
//! [`TransformResult`].

use crate::error::CoreError;
use crate::template::TransformResult;
use crate::transform;

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Message returned when nothing usable was uploaded.
pub const NO_FILE_MESSAGE: &str = "No file uploaded.";

/// What the user handed over.
#[derive(Debug, Clone)]
pub enum IngestSource {
    File { file_name: String, bytes: Vec<u8> },
    Text(String),
}

impl IngestSource {
    fn byte_len(&self) -> usize {
        match self {
            Self::File { bytes, .. } => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }
}

/// Run the transform engine over an upload.
///
/// The original text is carried through verbatim as `sanitized_original`.
/// Empty input is rejected before the engine is invoked.
pub fn ingest(source: IngestSource, max_bytes: usize) -> Result<TransformResult, CoreError> {
    let size = source.byte_len();
    if size == 0 {
        return Err(CoreError::InvalidInput(NO_FILE_MESSAGE.to_string()));
    }
    if size > max_bytes {
        return Err(CoreError::PayloadTooLarge { limit: max_bytes });
    }

    let html = match source {
        IngestSource::Text(text) => text,
        IngestSource::File { file_name, bytes } => String::from_utf8(bytes).map_err(|_| {
            CoreError::InvalidInput(format!("File '{file_name}' is not valid UTF-8 text"))
        })?,
    };

    let output = transform::transform(&html);
    Ok(TransformResult {
        sanitized_original: html,
        transformed_html: output.data,
        errors: output.errors,
    })
}
