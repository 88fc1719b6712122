//! Raw selected files, before validation and cropping.

use bytes::Bytes;

/// A file selected by the user, not yet validated or queued.
///
/// Ephemeral: created on selection, consumed once it enters the crop queue.
#[derive(Clone, Debug)]
pub struct CandidateFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
