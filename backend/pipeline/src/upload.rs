use std::path::Path;

/// Random bytes in the storage-name prefix (16 hex digits).
const TOKEN_BYTES: usize = 8;

/// Name used when the client filename has no usable final component.
const FALLBACK_NAME: &str = "upload";

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { filename: filename.into(), bytes: bytes.into() }
    }

    /// Browsers send an empty part with an empty filename when nothing was chosen.
    pub fn is_present(&self) -> bool {
        !self.filename.is_empty()
    }

    /// Final path component of the client filename.
    pub fn display_name(&self) -> String {
        let normalized = self.filename.replace('\\', "/");
        Path::new(&normalized)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string()
    }
}

/// Fresh random hex token.
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; TOKEN_BYTES]>())
}

/// `<token>_<display name>`.
pub fn storage_name(token: &str, file: &UploadedFile) -> String {
    format!("{token}_{}", file.display_name())
}
