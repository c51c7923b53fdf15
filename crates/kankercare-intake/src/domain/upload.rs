//! Uploaded document descriptors (radiology results, lab scans)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// 10 MiB per file
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata of a file picked by the user. File bytes never enter the
/// pipeline; only the name is forwarded to the sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Check type first, then size
    pub fn validate(&self) -> Result<(), FileRejection> {
        if !ALLOWED_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(FileRejection::UnsupportedType);
        }
        if self.size > MAX_UPLOAD_BYTES {
            return Err(FileRejection::TooLarge);
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    #[error("Format file tidak didukung. Gunakan PDF, JPG, atau PNG")]
    UnsupportedType,

    #[error("Ukuran file terlalu besar. Maksimal 10MB")]
    TooLarge,
}

/// MIME type implied by a file name's extension
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_accepts_allowed_types() {
        for mime in ALLOWED_MIME_TYPES {
            assert_eq!(UploadedFile::new("scan", mime, MB).validate(), Ok(()));
        }
    }

    #[test]
    fn test_rejects_oversize() {
        let file = UploadedFile::new("ct-scan.pdf", "application/pdf", 11 * MB);
        assert_eq!(file.validate(), Err(FileRejection::TooLarge));
        assert_eq!(
            FileRejection::TooLarge.to_string(),
            "Ukuran file terlalu besar. Maksimal 10MB"
        );
    }

    #[test]
    fn test_exact_limit_accepted() {
        let file = UploadedFile::new("a.png", "image/png", MAX_UPLOAD_BYTES);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_type_checked_before_size() {
        let file = UploadedFile::new("notes.docx", "application/msword", 50 * MB);
        assert_eq!(file.validate(), Err(FileRejection::UnsupportedType));
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("Hasil_Lab.PDF"), "application/pdf");
        assert_eq!(guess_mime_type("xray.jpeg"), "image/jpeg");
        assert_eq!(guess_mime_type("foto.png"), "image/png");
        assert_eq!(guess_mime_type("README"), "application/octet-stream");
    }
}
