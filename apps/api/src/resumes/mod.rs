//! Resume files: upload parsing, type checks, and the content-addressed vault
//! that lets rooms keep pointing at a resume across restarts.

use bytes::Bytes;

pub mod upload;
pub mod vault;

pub use upload::UploadForm;
pub use vault::ResumeVault;

/// An uploaded resume held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    /// PDF or a word-processor document.
    pub fn is_supported_type(&self) -> bool {
        self.content_type == "application/pdf"
            || self.content_type == "application/msword"
            || self.content_type.contains("document")
    }
}

/// Picks a content type for an upload: the declared one when it is specific,
/// otherwise magic bytes, otherwise the file extension.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str, data: &[u8]) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => detect_content_type(file_name, data),
    }
}

fn detect_content_type(file_name: &str, data: &[u8]) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if data.starts_with(b"%PDF") {
        return "application/pdf".to_string();
    }
    // docx/odt are zip containers; only the extension tells them apart
    if data.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        return match ext.as_str() {
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "odt" => "application/vnd.oasis.opendocument.text",
            _ => "application/zip",
        }
        .to_string();
    }

    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str) -> ResumeFile {
        ResumeFile {
            file_name: "cv".into(),
            content_type: content_type.into(),
            bytes: Bytes::from_static(b"x"),
        }
    }

    #[test]
    fn test_supported_types() {
        assert!(file("application/pdf").is_supported_type());
        assert!(file("application/msword").is_supported_type());
        assert!(file("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            .is_supported_type());
        assert!(!file("image/png").is_supported_type());
        assert!(!file("application/octet-stream").is_supported_type());
    }

    #[test]
    fn test_declared_type_wins() {
        assert_eq!(
            resolve_content_type(Some("application/msword"), "cv.pdf", b"%PDF-1.7"),
            "application/msword"
        );
    }

    #[test]
    fn test_sniffs_generic_uploads() {
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), "cv.bin", b"%PDF-1.4"),
            "application/pdf"
        );
        assert_eq!(
            resolve_content_type(None, "CV.DOCX", &[0x50, 0x4B, 0x03, 0x04, 0, 0]),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(resolve_content_type(None, "cv.doc", b"\xd0\xcf"), "application/msword");
        assert_eq!(resolve_content_type(None, "photo", b"\x89PNG"), "application/octet-stream");
    }
}
