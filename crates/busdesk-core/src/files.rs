use std::path::Path;

use crate::CoreError;

/// A file picked by the user and held in memory until the draft is submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PendingFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, inferring its content type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileIo`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| CoreError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("csv") => "text/csv",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_content_type_from_extension() {
        assert_eq!(PendingFile::new("front.JPG", vec![1]).content_type, "image/jpeg");
        assert_eq!(PendingFile::new("buses.xlsx", vec![]).extension().as_deref(), Some("xlsx"));
        assert_eq!(
            PendingFile::new("notes", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn image_detection() {
        assert!(PendingFile::new("a.png", vec![0; 4]).is_image());
        assert!(!PendingFile::new("a.csv", vec![0; 4]).is_image());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = PendingFile::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, CoreError::FileIo { .. }));
    }
}
