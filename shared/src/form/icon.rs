//! App icon uploads
//!
//! Only SVG icons are accepted. They are shipped to the backend as a
//! base64 data URL rather than as a multipart upload.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::error::ErrorCode;

/// Upload size limit (10 MiB)
pub const MAX_ICON_SIZE: u64 = 10 * 1024 * 1024;

/// The only accepted content type
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Icon rejection reasons, worded as field helper texts
#[derive(Debug, Error)]
pub enum IconError {
    #[error("Only SVG files are allowed")]
    UnsupportedFormat,

    #[error("File size must not exceed 10MB")]
    TooLarge { size: u64 },

    #[error("File is empty")]
    Empty,

    #[error("Failed to read icon file")]
    Read(#[source] std::io::Error),
}

impl IconError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedFormat => ErrorCode::UnsupportedFileFormat,
            Self::TooLarge { .. } => ErrorCode::FileTooLarge,
            Self::Empty => ErrorCode::EmptyFile,
            Self::Read(_) => ErrorCode::FileReadFailed,
        }
    }
}

/// Where the icon bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A freshly selected icon file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpload {
    pub file_name: String,
    pub content_type: String,
    pub source: IconSource,
}

impl IconUpload {
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            source: IconSource::Bytes(bytes),
        }
    }

    /// Reference a file on disk; the content type is guessed from the extension
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            source: IconSource::Path(path.to_path_buf()),
        }
    }

    /// Both the content type and the extension must say SVG
    pub fn is_svg(&self) -> bool {
        self.content_type == SVG_CONTENT_TYPE && self.file_name.to_lowercase().ends_with(".svg")
    }

    fn size(&self) -> Result<u64, IconError> {
        match &self.source {
            IconSource::Bytes(bytes) => Ok(bytes.len() as u64),
            IconSource::Path(path) => fs::metadata(path).map(|m| m.len()).map_err(IconError::Read),
        }
    }

    /// Type and size checks, without reading the file contents
    pub fn validate(&self) -> Result<(), IconError> {
        if !self.is_svg() {
            return Err(IconError::UnsupportedFormat);
        }
        let size = self.size()?;
        if size > MAX_ICON_SIZE {
            return Err(IconError::TooLarge { size });
        }
        if size == 0 {
            return Err(IconError::Empty);
        }
        Ok(())
    }

    fn read(&self) -> Result<Cow<'_, [u8]>, IconError> {
        match &self.source {
            IconSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            IconSource::Path(path) => fs::read(path).map(Cow::Owned).map_err(IconError::Read),
        }
    }

    /// Validate and encode as `data:image/svg+xml;base64,...`
    pub fn to_data_url(&self) -> Result<String, IconError> {
        self.validate()?;
        let bytes = self.read()?;
        // The file may have grown between the metadata check and the read
        if bytes.len() as u64 > MAX_ICON_SIZE {
            return Err(IconError::TooLarge { size: bytes.len() as u64 });
        }
        Ok(format!(
            "data:{};base64,{}",
            SVG_CONTENT_TYPE,
            STANDARD.encode(bytes.as_ref())
        ))
    }
}

/// Icon state of an app form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IconField {
    /// No icon selected
    #[default]
    Empty,
    /// Keep the icon the listing already has
    Unchanged,
    /// Replace with a newly selected file
    Upload(IconUpload),
}

impl IconField {
    /// Validate a pending upload; `Empty` and `Unchanged` always pass
    pub fn validate(&self) -> Result<(), IconError> {
        match self {
            Self::Upload(upload) => upload.validate(),
            Self::Empty | Self::Unchanged => Ok(()),
        }
    }
}
