use std::fmt;

use bytes::Bytes;

/// Current value of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    File(FileHandle),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            FieldValue::File(f) => Some(f),
            _ => None,
        }
    }
}

/// A file the applicant selected for a file field. Held in memory until submission.
#[derive(Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileHandle {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `"<name> (<size>)"`, the text shown next to a file input and sent to the relay.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, format_file_size(self.size()))
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with 1024-based units and at most two decimals,
/// trailing zeros dropped: `1536` → `"1.5 KB"`.
pub fn format_file_size(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
