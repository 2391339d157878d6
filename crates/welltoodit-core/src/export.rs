//! Export of the current note as a downloadable text file.

use crate::error::{NoteError, Result};
use crate::stats::is_blank;
use chrono::NaiveDateTime;

/// MIME type of exported notes.
pub const EXPORT_MIME: &str = "text/plain;charset=utf-8";

/// A file ready to be handed to the host's download facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Content as text. Always valid UTF-8 since it is built from a `&str`.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Filename for a note exported at local time `at`, truncated to the minute
/// with `:` replaced so the name is filesystem-safe.
pub fn export_filename(prefix: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.txt", prefix, at.format("%Y-%m-%dT%H-%M"))
}

/// Serialize `text` for download.
///
/// Fails with [`NoteError::EmptyDocument`] when the text is empty or
/// whitespace only; no artifact is produced in that case.
pub fn export_document(text: &str, prefix: &str, at: NaiveDateTime) -> Result<ExportArtifact> {
    if is_blank(text) {
        return Err(NoteError::EmptyDocument);
    }

    Ok(ExportArtifact {
        filename: export_filename(prefix, at),
        mime: EXPORT_MIME,
        bytes: text.as_bytes().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_filename_is_minute_precision_and_safe() {
        let name = export_filename("welltoodit_note", at(9, 5, 59));
        assert_eq!(name, "welltoodit_note_2026-03-07T09-05.txt");
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_export_content_is_byte_identical() {
        let artifact = export_document("hello world", "welltoodit_note", at(14, 30, 0)).unwrap();
        assert_eq!(artifact.bytes, b"hello world");
        assert_eq!(artifact.text(), "hello world");
        assert_eq!(artifact.mime, "text/plain;charset=utf-8");
        assert_eq!(artifact.filename, "welltoodit_note_2026-03-07T14-30.txt");
    }

    #[test]
    fn test_export_keeps_surrounding_whitespace() {
        let artifact = export_document("\n  indented\n", "n", at(0, 0, 0)).unwrap();
        assert_eq!(artifact.text(), "\n  indented\n");
    }

    #[test]
    fn test_export_empty_fails() {
        for text in ["", "   ", "\n\t\n", "\u{feff}"] {
            let result = export_document(text, "welltoodit_note", at(0, 0, 0));
            assert!(matches!(result, Err(NoteError::EmptyDocument)), "{:?}", text);
        }
    }
}
