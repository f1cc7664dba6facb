//! Error types for the splitter.
//!
//! Every variant is terminal for a run: the first error stops indexing,
//! resolution or writing and is returned to the caller unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::CollectionKind;

/// Main error type for the splitter library.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// An array entry in a recognized collection is not a JSON object.
    #[error("{collection}[{position}]: node expected, found a non-object value")]
    NotAnElement {
        collection: CollectionKind,
        position: usize,
    },

    /// An element has no string `id` property.
    #[error("{collection}[{position}]: missing string property \"id\"")]
    MissingIdentifier {
        collection: CollectionKind,
        position: usize,
    },

    /// A parent reference names an identifier that is not indexed.
    #[error("{collection} '{id}': {field} refers to unknown id '{target}'")]
    DanglingReference {
        collection: CollectionKind,
        id: String,
        field: &'static str,
        target: String,
    },

    /// Parent references loop back on themselves.
    #[error("{collection} '{id}': parent references form a cycle")]
    CyclicReference { collection: CollectionKind, id: String },

    /// Several fragments derive the same output location.
    #[error("url '{url}' is shared by {count} fragments")]
    DuplicateUrl { url: String, count: usize },

    /// Two planned output files resolve to the same path.
    #[error("output file {} would be written twice", .path.display())]
    DuplicatePath { path: PathBuf },

    /// The input is valid JSON but not an export document.
    #[error("Invalid export document: {0}")]
    InvalidDocument(String),

    /// JSON decoding or encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error outside the writer boundary (e.g. reading the input).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Creating a directory or writing a file failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for splitter operations.
pub type Result<T> = std::result::Result<T, SplitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_reference_display() {
        let err = SplitterError::DanglingReference {
            collection: CollectionKind::Slots,
            id: "21".to_string(),
            field: "parentPageId",
            target: "2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "slotList '21': parentPageId refers to unknown id '2'"
        );
    }

    #[test]
    fn test_not_an_element_display() {
        let err = SplitterError::NotAnElement {
            collection: CollectionKind::Components,
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "componentList[3]: node expected, found a non-object value"
        );
    }

    #[test]
    fn test_duplicate_url_display_with_blank_url() {
        let err = SplitterError::DuplicateUrl {
            url: String::new(),
            count: 2,
        };
        assert_eq!(err.to_string(), "url '' is shared by 2 fragments");
    }

    #[test]
    fn test_duplicate_path_display() {
        let err = SplitterError::DuplicatePath {
            path: PathBuf::from("out/components.json"),
        };
        assert_eq!(
            err.to_string(),
            "output file out/components.json would be written twice"
        );
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;

        let err = SplitterError::Write {
            path: PathBuf::from("out/slots.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("slots.json"));
        assert!(err.source().is_some());
    }
}
