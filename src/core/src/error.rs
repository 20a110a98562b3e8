use std::path::PathBuf;

use thiserror::Error;

/// Stacks Tag error types
#[derive(Error, Debug)]
pub enum TagError {
    /// External process exited with a non-zero status
    #[error("Command failed: `{command}` exited with {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Expected marker or format missing in command output
    #[error("Parse error in {tagger}: {message}")]
    ParseError { tagger: String, message: String },

    /// A tagger failed while tagging an image
    #[error("Failed to tag {image}: {source}")]
    Tagging {
        image: String,
        #[source]
        source: Box<TagError>,
    },

    /// Package is not installed in the container
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Image name is not in the hierarchy table
    #[error("Unknown image: {0}")]
    UnknownImage(String),

    /// Hierarchy table is malformed (unknown parent, cycle)
    #[error("Image hierarchy error: {0}")]
    HierarchyError(String),

    /// Per-architecture tags file absent at merge time
    #[error("Tags file not found: {}", path.display())]
    MissingTagsFile { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// One or more packages failed to import inside the container
    #[error("Following packages are not importable: {}", .0.join(", "))]
    ImportCheckFailed(Vec<String>),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TagError {
    /// Build a `ParseError` for the named tagger or parser.
    pub fn parse(tagger: impl Into<String>, message: impl Into<String>) -> Self {
        TagError::ParseError {
            tagger: tagger.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TagError {
    fn from(err: serde_json::Error) -> Self {
        TagError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for TagError {
    fn from(err: serde_yaml::Error) -> Self {
        TagError::SerializationError(err.to_string())
    }
}

/// Result type alias for tagging operations
pub type Result<T> = std::result::Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let error = TagError::CommandFailed {
            command: "docker pull quay.io/jupyter/base-notebook:x86_64-latest".to_string(),
            exit_code: 1,
            stderr: "manifest unknown".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Command failed: `docker pull quay.io/jupyter/base-notebook:x86_64-latest` exited with 1: manifest unknown"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = TagError::parse("SparkVersionTagger", "version banner not found");
        assert_eq!(
            error.to_string(),
            "Parse error in SparkVersionTagger: version banner not found"
        );
    }

    #[test]
    fn test_tagging_error_names_image() {
        let error = TagError::Tagging {
            image: "quay.io/jupyter/r-notebook".to_string(),
            source: Box::new(TagError::parse("RVersionTagger", "expected at least 3 fields")),
        };
        assert_eq!(
            error.to_string(),
            "Failed to tag quay.io/jupyter/r-notebook: Parse error in RVersionTagger: expected at least 3 fields"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_unknown_image_display() {
        let error = TagError::UnknownImage("nonexistent-notebook".to_string());
        assert_eq!(error.to_string(), "Unknown image: nonexistent-notebook");
    }

    #[test]
    fn test_missing_tags_file_display() {
        let error = TagError::MissingTagsFile {
            path: PathBuf::from("/tmp/tags/aarch64-base-notebook.txt"),
        };
        assert_eq!(
            error.to_string(),
            "Tags file not found: /tmp/tags/aarch64-base-notebook.txt"
        );
    }

    #[test]
    fn test_import_check_failed_display() {
        let error = TagError::ImportCheckFailed(vec!["sympy".to_string(), "pyarrow".to_string()]);
        assert_eq!(
            error.to_string(),
            "Following packages are not importable: sympy, pyarrow"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tag_error: TagError = io_error.into();
        assert!(matches!(tag_error, TagError::IoError(_)));
        assert!(tag_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ invalid");
        let tag_error: TagError = result.unwrap_err().into();
        assert!(matches!(tag_error, TagError::SerializationError(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content:");
        let tag_error: TagError = result.unwrap_err().into();
        assert!(matches!(tag_error, TagError::SerializationError(_)));
    }
}
