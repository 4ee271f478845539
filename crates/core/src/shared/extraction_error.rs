use std::path::PathBuf;

use thiserror::Error;

use crate::container::domain::container_error::ContainerError;
use crate::tags::domain::tag_source::FieldKey;

/// Failures the extraction layer records before degrading to an absent
/// result. None of these abort a whole extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("artwork payload is not a supported image (type flag {type_flag:#x})")]
    UnsupportedImageFormat { type_flag: u32 },
    #[error("failed to read field {key:?}: {reason}")]
    FieldReadFailure { key: FieldKey, reason: String },
    #[error("unsupported file type: {}", path.display())]
    UnsupportedFileType { path: PathBuf },
    #[error("failed to read tags from {}: {reason}", path.display())]
    TagRead { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::domain::box_node::FourCc;

    #[test]
    fn test_container_errors_convert() {
        let err: ExtractionError = ContainerError::PathNotFound {
            segment: FourCc::ILST,
        }
        .into();
        assert!(matches!(
            err,
            ExtractionError::Container(ContainerError::PathNotFound { .. })
        ));
        assert!(err.to_string().contains("ilst"));
    }

    #[test]
    fn test_messages_name_the_file() {
        let err = ExtractionError::UnsupportedFileType {
            path: PathBuf::from("/music/notes.txt"),
        };
        assert!(err.to_string().contains("notes.txt"));
    }
}
