use thiserror::Error;

use super::box_node::FourCc;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("byte source ended inside a box at offset {offset}")]
    Truncated { offset: u64 },
    #[error("box '{kind}' at offset {offset} declares {declared} bytes but {available} are available")]
    MalformedContainer {
        kind: FourCc,
        offset: u64,
        declared: u64,
        available: u64,
    },
    #[error("box '{kind}' payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { kind: FourCc, size: u64, limit: u64 },
    #[error("no box matches path segment '{segment}'")]
    PathNotFound { segment: FourCc },
    #[error("invalid box path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
    #[error("I/O error while reading container: {0}")]
    Io(#[source] std::io::Error),
}

impl ContainerError {
    /// Maps a read failure at `offset`, treating early EOF as truncation.
    pub(crate) fn from_read(err: std::io::Error, offset: u64) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ContainerError::Truncated { offset }
        } else {
            ContainerError::Io(err)
        }
    }
}
