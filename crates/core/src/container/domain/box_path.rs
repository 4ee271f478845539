use std::fmt;

use super::box_node::FourCc;
use super::container_error::ContainerError;

/// Ordered box-type segments from the top level down to a target box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxPath {
    segments: Vec<FourCc>,
}

impl BoxPath {
    /// Parses `moov/udta/meta` or `moov.udta.meta` (a leading `/` is allowed).
    ///
    /// Segments are four Latin-1 characters, so `©nam` is accepted. An empty
    /// path or a malformed segment is a caller bug and reported as
    /// [`ContainerError::InvalidPath`].
    pub fn parse(path: &str) -> Result<Self, ContainerError> {
        let invalid = |reason| ContainerError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let trimmed = path.strip_prefix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let separator = if trimmed.contains('/') { '/' } else { '.' };
        let segments = trimmed
            .split(separator)
            .map(|segment| parse_segment(segment).ok_or_else(|| invalid("segments must be four Latin-1 characters")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[FourCc] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for BoxPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

fn parse_segment(segment: &str) -> Option<FourCc> {
    let mut bytes = [0u8; 4];
    let mut count = 0;
    for c in segment.chars() {
        let code = u32::from(c);
        if count == 4 || code > 0xFF {
            return None;
        }
        bytes[count] = code as u8;
        count += 1;
    }
    (count == 4).then_some(FourCc(bytes))
}
