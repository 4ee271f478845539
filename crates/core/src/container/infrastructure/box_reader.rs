use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::container::domain::box_node::{BoxId, BoxNode, BoxTree, FourCc};
use crate::container::domain::box_path::BoxPath;
use crate::container::domain::container_error::ContainerError;
use crate::shared::constants::DEFAULT_MAX_PAYLOAD;

const HEADER_LEN: u64 = 8;
const EXTENDED_HEADER_LEN: u64 = 16;
const FULL_BOX_PREFIX_LEN: u64 = 4;

/// Box types whose payload is a sequence of child boxes.
const CONTAINER_TYPES: &[FourCc] = &[
    FourCc::MOOV,
    FourCc(*b"trak"),
    FourCc(*b"mdia"),
    FourCc(*b"minf"),
    FourCc(*b"stbl"),
    FourCc(*b"edts"),
    FourCc(*b"dinf"),
    FourCc::UDTA,
    FourCc::META,
    FourCc::ILST,
];

/// Byte range `[start, end)` a box scan may not leave.
#[derive(Clone, Copy, Debug)]
struct Region {
    start: u64,
    end: u64,
    nested: bool,
}

#[derive(Clone, Copy, Debug)]
struct BoxHeader {
    kind: FourCc,
    offset: u64,
    size: u64,
    header_len: u64,
}

impl BoxHeader {
    fn payload_region(&self) -> Region {
        Region {
            start: self.offset + self.header_len,
            end: self.offset + self.size,
            nested: true,
        }
    }
}

/// Resolves a single box path in an MP4/ISO-BMFF byte source.
///
/// Only boxes on the requested path are descended into; every other box is
/// skipped by seeking over its declared size, so unknown box types cost
/// nothing. Each level is bounded by its parent's payload region and no read
/// ever crosses it.
pub struct BoxReader<R> {
    source: R,
    max_payload: u64,
}

impl<R: Read + Seek> BoxReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Caps the size of the leaf payload loaded into memory.
    pub fn with_max_payload(mut self, bytes: u64) -> Self {
        self.max_payload = bytes;
        self
    }

    /// Walks `path` from the top level and returns the visited boxes, with
    /// the final segment's box as the tree leaf (payload loaded).
    pub fn read_path(&mut self, path: &BoxPath) -> Result<BoxTree, ContainerError> {
        let end = self.source.seek(SeekFrom::End(0)).map_err(ContainerError::Io)?;
        let mut region = Region {
            start: 0,
            end,
            nested: false,
        };
        let mut tree = BoxTree::new();
        let mut parent: Option<(BoxId, FourCc)> = None;
        let segments = path.segments();

        for (depth, &segment) in segments.iter().enumerate() {
            let header = self.find_child(region, segment)?;
            let is_last = depth + 1 == segments.len();

            let payload = if is_last {
                Some(self.read_payload(&header)?)
            } else {
                None
            };

            let id = tree.push(BoxNode {
                kind: header.kind,
                offset: header.offset,
                size: header.size,
                header_len: header.header_len,
                parent: parent.map(|(id, _)| id),
                children: Vec::new(),
                payload,
            });

            if is_last {
                tree.set_leaf(id);
                return Ok(tree);
            }

            if !is_container(header.kind, parent.map(|(_, kind)| kind)) {
                log::debug!("box '{}' is not a container, cannot descend", header.kind);
                return Err(ContainerError::PathNotFound {
                    segment: segments[depth + 1],
                });
            }

            region = header.payload_region();
            if header.kind == FourCc::META {
                region.start += self.full_box_prefix_len(region)?;
            }
            parent = Some((id, header.kind));
        }

        Err(ContainerError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty",
        })
    }

    /// Scans sibling headers in `region` until one of type `segment`.
    fn find_child(&mut self, region: Region, segment: FourCc) -> Result<BoxHeader, ContainerError> {
        let mut pos = region.start;
        while pos < region.end {
            let remaining = region.end - pos;
            if region.nested && remaining < HEADER_LEN {
                // QuickTime writers pad `udta` and friends with a short
                // zero terminator.
                log::debug!("ignoring {remaining} trailing bytes at offset {pos}");
                break;
            }

            let header = self.read_header(pos, region)?;
            if header.kind == segment {
                return Ok(header);
            }
            log::trace!("skipping box '{}' ({} bytes) at offset {pos}", header.kind, header.size);
            pos += header.size;
        }
        Err(ContainerError::PathNotFound { segment })
    }

    fn read_header(&mut self, pos: u64, region: Region) -> Result<BoxHeader, ContainerError> {
        let remaining = region.end - pos;
        if remaining < HEADER_LEN {
            return Err(ContainerError::Truncated { offset: pos });
        }

        self.source.seek(SeekFrom::Start(pos)).map_err(ContainerError::Io)?;
        let mut raw = [0u8; 8];
        self.source
            .read_exact(&mut raw)
            .map_err(|e| ContainerError::from_read(e, pos))?;

        let size32 = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let kind = FourCc([raw[4], raw[5], raw[6], raw[7]]);

        let (size, header_len) = match size32 {
            0 => (remaining, HEADER_LEN),
            1 => {
                if remaining < EXTENDED_HEADER_LEN {
                    return Err(ContainerError::Truncated { offset: pos });
                }
                let mut large = [0u8; 8];
                self.source
                    .read_exact(&mut large)
                    .map_err(|e| ContainerError::from_read(e, pos))?;
                (u64::from_be_bytes(large), EXTENDED_HEADER_LEN)
            }
            n => (u64::from(n), HEADER_LEN),
        };

        if size < header_len || size > remaining {
            return Err(ContainerError::MalformedContainer {
                kind,
                offset: pos,
                declared: size,
                available: remaining,
            });
        }

        Ok(BoxHeader {
            kind,
            offset: pos,
            size,
            header_len,
        })
    }

    fn read_payload(&mut self, header: &BoxHeader) -> Result<Vec<u8>, ContainerError> {
        let len = header.size - header.header_len;
        if len > self.max_payload {
            return Err(ContainerError::PayloadTooLarge {
                kind: header.kind,
                size: len,
                limit: self.max_payload,
            });
        }

        let start = header.offset + header.header_len;
        self.source.seek(SeekFrom::Start(start)).map_err(ContainerError::Io)?;
        let mut buf = vec![0u8; len as usize];
        self.source
            .read_exact(&mut buf)
            .map_err(|e| ContainerError::from_read(e, start))?;
        Ok(buf)
    }

    /// `meta` is a full box in MP4 (4-byte version/flags before its
    /// children) but a plain container in QuickTime files. The latter is
    /// recognised by its first child being `hdlr`.
    fn full_box_prefix_len(&mut self, region: Region) -> Result<u64, ContainerError> {
        if region.end - region.start < HEADER_LEN {
            return Ok(0);
        }
        self.source
            .seek(SeekFrom::Start(region.start))
            .map_err(ContainerError::Io)?;
        let mut peek = [0u8; 8];
        self.source
            .read_exact(&mut peek)
            .map_err(|e| ContainerError::from_read(e, region.start))?;
        if &peek[4..8] == b"hdlr" {
            Ok(0)
        } else {
            Ok(FULL_BOX_PREFIX_LEN)
        }
    }
}

fn is_container(kind: FourCc, parent: Option<FourCc>) -> bool {
    CONTAINER_TYPES.contains(&kind) || parent == Some(FourCc::ILST)
}

/// Opens `file` and resolves `path` in it. The file handle is released on
/// every exit path.
pub fn read_box_path_from_file(file: &Path, path: &BoxPath) -> Result<BoxTree, ContainerError> {
    let handle = File::open(file).map_err(ContainerError::Io)?;
    BoxReader::new(BufReader::new(handle)).read_path(path)
}
