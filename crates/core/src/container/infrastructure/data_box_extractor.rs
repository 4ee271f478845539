use std::path::Path;

use crate::container::domain::box_node::{BoxTree, FourCc};
use crate::container::domain::box_path::BoxPath;
use crate::container::domain::container_error::ContainerError;
use crate::container::domain::data_box::DataBoxPayload;
use crate::shared::constants::COVER_ART_PATH;

use super::box_reader::read_box_path_from_file;

/// Version byte, 24-bit type flag, 4-byte locale.
const DATA_BOX_PREFIX_LEN: usize = 8;

/// Splits the leaf `data` box of `tree` into its type flag and payload.
///
/// Structural only: the bytes are returned as-is, whatever the flag says.
pub fn extract_data_box(tree: &BoxTree) -> Result<DataBoxPayload, ContainerError> {
    let leaf = tree
        .leaf()
        .filter(|node| node.kind == FourCc::DATA)
        .ok_or(ContainerError::PathNotFound {
            segment: FourCc::DATA,
        })?;
    let payload = leaf.payload.as_deref().unwrap_or_default();

    if payload.len() < DATA_BOX_PREFIX_LEN {
        return Err(ContainerError::Truncated {
            offset: leaf.offset + leaf.header_len + payload.len() as u64,
        });
    }

    let type_flag = u32::from_be_bytes([0, payload[1], payload[2], payload[3]]);
    Ok(DataBoxPayload {
        type_flag,
        bytes: payload[DATA_BOX_PREFIX_LEN..].to_vec(),
    })
}

/// Reads the iTunes cover-art `data` box of the MP4 file at `file`.
pub fn read_cover_payload(file: &Path) -> Result<DataBoxPayload, ContainerError> {
    let path = BoxPath::parse(COVER_ART_PATH)?;
    let tree = read_box_path_from_file(file, &path)?;
    extract_data_box(&tree)
}
