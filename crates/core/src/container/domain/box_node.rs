use std::fmt;

/// Four-character box type code, e.g. `moov` or `©nam`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const MOOV: FourCc = FourCc(*b"moov");
    pub const UDTA: FourCc = FourCc(*b"udta");
    pub const META: FourCc = FourCc(*b"meta");
    pub const ILST: FourCc = FourCc(*b"ilst");
    pub const COVR: FourCc = FourCc(*b"covr");
    pub const DATA: FourCc = FourCc(*b"data");
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // iTunes item names start with 0xA9 ('©' in Latin-1).
        for &b in &self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({self})")
    }
}

/// Index of a node inside its owning [`BoxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoxId(usize);

/// One box of an MP4 tree.
///
/// `parent` is a back-reference into the owning tree and never owns the
/// parent. Container boxes list their resolved children; leaf boxes carry
/// their payload bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxNode {
    pub kind: FourCc,
    /// Absolute offset of the box header in the byte source.
    pub offset: u64,
    /// Total size including the header.
    pub size: u64,
    pub header_len: u64,
    pub parent: Option<BoxId>,
    pub children: Vec<BoxId>,
    pub payload: Option<Vec<u8>>,
}

impl BoxNode {
    pub fn payload_len(&self) -> u64 {
        self.size - self.header_len
    }
}

/// Arena holding the boxes visited while resolving a path.
///
/// Only boxes on the requested path are recorded; siblings that were
/// skipped never enter the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
    leaf: Option<BoxId>,
}

impl BoxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node`, linking it under its parent if any.
    pub fn push(&mut self, node: BoxNode) -> BoxId {
        let id = BoxId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub fn set_leaf(&mut self, id: BoxId) {
        self.leaf = Some(id);
    }

    pub fn get(&self, id: BoxId) -> &BoxNode {
        &self.nodes[id.0]
    }

    /// The node the resolved path ended at.
    pub fn leaf(&self) -> Option<&BoxNode> {
        self.leaf.map(|id| self.get(id))
    }

    pub fn root(&self) -> Option<&BoxNode> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Box types from the root down to the leaf.
    pub fn leaf_path(&self) -> Vec<FourCc> {
        let mut kinds = Vec::new();
        let mut cursor = self.leaf;
        while let Some(id) = cursor {
            let node = self.get(id);
            kinds.push(node.kind);
            cursor = node.parent;
        }
        kinds.reverse();
        kinds
    }
}
