//! The tree-node abstraction the builder consumes.
//!
//! The builder only depends on [`TreeNode`]: anything that can present
//! itself as a file (bytes) or a directory (named children) can be added.
//! How the tree is produced (filesystem, network, in memory) is up to the
//! caller. [`MemoryNode`] is the owned in-memory implementation.

use std::borrow::Cow;

/// What a node is, as seen by the builder.
pub enum NodeView<'a> {
    /// File content.
    File(Cow<'a, [u8]>),
    /// Named children, in the producer's enumeration order.
    ///
    /// The order need not be canonical; directory digests do not depend on it.
    Directory(Box<dyn Iterator<Item = (&'a str, &'a dyn TreeNode)> + 'a>),
    /// A variant the DAG cannot represent (symlink, device, ...).
    Unsupported {
        /// The producer's name for the variant.
        kind: String,
    },
}

impl std::fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(bytes) => f.debug_tuple("File").field(&bytes.len()).finish(),
            Self::Directory(_) => f.write_str("Directory(..)"),
            Self::Unsupported { kind } => {
                f.debug_struct("Unsupported").field("kind", kind).finish()
            }
        }
    }
}

/// A node in the input tree.
///
/// Each call to [`view`](Self::view) starts a fresh enumeration, so a
/// directory can be walked more than once.
pub trait TreeNode {
    fn view(&self) -> NodeView<'_>;
}

/// Owned in-memory tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemoryNode {
    File(Vec<u8>),
    Directory(MemoryDirectory),
}

impl MemoryNode {
    /// A file with the given content.
    pub fn file(content: impl Into<Vec<u8>>) -> Self {
        Self::File(content.into())
    }

    /// An empty directory.
    pub fn dir() -> MemoryDirectory {
        MemoryDirectory::new()
    }
}

impl From<MemoryDirectory> for MemoryNode {
    fn from(dir: MemoryDirectory) -> Self {
        Self::Directory(dir)
    }
}

impl TreeNode for MemoryNode {
    fn view(&self) -> NodeView<'_> {
        match self {
            Self::File(content) => NodeView::File(Cow::Borrowed(content.as_slice())),
            Self::Directory(dir) => dir.view(),
        }
    }
}

/// Directory of named in-memory nodes, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDirectory {
    entries: Vec<(String, MemoryNode)>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_child(mut self, name: impl Into<String>, node: impl Into<MemoryNode>) -> Self {
        self.insert(name, node);
        self
    }

    /// Add or replace the child called `name`, returning the replaced node.
    ///
    /// A replaced child keeps its original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: impl Into<MemoryNode>,
    ) -> Option<MemoryNode> {
        let name = name.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, node)),
            None => {
                self.entries.push((name, node));
                None
            }
        }
    }

    /// Look up a child by name.
    pub fn get(&self, name: &str) -> Option<&MemoryNode> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TreeNode for MemoryDirectory {
    fn view(&self) -> NodeView<'_> {
        NodeView::Directory(Box::new(
            self.entries
                .iter()
                .map(|(name, node)| (name.as_str(), node as &dyn TreeNode)),
        ))
    }
}

impl From<Vec<u8>> for MemoryNode {
    fn from(content: Vec<u8>) -> Self {
        Self::File(content)
    }
}

impl From<&[u8]> for MemoryNode {
    fn from(content: &[u8]) -> Self {
        Self::File(content.to_vec())
    }
}

impl From<&str> for MemoryNode {
    fn from(content: &str) -> Self {
        Self::File(content.as_bytes().to_vec())
    }
}
