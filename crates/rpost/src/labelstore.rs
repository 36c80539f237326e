//! A fixed-size file holding one `WB`-byte label per node of a full binary
//! tree of height `h`, written in depth-first post-order.
//!
//! Because post-order DFS is the same order the Merkle builder visits nodes
//! in, writing labels as they're produced requires no seeking, and any
//! node's offset can still be computed from its identifier alone without
//! loading the rest of the tree.

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    binstring::BinaryString,
    error::{MerkleError, StoreIoError},
    params::WB,
};

/// Computes the size, in labels, of the subtree rooted at `id` in a tree of
/// height `h`: `2^(h - |id| + 1) - 1`.
#[must_use]
pub fn subtree_size(id: &BinaryString, h: u32) -> u64 {
    let height = h - id.digits();
    (1u64 << (height + 1)) - 1
}

/// Sums [`subtree_size`] over every left sibling on the path from `id` to
/// the root.
#[must_use]
pub fn left_siblings_subtree_sum(id: &BinaryString, h: u32) -> u64 {
    id.siblings(true)
        .iter()
        .map(|s| subtree_size(s, h))
        .sum()
}

/// The post-order-DFS label index of `id` in a tree of height `h`.
#[must_use]
pub fn label_index(id: &BinaryString, h: u32) -> u64 {
    left_siblings_subtree_sum(id, h) + subtree_size(id, h) - 1
}

/// Appends `WB`-byte labels to a file in depth-first post-order. Random
/// access is not supported while writing; see [`LabelReader`] for that.
pub struct LabelWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl LabelWriter {
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreIoError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| StoreIoError::Other {
                operation: "create",
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Appends `label` (must be exactly [`WB`] bytes) as the next node in
    /// depth-first post-order.
    pub fn write(&mut self, label: &[u8; WB]) -> Result<(), StoreIoError> {
        self.writer
            .write_all(label)
            .map_err(|source| StoreIoError::Other {
                operation: "write",
                path: self.path.display().to_string(),
                source,
            })?;
        self.written += 1;
        Ok(())
    }

    /// Number of labels written so far, including buffered but unflushed
    /// ones.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.written
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Whether `id`'s label has already been written, counting labels still
    /// sitting in the buffered writer that haven't been flushed to disk yet.
    ///
    /// `h` is the tree height `id` is being read against; it must match the
    /// height this writer is building.
    #[must_use]
    pub fn is_label_present(&self, id: &BinaryString, h: u32) -> bool {
        label_index(id, h) < self.written
    }

    /// Truncates the backing file and resets the write position, allowing a
    /// caller to retry a build against the same path without deleting it
    /// first.
    pub fn reset(&mut self) -> Result<(), StoreIoError> {
        self.writer.flush().map_err(|source| StoreIoError::Other {
            operation: "flush",
            path: self.path.display().to_string(),
            source,
        })?;
        self.writer
            .get_ref()
            .set_len(0)
            .map_err(|source| StoreIoError::Other {
                operation: "truncate",
                path: self.path.display().to_string(),
                source,
            })?;
        self.written = 0;
        Ok(())
    }

    /// Flushes the buffered writer.
    pub fn finalize(&mut self) -> Result<(), StoreIoError> {
        self.writer.flush().map_err(|source| StoreIoError::Other {
            operation: "flush",
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Random-access reader over a file written by [`LabelWriter`].
pub struct LabelReader {
    path: PathBuf,
    file: File,
    /// tree height: leaves have `h` digits.
    height: u32,
}

impl LabelReader {
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, height: u32) -> Result<Self, StoreIoError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|source| StoreIoError::Other {
                operation: "open",
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            path,
            file,
            height,
        })
    }

    /// Reads the label stored for node `id`. Returns
    /// [`MerkleError::LabelMissing`] if the store doesn't extend far enough
    /// to hold it, e.g. because the tree is still being built.
    pub fn read(&self, id: &BinaryString) -> Result<[u8; WB], MerkleError> {
        use std::os::unix::fs::FileExt;

        let offset = label_index(id, self.height) * WB as u64;
        let mut buf = [0u8; WB];
        let read = self
            .file
            .read_at(&mut buf, offset)
            .map_err(|source| {
                MerkleError::Store(StoreIoError::AtIndex {
                    operation: "read",
                    path: self.path.display().to_string(),
                    index: id.value(),
                    source,
                })
            })?;
        if read < WB {
            return Err(MerkleError::LabelMissing {
                identifier: id.to_binary_string(),
            });
        }
        Ok(buf)
    }
}
