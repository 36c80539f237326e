//! Builds and reads the Merkle commitment over a bit-packed table.
//!
//! The tree has `2^(n-1)` leaves, each leaf pairing table entries `2v` and
//! `2v+1` for leaf identifier value `v`. Building is a single post-order DFS
//! over the table; the recursive and iterative variants produce identical
//! on-disk bytes, so callers on a constrained stack can pick the iterative
//! one without changing the result.

use tracing::instrument;

use crate::{
    bitstore::WordReader,
    binstring::BinaryString,
    error::MerkleError,
    hash,
    labelstore::{LabelReader, LabelWriter},
    params::WB,
};

/// One step of a Merkle authentication path: the sibling's identifier and
/// its label.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofNode {
    pub identifier: String,
    pub label: [u8; WB],
}

/// The sibling labels from a leaf to the root, exclusive of the root.
pub type MerkleProof = Vec<ProofNode>;

/// Builds a Merkle tree over `table`, writing labels to `writer` in
/// depth-first post-order, and returns the root digest (the commitment).
///
/// `tree_height` is `n - 1`: the table has `2^n` entries, pairing into
/// `2^(n-1)` leaves.
#[instrument(skip(table, writer))]
pub fn build(
    table: &dyn WordReader,
    writer: &mut LabelWriter,
    tree_height: u32,
) -> Result<[u8; WB], MerkleError> {
    let root = visit_recursive(table, writer, BinaryString::ROOT, tree_height)?;
    writer.finalize().map_err(MerkleError::Store)?;
    Ok(root)
}

fn visit_recursive(
    table: &dyn WordReader,
    writer: &mut LabelWriter,
    id: BinaryString,
    tree_height: u32,
) -> Result<[u8; WB], MerkleError> {
    let (left, right) = if id.digits() == tree_height {
        let base = id.value() * 2;
        (
            table.read_bytes(base).map_err(MerkleError::Store)?,
            table.read_bytes(base + 1).map_err(MerkleError::Store)?,
        )
    } else {
        let left_id = BinaryString::from_value(id.value() << 1, id.digits() + 1);
        let right_id = BinaryString::from_value((id.value() << 1) | 1, id.digits() + 1);
        (
            visit_recursive(table, writer, left_id, tree_height)?.to_vec(),
            visit_recursive(table, writer, right_id, tree_height)?.to_vec(),
        )
    };

    let digest = hash::hash(&[&left, &right]);
    writer.write(&digest).map_err(MerkleError::Store)?;
    Ok(digest)
}

/// Explicit-stack equivalent of [`build`], for table sizes whose recursion
/// depth (`tree_height`) could exceed the host stack budget.
#[instrument(skip(table, writer))]
pub fn build_iterative(
    table: &dyn WordReader,
    writer: &mut LabelWriter,
    tree_height: u32,
) -> Result<[u8; WB], MerkleError> {
    enum Frame {
        /// Descend into this node: compute its children before visiting it.
        Enter(BinaryString),
        /// Both children have been visited; combine their digests and emit
        /// this node's label.
        Exit(BinaryString, [u8; WB], [u8; WB]),
    }

    let mut stack = vec![Frame::Enter(BinaryString::ROOT)];
    let mut digests: std::collections::HashMap<BinaryString, [u8; WB]> =
        std::collections::HashMap::new();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if id.digits() == tree_height {
                    let base = id.value() * 2;
                    let left = table.read_bytes(base).map_err(MerkleError::Store)?;
                    let right = table.read_bytes(base + 1).map_err(MerkleError::Store)?;
                    let digest = hash::hash(&[&left, &right]);
                    writer.write(&digest).map_err(MerkleError::Store)?;
                    digests.insert(id, digest);
                } else {
                    let left_id = BinaryString::from_value(id.value() << 1, id.digits() + 1);
                    let right_id =
                        BinaryString::from_value((id.value() << 1) | 1, id.digits() + 1);
                    // Push Exit first so it runs after both children (which
                    // are pushed after, and popped first).
                    stack.push(Frame::Exit(id, [0; WB], [0; WB]));
                    stack.push(Frame::Enter(right_id));
                    stack.push(Frame::Enter(left_id));
                }
            }
            Frame::Exit(id, _, _) => {
                let left_id = BinaryString::from_value(id.value() << 1, id.digits() + 1);
                let right_id = BinaryString::from_value((id.value() << 1) | 1, id.digits() + 1);
                let left = digests
                    .remove(&left_id)
                    .expect("left child visited before its parent's exit frame");
                let right = digests
                    .remove(&right_id)
                    .expect("right child visited before its parent's exit frame");
                let digest = hash::hash(&[&left, &right]);
                writer.write(&digest).map_err(MerkleError::Store)?;
                digests.insert(id, digest);
            }
        }
    }

    writer.finalize().map_err(MerkleError::Store)?;
    Ok(digests
        .remove(&BinaryString::ROOT)
        .expect("root digest computed by traversal"))
}

/// Reads Merkle authentication paths from a tree store built by [`build`].
pub struct Reader {
    reader: LabelReader,
}

impl Reader {
    #[must_use]
    pub fn new(reader: LabelReader) -> Self {
        Self { reader }
    }

    /// Returns the sibling labels from `id` to the root, exclusive of the
    /// root. The result has length `id.digits()`.
    pub fn read_proof(&self, id: &BinaryString) -> Result<MerkleProof, MerkleError> {
        id.siblings(false)
            .iter()
            .map(|sibling| {
                let label = self.reader.read(sibling)?;
                Ok(ProofNode {
                    identifier: sibling.to_binary_string(),
                    label,
                })
            })
            .collect()
    }

    /// Converts table indices into their leaf-layer identifiers (`idx >> 1`
    /// at width `n - 1`) and reads a proof for each.
    pub fn read_proofs(
        &self,
        indices: &[u64],
        n: u32,
    ) -> Result<Vec<MerkleProof>, MerkleError> {
        indices
            .iter()
            .map(|&idx| {
                let leaf = BinaryString::from_value(idx >> 1, n - 1);
                self.read_proof(&leaf)
            })
            .collect()
    }
}
