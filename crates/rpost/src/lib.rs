//! A proof-of-space-time construction: an interactive protocol in which a
//! prover commits to a bounded amount of persistent storage derived from a
//! public commitment, then later answers challenges by proving the storage
//! exists and was consulted.
//!
//! Three pieces make up the construction and map onto this crate's modules:
//!
//! - [`table`]: the iPoW table generator. For each of `2^n` indices, finds
//!   a nonce whose hash with the commitment has `l` leading zero bits and
//!   persists the low `l` bits of that nonce to a bit-packed store
//!   ([`bitstore`]).
//! - [`merkle`]: builds a Merkle commitment over the packed table, written
//!   to a label store ([`labelstore`]) in depth-first post-order so any
//!   node's authentication path can be read back without loading the whole
//!   tree. Node identifiers are [`binstring::BinaryString`]s.
//! - [`prover`]: given a challenge, runs `K` nested-search rounds and
//!   assembles the resulting [`prover::Proof`].
//!
//! # Examples
//!
//! ```
//! use rpost::{params, params::Params, table, merkle, prover};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let store_path = dir.path().join("table.bin");
//! let tree_path = dir.path().join("tree.bin");
//!
//! let params = Params::new(b"example commitment".to_vec(), 4, 6)?;
//!
//! let words = table::generate_collecting(&params, &store_path)?;
//! let table_reader = table::in_memory_reader(words, params.l());
//!
//! let mut tree_writer = rpost::labelstore::LabelWriter::create(&tree_path)?;
//! let commitment = merkle::build(&table_reader, &mut tree_writer, params.tree_height())?;
//! assert_eq!(commitment.len(), 32);
//!
//! let tree_reader = merkle::Reader::new(rpost::labelstore::LabelReader::open(
//!     &tree_path,
//!     params.tree_height(),
//! )?);
//! let prover = prover::Prover::new(&table_reader, &tree_reader, &params);
//! let proof = prover.prove()?;
//! assert_eq!(proof.nonces.len(), params::ROUNDS as usize);
//! # Ok(())
//! # }
//! ```

pub mod binstring;
pub mod bitstore;
pub mod error;
pub mod hash;
pub mod labelstore;
pub mod math;
pub mod merkle;
pub mod params;
pub mod prover;
pub mod table;

pub use error::Error;
pub use params::Params;
