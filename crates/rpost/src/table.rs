//! The iPoW table generator: for each of `2^n` indices, finds a nonce whose
//! hash with the commitment has `l` leading zero bits, and persists the low
//! `l` bits of that nonce.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    bitstore::{InMemoryStoreReader, StoreReader, StoreWriter},
    error::{StoreIoError, TableError},
    hash,
    math,
    params::Params,
};

/// Generates the iPoW table for `params`, writing packed `l`-bit words to
/// `store_path`.
#[instrument(skip(params), fields(n = params.n(), l = params.l()))]
pub fn generate(params: &Params, store_path: impl AsRef<Path>) -> Result<(), TableError> {
    generate_impl(params, store_path, false).map(|_| ())
}

/// Like [`generate`], but also returns the `2^n` decoded words in memory so
/// a caller (typically a test) can build a Merkle tree directly from them
/// without a second pass reading the file back.
#[instrument(skip(params), fields(n = params.n(), l = params.l()))]
pub fn generate_collecting(
    params: &Params,
    store_path: impl AsRef<Path>,
) -> Result<Vec<u64>, TableError> {
    generate_impl(params, store_path, true)
}

fn generate_impl(
    params: &Params,
    store_path: impl AsRef<Path>,
    collect: bool,
) -> Result<Vec<u64>, TableError> {
    let table_size = params.table_size();
    let l = params.l();
    let p = math::get_probability(l);
    let max_nonce = math::get_max_nonce_attempts(crate::params::K, p);
    let mask = math::get_mask(crate::params::WB, l);
    let store_mask = math::get_simple_mask(l);

    info!(table_size, l, max_nonce, "generating iPoW table");

    let mut writer = StoreWriter::create(store_path).map_err(TableError::Store)?;
    let mut collected = Vec::with_capacity(if collect { table_size as usize } else { 0 });

    for i in 0..table_size {
        let i_bytes = math::encode_minimal_be(i);
        let mut nonce: u64 = 0;

        loop {
            let nonce_bytes = nonce.to_be_bytes();
            let digest = hash::hash(&[&i_bytes, &nonce_bytes]);

            // accept iff digest <= mask, i.e. iff digest is not strictly
            // greater than mask.
            if !math::be_bytes_less_than(&mask, &digest) {
                let data = nonce & store_mask;
                writer
                    .write(data, l)
                    .map_err(TableError::Store)?;
                if collect {
                    collected.push(data);
                }
                debug!(index = i, nonce, data, "accepted iPoW entry");
                break;
            }

            nonce += 1;
            if nonce > max_nonce {
                return Err(TableError::NonceOverflow {
                    index: i,
                    max_nonce,
                });
            }
        }
    }

    writer.finalize().map_err(TableError::Store)?;
    Ok(collected)
}

/// Opens a file-backed reader over a previously generated table.
pub fn open_reader(
    store_path: impl AsRef<Path>,
    l: u32,
) -> Result<StoreReader, StoreIoError> {
    StoreReader::open(store_path, l)
}

/// Wraps already-decoded words (e.g. from [`generate_collecting`]) in an
/// in-memory reader.
#[must_use]
pub fn in_memory_reader(words: Vec<u64>, l: u32) -> InMemoryStoreReader {
    InMemoryStoreReader::new(words, l)
}
