//! A write-once, append-only stream of fixed-width bit words with
//! positioned random-access reads.
//!
//! Words are packed MSB-first and may straddle byte boundaries; there is no
//! file header. A store holding `N` words of `l` bits each occupies exactly
//! `ceil(N * l / 8)` bytes once finalized.

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::error::StoreIoError;

/// Appends `l`-bit words to a file, MSB-first, with no random access.
pub struct StoreWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    /// bits buffered in `pending` below the next byte boundary.
    pending_bits: u32,
    pending: u8,
}

impl StoreWriter {
    /// Creates (truncating if present) the store file at `path`.
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
            pending_bits: 0,
            pending: 0,
        })
    }

    /// Appends the low `n` bits of `word`, MSB-first. `n` must be `<= 64`.
    pub fn write(&mut self, word: u64, n: u32) -> Result<(), StoreIoError> {
        for bit_pos in (0..n).rev() {
            let bit = (word >> bit_pos) & 1;
            self.pending = (self.pending << 1) | bit as u8;
            self.pending_bits += 1;
            if self.pending_bits == 8 {
                self.flush_pending_byte()?;
            }
        }
        Ok(())
    }

    fn flush_pending_byte(&mut self) -> Result<(), StoreIoError> {
        self.writer
            .write_all(&[self.pending])
            .map_err(|source| StoreIoError::Other {
                operation: "write",
                path: self.path.display().to_string(),
                source,
            })?;
        self.pending = 0;
        self.pending_bits = 0;
        Ok(())
    }

    /// Flushes any partial trailing byte (zero-padded at the LSB end) and
    /// the underlying buffered writer.
    pub fn finalize(&mut self) -> Result<(), StoreIoError> {
        if self.pending_bits > 0 {
            self.pending <<= 8 - self.pending_bits;
            self.flush_pending_byte()?;
        }
        self.writer.flush().map_err(|source| StoreIoError::Other {
            operation: "flush",
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// A capability for positioned, repeatable reads of `l`-bit words.
///
/// Implemented by both the file-backed [`StoreReader`] and
/// [`InMemoryStoreReader`] so the Merkle builder and prover can be written
/// against one trait regardless of where a table came from.
pub trait WordReader {
    /// Width in bits of each stored word.
    fn word_width(&self) -> u32;

    /// Reads the word at `idx` and returns it as a `u64`.
    fn read_u64(&self, idx: u64) -> Result<u64, StoreIoError>;

    /// Reads the word at `idx` and returns its minimal big-endian byte
    /// encoding (a single `0x00` byte for `0`).
    fn read_bytes(&self, idx: u64) -> Result<Vec<u8>, StoreIoError> {
        Ok(crate::math::encode_minimal_be(self.read_u64(idx)?))
    }
}

/// Random-access reader over a file written by [`StoreWriter`].
pub struct StoreReader {
    path: PathBuf,
    file: File,
    file_len: u64,
    word_width: u32,
}

impl StoreReader {
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, word_width: u32) -> Result<Self, StoreIoError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|source| StoreIoError::Other {
                operation: "open",
                path: path.display().to_string(),
                source,
            })?;
        let file_len = file
            .metadata()
            .map_err(|source| StoreIoError::Other {
                operation: "stat",
                path: path.display().to_string(),
                source,
            })?
            .len();
        Ok(Self {
            path,
            file,
            file_len,
            word_width,
        })
    }

    fn read_raw(&self, idx: u64) -> Result<u64, StoreIoError> {
        use std::os::unix::fs::FileExt;

        let n = self.word_width;
        let mut buf_len = (n as u64 / 8) + u64::from(n % 8 != 0);

        let offset_bits = idx * u64::from(n);
        let offset_bytes = offset_bits / 8;

        if offset_bits % 8 != 0 && offset_bytes + buf_len + 1 < self.file_len {
            buf_len += 1;
        }

        let mut buf = vec![0u8; buf_len as usize];
        let read = self
            .file
            .read_at(&mut buf, offset_bytes)
            .map_err(|source| StoreIoError::AtIndex {
                operation: "read",
                path: self.path.display().to_string(),
                index: idx,
                source,
            })?;
        if read == 0 {
            return Err(StoreIoError::AtIndex {
                operation: "read",
                path: self.path.display().to_string(),
                index: idx,
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no data at requested index",
                ),
            });
        }

        let mut result = 0u64;
        let mut bit_in_byte = (offset_bits % 8) as u32;
        let mut byte_idx = 0usize;
        for _ in 0..n {
            let bit = (buf[byte_idx] >> (7 - bit_in_byte)) & 1;
            result = (result << 1) | u64::from(bit);
            bit_in_byte += 1;
            if bit_in_byte == 8 {
                bit_in_byte = 0;
                byte_idx += 1;
            }
        }
        Ok(result)
    }
}

impl WordReader for StoreReader {
    fn word_width(&self) -> u32 {
        self.word_width
    }

    fn read_u64(&self, idx: u64) -> Result<u64, StoreIoError> {
        self.read_raw(idx)
    }
}

/// An in-memory reader over words already decoded in a `Vec<u64>`, e.g. the
/// values a table generator run also returned directly to its caller
/// without a second pass reading the file back.
pub struct InMemoryStoreReader {
    words: Vec<u64>,
    word_width: u32,
}

impl InMemoryStoreReader {
    #[must_use]
    pub fn new(words: Vec<u64>, word_width: u32) -> Self {
        Self { words, word_width }
    }
}

impl WordReader for InMemoryStoreReader {
    fn word_width(&self) -> u32 {
        self.word_width
    }

    fn read_u64(&self, idx: u64) -> Result<u64, StoreIoError> {
        self.words
            .get(idx as usize)
            .copied()
            .ok_or_else(|| StoreIoError::AtIndex {
                operation: "read",
                path: "<in-memory>".to_owned(),
                index: idx,
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no data at requested index",
                ),
            })
    }
}
