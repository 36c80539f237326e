//! Fixed-width binary identifiers for nodes of a full binary tree.
//!
//! A [`BinaryString`] names a node by the path taken from the root: each bit
//! selects a child (`0` for left, `1` for right), read most-significant bit
//! first. The empty string (`digits == 0`) names the root.

use thiserror::Error;

/// A binary string could not be parsed because it contained a non-`{0,1}`
/// character, or its width exceeded what fits in the internal 64-bit value.
#[derive(Debug, Error)]
pub enum InvalidIdentifierError {
    #[error("identifier {0:?} contains a character other than '0' or '1'")]
    NotBinary(String),
    #[error("identifier width {0} exceeds the supported maximum of 63")]
    TooWide(usize),
}

/// A fixed-width binary identifier for a node in a full binary tree.
///
/// The value is stored as a `u64` together with an explicit digit count, so
/// that leading zeros (e.g. `"001"` vs `"01"` vs `"1"`) are preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinaryString {
    value: u64,
    digits: u32,
}

impl BinaryString {
    /// The identifier naming the root of the tree: zero digits.
    pub const ROOT: Self = Self { value: 0, digits: 0 };

    /// Builds an identifier from an already-known value and digit count.
    ///
    /// `digits` must not exceed 63. Bits of `value` above `digits` are
    /// discarded rather than rejected, mirroring the masking behavior callers
    /// rely on when deriving a leaf identifier from a wider index.
    #[must_use]
    pub fn from_value(value: u64, digits: u32) -> Self {
        let masked = if digits >= 64 {
            value
        } else {
            value & ((1u64 << digits) - 1)
        };
        Self {
            value: masked,
            digits,
        }
    }

    /// Parses an identifier from a string of `0`/`1` characters, e.g. `"0110"`.
    pub fn parse(s: &str) -> Result<Self, InvalidIdentifierError> {
        if s.len() > 63 {
            return Err(InvalidIdentifierError::TooWide(s.len()));
        }
        if s.is_empty() {
            return Ok(Self::ROOT);
        }
        let mut value = 0u64;
        for c in s.chars() {
            value <<= 1;
            match c {
                '0' => {}
                '1' => value |= 1,
                _ => return Err(InvalidIdentifierError::NotBinary(s.to_owned())),
            }
        }
        Ok(Self {
            value,
            digits: s.len() as u32,
        })
    }

    /// The binary value this identifier encodes, e.g. `"0011"` is `3`.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of digits, including leading zeros.
    #[must_use]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.digits == 0
    }

    #[must_use]
    pub fn is_even(&self) -> bool {
        self.value % 2 == 0
    }

    #[must_use]
    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Returns a new identifier with the least-significant bit truncated,
    /// i.e. the identifier of this node's parent. `"0110" -> "011"`.
    ///
    /// # Panics
    ///
    /// Panics if called on the root identifier.
    #[must_use]
    pub fn truncate_lsb(&self) -> Self {
        assert!(!self.is_root(), "root identifier has no parent");
        Self::from_value(self.value >> 1, self.digits - 1)
    }

    /// Returns a new identifier with the least-significant bit flipped, i.e.
    /// the identifier of this node's sibling. `"0110" -> "0111"`.
    #[must_use]
    pub fn flip_lsb(&self) -> Self {
        Self::from_value(self.value ^ 1, self.digits)
    }

    /// Renders the identifier as a string of `0`/`1` characters with leading
    /// zeros, e.g. value `3`, digits `4` renders as `"0011"`.
    #[must_use]
    pub fn to_binary_string(&self) -> String {
        (0..self.digits)
            .rev()
            .map(|bit| if (self.value >> bit) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    /// Returns the siblings on the path from this node to the root, ordered
    /// leaf-adjacent first. When `left_only` is set, only left siblings
    /// (`is_even() == true`) are kept.
    ///
    /// The root has no siblings and always yields an empty list.
    #[must_use]
    pub fn siblings(&self, left_only: bool) -> Vec<Self> {
        let mut result = Vec::new();
        if self.is_root() {
            return result;
        }

        let mut current = *self;
        loop {
            let sibling = current.flip_lsb();
            if !left_only || sibling.is_even() {
                result.push(sibling);
            }
            current = current.truncate_lsb();
            if current.is_root() {
                break;
            }
        }

        result
    }
}

impl std::fmt::Display for BinaryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_binary_string())
    }
}
