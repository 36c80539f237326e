//! The `(id, n, l)` triple that parameterizes a single rpost instance.

use crate::error::ParameterOutOfRangeError;

/// Hash output width in bits. Fixed by the choice of SHA-256 in [`crate::hash`].
pub const K: u32 = 256;

/// Hash output width in bytes.
pub const WB: usize = (K / 8) as usize;

/// Number of challenge rounds a [`crate::prover::Prover`] runs per proof.
pub const ROUNDS: u32 = K;

/// Validated parameters for a single rpost instance: a commitment, a table
/// size exponent, and a difficulty.
///
/// All three fields are read from one `Params` value across the generator,
/// the Merkle builder, and the prover, so the range checks performed once at
/// construction apply everywhere instead of being repeated (or skipped) at
/// each call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    id: Vec<u8>,
    n: u32,
    l: u32,
}

impl Params {
    /// Builds a validated `Params`, rejecting `n` or `l` outside `1..=63`.
    pub fn new(id: impl Into<Vec<u8>>, n: u32, l: u32) -> Result<Self, ParameterOutOfRangeError> {
        if n == 0 || n > 63 {
            return Err(ParameterOutOfRangeError::N(n));
        }
        if l == 0 || l > 63 {
            return Err(ParameterOutOfRangeError::L(l));
        }
        Ok(Self {
            id: id.into(),
            n,
            l,
        })
    }

    /// Builds a `Params` without validating `n`/`l`, for callers that already
    /// know the values are in range (e.g. they were read back from a store
    /// this crate itself wrote).
    #[cfg(feature = "unchecked-constructors")]
    #[must_use]
    pub fn new_unchecked(id: impl Into<Vec<u8>>, n: u32, l: u32) -> Self {
        Self {
            id: id.into(),
            n,
            l,
        }
    }

    #[must_use]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Table size exponent: the table holds `2^n` entries.
    #[must_use]
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Table size: `2^n`.
    #[must_use]
    pub fn table_size(&self) -> u64 {
        1u64 << self.n
    }

    /// Merkle tree height: `n - 1`, since each leaf pairs two table entries.
    #[must_use]
    pub fn tree_height(&self) -> u32 {
        self.n - 1
    }

    /// Difficulty: the number of leading zero bits an iPoW hash must have.
    #[must_use]
    pub fn l(&self) -> u32 {
        self.l
    }

    /// Acceptance probability of a single iPoW hash attempt: `2^-l`.
    #[must_use]
    pub fn probability(&self) -> f64 {
        crate::math::get_probability(self.l)
    }
}

/// Environment-backed configuration, read via [`figment`] the way the
/// teacher's service crates assemble typed config from the environment
/// rather than hand-rolling a parser.
///
/// Expected variables: `RPOST_ID` (hex-encoded), `RPOST_N`, `RPOST_L`.
#[cfg(feature = "config")]
pub mod config {
    use figment::{
        providers::{Env, Serialized},
        Figment,
    };
    use serde::{Deserialize, Serialize};

    use super::Params;
    use crate::error::Error;

    #[derive(Debug, Serialize, Deserialize)]
    struct RawParams {
        id: String,
        n: u32,
        l: u32,
    }

    /// Loads [`Params`] from environment variables prefixed `RPOST_`.
    pub fn from_env() -> Result<Params, Error> {
        let raw: RawParams = Figment::from(Serialized::defaults(()))
            .merge(Env::prefixed("RPOST_"))
            .extract()?;
        let id = hex::decode(&raw.id).map_err(|_| {
            figment::Error::from(format!("RPOST_ID is not valid hex: {:?}", raw.id))
        })?;
        Ok(Params::new(id, raw.n, raw.l)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_n_out_of_range() {
        assert!(Params::new(vec![], 0, 10).is_err());
        assert!(Params::new(vec![], 64, 10).is_err());
    }

    #[test]
    fn rejects_l_out_of_range() {
        assert!(Params::new(vec![], 10, 0).is_err());
        assert!(Params::new(vec![], 10, 64).is_err());
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(Params::new(vec![1, 2, 3], 1, 1).is_ok());
        assert!(Params::new(vec![1, 2, 3], 63, 63).is_ok());
    }

    #[test]
    fn table_size_and_tree_height() {
        let p = Params::new(vec![], 11, 14).unwrap();
        assert_eq!(p.table_size(), 2048);
        assert_eq!(p.tree_height(), 10);
    }
}
