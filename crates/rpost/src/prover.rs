//! The prover core: nested search for `K` challenge rounds, each producing
//! an accepting nonce and `K` Merkle proofs whose concatenated path probe
//! hashes below the round's acceptance mask.

use tracing::{debug, info, instrument};

use crate::{
    bitstore::WordReader,
    error::{MerkleError, ProverError, TableError},
    hash,
    math,
    merkle::MerkleProof,
    params::{Params, ROUNDS, WB},
};

/// A completed proof: one accepting nonce and one set of `K` Merkle proofs
/// per round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    pub nonces: Vec<u64>,
    pub proofs: Vec<Vec<MerkleProof>>,
}

/// Proves a challenge against a previously generated table and Merkle tree.
pub struct Prover<'a> {
    table: &'a dyn WordReader,
    tree: &'a crate::merkle::Reader,
    params: &'a Params,
    mask: Vec<u8>,
}

impl<'a> Prover<'a> {
    /// `challenge` selects nothing about the search itself here: the round
    /// (`j`) and slot (`t`) indices alone parameterize each hash, matching
    /// the source's nested search; a network-facing verifier protocol is
    /// responsible for how a challenge maps to the commitment this prover
    /// was constructed against.
    #[must_use]
    pub fn new(
        table: &'a dyn WordReader,
        tree: &'a crate::merkle::Reader,
        params: &'a Params,
    ) -> Self {
        let t = params.table_size();
        let phi = f64::from(ROUNDS) / t as f64;
        let d_phi = math::get_difficulty(phi);
        let mask = math::get_mask(WB, d_phi);
        Self {
            table,
            tree,
            params,
            mask,
        }
    }

    /// Runs all `K` rounds and assembles the resulting [`Proof`].
    #[instrument(skip(self))]
    pub fn prove(&self) -> Result<Proof, ProverError> {
        let mut nonces = Vec::with_capacity(ROUNDS as usize);
        let mut proofs = Vec::with_capacity(ROUNDS as usize);

        for j in 0..ROUNDS {
            let (nonce, round_proofs) = self.prove_round(j)?;
            nonces.push(nonce);
            proofs.push(round_proofs);
        }

        info!(rounds = ROUNDS, "proof assembled");
        Ok(Proof { nonces, proofs })
    }

    fn prove_round(&self, j: u32) -> Result<(u64, Vec<MerkleProof>), ProverError> {
        let j_bytes = math::encode_minimal_be(u64::from(j));
        let t_table_size = self.params.table_size();

        let mut nonce: u64 = 0;
        loop {
            nonce += 1;
            let nonce_bytes = nonce.to_be_bytes();

            // Every round index below is its own freshly computed value:
            // nothing here is accumulated into a shared buffer across `t`,
            // so there is no risk of one slot's reduction aliasing another's
            // (the nested-search implementation this is grounded on has a
            // documented bug of exactly that shape).
            let mut indices = Vec::with_capacity(ROUNDS as usize);
            for t in 0..ROUNDS {
                let t_bytes = math::encode_minimal_be(u64::from(t));
                let digest = hash::hash(&[
                    &nonce_bytes,
                    self.params.id(),
                    &j_bytes,
                    &t_bytes,
                ]);
                let index = digest_mod(&digest, t_table_size);
                indices.push(index);
            }

            let round_proofs = self.read_proofs(&indices)?;
            let probe = self.path_probe(&indices, &round_proofs)?;

            // accept iff probe <= mask, i.e. iff probe is not strictly
            // greater than mask.
            if !math::be_bytes_less_than(&self.mask, &probe) {
                debug!(round = j, nonce, "round accepted");
                return Ok((nonce, round_proofs));
            }
        }
    }

    fn read_proofs(&self, indices: &[u64]) -> Result<Vec<MerkleProof>, MerkleError> {
        self.tree.read_proofs(indices, self.params.n())
    }

    fn path_probe(
        &self,
        indices: &[u64],
        proofs: &[MerkleProof],
    ) -> Result<[u8; WB], ProverError> {
        let mut index_bytes = Vec::with_capacity(indices.len());
        let mut data_bytes = Vec::with_capacity(indices.len());
        for &idx in indices {
            index_bytes.push(math::encode_minimal_be(idx));
            data_bytes.push(
                self.table
                    .read_bytes(idx)
                    .map_err(|e| ProverError::Table(TableError::Store(e)))?,
            );
        }

        let sibling_bytes: Vec<Vec<u8>> = proofs
            .iter()
            .map(|proof| {
                let mut concatenated = Vec::with_capacity(proof.len() * WB);
                for node in proof {
                    concatenated.extend_from_slice(&node.label);
                }
                concatenated
            })
            .collect();

        let mut parts: Vec<&[u8]> = Vec::with_capacity(indices.len() * 3);
        for b in &index_bytes {
            parts.push(b);
        }
        for b in &data_bytes {
            parts.push(b);
        }
        for b in &sibling_bytes {
            parts.push(b);
        }

        Ok(hash::hash(&parts))
    }
}

/// Reduces a big-endian digest modulo `modulus` by repeated byte-wise
/// long division, since the table size can exceed `u64` only in the
/// exponent (`n <= 63`) but digests are always 32 bytes.
fn digest_mod(digest: &[u8; WB], modulus: u64) -> u64 {
    let mut remainder: u128 = 0;
    for &byte in digest {
        remainder = (remainder << 8 | u128::from(byte)) % u128::from(modulus);
    }
    remainder as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_mod_is_within_range() {
        let digest = [0xffu8; WB];
        let modulus = 2048u64;
        let r = digest_mod(&digest, modulus);
        assert!(r < modulus);
    }

    #[test]
    fn digest_mod_is_deterministic() {
        let digest = [0x42u8; WB];
        assert_eq!(digest_mod(&digest, 1024), digest_mod(&digest, 1024));
    }
}
