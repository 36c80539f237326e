//! Difficulty, probability, and mask helpers shared by the table generator
//! and the prover's path-probe acceptance check.

/// Returns a `u64` with the low `l` bits set to `1` and the rest `0`.
///
/// Used to mask a candidate nonce down to the `l` bits that get persisted to
/// the bit-packed store.
#[must_use]
pub fn get_simple_mask(l: u32) -> u64 {
    if l >= 64 {
        u64::MAX
    } else {
        (1u64 << l) - 1
    }
}

/// Builds a `byte_len`-byte big-endian acceptance mask with the top
/// `leading_zero_bits` bits cleared to `0` and the rest set to `1`.
///
/// Equivalently, the mask equals `2^(byte_len*8 - leading_zero_bits) - 1`
/// encoded as `byte_len` big-endian bytes.
#[must_use]
pub fn get_mask(byte_len: usize, leading_zero_bits: u32) -> Vec<u8> {
    let mut buf = vec![0xffu8; byte_len];
    clear_msb_bits(leading_zero_bits, &mut buf);
    buf
}

/// Clears the top `count` bits of `data`, read as a big-endian integer.
fn clear_msb_bits(mut count: u32, data: &mut [u8]) {
    for byte in data.iter_mut() {
        if count == 0 {
            break;
        }
        if count >= 8 {
            *byte = 0;
            count -= 8;
        } else {
            *byte &= 0xffu8 >> count;
            count = 0;
        }
    }
}

/// The acceptance probability `p = 1 / 2^l` of a single iPoW hash attempt.
#[must_use]
pub fn get_probability(l: u32) -> f64 {
    1.0 / 2f64.powi(l as i32)
}

/// Solves `p = 1 / 2^l` for `l`, rounding up.
#[must_use]
pub fn get_difficulty(p: f64) -> u32 {
    (1.0 / p).log2().ceil() as u32
}

/// Returns the maximum number of nonce attempts permitted before a table
/// entry is considered to have failed: `ceil(k / p)`.
#[must_use]
pub fn get_max_nonce_attempts(k: u32, p: f64) -> u64 {
    (f64::from(k) / p).ceil() as u64
}

/// Compares two big-endian byte buffers of equal length as unsigned
/// integers. A 256-bit digest compared against a mask this way is equivalent
/// to, but avoids pulling in, an arbitrary-precision integer type.
#[must_use]
pub fn be_bytes_less_than(lhs: &[u8], rhs: &[u8]) -> bool {
    debug_assert_eq!(lhs.len(), rhs.len());
    lhs < rhs
}

/// The minimal big-endian byte encoding of `i`: a single `0x00` byte for `0`,
/// otherwise the shortest big-endian encoding with no leading zero byte.
#[must_use]
pub fn encode_minimal_be(i: u64) -> Vec<u8> {
    if i == 0 {
        return vec![0u8];
    }
    let full = i.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0).unwrap_or(7);
    full[first_nonzero..].to_vec()
}
