//! Property-based tests for the quantified invariants in the bit-packed
//! store and the mask/probability helpers.

use proptest::prelude::*;
use rpost::{
    bitstore::{StoreReader, StoreWriter, WordReader},
    math,
};

proptest! {
    /// For all `(l, data[])` with each entry in `[0, 2^l)`, writing then
    /// reading returns the original sequence, and the file size equals
    /// `ceil(N*l/8)`.
    #[test]
    fn bit_store_round_trips(
        l in 1u32..32,
        values in proptest::collection::vec(0u64..(1u64 << 31), 1..64),
    ) {
        let masked: Vec<u64> = values.iter().map(|v| v & math::get_simple_mask(l)).collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let mut writer = StoreWriter::create(&path).unwrap();
        for &v in &masked {
            writer.write(v, l).unwrap();
        }
        writer.finalize().unwrap();

        let expected_bytes = (masked.len() as u64 * u64::from(l)).div_ceil(8);
        let actual_bytes = std::fs::metadata(&path).unwrap().len();
        prop_assert_eq!(actual_bytes, expected_bytes);

        let reader = StoreReader::open(&path, l).unwrap();
        for (idx, &expected) in masked.iter().enumerate() {
            prop_assert_eq!(reader.read_u64(idx as u64).unwrap(), expected);
        }
    }

    /// `get_simple_mask(l)` always has exactly `l` one bits, all in the low
    /// `l` positions.
    #[test]
    fn simple_mask_has_exactly_l_one_bits(l in 0u32..64) {
        let mask = math::get_simple_mask(l);
        prop_assert_eq!(mask.count_ones(), l);
        prop_assert_eq!(mask >> l, 0);
    }

    /// `get_probability` and `get_difficulty` round-trip: feeding the
    /// probability for `l` back through `get_difficulty` recovers `l`.
    #[test]
    fn probability_and_difficulty_round_trip(l in 0u32..40) {
        let p = math::get_probability(l);
        prop_assert_eq!(math::get_difficulty(p), l);
    }
}
