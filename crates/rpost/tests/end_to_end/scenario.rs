use hex_literal::hex;
use rpost::{
    labelstore::{LabelReader, LabelWriter},
    merkle,
    params::Params,
    prover::Prover,
    table,
};

/// A fixed 32-byte commitment, the way the teacher's own Merkle tests fix
/// their leaves via `hex!` rather than ad hoc byte strings.
const COMMITMENT: [u8; 32] =
    hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");

/// `n = 4, l = 6`: small enough to run quickly, large enough to exercise a
/// multi-level tree and more than one leaf pair.
#[test]
fn small_table_generate_build_and_prove() {
    let _ = tracing_subscriber::fmt::try_init();

    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.bin");
    let tree_path = dir.path().join("tree.bin");

    let params = Params::new(COMMITMENT.to_vec(), 4, 6).unwrap();

    let words = table::generate_collecting(&params, &table_path).unwrap();
    assert_eq!(words.len() as u64, params.table_size());
    for w in &words {
        assert!(*w < (1u64 << params.l()));
    }

    let table_reader = table::in_memory_reader(words, params.l());

    let mut writer = LabelWriter::create(&tree_path).unwrap();
    let commitment = merkle::build(&table_reader, &mut writer, params.tree_height()).unwrap();
    assert_eq!(commitment.len(), 32);

    let tree_reader = merkle::Reader::new(LabelReader::open(&tree_path, params.tree_height()).unwrap());

    // Rebuilding from the file-backed reader reproduces the same root.
    let file_reader = table::open_reader(&table_path, params.l()).unwrap();
    let rebuilt_tree_path = dir.path().join("tree-rebuilt.bin");
    let mut rebuilt_writer = LabelWriter::create(&rebuilt_tree_path).unwrap();
    let rebuilt_commitment =
        merkle::build(&file_reader, &mut rebuilt_writer, params.tree_height()).unwrap();
    assert_eq!(commitment, rebuilt_commitment);

    let prover = Prover::new(&table_reader, &tree_reader, &params);
    let proof = prover.prove().unwrap();

    assert_eq!(proof.nonces.len(), rpost::params::ROUNDS as usize);
    assert_eq!(proof.proofs.len(), rpost::params::ROUNDS as usize);
    for round_proofs in &proof.proofs {
        assert_eq!(round_proofs.len(), rpost::params::ROUNDS as usize);
        for p in round_proofs {
            assert_eq!(p.len() as u32, params.tree_height());
        }
    }
}

/// The scenario named directly in the acceptance tests: `n = 11, l = 14,
/// K = 256`. Expensive (table generation alone needs on the order of
/// `2^11 * 2^14` hash attempts), so it's excluded from the default run.
#[test]
#[ignore = "exercises the full n=11, l=14 scenario; run explicitly with --ignored"]
fn full_scale_scenario() {
    let _ = tracing_subscriber::fmt::try_init();

    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.bin");
    let tree_path = dir.path().join("tree.bin");

    // a fresh random commitment per run, rather than the fixed `COMMITMENT`
    // the cheap scenario above reuses, since this test stands in for a
    // from-scratch instance at realistic scale.
    let mut id = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut id);
    let params = Params::new(id.to_vec(), 11, 14).unwrap();

    let words = table::generate_collecting(&params, &table_path).unwrap();
    let table_reader = table::in_memory_reader(words, params.l());

    let mut writer = LabelWriter::create(&tree_path).unwrap();
    merkle::build(&table_reader, &mut writer, params.tree_height()).unwrap();
    let tree_reader = merkle::Reader::new(LabelReader::open(&tree_path, params.tree_height()).unwrap());

    let prover = Prover::new(&table_reader, &tree_reader, &params);
    let proof = prover.prove().unwrap();

    assert_eq!(proof.nonces.len(), 256);
    for round_proofs in &proof.proofs {
        for p in round_proofs {
            assert_eq!(p.len(), 10); // tree height n - 1 = 10
        }
    }
}
