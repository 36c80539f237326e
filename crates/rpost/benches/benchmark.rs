//! Micro-benchmarks for the hot loops: table generation and Merkle building.
//!
//! Run with `cargo bench`. Sizes are kept small (`n <= 14`) since generation
//! time grows with `2^n * 2^l`.

use rpost::{labelstore::LabelWriter, merkle, params::Params, table};

fn main() {
    let _ = tracing_subscriber::fmt::try_init();
    divan::main();
}

#[divan::bench(args = [8, 10, 12])]
fn generate_table(bencher: divan::Bencher, n: u32) {
    let params = Params::new(b"benchmark commitment".to_vec(), n, 8).unwrap();
    bencher.bench_local(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");
        table::generate(&params, &path).unwrap();
    });
}

#[divan::bench(args = [8, 10, 12])]
fn build_merkle_tree(bencher: divan::Bencher, n: u32) {
    let params = Params::new(b"benchmark commitment".to_vec(), n, 8).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.bin");
    let words = table::generate_collecting(&params, &table_path).unwrap();
    let table_reader = table::in_memory_reader(words, params.l());

    bencher.bench_local(|| {
        let tree_dir = tempfile::tempdir().unwrap();
        let tree_path = tree_dir.path().join("tree.bin");
        let mut writer = LabelWriter::create(&tree_path).unwrap();
        merkle::build(&table_reader, &mut writer, params.tree_height()).unwrap();
    });
}
