//! Exercises `params::config::from_env`, gated behind the `config` feature
//! the function itself requires (run with `cargo test --features config`).

#![cfg(feature = "config")]

use rpost::params::{config, Params};

const ID_HEX: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Runs `f` with the given environment variables set, restoring the
/// environment afterward. `config::from_env` is synchronous and reads the
/// environment once per call, so this is safe as long as no other test in
/// this binary touches the same `RPOST_*` variables concurrently.
fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = f();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    result
}

#[test]
fn from_env_matches_explicit_constructor() {
    let loaded = with_env(
        &[
            ("RPOST_ID", ID_HEX),
            ("RPOST_N", "4"),
            ("RPOST_L", "6"),
        ],
        config::from_env,
    )
    .expect("valid environment should load");

    let expected = Params::new(hex::decode(ID_HEX).unwrap(), 4, 6).unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn from_env_surfaces_invalid_hex_as_an_error() {
    let result = with_env(
        &[
            ("RPOST_ID", "not valid hex"),
            ("RPOST_N", "4"),
            ("RPOST_L", "6"),
        ],
        config::from_env,
    );
    assert!(result.is_err());
}

#[test]
fn from_env_surfaces_out_of_range_parameters_as_an_error() {
    let result = with_env(
        &[("RPOST_ID", ID_HEX), ("RPOST_N", "0"), ("RPOST_L", "6")],
        config::from_env,
    );
    assert!(result.is_err());
}
