//! Runs the full generate -> build -> prove pipeline against temporary
//! files, the way a caller actually drives this crate.

mod scenario;
