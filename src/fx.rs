//! Fast, non-cryptographic hash collections used throughout the crate.
//!
//! The matcher and simplifier are hot loops over small keys (expression
//! hashes, lookup indices); `rustc-hash`'s `FxHash` trades DoS-resistance
//! for speed, which is the right trade here since inputs are never
//! adversarial network data.

pub use rustc_hash::FxHashMap;
