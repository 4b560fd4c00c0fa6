//! Layered AES-GCM primitives.
//!
//! This module is free of I/O and global state. It provides the single-layer
//! cipher, the nonce source, and the N-layer seal/open built on top of them.
//!
//! # Envelope format
//!
//! ```text
//! nonce_N || AES-GCM(key, nonce_N, nonce_(N-1) || AES-GCM(key, nonce_(N-1), ... ))
//! ```
//!
//! Every layer adds a 12-byte nonce in front and a 16-byte tag at the end.

pub mod cipher;
pub mod layered;
pub mod nonce;

pub use cipher::{LayerCipher, MasterKey};
pub use layered::{open, open_armored, seal, seal_armored, LayeredCipher};
pub use nonce::{NonceSource, OsNonceSource};
