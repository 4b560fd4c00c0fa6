//! Layered AES-GCM encryption.
//!
//! A message is sealed under N authenticated-encryption layers, each with its
//! own freshly drawn 96-bit nonce, all keyed by one master key. Opening strips
//! the layers in reverse order and fails on the first layer that does not
//! verify.
//!
//! ```
//! let key = [0u8; 32];
//! let envelope = manynonce::seal(b"hello", &key, 3)?;
//! assert_eq!(envelope.len(), 5 + 3 * 28);
//! assert_eq!(manynonce::open(&envelope, &key, 3)?, b"hello");
//! # Ok::<(), manynonce::LayerError>(())
//! ```
//!
//! The transform is pure: no global state, no caching between calls.
//! [`config`] and [`telemetry`] are conveniences for embedding applications.

pub mod config;
pub mod crypto;
pub mod telemetry;

pub use config::Config;
pub use crypto::{open, open_armored, seal, seal_armored, LayeredCipher, NonceSource};
pub use manynonce_common::protocol;
pub use manynonce_common::{ArmoredEnvelope, LayerError};
