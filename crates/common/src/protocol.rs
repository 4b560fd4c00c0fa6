//! Envelope layout: sizes, length arithmetic, and the armored text form.
//!
//! # Binary layout
//!
//! ```text
//! envelope = nonce_N || [ nonce_(N-1) || [ ... [ message ] ... ] ] || tag_N
//! ```
//!
//! Brackets mark the bytes encrypted by the enclosing layer; each inner layer
//! carries its own tag at its end.
//!
//! Layer `N` is created last, sits outermost, and is removed first. Every
//! layer adds exactly [`LAYER_OVERHEAD`] bytes.
//!
//! # Armored form
//!
//! ```text
//! v1.<layers>.<base64url-no-pad(envelope)>
//! ```
//!
//! The armor carries the layer count alongside the bytes so an envelope can be
//! stored without a side channel for `N`. The binary layout inside is unchanged.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::LayerError;

/// Byte length of an AES-GCM nonce (96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// Bytes added to the payload by each layer.
pub const LAYER_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Accepted master key lengths (AES-128, AES-192, AES-256).
pub const KEY_LENS: [usize; 3] = [16, 24, 32];

/// Prefix that appears at the start of every armored envelope.
pub const VERSION_PREFIX: &str = "v1";

/// Smallest envelope that can hold `layers` layers, or `None` on overflow.
pub fn min_envelope_len(layers: usize) -> Option<usize> {
    layers.checked_mul(LAYER_OVERHEAD)
}

/// Length of the envelope produced by sealing `message_len` bytes `layers` times.
pub fn sealed_len(message_len: usize, layers: usize) -> Option<usize> {
    min_envelope_len(layers)?.checked_add(message_len)
}

/// An envelope bundled with the number of layers it was sealed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArmoredEnvelope {
    /// Number of layers applied; always at least 1.
    pub layers: u32,
    /// Raw envelope bytes.
    pub bytes: Vec<u8>,
}

impl ArmoredEnvelope {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}.{}.{}",
            VERSION_PREFIX,
            self.layers,
            URL_SAFE_NO_PAD.encode(&self.bytes),
        )
    }
}

impl fmt::Display for ArmoredEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_repr())
    }
}

impl FromStr for ArmoredEnvelope {
    type Err = LayerError;

    /// Parse `v1.<layers>.<base64url>` back into an [`ArmoredEnvelope`].
    ///
    /// Fails with [`LayerError::MalformedInput`] on a bad prefix, a bad or zero
    /// layer count, bad base64, or a payload too short for its layer count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LayerError::MalformedInput {
            len: s.len(),
            required: LAYER_OVERHEAD,
        };

        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != VERSION_PREFIX {
            return Err(malformed());
        }
        let layers: u32 = parts[1].parse().map_err(|_| malformed())?;
        if layers == 0 {
            return Err(malformed());
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| malformed())?;

        let required = usize::try_from(layers)
            .ok()
            .and_then(min_envelope_len)
            .unwrap_or(usize::MAX);
        if bytes.len() < required {
            return Err(LayerError::MalformedInput {
                len: bytes.len(),
                required,
            });
        }

        Ok(Self { layers, bytes })
    }
}

impl TryFrom<String> for ArmoredEnvelope {
    type Error = LayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArmoredEnvelope> for String {
    fn from(value: ArmoredEnvelope) -> Self {
        value.to_string_repr()
    }
}
