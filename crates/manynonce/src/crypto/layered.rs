//! Layered seal and open: N AES-GCM passes, each behind its own random nonce.
//!
//! Sealing wraps the message N times. Each pass draws a fresh 96-bit nonce,
//! encrypts the previous pass's output, and prepends the nonce:
//!
//! ```text
//! layer_i = nonce_i || AES-GCM(key, nonce_i, layer_(i-1))      layer_0 = message
//! ```
//!
//! Opening strips layers in reverse creation order (outermost first). The
//! first failure aborts the call; partial plaintext is never returned.

use manynonce_common::protocol::{min_envelope_len, ArmoredEnvelope, LAYER_OVERHEAD, NONCE_LEN};
use manynonce_common::LayerError;
use tracing::debug;

use super::cipher::{LayerCipher, MasterKey};
use super::nonce::{NonceSource, OsNonceSource};
use crate::config::Config;

/// A validated key and layer count, reusable across many seal/open calls.
///
/// The AES key schedule is computed once in the constructor. Holds no state
/// that changes between calls, so a shared reference can be used from many
/// threads at once.
#[derive(Debug)]
pub struct LayeredCipher<S = OsNonceSource> {
    cipher: LayerCipher,
    layers: usize,
    nonces: S,
}

impl LayeredCipher<OsNonceSource> {
    /// Build a transform that draws nonces from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidParameter`] if `layers < 1`, then
    /// [`LayerError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
    pub fn new(key: &[u8], layers: i64) -> Result<Self, LayerError> {
        Self::with_nonce_source(key, layers, OsNonceSource)
    }

    /// Build a transform using the layer count from `cfg`.
    ///
    /// # Errors
    ///
    /// Same as [`LayeredCipher::new`].
    pub fn from_config(key: &[u8], cfg: &Config) -> Result<Self, LayerError> {
        Self::new(key, i64::from(cfg.layers))
    }
}

impl<S: NonceSource> LayeredCipher<S> {
    /// Build a transform with a caller-supplied nonce source.
    ///
    /// # Errors
    ///
    /// Same as [`LayeredCipher::new`].
    pub fn with_nonce_source(key: &[u8], layers: i64, nonces: S) -> Result<Self, LayerError> {
        let layers = layer_count(layers)?;
        let key = MasterKey::from_slice(key)?;
        let cipher = LayerCipher::new(&key)?;
        Ok(Self {
            cipher,
            layers,
            nonces,
        })
    }

    /// Number of layers applied by [`seal`](Self::seal) and removed by [`open`](Self::open).
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Seal `message` under all configured layers.
    ///
    /// The result is `message.len() + layers * 28` bytes long.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::RandomnessUnavailable`] if a nonce cannot be drawn.
    pub fn seal(&self, message: &[u8]) -> Result<Vec<u8>, LayerError> {
        let result = self.seal_layers(message);
        match &result {
            Ok(envelope) => debug!(
                layers = self.layers,
                message_len = message.len(),
                envelope_len = envelope.len(),
                "sealed envelope"
            ),
            Err(e) => debug!(layers = self.layers, code = e.code(), "seal failed"),
        }
        result
    }

    /// Open `envelope`, removing all configured layers.
    ///
    /// If the recovered bytes still form a layer that verifies under the key,
    /// the envelope had more layers than configured and the call fails rather
    /// than hand back residual ciphertext. As a consequence, a message that is
    /// itself an envelope under the same key must be opened with the combined
    /// layer count.
    ///
    /// # Errors
    ///
    /// - [`LayerError::MalformedInput`] if `envelope` is shorter than `layers * 28`.
    /// - [`LayerError::AuthenticationFailure`] on tampering, a wrong key, or a
    ///   wrong layer count.
    pub fn open(&self, envelope: &[u8]) -> Result<Vec<u8>, LayerError> {
        let result = self.open_layers(envelope);
        match &result {
            Ok(message) => debug!(
                layers = self.layers,
                envelope_len = envelope.len(),
                message_len = message.len(),
                "opened envelope"
            ),
            Err(e) => debug!(
                layers = self.layers,
                envelope_len = envelope.len(),
                code = e.code(),
                "open failed"
            ),
        }
        result
    }

    /// Seal `message` and bundle the result with its layer count.
    ///
    /// # Errors
    ///
    /// Same as [`seal`](Self::seal), plus [`LayerError::InvalidParameter`] if
    /// the layer count does not fit the armored form.
    pub fn seal_armored(&self, message: &[u8]) -> Result<ArmoredEnvelope, LayerError> {
        let layers = u32::try_from(self.layers).map_err(|_| {
            LayerError::InvalidParameter(format!(
                "layer count {} is too large to armor",
                self.layers
            ))
        })?;
        Ok(ArmoredEnvelope {
            layers,
            bytes: self.seal(message)?,
        })
    }

    fn seal_layers(&self, message: &[u8]) -> Result<Vec<u8>, LayerError> {
        let mut current = message.to_vec();
        for _ in 0..self.layers {
            let mut nonce = [0u8; NONCE_LEN];
            self.nonces.fill_nonce(&mut nonce)?;
            let sealed = self.cipher.seal_layer(&nonce, &current)?;

            let mut next = Vec::with_capacity(NONCE_LEN + sealed.len());
            next.extend_from_slice(&nonce);
            next.extend_from_slice(&sealed);
            current = next;
        }
        Ok(current)
    }

    fn open_layers(&self, envelope: &[u8]) -> Result<Vec<u8>, LayerError> {
        let required = min_envelope_len(self.layers).unwrap_or(usize::MAX);
        if envelope.len() < required {
            return Err(LayerError::MalformedInput {
                len: envelope.len(),
                required,
            });
        }

        let mut current = self.peel(envelope)?;
        for _ in 1..self.layers {
            current = self.peel(&current)?;
        }

        if self.still_sealed(&current) {
            return Err(LayerError::AuthenticationFailure);
        }
        Ok(current)
    }

    /// Remove one layer: split off the nonce and verify the remaining body.
    fn peel(&self, layer: &[u8]) -> Result<Vec<u8>, LayerError> {
        let (nonce, body) =
            layer
                .split_first_chunk::<NONCE_LEN>()
                .ok_or(LayerError::MalformedInput {
                    len: layer.len(),
                    required: LAYER_OVERHEAD,
                })?;
        self.cipher.open_layer(nonce, body)
    }

    fn still_sealed(&self, bytes: &[u8]) -> bool {
        bytes.len() >= LAYER_OVERHEAD && self.peel(bytes).is_ok()
    }
}

/// Seal `message` under `layers` AES-GCM layers keyed by `key`.
///
/// # Errors
///
/// - [`LayerError::InvalidParameter`] if `layers < 1` (checked first).
/// - [`LayerError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
/// - [`LayerError::RandomnessUnavailable`] if the OS CSPRNG fails.
pub fn seal(message: &[u8], key: &[u8], layers: i64) -> Result<Vec<u8>, LayerError> {
    LayeredCipher::new(key, layers)?.seal(message)
}

/// Open an envelope produced by [`seal`] with the same key and layer count.
///
/// # Errors
///
/// - [`LayerError::InvalidParameter`] if `layers < 1` (checked first).
/// - [`LayerError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
/// - [`LayerError::MalformedInput`] if `envelope` is shorter than `layers * 28`.
/// - [`LayerError::AuthenticationFailure`] on tampering, a wrong key, or a
///   wrong layer count.
pub fn open(envelope: &[u8], key: &[u8], layers: i64) -> Result<Vec<u8>, LayerError> {
    LayeredCipher::new(key, layers)?.open(envelope)
}

/// Seal `message` and bundle the envelope with its layer count.
///
/// # Errors
///
/// Same as [`seal`].
pub fn seal_armored(message: &[u8], key: &[u8], layers: u32) -> Result<ArmoredEnvelope, LayerError> {
    LayeredCipher::new(key, i64::from(layers))?.seal_armored(message)
}

/// Open an [`ArmoredEnvelope`] using the layer count it carries.
///
/// # Errors
///
/// Same as [`open`].
pub fn open_armored(armored: &ArmoredEnvelope, key: &[u8]) -> Result<Vec<u8>, LayerError> {
    open(&armored.bytes, key, i64::from(armored.layers))
}

fn layer_count(layers: i64) -> Result<usize, LayerError> {
    if layers < 1 {
        return Err(LayerError::InvalidParameter(format!(
            "layer count must be at least 1, got {layers}"
        )));
    }
    usize::try_from(layers).map_err(|_| {
        LayerError::InvalidParameter(format!("layer count {layers} exceeds platform limits"))
    })
}
