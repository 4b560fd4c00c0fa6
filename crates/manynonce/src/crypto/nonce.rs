//! Per-layer nonce generation.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use manynonce_common::protocol::NONCE_LEN;
use manynonce_common::LayerError;

/// Source of fresh 96-bit nonces, one per layer.
///
/// Implementations must return independent, uniformly random bytes on every
/// call; nonces are never tracked or deduplicated across calls.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource {
    /// Fill `nonce` with fresh random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::RandomnessUnavailable`] if the source fails.
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), LayerError>;
}

/// Nonces drawn from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), LayerError> {
        OsRng
            .try_fill_bytes(nonce)
            .map_err(|e| LayerError::RandomnessUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_source_fills_distinct_nonces() {
        let source = OsNonceSource;
        let mut a = [0u8; NONCE_LEN];
        let mut b = [0u8; NONCE_LEN];
        source.fill_nonce(&mut a).unwrap();
        source.fill_nonce(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn mock_source_reports_failure() {
        let mut source = MockNonceSource::new();
        source
            .expect_fill_nonce()
            .returning(|_| Err(LayerError::RandomnessUnavailable("entropy".into())));
        let mut nonce = [0u8; NONCE_LEN];
        assert_eq!(
            source.fill_nonce(&mut nonce),
            Err(LayerError::RandomnessUnavailable("entropy".into()))
        );
    }
}
