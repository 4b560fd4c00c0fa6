//! Single-layer AES-GCM seal and open under the caller's master key.
//!
//! The key size picks the variant: 16 bytes → AES-128-GCM, 24 → AES-192-GCM,
//! 32 → AES-256-GCM. All three use a 96-bit nonce and a 128-bit tag, and no
//! associated data.

use std::fmt;

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use manynonce_common::protocol::{KEY_LENS, NONCE_LEN, TAG_LEN};
use manynonce_common::LayerError;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Owned copy of the caller's master key.
///
/// The buffer is overwritten with zeroes on drop.
pub struct MasterKey(Box<[u8]>);

impl MasterKey {
    /// Copy `key` into a new [`MasterKey`].
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidKey`] unless `key` is 16, 24 or 32 bytes.
    pub fn from_slice(key: &[u8]) -> Result<Self, LayerError> {
        if !KEY_LENS.contains(&key.len()) {
            return Err(LayerError::InvalidKey(key.len()));
        }
        Ok(Self(key.into()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// AES-GCM keyed once and reused for every layer of a call.
#[derive(Clone)]
pub enum LayerCipher {
    /// 16-byte key.
    Aes128(Aes128Gcm),
    /// 24-byte key.
    Aes192(Aes192Gcm),
    /// 32-byte key.
    Aes256(Aes256Gcm),
}

impl LayerCipher {
    /// Build the cipher matching the master key's length.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidKey`] if the key is not 16, 24 or 32 bytes.
    pub fn new(key: &MasterKey) -> Result<Self, LayerError> {
        let bytes = key.as_bytes();
        let invalid = |_| LayerError::InvalidKey(bytes.len());
        match bytes.len() {
            16 => Aes128Gcm::new_from_slice(bytes).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(bytes).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(bytes).map(Self::Aes256).map_err(invalid),
            other => Err(LayerError::InvalidKey(other)),
        }
    }

    /// Encrypt one layer, returning `ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidParameter`] if the plaintext exceeds the
    /// AES-GCM length limit.
    pub fn seal_layer(
        &self,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, LayerError> {
        let nonce = Nonce::from_slice(nonce);
        let sealed = match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| {
            LayerError::InvalidParameter(format!(
                "{} byte plaintext exceeds the AES-GCM length limit",
                plaintext.len()
            ))
        })
    }

    /// Verify and decrypt one layer body (`ciphertext || tag`).
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::AuthenticationFailure`] if the tag does not verify.
    pub fn open_layer(&self, nonce: &[u8; NONCE_LEN], body: &[u8]) -> Result<Vec<u8>, LayerError> {
        if body.len() < TAG_LEN {
            return Err(LayerError::AuthenticationFailure);
        }
        let nonce = Nonce::from_slice(nonce);
        let opened = match self {
            Self::Aes128(c) => c.decrypt(nonce, body),
            Self::Aes192(c) => c.decrypt(nonce, body),
            Self::Aes256(c) => c.decrypt(nonce, body),
        };
        opened.map_err(|_| LayerError::AuthenticationFailure)
    }
}

impl fmt::Debug for LayerCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aes128(_) => "AES-128-GCM",
            Self::Aes192(_) => "AES-192-GCM",
            Self::Aes256(_) => "AES-256-GCM",
        };
        f.debug_tuple("LayerCipher").field(&name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(len: usize) -> LayerCipher {
        LayerCipher::new(&MasterKey::from_slice(&vec![0x42u8; len]).unwrap()).unwrap()
    }

    #[test]
    fn every_key_size_round_trips() {
        for len in KEY_LENS {
            let c = cipher(len);
            let nonce = [0x01; NONCE_LEN];
            let sealed = c.seal_layer(&nonce, b"hello").unwrap();
            assert_eq!(sealed.len(), 5 + TAG_LEN);
            assert_eq!(c.open_layer(&nonce, &sealed).unwrap(), b"hello");
        }
    }

    #[test]
    fn key_size_selects_variant() {
        assert!(matches!(cipher(16), LayerCipher::Aes128(_)));
        assert!(matches!(cipher(24), LayerCipher::Aes192(_)));
        assert!(matches!(cipher(32), LayerCipher::Aes256(_)));
    }

    #[test]
    fn invalid_key_length_rejected() {
        for len in [0, 1, 15, 17, 31, 33, 64] {
            let err = MasterKey::from_slice(&vec![0u8; len]).unwrap_err();
            assert_eq!(err, LayerError::InvalidKey(len));
        }
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let nonce = [0x07; NONCE_LEN];
        let sealed = cipher(32).seal_layer(&nonce, b"secret").unwrap();
        let other =
            LayerCipher::new(&MasterKey::from_slice(&[0x43u8; 32]).unwrap()).unwrap();
        assert_eq!(
            other.open_layer(&nonce, &sealed),
            Err(LayerError::AuthenticationFailure)
        );
    }

    #[test]
    fn wrong_nonce_fails_authentication() {
        let c = cipher(16);
        let sealed = c.seal_layer(&[0x01; NONCE_LEN], b"secret").unwrap();
        assert_eq!(
            c.open_layer(&[0x02; NONCE_LEN], &sealed),
            Err(LayerError::AuthenticationFailure)
        );
    }

    #[test]
    fn tampered_tag_fails_authentication() {
        let c = cipher(24);
        let nonce = [0x09; NONCE_LEN];
        let mut sealed = c.seal_layer(&nonce, b"tamper me").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert_eq!(
            c.open_layer(&nonce, &sealed),
            Err(LayerError::AuthenticationFailure)
        );
    }

    #[test]
    fn body_shorter_than_tag_fails_authentication() {
        assert_eq!(
            cipher(32).open_layer(&[0u8; NONCE_LEN], &[0u8; TAG_LEN - 1]),
            Err(LayerError::AuthenticationFailure)
        );
    }

    #[test]
    fn master_key_redacted_in_debug() {
        let key = MasterKey::from_slice(&[0xFFu8; 32]).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
        assert_eq!(format!("{:?}", cipher(32)), "LayerCipher(\"AES-256-GCM\")");
    }
}
