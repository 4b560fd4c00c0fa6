//! Error taxonomy for the layered transform.

use thiserror::Error;

/// Every way a seal or open call can fail.
///
/// Each variant maps to a stable machine-readable code (see [`LayerError::code`])
/// for callers that surface failures through their own APIs or log pipelines.
/// No variant ever carries key, nonce or plaintext bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// The layer count is zero, negative, or not representable on this platform.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The key is not a valid AES key length (16, 24 or 32 bytes).
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKey(usize),

    /// The envelope is too short to hold the declared number of layers, or an
    /// armored envelope could not be parsed.
    #[error("malformed input: {len} bytes, at least {required} required")]
    MalformedInput {
        /// Bytes actually supplied.
        len: usize,
        /// Bytes needed to strip the declared layers.
        required: usize,
    },

    /// A layer's tag failed to verify: tampering, wrong key, or wrong layer count.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// The OS random source could not supply nonce bytes.
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

impl LayerError {
    /// Returns the stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            LayerError::InvalidParameter(_) => "invalid_parameter",
            LayerError::InvalidKey(_) => "invalid_key",
            LayerError::MalformedInput { .. } => "malformed_input",
            LayerError::AuthenticationFailure => "authentication_failure",
            LayerError::RandomnessUnavailable(_) => "randomness_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(
            LayerError::InvalidParameter("x".into()).code(),
            "invalid_parameter"
        );
        assert_eq!(LayerError::InvalidKey(7).code(), "invalid_key");
        assert_eq!(
            LayerError::MalformedInput {
                len: 1,
                required: 28
            }
            .code(),
            "malformed_input"
        );
        assert_eq!(
            LayerError::AuthenticationFailure.code(),
            "authentication_failure"
        );
        assert_eq!(
            LayerError::RandomnessUnavailable("x".into()).code(),
            "randomness_unavailable"
        );
    }

    #[test]
    fn display_includes_lengths() {
        let e = LayerError::MalformedInput {
            len: 10,
            required: 84,
        };
        let msg = e.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("84"));
        assert!(LayerError::InvalidKey(20).to_string().contains("20"));
    }
}
