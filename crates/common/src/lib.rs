//! Error taxonomy and envelope layout shared across `manynonce` crates.

pub mod error;
pub mod protocol;

pub use error::LayerError;
pub use protocol::ArmoredEnvelope;
