//! Plaintext polynomial container.

use serde::{Deserialize, Serialize};

/// An encoded message: up to N coefficients, each in [0, t).
///
/// Produced by the encoder or by decryption; not constructed by hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plaintext {
    pub(crate) coeffs: Vec<u64>,
}

impl Plaintext {
    /// The coefficient vector, constant term first.
    #[must_use]
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }
}
