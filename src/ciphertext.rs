//! Ciphertext container.

use crate::polynomial::RingPoly;
use serde::{Deserialize, Serialize};

/// A ciphertext (c0, c1) over the active coefficient modulus, tagged with
/// the modulus level and context it was produced under and a conservative
/// noise-budget estimate in bits.
///
/// Ciphertexts are values: evaluator operations copy their inputs and
/// return a new ciphertext, so a given ciphertext never changes after
/// creation. The budget estimate starts at the session maximum on a fresh
/// encryption, drops by one bit per ciphertext-ciphertext operation, and
/// once it reaches zero every further operation and decryption fails —
/// there is no way back except re-encrypting from plaintext.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub(crate) c0: RingPoly,
    pub(crate) c1: RingPoly,
    pub(crate) level: usize,
    pub(crate) context_id: u64,
    pub(crate) noise_budget: u32,
}

impl Ciphertext {
    /// Modulus level this ciphertext was produced at.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Identity of the context that produced this ciphertext.
    #[must_use]
    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    /// Conservative remaining noise budget, in bits.
    #[must_use]
    pub fn noise_budget(&self) -> u32 {
        self.noise_budget
    }
}
