//! Error taxonomy for the BFV engine.

use thiserror::Error;

/// Failure kinds surfaced by the engine.
///
/// `InvalidParameters` is fatal at setup; everything else is recoverable by
/// the caller (pick a different value, stop mixing contexts, supply an
/// operand, or re-encrypt from plaintext). Nothing is retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BfvError {
    /// The parameter set cannot form a valid session.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A value does not fit the plaintext modulus without ambiguity.
    #[error("value out of encodable range: {0}")]
    EncodingRange(String),

    /// Operands were produced under different contexts or modulus levels.
    #[error("parameter mismatch: {0}")]
    ParameterMismatch(String),

    /// An operand list was empty.
    #[error("operand list is empty")]
    EmptyInput,

    /// Accumulated noise no longer guarantees correct decryption rounding.
    /// Recoverable only by re-encrypting from plaintext.
    #[error("noise budget exhausted; re-encrypt from plaintext to continue")]
    NoiseBudgetExhausted,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BfvError>;
