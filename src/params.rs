//! Encryption parameters: ring dimension, coefficient modulus chain,
//! plaintext modulus.

use crate::arith::is_prime_u64;
use crate::error::{BfvError, Result};
use num_integer::Integer;
use serde::{Deserialize, Serialize};

/// Smallest supported ring dimension.
pub const MIN_RING_DIM: usize = 8;
/// Largest supported ring dimension.
pub const MAX_RING_DIM: usize = 32768;

/// Chain primes are capped at 61 bits so butterfly sums stay inside u64.
const MAX_MODULUS_BITS: u32 = 61;
const MIN_MODULUS_BITS: u32 = 12;

/// The algebraic setup of a session: ring dimension N (power of two),
/// ordered chain of coefficient moduli, and plaintext modulus t.
///
/// Immutable once constructed; shared by reference across every other
/// component for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParameters {
    poly_degree: usize,
    coeff_modulus: Vec<u64>,
    plain_modulus: u64,
}

impl EncryptionParameters {
    /// Validate and construct a parameter set.
    pub fn new(poly_degree: usize, coeff_modulus: Vec<u64>, plain_modulus: u64) -> Result<Self> {
        let params = Self {
            poly_degree,
            coeff_modulus,
            plain_modulus,
        };
        params.validate()?;
        Ok(params)
    }

    /// Ring dimension N.
    #[must_use]
    pub fn poly_degree(&self) -> usize {
        self.poly_degree
    }

    /// The coefficient modulus chain, in the order it was given.
    #[must_use]
    pub fn coeff_modulus(&self) -> &[u64] {
        &self.coeff_modulus
    }

    /// Plaintext modulus t.
    #[must_use]
    pub fn plain_modulus(&self) -> u64 {
        self.plain_modulus
    }

    /// The active coefficient modulus q = product of the chain.
    /// Assumes `validate` has passed.
    pub(crate) fn coeff_modulus_product(&self) -> u128 {
        self.coeff_modulus
            .iter()
            .fold(1u128, |acc, &qi| acc * u128::from(qi))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let n = self.poly_degree;
        if !n.is_power_of_two() || !(MIN_RING_DIM..=MAX_RING_DIM).contains(&n) {
            return Err(BfvError::InvalidParameters(format!(
                "ring dimension {n} must be a power of two in [{MIN_RING_DIM}, {MAX_RING_DIM}]"
            )));
        }
        if self.coeff_modulus.is_empty() {
            return Err(BfvError::InvalidParameters(
                "coefficient modulus chain is empty".into(),
            ));
        }
        let two_n = 2 * n as u64;
        for &qi in &self.coeff_modulus {
            if qi >= 1u64 << MAX_MODULUS_BITS {
                return Err(BfvError::InvalidParameters(format!(
                    "coefficient modulus {qi} exceeds {MAX_MODULUS_BITS} bits"
                )));
            }
            if !is_prime_u64(qi) {
                return Err(BfvError::InvalidParameters(format!(
                    "coefficient modulus {qi} is not prime"
                )));
            }
            if qi % two_n != 1 {
                return Err(BfvError::InvalidParameters(format!(
                    "coefficient modulus {qi} is not congruent to 1 mod 2N = {two_n}"
                )));
            }
        }
        for (i, &qi) in self.coeff_modulus.iter().enumerate() {
            for &qj in &self.coeff_modulus[i + 1..] {
                if qi.gcd(&qj) != 1 {
                    return Err(BfvError::InvalidParameters(format!(
                        "coefficient moduli {qi} and {qj} are not coprime"
                    )));
                }
            }
        }
        let t = self.plain_modulus;
        let smallest = *self.coeff_modulus.iter().min().unwrap_or(&0);
        if t < 2 {
            return Err(BfvError::InvalidParameters(
                "plaintext modulus must be at least 2".into(),
            ));
        }
        if t >= smallest {
            return Err(BfvError::InvalidParameters(format!(
                "plaintext modulus {t} must be smaller than the smallest coefficient modulus {smallest}"
            )));
        }
        // decryption computes t·w + q/2 over u128; keep two spare bits
        let product = self
            .coeff_modulus
            .iter()
            .try_fold(1u128, |acc, &qi| acc.checked_mul(u128::from(qi)));
        let fits = product
            .and_then(|q| q.checked_mul(u128::from(t)))
            .and_then(|qt| qt.checked_mul(4));
        if fits.is_none() {
            return Err(BfvError::InvalidParameters(
                "coefficient modulus chain is too large for 128-bit arithmetic".into(),
            ));
        }
        Ok(())
    }
}

/// Search for distinct NTT-friendly primes of the requested bit widths,
/// largest first within each width.
pub fn suggest_coeff_modulus(poly_degree: usize, bit_sizes: &[u32]) -> Result<Vec<u64>> {
    if !poly_degree.is_power_of_two() || !(MIN_RING_DIM..=MAX_RING_DIM).contains(&poly_degree) {
        return Err(BfvError::InvalidParameters(format!(
            "ring dimension {poly_degree} must be a power of two in [{MIN_RING_DIM}, {MAX_RING_DIM}]"
        )));
    }
    let two_n = 2 * poly_degree as u64;
    let mut picked: Vec<u64> = Vec::with_capacity(bit_sizes.len());
    for &bits in bit_sizes {
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
            return Err(BfvError::InvalidParameters(format!(
                "requested modulus width {bits} outside [{MIN_MODULUS_BITS}, {MAX_MODULUS_BITS}] bits"
            )));
        }
        let upper = (1u64 << bits) - 1;
        let lower = 1u64 << (bits - 1);
        let mut candidate = upper - (upper % two_n) + 1;
        if candidate > upper {
            candidate -= two_n;
        }
        let mut found = None;
        while candidate >= lower {
            if is_prime_u64(candidate) && !picked.contains(&candidate) {
                found = Some(candidate);
                break;
            }
            match candidate.checked_sub(two_n) {
                Some(next) => candidate = next,
                None => break,
            }
        }
        match found {
            Some(q) => picked.push(q),
            None => {
                return Err(BfvError::InvalidParameters(format!(
                    "no {bits}-bit NTT-friendly prime exists for N = {poly_degree}"
                )))
            }
        }
    }
    Ok(picked)
}
