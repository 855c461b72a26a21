//! Integer encoding into plaintext polynomials.
//!
//! A signed integer v is stored in the constant coefficient as v mod t;
//! the unambiguous range is [-(t-1)/2, (t-1)/2]. Small integer vectors
//! pack one value per coefficient. Encoding is pure: no randomness, no
//! state.

use std::sync::Arc;

use crate::context::BfvContext;
use crate::error::{BfvError, Result};
use crate::plaintext::Plaintext;

/// Encodes and decodes signed integers for one session.
pub struct IntegerEncoder {
    ctx: Arc<BfvContext>,
}

impl IntegerEncoder {
    /// Bind an encoder to a session.
    #[must_use]
    pub fn new(ctx: Arc<BfvContext>) -> Self {
        Self { ctx }
    }

    /// Largest encodable magnitude, (t-1)/2.
    #[must_use]
    pub fn max_abs_value(&self) -> u64 {
        (self.ctx.params().plain_modulus() - 1) / 2
    }

    /// Encode one signed integer.
    pub fn encode(&self, value: i64) -> Result<Plaintext> {
        let max = self.max_abs_value();
        if value.unsigned_abs() > max {
            return Err(BfvError::EncodingRange(format!(
                "{value} exceeds the representable range ±{max}"
            )));
        }
        Ok(Plaintext {
            coeffs: vec![self.to_residue(value)],
        })
    }

    /// Decode the constant coefficient back to a signed integer; exact
    /// inverse of [`encode`](Self::encode) for in-range values, with
    /// wraparound mod t for homomorphic results that left the range.
    #[must_use]
    pub fn decode(&self, plaintext: &Plaintext) -> i64 {
        self.from_residue(plaintext.coeffs.first().copied().unwrap_or(0))
    }

    /// Encode up to N signed integers, one per coefficient.
    pub fn encode_vector(&self, values: &[i64]) -> Result<Plaintext> {
        let n = self.ctx.params().poly_degree();
        if values.len() > n {
            return Err(BfvError::EncodingRange(format!(
                "{} values do not fit in a ring of dimension {n}",
                values.len()
            )));
        }
        let max = self.max_abs_value();
        let mut coeffs = Vec::with_capacity(values.len());
        for &v in values {
            if v.unsigned_abs() > max {
                return Err(BfvError::EncodingRange(format!(
                    "{v} exceeds the representable range ±{max}"
                )));
            }
            coeffs.push(self.to_residue(v));
        }
        Ok(Plaintext { coeffs })
    }

    /// Decode every stored coefficient; absent trailing coefficients
    /// decode as zero on the encrypt/decrypt path.
    #[must_use]
    pub fn decode_vector(&self, plaintext: &Plaintext) -> Vec<i64> {
        plaintext
            .coeffs
            .iter()
            .map(|&c| self.from_residue(c))
            .collect()
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn to_residue(&self, value: i64) -> u64 {
        let t = self.ctx.params().plain_modulus();
        value.rem_euclid(t as i64) as u64
    }

    #[allow(clippy::cast_possible_wrap)]
    fn from_residue(&self, residue: u64) -> i64 {
        let t = self.ctx.params().plain_modulus();
        if u128::from(residue) * 2 > u128::from(t) {
            residue as i64 - t as i64
        } else {
            residue as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{suggest_coeff_modulus, EncryptionParameters};

    fn encoder(t: u64) -> IntegerEncoder {
        let chain = suggest_coeff_modulus(64, &[40]).unwrap();
        let params = EncryptionParameters::new(64, chain, t).unwrap();
        IntegerEncoder::new(BfvContext::new(params).unwrap())
    }

    #[test]
    fn test_round_trip_full_range() {
        let enc = encoder(257);
        for v in -128i64..=128 {
            let pt = enc.encode(v).unwrap();
            assert_eq!(enc.decode(&pt), v, "round trip failed for {v}");
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let enc = encoder(257);
        assert!(matches!(enc.encode(129), Err(BfvError::EncodingRange(_))));
        assert!(matches!(enc.encode(-129), Err(BfvError::EncodingRange(_))));
    }

    #[test]
    fn test_negative_values_map_into_upper_residues() {
        let enc = encoder(257);
        let pt = enc.encode(-1).unwrap();
        assert_eq!(pt.coeffs(), &[256]);
    }

    #[test]
    fn test_vector_round_trip() {
        let enc = encoder(257);
        let values = vec![-128, -1, 0, 1, 7, 128];
        let pt = enc.encode_vector(&values).unwrap();
        assert_eq!(enc.decode_vector(&pt), values);
    }

    #[test]
    fn test_vector_too_long_rejected() {
        let enc = encoder(257);
        let values = vec![1i64; 65];
        assert!(matches!(
            enc.encode_vector(&values),
            Err(BfvError::EncodingRange(_))
        ));
    }

    #[test]
    fn test_even_plain_modulus() {
        let enc = encoder(256);
        for v in [-127i64, -1, 0, 1, 127] {
            let pt = enc.encode(v).unwrap();
            assert_eq!(enc.decode(&pt), v);
        }
    }
}
