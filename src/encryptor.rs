//! Public-key encryption of plaintext polynomials.

use std::sync::Arc;

use log::trace;
use rand::{CryptoRng, Rng};

use crate::ciphertext::Ciphertext;
use crate::context::BfvContext;
use crate::error::{BfvError, Result};
use crate::keys::PublicKey;
use crate::plaintext::Plaintext;
use crate::sampling;

/// Encrypts plaintexts under a public key.
///
/// Every call draws fresh randomness u, e1, e2; the `CryptoRng` bound and
/// the by-value sampling make reuse of randomness across calls impossible
/// by construction.
pub struct Encryptor {
    ctx: Arc<BfvContext>,
    public_key: PublicKey,
}

impl Encryptor {
    /// Bind an encryptor to a session and a matching public key.
    pub fn new(ctx: Arc<BfvContext>, public_key: PublicKey) -> Result<Self> {
        ctx.check_public_key(&public_key)?;
        Ok(Self { ctx, public_key })
    }

    /// Encrypt one plaintext.
    ///
    /// c0 = p0·u + e1 + Δ·m, c1 = p1·u + e2. The result carries the
    /// session's maximal noise budget for the current modulus level.
    pub fn encrypt<R: Rng + CryptoRng>(
        &self,
        plaintext: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let n = self.ctx.params().poly_degree();
        let t = self.ctx.params().plain_modulus();
        if plaintext.coeffs.len() > n || plaintext.coeffs.iter().any(|&c| c >= t) {
            return Err(BfvError::EncodingRange(
                "plaintext polynomial is not valid for these parameters".into(),
            ));
        }

        let q = self.ctx.coeff_modulus();
        let u = sampling::ternary_poly(n, q, rng);
        let e1 = sampling::error_poly(n, q, rng);
        let e2 = sampling::error_poly(n, q, rng);

        let c0 = &(&self.ctx.ring_mul(&self.public_key.p0, &u) + &e1) + &self.ctx.scale_up(plaintext);
        let c1 = &self.ctx.ring_mul(&self.public_key.p1, &u) + &e2;

        trace!(
            "fresh ciphertext under context {} with noise budget {} bits",
            self.ctx.id(),
            self.ctx.max_noise_budget()
        );
        Ok(Ciphertext {
            c0,
            c1,
            level: self.ctx.level(),
            context_id: self.ctx.id(),
            noise_budget: self.ctx.max_noise_budget(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::IntegerEncoder;
    use crate::keys::KeyGenerator;
    use crate::params::{suggest_coeff_modulus, EncryptionParameters};
    use rand::thread_rng;

    fn session() -> (Arc<BfvContext>, Encryptor, IntegerEncoder) {
        let chain = suggest_coeff_modulus(64, &[40]).unwrap();
        let params = EncryptionParameters::new(64, chain, 257).unwrap();
        let ctx = BfvContext::new(params).unwrap();
        let (_, pk) = KeyGenerator::new(ctx.clone()).generate(&mut thread_rng());
        let encryptor = Encryptor::new(ctx.clone(), pk).unwrap();
        let encoder = IntegerEncoder::new(ctx.clone());
        (ctx, encryptor, encoder)
    }

    #[test]
    fn test_fresh_ciphertext_is_tagged() {
        let (ctx, encryptor, encoder) = session();
        let ct = encryptor
            .encrypt(&encoder.encode(42).unwrap(), &mut thread_rng())
            .unwrap();
        assert_eq!(ct.context_id(), ctx.id());
        assert_eq!(ct.level(), ctx.level());
        assert_eq!(ct.noise_budget(), ctx.max_noise_budget());
    }

    #[test]
    fn test_encryption_is_randomized() {
        let (_, encryptor, encoder) = session();
        let pt = encoder.encode(42).unwrap();
        let mut rng = thread_rng();
        let a = encryptor.encrypt(&pt, &mut rng).unwrap();
        let b = encryptor.encrypt(&pt, &mut rng).unwrap();
        assert_ne!(a.c0.coeffs, b.c0.coeffs);
        assert_ne!(a.c1.coeffs, b.c1.coeffs);
    }

    #[test]
    fn test_rejects_foreign_public_key() {
        let (_, _, _) = session();
        let chain = suggest_coeff_modulus(64, &[40]).unwrap();
        let params = EncryptionParameters::new(64, chain, 257).unwrap();
        let ctx_a = BfvContext::new(params.clone()).unwrap();
        let ctx_b = BfvContext::new(params).unwrap();
        let (_, pk_a) = KeyGenerator::new(ctx_a).generate(&mut thread_rng());
        assert!(matches!(
            Encryptor::new(ctx_b, pk_a),
            Err(BfvError::ParameterMismatch(_))
        ));
    }
}
