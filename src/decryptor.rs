//! Secret-key decryption with explicit noise verification.

use std::sync::Arc;

use log::debug;

use crate::ciphertext::Ciphertext;
use crate::context::{margin_bits, BfvContext};
use crate::error::{BfvError, Result};
use crate::keys::SecretKey;
use crate::plaintext::Plaintext;

/// Decrypts ciphertexts; deterministic given its inputs.
pub struct Decryptor {
    ctx: Arc<BfvContext>,
    secret_key: SecretKey,
}

impl Decryptor {
    /// Bind a decryptor to a session and a matching secret key.
    pub fn new(ctx: Arc<BfvContext>, secret_key: SecretKey) -> Result<Self> {
        ctx.check_secret_key(&secret_key)?;
        Ok(Self { ctx, secret_key })
    }

    /// Recover the plaintext, or fail with `NoiseBudgetExhausted` when
    /// either the tracked budget has reached zero or the measured rounding
    /// margin has no whole bit left. A corrupted value is never returned
    /// silently.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Plaintext> {
        self.ctx.check_ciphertext(ciphertext)?;
        if ciphertext.noise_budget() == 0 {
            return Err(BfvError::NoiseBudgetExhausted);
        }

        let (coeffs, dist) = decrypt_with_noise(&self.ctx, &self.secret_key, ciphertext);
        let measured = margin_bits(self.ctx.coeff_modulus(), dist);
        debug!(
            "decrypting with measured margin {} bits (tracked estimate {})",
            measured,
            ciphertext.noise_budget()
        );
        if measured == 0 {
            return Err(BfvError::NoiseBudgetExhausted);
        }
        Ok(Plaintext { coeffs })
    }
}

/// Raw decryption: per coefficient m = round(t·w/q) mod t for
/// w = c0 + c1·s, together with the largest distance of t·w from a
/// multiple of q. The distance is the measured noise; correctness of the
/// rounding requires it to stay below q/2.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decrypt_with_noise(
    ctx: &BfvContext,
    secret_key: &SecretKey,
    ciphertext: &Ciphertext,
) -> (Vec<u64>, u128) {
    let w = &ciphertext.c0 + &ctx.ring_mul(&ciphertext.c1, &secret_key.s);
    let q = ctx.coeff_modulus();
    let t = u128::from(ctx.params().plain_modulus());

    let mut worst = 0u128;
    let coeffs = w
        .coeffs
        .iter()
        .map(|&wj| {
            let prod = t * wj;
            let m = ((prod + q / 2) / q) % t;
            let rem = prod % q;
            worst = worst.max(rem.min(q - rem));
            m as u64
        })
        .collect();
    (coeffs, worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::IntegerEncoder;
    use crate::encryptor::Encryptor;
    use crate::keys::KeyGenerator;
    use crate::params::{suggest_coeff_modulus, EncryptionParameters};
    use rand::thread_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn session(
        n: usize,
        widths: &[u32],
        t: u64,
    ) -> (Arc<BfvContext>, Encryptor, Decryptor, IntegerEncoder) {
        let chain = suggest_coeff_modulus(n, widths).unwrap();
        let params = EncryptionParameters::new(n, chain, t).unwrap();
        let ctx = BfvContext::new(params).unwrap();
        let (sk, pk) = KeyGenerator::new(ctx.clone()).generate(&mut thread_rng());
        let encryptor = Encryptor::new(ctx.clone(), pk).unwrap();
        let decryptor = Decryptor::new(ctx.clone(), sk).unwrap();
        let encoder = IntegerEncoder::new(ctx.clone());
        (ctx, encryptor, decryptor, encoder)
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let (_, encryptor, decryptor, encoder) = session(64, &[40], 257);
        let mut rng = thread_rng();
        for v in [-128i64, -17, -1, 0, 1, 42, 128] {
            let ct = encryptor.encrypt(&encoder.encode(v).unwrap(), &mut rng).unwrap();
            let pt = decryptor.decrypt(&ct).unwrap();
            assert_eq!(encoder.decode(&pt), v, "round trip failed for {v}");
        }
    }

    #[test]
    fn test_vector_round_trip() {
        let (_, encryptor, decryptor, encoder) = session(64, &[40], 257);
        let values: Vec<i64> = (-32..32).collect();
        let ct = encryptor
            .encrypt(&encoder.encode_vector(&values).unwrap(), &mut thread_rng())
            .unwrap();
        let pt = decryptor.decrypt(&ct).unwrap();
        assert_eq!(&encoder.decode_vector(&pt)[..values.len()], &values[..]);
    }

    #[test]
    fn test_multi_prime_chain_round_trip() {
        let (_, encryptor, decryptor, encoder) = session(64, &[30, 31, 32], 65537);
        let mut rng = thread_rng();
        for v in [-32768i64, -1, 0, 1, 32768] {
            let ct = encryptor.encrypt(&encoder.encode(v).unwrap(), &mut rng).unwrap();
            assert_eq!(encoder.decode(&decryptor.decrypt(&ct).unwrap()), v);
        }
    }

    #[test]
    fn test_decryption_is_deterministic() {
        let (_, encryptor, decryptor, encoder) = session(64, &[40], 257);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let ct = encryptor.encrypt(&encoder.encode(99).unwrap(), &mut rng).unwrap();
        assert_eq!(decryptor.decrypt(&ct).unwrap(), decryptor.decrypt(&ct).unwrap());
    }

    #[test]
    fn test_rejects_foreign_ciphertext() {
        let (_, encryptor_a, _, encoder_a) = session(64, &[40], 257);
        let (_, _, decryptor_b, _) = session(64, &[40], 257);
        let ct = encryptor_a
            .encrypt(&encoder_a.encode(5).unwrap(), &mut thread_rng())
            .unwrap();
        assert!(matches!(
            decryptor_b.decrypt(&ct),
            Err(BfvError::ParameterMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_secret_key() {
        let chain = suggest_coeff_modulus(64, &[40]).unwrap();
        let params = EncryptionParameters::new(64, chain, 257).unwrap();
        let ctx_a = BfvContext::new(params.clone()).unwrap();
        let ctx_b = BfvContext::new(params).unwrap();
        let (sk_a, _) = KeyGenerator::new(ctx_a).generate(&mut thread_rng());
        assert!(matches!(
            Decryptor::new(ctx_b, sk_a),
            Err(BfvError::ParameterMismatch(_))
        ));
    }
}
