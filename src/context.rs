//! Session context: immutable precomputation derived from the encryption
//! parameters.
//!
//! Owns the transform tables, the CRT reconstruction constants and the
//! noise-budget bookkeeping. Owns no key material. Every other component
//! holds an `Arc<BfvContext>`; two contexts are never interchangeable,
//! even when built from identical parameters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itertools::izip;

use crate::arith::{mod_pow64, mulmod128, mulmod64};
use crate::ciphertext::Ciphertext;
use crate::error::{BfvError, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::ntt::NttTable;
use crate::params::EncryptionParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::RingPoly;
use crate::sampling::ERROR_BOUND;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Cached algebraic setup for one session.
pub struct BfvContext {
    params: EncryptionParameters,
    id: u64,
    coeff_modulus: u128,
    delta: u128,
    ntt_tables: Vec<NttTable>,
    q_hat: Vec<u128>,
    q_hat_inv: Vec<u64>,
    max_noise_budget: u32,
}

impl BfvContext {
    /// Derive a context from a parameter set.
    ///
    /// Re-validates the parameters (they may have arrived through
    /// deserialization) and additionally rejects sets whose worst-case
    /// fresh noise leaves no whole bit of budget.
    pub fn new(params: EncryptionParameters) -> Result<Arc<Self>> {
        params.validate()?;
        let n = params.poly_degree();
        let q = params.coeff_modulus_product();
        let t = u128::from(params.plain_modulus());

        let ntt_tables: Vec<NttTable> = params
            .coeff_modulus()
            .iter()
            .map(|&qi| NttTable::new(qi, n))
            .collect();

        let mut q_hat = Vec::with_capacity(ntt_tables.len());
        let mut q_hat_inv = Vec::with_capacity(ntt_tables.len());
        for &qi in params.coeff_modulus() {
            let hat = q / u128::from(qi);
            let hat_mod = (hat % u128::from(qi)) as u64;
            q_hat.push(hat);
            q_hat_inv.push(mod_pow64(hat_mod, qi - 2, qi));
        }

        // Worst-case distance of t·w from a multiple of q for a fresh
        // ciphertext: the Δ rounding remainder plus the sampled errors
        // e1 + e2·s - e_pk·u, each coefficient bounded by B(2N+1).
        let r_t = q % t;
        let fresh_bound =
            r_t * (t - 1) + t * u128::from(ERROR_BOUND) * (2 * n as u128 + 1);
        let max_noise_budget = margin_bits(q, fresh_bound);
        if max_noise_budget == 0 {
            return Err(BfvError::InvalidParameters(
                "parameter set leaves no noise headroom for a fresh encryption".into(),
            ));
        }

        Ok(Arc::new(Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            coeff_modulus: q,
            delta: q / t,
            ntt_tables,
            q_hat,
            q_hat_inv,
            max_noise_budget,
            params,
        }))
    }

    /// The validated parameter set this context was derived from.
    #[must_use]
    pub fn params(&self) -> &EncryptionParameters {
        &self.params
    }

    /// Process-unique session identity.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Active coefficient modulus q (product of the chain).
    #[must_use]
    pub fn coeff_modulus(&self) -> u128 {
        self.coeff_modulus
    }

    /// Δ = ⌊q/t⌋, the plaintext scaling factor.
    #[must_use]
    pub fn delta(&self) -> u128 {
        self.delta
    }

    /// The modulus level ciphertexts are produced at (the chain length;
    /// no operation in this engine switches level).
    #[must_use]
    pub fn level(&self) -> usize {
        self.params.coeff_modulus().len()
    }

    /// Noise budget of a fresh encryption, in bits. Derived from the
    /// worst-case fresh noise bound, so every fresh ciphertext reports
    /// exactly this value.
    #[must_use]
    pub fn max_noise_budget(&self) -> u32 {
        self.max_noise_budget
    }

    /// Product in R_q via per-prime negacyclic NTT and CRT recombination.
    pub(crate) fn ring_mul(&self, a: &RingPoly, b: &RingPoly) -> RingPoly {
        let n = self.params.poly_degree();
        assert_eq!(a.modulus, self.coeff_modulus, "operand not in this ring");
        assert_eq!(b.modulus, self.coeff_modulus, "operand not in this ring");
        assert_eq!(a.len(), n);
        assert_eq!(b.len(), n);

        let q = self.coeff_modulus;
        let mut acc = vec![0u128; n];
        for (table, &hat, &hat_inv) in izip!(&self.ntt_tables, &self.q_hat, &self.q_hat_inv) {
            let qi = u128::from(table.modulus());
            let ar: Vec<u64> = a.coeffs.iter().map(|&c| (c % qi) as u64).collect();
            let br: Vec<u64> = b.coeffs.iter().map(|&c| (c % qi) as u64).collect();
            let prod = table.negacyclic_mul(&ar, &br);
            for (out, &r) in acc.iter_mut().zip(&prod) {
                let c = mulmod64(r, hat_inv, table.modulus());
                *out = (*out + mulmod128(hat, u128::from(c), q)) % q;
            }
        }
        RingPoly {
            coeffs: acc,
            modulus: q,
        }
    }

    /// Lift an encoded plaintext into R_q scaled by Δ.
    pub(crate) fn scale_up(&self, plaintext: &Plaintext) -> RingPoly {
        let n = self.params.poly_degree();
        let mut coeffs = vec![0u128; n];
        for (out, &c) in coeffs.iter_mut().zip(&plaintext.coeffs) {
            *out = (self.delta * u128::from(c)) % self.coeff_modulus;
        }
        RingPoly {
            coeffs,
            modulus: self.coeff_modulus,
        }
    }

    /// Reject ciphertexts from another context, another modulus level, or
    /// with a mangled shape (e.g. deserialized against the wrong session).
    pub(crate) fn check_ciphertext(&self, ct: &Ciphertext) -> Result<()> {
        if ct.context_id != self.id {
            return Err(BfvError::ParameterMismatch(format!(
                "ciphertext was produced under context {}, not context {}",
                ct.context_id, self.id
            )));
        }
        if ct.level != self.level() {
            return Err(BfvError::ParameterMismatch(format!(
                "ciphertext is at modulus level {}, context operates at level {}",
                ct.level,
                self.level()
            )));
        }
        let n = self.params.poly_degree();
        if ct.c0.len() != n
            || ct.c1.len() != n
            || ct.c0.modulus != self.coeff_modulus
            || ct.c1.modulus != self.coeff_modulus
        {
            return Err(BfvError::ParameterMismatch(
                "ciphertext shape does not match this context".into(),
            ));
        }
        // deserialized bytes can claim the right modulus yet carry
        // unreduced coefficients; those would overflow downstream
        let q = self.coeff_modulus;
        if ct.c0.coeffs.iter().chain(&ct.c1.coeffs).any(|&c| c >= q) {
            return Err(BfvError::ParameterMismatch(
                "ciphertext coefficients are not reduced modulo this context's modulus".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_secret_key(&self, key: &SecretKey) -> Result<()> {
        if key.context_id != self.id {
            return Err(BfvError::ParameterMismatch(format!(
                "secret key belongs to context {}, not context {}",
                key.context_id, self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn check_public_key(&self, key: &PublicKey) -> Result<()> {
        if key.context_id != self.id {
            return Err(BfvError::ParameterMismatch(format!(
                "public key belongs to context {}, not context {}",
                key.context_id, self.id
            )));
        }
        Ok(())
    }
}

/// Whole bits of margin between `dist` and the q/2 correctness threshold.
pub(crate) fn margin_bits(q: u128, dist: u128) -> u32 {
    if dist == 0 {
        return u128::BITS;
    }
    let ratio = q / (2 * dist);
    if ratio <= 1 {
        0
    } else {
        ratio.ilog2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::mulmod128 as mm;
    use crate::params::suggest_coeff_modulus;
    use rand::{thread_rng, Rng};

    fn small_context(n: usize, widths: &[u32], t: u64) -> Arc<BfvContext> {
        let chain = suggest_coeff_modulus(n, widths).unwrap();
        let params = EncryptionParameters::new(n, chain, t).unwrap();
        BfvContext::new(params).unwrap()
    }

    fn naive_negacyclic(a: &[u128], b: &[u128], q: u128) -> Vec<u128> {
        let n = a.len();
        let mut out = vec![0u128; n];
        for i in 0..n {
            for j in 0..n {
                let prod = mm(a[i], b[j], q);
                let k = i + j;
                if k < n {
                    out[k] = (out[k] + prod) % q;
                } else {
                    out[k - n] = (out[k - n] + q - prod) % q;
                }
            }
        }
        out
    }

    #[test]
    fn test_context_ids_are_unique() {
        let a = small_context(64, &[30], 257);
        let b = small_context(64, &[30], 257);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_delta() {
        let ctx = small_context(64, &[30], 257);
        assert_eq!(ctx.delta(), ctx.coeff_modulus() / 257);
    }

    #[test]
    fn test_ring_mul_single_prime() {
        let ctx = small_context(16, &[30], 257);
        let q = ctx.coeff_modulus();
        let mut rng = thread_rng();
        let a = RingPoly::new((0..16).map(|_| rng.gen_range(0..q)).collect(), q);
        let b = RingPoly::new((0..16).map(|_| rng.gen_range(0..q)).collect(), q);
        let got = ctx.ring_mul(&a, &b);
        assert_eq!(got.coeffs, naive_negacyclic(&a.coeffs, &b.coeffs, q));
    }

    #[test]
    fn test_ring_mul_crt_recombination() {
        // two-prime chain exercises the CRT path
        let ctx = small_context(16, &[30, 31], 257);
        let q = ctx.coeff_modulus();
        let mut rng = thread_rng();
        let a = RingPoly::new((0..16).map(|_| rng.gen_range(0..q)).collect(), q);
        let b = RingPoly::new((0..16).map(|_| rng.gen_range(0..q)).collect(), q);
        let got = ctx.ring_mul(&a, &b);
        assert_eq!(got.coeffs, naive_negacyclic(&a.coeffs, &b.coeffs, q));
    }

    #[test]
    fn test_margin_bits() {
        assert_eq!(margin_bits(1024, 1), 9);
        assert_eq!(margin_bits(1024, 255), 1);
        assert_eq!(margin_bits(1024, 256), 1);
        assert_eq!(margin_bits(1024, 257), 0);
        assert_eq!(margin_bits(1024, 600), 0);
        assert_eq!(margin_bits(1024, 0), u128::BITS);
    }

    #[test]
    fn test_rejects_parameters_without_headroom() {
        // t only one bit below a tiny q leaves no room for fresh noise
        let chain = suggest_coeff_modulus(64, &[14]).unwrap();
        let params = EncryptionParameters::new(64, chain.clone(), chain[0] - 2);
        // either the parameter check or the headroom check must fire
        if let Ok(p) = params {
            assert!(matches!(
                BfvContext::new(p),
                Err(BfvError::InvalidParameters(_))
            ));
        }
    }
}
