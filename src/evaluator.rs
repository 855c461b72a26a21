//! Homomorphic arithmetic on ciphertexts.
//!
//! Addition and subtraction only: ciphertext±ciphertext is coefficient-wise
//! over both components; ciphertext±plaintext touches c0 alone. Every
//! operation validates its operands against the session, copies them, and
//! returns a new ciphertext.

use std::sync::Arc;

use log::debug;

use crate::ciphertext::Ciphertext;
use crate::context::{margin_bits, BfvContext};
use crate::decryptor::decrypt_with_noise;
use crate::encoder::IntegerEncoder;
use crate::error::{BfvError, Result};
use crate::keys::SecretKey;

/// Performs homomorphic arithmetic for one session.
pub struct Evaluator {
    ctx: Arc<BfvContext>,
    encoder: IntegerEncoder,
}

impl Evaluator {
    /// Bind an evaluator to a session.
    #[must_use]
    pub fn new(ctx: Arc<BfvContext>) -> Self {
        let encoder = IntegerEncoder::new(ctx.clone());
        Self { ctx, encoder }
    }

    /// Sum of all operands. The decrypted result is independent of the
    /// operand order; only the noise accumulation depends on the count.
    pub fn add_ciphertexts(&self, operands: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = operands.split_first().ok_or(BfvError::EmptyInput)?;
        for ct in operands {
            self.ctx.check_ciphertext(ct)?;
            check_budget(ct)?;
        }
        debug!("adding {} ciphertexts", operands.len());
        Ok(rest
            .iter()
            .fold(first.clone(), |acc, ct| self.combine(&acc, ct, false)))
    }

    /// Left fold of subtraction in list order: first − second − third − …
    /// Order matters and is preserved exactly as given.
    pub fn sub_ciphertexts(&self, operands: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = operands.split_first().ok_or(BfvError::EmptyInput)?;
        for ct in operands {
            self.ctx.check_ciphertext(ct)?;
            check_budget(ct)?;
        }
        debug!("subtracting {} ciphertexts", operands.len());
        Ok(rest
            .iter()
            .fold(first.clone(), |acc, ct| self.combine(&acc, ct, true)))
    }

    /// Add an encoded integer to a ciphertext. Only c0 changes; the
    /// randomness component c1 and the tracked noise budget are untouched
    /// (the encoding error is absorbed by the fresh-noise bound).
    pub fn add_plain(&self, ciphertext: &Ciphertext, value: i64) -> Result<Ciphertext> {
        self.ctx.check_ciphertext(ciphertext)?;
        check_budget(ciphertext)?;
        let scaled = self.ctx.scale_up(&self.encoder.encode(value)?);
        debug!("adding plain {value}");
        Ok(Ciphertext {
            c0: &ciphertext.c0 + &scaled,
            c1: ciphertext.c1.clone(),
            level: ciphertext.level,
            context_id: ciphertext.context_id,
            noise_budget: ciphertext.noise_budget,
        })
    }

    /// Subtract an encoded integer from a ciphertext; same asymmetry as
    /// [`add_plain`](Self::add_plain).
    pub fn sub_plain(&self, ciphertext: &Ciphertext, value: i64) -> Result<Ciphertext> {
        self.ctx.check_ciphertext(ciphertext)?;
        check_budget(ciphertext)?;
        let scaled = self.ctx.scale_up(&self.encoder.encode(value)?);
        debug!("subtracting plain {value}");
        Ok(Ciphertext {
            c0: &ciphertext.c0 - &scaled,
            c1: ciphertext.c1.clone(),
            level: ciphertext.level,
            context_id: ciphertext.context_id,
            noise_budget: ciphertext.noise_budget,
        })
    }

    /// Remaining noise budget in bits, never negative. Measures how close
    /// the decryption error is to the correctness threshold (which needs
    /// the secret key) and caps the answer with the tracked estimate, so
    /// the report never increases along a chain of operations.
    pub fn noise_budget(&self, secret_key: &SecretKey, ciphertext: &Ciphertext) -> Result<u32> {
        self.ctx.check_ciphertext(ciphertext)?;
        self.ctx.check_secret_key(secret_key)?;
        let (_, dist) = decrypt_with_noise(&self.ctx, secret_key, ciphertext);
        let measured = margin_bits(self.ctx.coeff_modulus(), dist);
        Ok(measured.min(ciphertext.noise_budget()))
    }

    fn combine(&self, a: &Ciphertext, b: &Ciphertext, subtract: bool) -> Ciphertext {
        debug_assert!(a.noise_budget > 0 && b.noise_budget > 0);
        let (c0, c1) = if subtract {
            (&a.c0 - &b.c0, &a.c1 - &b.c1)
        } else {
            (&a.c0 + &b.c0, &a.c1 + &b.c1)
        };
        // noise bounds add, so at most one bit of budget is lost per step
        Ciphertext {
            c0,
            c1,
            level: a.level,
            context_id: a.context_id,
            noise_budget: a.noise_budget.min(b.noise_budget).saturating_sub(1),
        }
    }
}

/// Exhausted ciphertexts are terminal: every further operation fails.
fn check_budget(ciphertext: &Ciphertext) -> Result<()> {
    if ciphertext.noise_budget == 0 {
        return Err(BfvError::NoiseBudgetExhausted);
    }
    Ok(())
}
