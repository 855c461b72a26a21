//! Key material and key generation.

use std::sync::Arc;

use log::debug;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::context::BfvContext;
use crate::polynomial::RingPoly;
use crate::sampling;

/// Ternary secret key bound to one context.
///
/// Deliberately not serializable and without a `Debug` impl: the secret
/// never leaves the key-generator/decryptor boundary.
#[derive(Clone)]
pub struct SecretKey {
    pub(crate) s: RingPoly,
    pub(crate) context_id: u64,
}

/// Public key (p0, p1) = (-(a·s + e), a); an encryption of zero binding
/// the pair to the secret. Safe to share and serialize.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKey {
    pub(crate) p0: RingPoly,
    pub(crate) p1: RingPoly,
    pub(crate) context_id: u64,
}

impl PublicKey {
    /// Identity of the context this key belongs to.
    #[must_use]
    pub fn context_id(&self) -> u64 {
        self.context_id
    }
}

/// Derives a keypair from a context and a cryptographically secure
/// random source.
pub struct KeyGenerator {
    ctx: Arc<BfvContext>,
}

impl KeyGenerator {
    /// Bind a generator to a session.
    #[must_use]
    pub fn new(ctx: Arc<BfvContext>) -> Self {
        Self { ctx }
    }

    /// Draw a fresh keypair. Each call produces an independent pair.
    pub fn generate<R: Rng + CryptoRng>(&self, rng: &mut R) -> (SecretKey, PublicKey) {
        let n = self.ctx.params().poly_degree();
        let q = self.ctx.coeff_modulus();

        let s = sampling::ternary_poly(n, q, rng);
        let a = sampling::uniform_poly(n, q, rng);
        let e = sampling::error_poly(n, q, rng);
        let p0 = -(&self.ctx.ring_mul(&a, &s) + &e);
        debug!("generated keypair for context {}", self.ctx.id());

        (
            SecretKey {
                s,
                context_id: self.ctx.id(),
            },
            PublicKey {
                p0,
                p1: a,
                context_id: self.ctx.id(),
            },
        )
    }
}
