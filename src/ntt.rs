//! Negacyclic number-theoretic transform over NTT-friendly primes.
//!
//! One table per chain prime. A product in Z_q[x]/(x^N + 1) is the
//! negacyclic convolution of the coefficient vectors; it is computed by
//! twisting with powers of a 2N-th root of unity, a cyclic NTT, a pointwise
//! multiply and the inverse transform.

use crate::arith::{find_primitive_root, mod_pow64, mulmod64};

/// Precomputed twiddle factors for one prime modulus.
pub struct NttTable {
    modulus: u64,
    len: usize,
    psi: Vec<u64>,     // psi^j, psi a primitive 2N-th root of unity
    psi_inv: Vec<u64>, // psi^-j
    omega: u64,        // psi^2, primitive N-th root
    omega_inv: u64,
    len_inv: u64,
}

impl NttTable {
    /// Build tables for `modulus`, which must be prime with
    /// modulus ≡ 1 (mod 2·len), and `len` a power of two.
    #[must_use]
    pub fn new(modulus: u64, len: usize) -> Self {
        assert!(len.is_power_of_two(), "transform length must be a power of two");
        assert_eq!(
            (modulus - 1) % (2 * len as u64),
            0,
            "modulus not NTT-friendly for this length"
        );
        let g = find_primitive_root(modulus);
        let psi0 = mod_pow64(g, (modulus - 1) / (2 * len as u64), modulus);
        let psi0_inv = mod_pow64(psi0, modulus - 2, modulus);

        let mut psi = Vec::with_capacity(len);
        let mut psi_inv = Vec::with_capacity(len);
        let (mut p, mut pi) = (1u64, 1u64);
        for _ in 0..len {
            psi.push(p);
            psi_inv.push(pi);
            p = mulmod64(p, psi0, modulus);
            pi = mulmod64(pi, psi0_inv, modulus);
        }

        let omega = mulmod64(psi0, psi0, modulus);
        Self {
            modulus,
            len,
            psi,
            psi_inv,
            omega,
            omega_inv: mod_pow64(omega, modulus - 2, modulus),
            len_inv: mod_pow64(len as u64, modulus - 2, modulus),
        }
    }

    /// The prime this table transforms under.
    #[must_use]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Negacyclic product of two length-N coefficient vectors mod `x^N + 1`.
    pub fn negacyclic_mul(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        assert_eq!(a.len(), self.len, "operand length mismatch");
        assert_eq!(b.len(), self.len, "operand length mismatch");
        let mut fa = a.to_vec();
        let mut fb = b.to_vec();
        self.forward(&mut fa);
        self.forward(&mut fb);
        for (x, &y) in fa.iter_mut().zip(&fb) {
            *x = mulmod64(*x, y, self.modulus);
        }
        self.inverse(&mut fa);
        fa
    }

    fn forward(&self, v: &mut [u64]) {
        for (x, &p) in v.iter_mut().zip(&self.psi) {
            *x = mulmod64(*x, p, self.modulus);
        }
        cyclic_ntt(v, self.modulus, self.omega);
    }

    fn inverse(&self, v: &mut [u64]) {
        cyclic_ntt(v, self.modulus, self.omega_inv);
        for (x, &p) in v.iter_mut().zip(&self.psi_inv) {
            *x = mulmod64(mulmod64(*x, p, self.modulus), self.len_inv, self.modulus);
        }
    }
}

fn bit_reverse(vec: &mut [u64]) {
    let n = vec.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            vec.swap(i, j);
        }
    }
}

/// In-place radix-2 cyclic NTT; `root` is a primitive `a.len()`-th root of
/// unity mod `modu`. Passing the inverse root computes the inverse
/// transform up to the 1/N scaling.
fn cyclic_ntt(a: &mut [u64], modu: u64, root: u64) {
    let n = a.len();
    bit_reverse(a);

    let mut len = 2;
    while len <= n {
        let w_len = mod_pow64(root, (n / len) as u64, modu);
        for i in (0..n).step_by(len) {
            let mut w = 1u64;
            for j in 0..len / 2 {
                let u = a[i + j];
                let v = mulmod64(a[i + j + len / 2], w, modu);
                a[i + j] = (u + v) % modu;
                a[i + j + len / 2] = (u + modu - v) % modu;
                w = mulmod64(w, w_len, modu);
            }
        }
        len <<= 1;
    }
}
