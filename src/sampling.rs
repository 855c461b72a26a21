//! Random ring elements: uniform masks, ternary secrets, bounded Gaussian
//! error.
//!
//! Every sampler requires `R: Rng + CryptoRng`, so a non-cryptographic
//! generator is rejected at compile time. If the system randomness source
//! fails, `rand` aborts the process; there is no recovery path.

use crate::polynomial::RingPoly;
use rand::{CryptoRng, Rng};
use rand_distr::{Distribution, Normal};

/// Standard deviation of the error distribution.
pub const ERROR_STD_DEV: f64 = 3.2;

/// Hard cap on error magnitude (about six standard deviations); samples
/// beyond it are rejected and redrawn.
pub const ERROR_BOUND: u64 = 19;

/// Uniform element of R_q.
pub fn uniform_poly<R: Rng + CryptoRng>(len: usize, modulus: u128, rng: &mut R) -> RingPoly {
    let coeffs = (0..len).map(|_| rng.gen_range(0..modulus)).collect();
    RingPoly { coeffs, modulus }
}

/// Ternary element: each coefficient drawn uniformly from {-1, 0, 1}.
pub fn ternary_poly<R: Rng + CryptoRng>(len: usize, modulus: u128, rng: &mut R) -> RingPoly {
    let coeffs = (0..len)
        .map(|_| match rng.gen_range(0..3u8) {
            0 => modulus - 1,
            1 => 0,
            _ => 1,
        })
        .collect();
    RingPoly { coeffs, modulus }
}

/// Small error element: rounded Gaussian, rejected beyond [`ERROR_BOUND`].
pub fn error_poly<R: Rng + CryptoRng>(len: usize, modulus: u128, rng: &mut R) -> RingPoly {
    let gauss = Normal::new(0.0, ERROR_STD_DEV).expect("standard deviation is positive");
    let coeffs = (0..len)
        .map(|_| {
            let e = loop {
                #[allow(clippy::cast_possible_truncation)]
                let x = gauss.sample(rng).round() as i64;
                if x.unsigned_abs() <= ERROR_BOUND {
                    break x;
                }
            };
            if e < 0 {
                modulus - u128::from(e.unsigned_abs())
            } else {
                u128::from(e.unsigned_abs())
            }
        })
        .collect();
    RingPoly { coeffs, modulus }
}
