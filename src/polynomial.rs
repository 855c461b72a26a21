//! Ring element type: fixed-length coefficient vector over Z/qZ.
//!
//! All arithmetic lives in R_q = Z_q[x]/(x^N + 1). Addition and
//! subtraction are coefficient-wise; products go through the context's
//! transform tables, never through this type directly.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// f(x) = coeffs[0] + coeffs[1]·x + ...  (always mod `modulus`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingPoly {
    /// Coefficients, constant term first, each in [0, modulus).
    pub coeffs: Vec<u128>,
    /// The active coefficient modulus q.
    pub modulus: u128,
}

impl RingPoly {
    /// Construct from raw coefficients, reducing each one.
    pub fn new(coeffs: Vec<u128>, modulus: u128) -> Self {
        assert!(modulus > 1, "modulus must be at least 2");
        let coeffs = coeffs.into_iter().map(|x| x % modulus).collect();
        Self { coeffs, modulus }
    }

    /// The zero element of given length.
    #[must_use]
    pub fn zero(len: usize, modulus: u128) -> Self {
        Self {
            coeffs: vec![0; len],
            modulus,
        }
    }

    /// Number of coefficients (the ring dimension N for ring elements).
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// True when the coefficient vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }
}

impl Add for &RingPoly {
    type Output = RingPoly;
    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(self.modulus, rhs.modulus, "modulus mismatch");
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "length mismatch");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(&a, &b)| (a + b) % self.modulus)
            .collect();
        RingPoly {
            coeffs,
            modulus: self.modulus,
        }
    }
}

impl Add for RingPoly {
    type Output = RingPoly;
    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Add<&RingPoly> for RingPoly {
    type Output = RingPoly;
    fn add(self, rhs: &RingPoly) -> Self::Output {
        &self + rhs
    }
}

impl Sub for &RingPoly {
    type Output = RingPoly;
    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(self.modulus, rhs.modulus, "modulus mismatch");
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "length mismatch");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(&a, &b)| (self.modulus + a - b) % self.modulus)
            .collect();
        RingPoly {
            coeffs,
            modulus: self.modulus,
        }
    }
}

impl Sub for RingPoly {
    type Output = RingPoly;
    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Sub<&RingPoly> for RingPoly {
    type Output = RingPoly;
    fn sub(self, rhs: &RingPoly) -> Self::Output {
        &self - rhs
    }
}

impl Neg for RingPoly {
    type Output = RingPoly;
    fn neg(self) -> Self::Output {
        let coeffs = self
            .coeffs
            .iter()
            .map(|&x| (self.modulus - x) % self.modulus)
            .collect();
        RingPoly {
            coeffs,
            modulus: self.modulus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let m = 16u128;
        let p1 = RingPoly::new(vec![1, 2, 3], m);
        let p2 = RingPoly::new(vec![4, 5, 6], m);

        let sum = &p1 + &p2;
        assert_eq!(sum.coeffs, vec![5, 7, 9]);

        let diff = &p1 - &p2;
        assert_eq!(diff.coeffs, vec![13, 13, 13]);

        let neg = -p1.clone();
        assert_eq!(neg.coeffs, vec![15, 14, 13]);

        // negating zero stays zero, not q
        let z = RingPoly::zero(3, m);
        assert_eq!((-z).coeffs, vec![0, 0, 0]);
    }

    #[test]
    fn test_new_reduces() {
        let p = RingPoly::new(vec![15, 20, 25], 17);
        assert_eq!(p.coeffs, vec![15, 3, 8]);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_rejects_length_mismatch() {
        let p1 = RingPoly::new(vec![1, 2], 17);
        let p2 = RingPoly::new(vec![1, 2, 3], 17);
        let _ = &p1 + &p2;
    }
}
