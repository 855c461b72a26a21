//! Modular arithmetic primitives shared by parameter validation and the NTT.

/// (a * b) mod m with 64-bit operands, widening through u128.
#[inline]
pub fn mulmod64(a: u64, b: u64, modulus: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(modulus)) as u64
}

/// base^exp mod m by square-and-multiply.
pub fn mod_pow64(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut acc = 1u64;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mulmod64(acc, base, modulus);
        }
        base = mulmod64(base, base, modulus);
        exp >>= 1;
    }
    acc
}

/// (a * b) mod m for 128-bit operands.
///
/// Shift-and-add so the full product never materialises; requires
/// m < 2^127 so the running doublings cannot overflow.
pub fn mulmod128(mut a: u128, mut b: u128, modulus: u128) -> u128 {
    debug_assert!(modulus < 1u128 << 127);
    a %= modulus;
    b %= modulus;
    let mut acc = 0u128;
    while b > 0 {
        if b & 1 == 1 {
            acc += a;
            if acc >= modulus {
                acc -= modulus;
            }
        }
        a <<= 1;
        if a >= modulus {
            a -= modulus;
        }
        b >>= 1;
    }
    acc
}

const MR_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Deterministic Miller-Rabin primality test, exact for all u64.
pub fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &MR_WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let mut d = n - 1;
    let mut r = 0u32;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }
    'witness: for &a in &MR_WITNESSES {
        let mut x = mod_pow64(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mulmod64(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn gcd64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// One non-trivial factor of an odd composite, by Pollard's rho.
fn pollard_rho(n: u64) -> u64 {
    let advance = |x: u64, c: u64| (mulmod64(x, x, n) + c) % n;
    let mut c = 1u64;
    loop {
        let mut x = 2u64;
        let mut y = 2u64;
        let mut d = 1u64;
        while d == 1 {
            x = advance(x, c);
            y = advance(advance(y, c), c);
            d = gcd64(x.abs_diff(y), n);
        }
        if d != n {
            return d;
        }
        c += 1;
    }
}

/// Distinct prime factors of `n`, ascending.
pub fn factorize(mut n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47] {
        if n % p == 0 {
            out.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
    }
    let mut stack = vec![n];
    while let Some(m) = stack.pop() {
        if m < 2 {
            continue;
        }
        if is_prime_u64(m) {
            if !out.contains(&m) {
                out.push(m);
            }
            continue;
        }
        let d = pollard_rho(m);
        stack.push(d);
        stack.push(m / d);
    }
    out.sort_unstable();
    out
}

/// Smallest primitive root modulo the prime `modulus`.
pub fn find_primitive_root(modulus: u64) -> u64 {
    let phi = modulus - 1;
    let factors = factorize(phi);
    let mut g = 2u64;
    loop {
        if factors.iter().all(|&p| mod_pow64(g, phi / p, modulus) != 1) {
            return g;
        }
        g += 1;
    }
}
