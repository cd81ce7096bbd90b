//! Number-theoretic helpers: primality, prime powers, modular exponentiation
//! and quadratic residuosity.
//!
//! These are the integer-level building blocks for field construction and
//! parameter generation.

mod primality;

pub use primality::{
    factor_prime_power, is_prime, is_probable_prime, prime_divisors, PrimePowerFactorization,
};

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Compute `base^exp mod modulus` using binary exponentiation.
///
/// Intermediate products are taken in `u128`, so any `u64` modulus is safe.
///
/// # Panics
///
/// Panics if `modulus` is 0.
///
/// # Examples
///
/// ```
/// use aiip::utils::mod_pow;
///
/// assert_eq!(mod_pow(2, 10, 1000), 24);
/// assert_eq!(mod_pow(3, 5, 7), 5);
/// ```
#[must_use]
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    assert!(modulus > 0, "modulus must be positive");

    if modulus == 1 {
        return 0;
    }

    let m = u128::from(modulus);
    let mut result = 1u128;
    let mut base = u128::from(base) % m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        exp >>= 1;
        base = base * base % m;
    }

    result as u64
}

/// Legendre symbol of `a` modulo an odd prime `p`, via Euler's criterion.
///
/// Returns `0` when `p | a`, `1` for a non-zero quadratic residue and `-1`
/// for a quadratic non-residue.
///
/// # Examples
///
/// ```
/// use aiip::utils::legendre_symbol;
/// use num_bigint::BigUint;
///
/// let p = BigUint::from(7u32);
/// assert_eq!(legendre_symbol(&BigUint::from(2u32), &p), 1);  // 3^2 = 2
/// assert_eq!(legendre_symbol(&BigUint::from(3u32), &p), -1);
/// assert_eq!(legendre_symbol(&BigUint::from(14u32), &p), 0);
/// ```
#[must_use]
pub fn legendre_symbol(a: &BigUint, p: &BigUint) -> i8 {
    let a = a % p;
    if a.is_zero() {
        return 0;
    }
    let e = (p - BigUint::one()) >> 1u32;
    if a.modpow(&e, p).is_one() {
        1
    } else {
        -1
    }
}

/// Euler's criterion as stated for parameter validation: `a^((q-1)/2) mod q == q - 1`.
///
/// For an odd prime `q` this holds exactly when `a` is a quadratic non-residue.
#[must_use]
pub fn is_quadratic_nonresidue(a: &BigUint, q: &BigUint) -> bool {
    if *q < BigUint::from(3u32) {
        return false;
    }
    let q_minus_1 = q - BigUint::one();
    let e = &q_minus_1 >> 1u32;
    a.modpow(&e, q) == q_minus_1
}
