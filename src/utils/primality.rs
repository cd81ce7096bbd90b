//! Primality testing and prime power factorization.
//!
//! This module provides:
//! - Deterministic Miller-Rabin for `u64`
//! - Probabilistic Miller-Rabin for arbitrary `BigUint` values
//! - Prime power factorization of `u64` field orders

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use super::mod_pow;

/// Miller-Rabin witnesses. The first twelve are deterministic for every
/// `n < 3.3 * 10^24`, which covers all of `u64`.
const WITNESSES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Small primes used for trial division before Miller-Rabin.
const SMALL_PRIMES: &[u32] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Result of factoring a prime power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimePowerFactorization {
    /// The prime base.
    pub prime: u64,
    /// The exponent (power).
    pub exponent: u32,
}

impl PrimePowerFactorization {
    /// Compute the value p^k, or `None` on overflow.
    #[must_use]
    pub fn value(&self) -> Option<u64> {
        self.prime.checked_pow(self.exponent)
    }
}

/// Test if a number is prime using the Miller-Rabin primality test.
///
/// Deterministic for every `u64`.
///
/// # Examples
///
/// ```
/// use aiip::utils::is_prime;
///
/// assert!(is_prime(2));
/// assert!(!is_prime(9));
/// assert!(is_prime(131_071));
/// assert!(!is_prime(131_072));
/// ```
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    if n < 9 {
        return true;
    }
    if n % 3 == 0 {
        return false;
    }

    let n_minus_1 = n - 1;
    let r = n_minus_1.trailing_zeros();
    let d = n_minus_1 >> r;

    'witness: for &a in &WITNESSES[..12] {
        if a >= n {
            continue;
        }

        let mut x = mod_pow(a, d, n);

        if x == 1 || x == n_minus_1 {
            continue 'witness;
        }

        for _ in 0..(r - 1) {
            x = ((u128::from(x) * u128::from(x)) % u128::from(n)) as u64;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Test if an arbitrary-precision number is (very probably) prime.
///
/// Values that fit in a `u64` are tested deterministically. Larger values go
/// through trial division and Miller-Rabin with twenty fixed prime bases.
#[must_use]
pub fn is_probable_prime(n: &BigUint) -> bool {
    if let Some(small) = n.to_u64() {
        return is_prime(small);
    }
    if n.is_even() {
        return false;
    }
    for &sp in SMALL_PRIMES {
        if (n % sp).is_zero() {
            return false;
        }
    }

    let one = BigUint::one();
    let n_minus_1 = n - &one;
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    'witness: for &a in WITNESSES {
        let mut x = BigUint::from(a).modpow(&d, n);

        if x == one || x == n_minus_1 {
            continue 'witness;
        }

        for _ in 0..(r - 1) {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor a number as a prime power if possible.
///
/// Returns `Some` if `n = p^k` for some prime p and k >= 1.
///
/// # Examples
///
/// ```
/// use aiip::utils::{factor_prime_power, PrimePowerFactorization};
///
/// assert_eq!(factor_prime_power(8), Some(PrimePowerFactorization { prime: 2, exponent: 3 }));
/// assert_eq!(factor_prime_power(49), Some(PrimePowerFactorization { prime: 7, exponent: 2 }));
/// assert_eq!(factor_prime_power(12), None);
/// ```
#[must_use]
pub fn factor_prime_power(n: u64) -> Option<PrimePowerFactorization> {
    if n < 2 {
        return None;
    }

    if is_prime(n) {
        return Some(PrimePowerFactorization {
            prime: n,
            exponent: 1,
        });
    }

    if n.is_power_of_two() {
        return Some(PrimePowerFactorization {
            prime: 2,
            exponent: n.trailing_zeros(),
        });
    }

    // If n = p^k then p = n^(1/k) for some k in 2..=log2(n)
    let max_exp = 64 - n.leading_zeros();

    for k in 2..=max_exp {
        if let Some(root) = integer_kth_root(n, k) {
            if root > 1 && is_prime(root) && root.checked_pow(k) == Some(n) {
                return Some(PrimePowerFactorization {
                    prime: root,
                    exponent: k,
                });
            }
        }
    }

    None
}

/// Exact integer k-th root of n, if n is a perfect k-th power.
fn integer_kth_root(n: u64, k: u32) -> Option<u64> {
    if k == 0 {
        return None;
    }
    if n <= 1 || k == 1 {
        return Some(n);
    }

    // Newton's method: x_{i+1} = ((k-1) * x_i + n / x_i^(k-1)) / k
    let bits = 64 - n.leading_zeros();
    let mut x = 1u64 << ((bits + k - 1) / k).min(63);

    loop {
        let Some(x_pow_k_minus_1) = x.checked_pow(k - 1) else {
            x /= 2;
            continue;
        };

        if x_pow_k_minus_1 == 0 {
            return None;
        }

        let next = ((u128::from(k - 1) * u128::from(x) + u128::from(n / x_pow_k_minus_1))
            / u128::from(k)) as u64;

        if next >= x {
            return (x.checked_pow(k) == Some(n)).then_some(x);
        }

        x = next;
    }
}

/// Distinct prime divisors of `n`, ascending.
#[must_use]
pub fn prime_divisors(mut n: usize) -> Vec<usize> {
    let mut divisors = Vec::new();
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            divisors.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        divisors.push(n);
    }
    divisors
}
