//! Irreducible polynomials and polynomial arithmetic over GF(p).
//!
//! Extension fields GF(p^k) are built as GF(p)[x] / (f) for a monic
//! irreducible f of degree k. A modulus is stored as its low coefficients
//! `[c_0, c_1, ..., c_{k-1}]`, describing
//! x^k + c_{k-1}*x^{k-1} + ... + c_1*x + c_0.
//! The leading coefficient is always 1 and is implicit.
//!
//! Polynomials are little-endian coefficient vectors of `BigUint` residues.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::utils::prime_divisors;

/// Lookup table of irreducible polynomials for common small extension fields.
///
/// Entries are `(p, k, [c_0, ..., c_{k-1}])`.
pub static IRREDUCIBLE_POLYS: &[(u64, usize, &[u64])] = &[
    // x^2 + x + 1
    (2, 2, &[1, 1]),
    // x^3 + x + 1
    (2, 3, &[1, 1, 0]),
    // x^4 + x + 1
    (2, 4, &[1, 1, 0, 0]),
    // x^5 + x^2 + 1
    (2, 5, &[1, 0, 1, 0, 0]),
    // x^6 + x + 1
    (2, 6, &[1, 1, 0, 0, 0, 0]),
    // x^7 + x^3 + 1
    (2, 7, &[1, 0, 0, 1, 0, 0, 0]),
    // x^8 + x^4 + x^3 + x + 1 (AES polynomial)
    (2, 8, &[1, 1, 0, 1, 1, 0, 0, 0]),
    // x^2 + 1
    (3, 2, &[1, 0]),
    // x^3 + 2x + 1
    (3, 3, &[1, 2, 0]),
    // x^4 + 2x^3 + 2
    (3, 4, &[2, 0, 0, 2]),
    // x^2 + 2
    (5, 2, &[2, 0]),
    // x^3 + 3x + 3
    (5, 3, &[3, 3, 0]),
    // x^2 + 1
    (7, 2, &[1, 0]),
    // x^2 + 1
    (11, 2, &[1, 0]),
    // x^2 + 2
    (13, 2, &[2, 0]),
    // x^2 + 3
    (17, 2, &[3, 0]),
];

/// Get a tabulated irreducible polynomial for GF(p^k).
///
/// Returns `None` if the table has no entry for the given parameters.
#[must_use]
pub fn get_irreducible_poly(p: u64, k: usize) -> Option<Vec<u64>> {
    IRREDUCIBLE_POLYS
        .iter()
        .find(|&&(poly_p, poly_k, _)| poly_p == p && poly_k == k)
        .map(|&(_, _, coeffs)| coeffs.to_vec())
}

/// Rabin's irreducibility test for the monic polynomial with low
/// coefficients `modulus` over GF(p).
///
/// f of degree k is irreducible iff x^(p^k) = x (mod f) and
/// gcd(x^(p^(k/r)) - x, f) = 1 for every prime r dividing k.
#[must_use]
pub fn is_irreducible(modulus: &[BigUint], p: &BigUint) -> bool {
    let k = modulus.len();
    if k == 0 {
        return false;
    }
    if k == 1 {
        return true;
    }
    // A zero constant term means x | f
    if modulus[0].is_zero() {
        return false;
    }

    let full = monic(modulus);
    let x = monomial_x(k);

    let checkpoints: Vec<usize> = prime_divisors(k).into_iter().map(|r| k / r).collect();

    // frobenius[i] = x^(p^i) mod f
    let mut h = x.clone();
    for i in 1..=k {
        h = pow_mod(&h, p, modulus, p);
        if checkpoints.contains(&i) {
            let diff = sub(&h, &x, p);
            let g = gcd(diff, full.clone(), p);
            if degree(&g) != Some(0) {
                return false;
            }
        }
    }

    h == x
}

/// Multiply two reduced polynomials and reduce modulo the monic modulus.
///
/// Both inputs and the output have exactly `modulus.len()` coefficients.
#[must_use]
pub(crate) fn mul_mod(
    a: &[BigUint],
    b: &[BigUint],
    modulus: &[BigUint],
    p: &BigUint,
) -> Vec<BigUint> {
    let k = modulus.len();
    let mut product = vec![BigUint::zero(); 2 * k - 1];
    for (i, ai) in a.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            product[i + j] += ai * bj;
        }
    }
    for coeff in &mut product {
        *coeff %= p;
    }
    reduce(product, modulus, p)
}

/// Reduce a polynomial modulo the monic modulus, returning `modulus.len()` coefficients.
#[must_use]
pub(crate) fn reduce(mut product: Vec<BigUint>, modulus: &[BigUint], p: &BigUint) -> Vec<BigUint> {
    let k = modulus.len();

    // x^k = -(c_{k-1}*x^{k-1} + ... + c_0)
    for i in (k..product.len()).rev() {
        let coef = std::mem::take(&mut product[i]);
        if coef.is_zero() {
            continue;
        }
        for (j, c) in modulus.iter().enumerate() {
            let idx = i - k + j;
            let t = &coef * c % p;
            product[idx] = (&product[idx] + p - t) % p;
        }
    }

    product.resize(k, BigUint::zero());
    product
}

/// Compute `base^exp` modulo the monic modulus.
#[must_use]
pub(crate) fn pow_mod(
    base: &[BigUint],
    exp: &BigUint,
    modulus: &[BigUint],
    p: &BigUint,
) -> Vec<BigUint> {
    let k = modulus.len();
    let mut result = vec![BigUint::zero(); k];
    result[0] = BigUint::one();

    for i in (0..exp.bits()).rev() {
        result = mul_mod(&result, &result, modulus, p);
        if exp.bit(i) {
            result = mul_mod(&result, base, modulus, p);
        }
    }

    result
}

/// The coefficient vectors of x^0, x^1, ..., x^(2k-2) reduced modulo f.
#[must_use]
pub(crate) fn reduced_powers_of_x(modulus: &[BigUint], p: &BigUint) -> Vec<Vec<BigUint>> {
    let k = modulus.len();
    let mut powers = Vec::with_capacity(2 * k - 1);

    let mut current = vec![BigUint::zero(); k];
    current[0] = BigUint::one();
    powers.push(current.clone());

    for _ in 1..(2 * k - 1) {
        // Multiply by x: shift up one position, then fold x^k back down
        let mut shifted = Vec::with_capacity(k + 1);
        shifted.push(BigUint::zero());
        shifted.extend(current);
        current = reduce(shifted, modulus, p);
        powers.push(current.clone());
    }

    powers
}

fn monic(modulus: &[BigUint]) -> Vec<BigUint> {
    let mut full = modulus.to_vec();
    full.push(BigUint::one());
    full
}

fn monomial_x(k: usize) -> Vec<BigUint> {
    let mut x = vec![BigUint::zero(); k];
    x[1] = BigUint::one();
    x
}

fn degree(a: &[BigUint]) -> Option<usize> {
    a.iter().rposition(|c| !c.is_zero())
}

fn trim(a: &mut Vec<BigUint>) {
    while a.last().is_some_and(Zero::is_zero) {
        a.pop();
    }
}

fn sub(a: &[BigUint], b: &[BigUint], p: &BigUint) -> Vec<BigUint> {
    let len = a.len().max(b.len());
    let zero = BigUint::zero();
    (0..len)
        .map(|i| {
            let ai = a.get(i).unwrap_or(&zero);
            let bi = b.get(i).unwrap_or(&zero);
            (ai + p - bi) % p
        })
        .collect()
}

/// Remainder of `a` divided by a non-zero `b` over GF(p).
fn rem(mut a: Vec<BigUint>, b: &[BigUint], p: &BigUint) -> Vec<BigUint> {
    trim(&mut a);
    let Some(db) = degree(b) else {
        return a;
    };
    let lead_inv = b[db].modpow(&(p - BigUint::from(2u32)), p);

    while let Some(da) = degree(&a) {
        if da < db {
            break;
        }
        let factor = &a[da] * &lead_inv % p;
        let shift = da - db;
        for (j, bj) in b.iter().take(db + 1).enumerate() {
            let t = &factor * bj % p;
            a[shift + j] = (&a[shift + j] + p - t) % p;
        }
        trim(&mut a);
    }

    a
}

fn gcd(mut a: Vec<BigUint>, mut b: Vec<BigUint>, p: &BigUint) -> Vec<BigUint> {
    trim(&mut a);
    trim(&mut b);
    while degree(&b).is_some() {
        let r = rem(a, &b, p);
        a = b;
        b = r;
    }
    a
}
