//! Runtime-configured finite field contexts.
//!
//! A [`FieldContext`] fixes GF(p^k): the prime characteristic, the extension
//! degree, the irreducible modulus and the structure constants of the
//! polynomial basis. It is immutable and reference-counted internally, so
//! cloning a context is cheap and clones can be handed to worker threads.

use std::fmt;
use std::sync::Arc;

use ndarray::Array3;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use super::poly::{self, get_irreducible_poly, is_irreducible};
use super::FieldElement;
use crate::error::{Error, Result};
use crate::utils::{factor_prime_power, is_probable_prime};

/// Largest coefficient value tried when searching for an irreducible modulus.
const SEARCH_DIGIT_BOUND: u32 = 16;

/// The finite field GF(p^k) in the polynomial basis 1, x, ..., x^(k-1).
///
/// # Example
///
/// ```
/// use aiip::gf::FieldContext;
///
/// let gf9 = FieldContext::from_order(9).unwrap();
/// assert_eq!(gf9.degree(), 2);
/// assert_eq!(gf9.to_string(), "GF(3^2)");
///
/// let x = gf9.element(3); // integer encoding of the basis vector x
/// assert_eq!((&x * &x).to_u64(), Some(2)); // x^2 = -1 in GF(3)[x]/(x^2 + 1)
/// ```
#[derive(Clone)]
pub struct FieldContext {
    inner: Arc<FieldInner>,
}

struct FieldInner {
    characteristic: BigUint,
    degree: usize,
    modulus: Vec<BigUint>,
    order: BigUint,
    structure: Array3<BigUint>,
}

impl FieldContext {
    /// Create the prime field GF(p).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPrime`] if `p` is not prime.
    pub fn prime(p: impl Into<BigUint>) -> Result<Self> {
        let p = p.into();
        if !is_probable_prime(&p) {
            return Err(Error::NotPrime(p));
        }
        Ok(Self::build(p, vec![BigUint::zero()]))
    }

    /// Create GF(p^k) from an explicit monic modulus given by its low
    /// coefficients `[c_0, ..., c_{k-1}]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is not prime, if the modulus is empty, has a
    /// coefficient outside `[0, p)`, or is reducible.
    pub fn extension(p: impl Into<BigUint>, modulus: Vec<BigUint>) -> Result<Self> {
        let p = p.into();
        if !is_probable_prime(&p) {
            return Err(Error::NotPrime(p));
        }
        if modulus.is_empty() {
            return Err(Error::invalid_modulus("modulus must have degree at least 1"));
        }
        if let Some(bad) = modulus.iter().find(|c| **c >= p) {
            return Err(Error::invalid_modulus(format!(
                "coefficient {bad} is not reduced modulo {p}"
            )));
        }
        if !is_irreducible(&modulus, &p) {
            return Err(Error::invalid_modulus(format!(
                "polynomial of degree {} is reducible over GF({p})",
                modulus.len()
            )));
        }
        Ok(Self::build(p, modulus))
    }

    /// Create GF(p^k) with an automatically chosen modulus.
    ///
    /// Tabulated polynomials are used when available; otherwise the first
    /// irreducible monic polynomial with small coefficients is searched for.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is not prime, `k` is zero, or no irreducible
    /// polynomial is found.
    pub fn with_degree(p: impl Into<BigUint>, k: usize) -> Result<Self> {
        let p = p.into();
        if k == 0 {
            return Err(Error::invalid_params("extension degree must be at least 1"));
        }
        if !is_probable_prime(&p) {
            return Err(Error::NotPrime(p));
        }
        if k == 1 {
            return Ok(Self::build(p, vec![BigUint::zero()]));
        }

        if let Some(coeffs) = p.to_u64().and_then(|small| get_irreducible_poly(small, k)) {
            let modulus = coeffs.into_iter().map(BigUint::from).collect();
            return Ok(Self::build(p, modulus));
        }

        let modulus = search_irreducible(&p, k)?;
        Ok(Self::build(p, modulus))
    }

    /// Create GF(q) for a prime power `q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `q` is not a prime power.
    pub fn from_order(q: u64) -> Result<Self> {
        let factorization = factor_prime_power(q)
            .ok_or_else(|| Error::invalid_params(format!("order {q} is not a prime power")))?;
        Self::with_degree(factorization.prime, factorization.exponent as usize)
    }

    fn build(characteristic: BigUint, mut modulus: Vec<BigUint>) -> Self {
        // Every linear modulus yields GF(p) with identical coordinates
        if modulus.len() == 1 {
            modulus = vec![BigUint::zero()];
        }
        let degree = modulus.len();
        let order = num_traits::pow(characteristic.clone(), degree);

        // c[u][v][w] = coordinate w of x^(u+v) mod f
        let powers = poly::reduced_powers_of_x(&modulus, &characteristic);
        let mut structure = Array3::from_elem((degree, degree, degree), BigUint::zero());
        for u in 0..degree {
            for v in 0..degree {
                for (w, coeff) in powers[u + v].iter().enumerate() {
                    structure[[u, v, w]] = coeff.clone();
                }
            }
        }

        Self {
            inner: Arc::new(FieldInner {
                characteristic,
                degree,
                modulus,
                order,
                structure,
            }),
        }
    }

    /// The prime characteristic p.
    #[must_use]
    pub fn characteristic(&self) -> &BigUint {
        &self.inner.characteristic
    }

    /// The extension degree k.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.inner.degree
    }

    /// The field order q = p^k.
    #[must_use]
    pub fn order(&self) -> &BigUint {
        &self.inner.order
    }

    /// Low coefficients `[c_0, ..., c_{k-1}]` of the monic modulus.
    ///
    /// For a prime field this is `[0]`, i.e. the modulus `x`.
    #[must_use]
    pub fn modulus(&self) -> &[BigUint] {
        &self.inner.modulus
    }

    /// Whether this is a prime field (k = 1).
    #[must_use]
    pub fn is_prime_field(&self) -> bool {
        self.inner.degree == 1
    }

    /// The k×k×k structure-constant tensor of the polynomial basis.
    ///
    /// For basis vectors e_u, e_v: e_u · e_v = Σ_w c[[u, v, w]] · e_w, so
    /// coordinate w of a product a·b is the bilinear form
    /// Σ_{u,v} c[[u, v, w]] · a_u · b_v.
    #[must_use]
    pub fn structure_constants(&self) -> &Array3<BigUint> {
        &self.inner.structure
    }

    /// Create an element from a small integer encoding, **reducing it
    /// modulo q**.
    ///
    /// This is a convenience for literals and never fails: out-of-range
    /// values wrap around. Use [`FieldContext::from_integer`] when an
    /// out-of-range value must be rejected with
    /// [`Error::InvalidFieldElement`].
    ///
    /// ```
    /// use aiip::gf::FieldContext;
    /// use num_bigint::BigUint;
    ///
    /// let gf7 = FieldContext::prime(7u32).unwrap();
    /// assert_eq!(gf7.element(9), gf7.element(2));
    /// assert!(gf7.from_integer(&BigUint::from(9u32)).is_err());
    /// ```
    #[must_use]
    pub fn element(&self, value: u64) -> FieldElement {
        let value = BigUint::from(value) % self.order();
        self.decode(value)
    }

    /// The additive identity.
    #[must_use]
    pub fn zero(&self) -> FieldElement {
        FieldElement::from_parts(vec![BigUint::zero(); self.degree()], self.clone())
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one(&self) -> FieldElement {
        let mut coords = vec![BigUint::zero(); self.degree()];
        coords[0] = BigUint::one();
        FieldElement::from_parts(coords, self.clone())
    }

    /// Create an element from its integer encoding
    /// a_0 + a_1·p + ... + a_{k-1}·p^(k-1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `value >= q`.
    pub fn from_integer(&self, value: &BigUint) -> Result<FieldElement> {
        if value >= self.order() {
            return Err(Error::invalid_element(format!(
                "{value} is out of range for {self}, must be in 0..{}",
                self.order()
            )));
        }
        Ok(self.decode(value.clone()))
    }

    /// Create an element from its coordinate vector over GF(p).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if the vector does not have
    /// exactly k coordinates or a coordinate is not in `[0, p)`.
    pub fn from_vector(&self, coords: Vec<BigUint>) -> Result<FieldElement> {
        if coords.len() != self.degree() {
            return Err(Error::invalid_element(format!(
                "coordinate vector has length {}, {self} needs {}",
                coords.len(),
                self.degree()
            )));
        }
        if let Some((i, c)) = coords
            .iter()
            .enumerate()
            .find(|(_, c)| *c >= self.characteristic())
        {
            return Err(Error::invalid_element(format!(
                "coordinate {i} = {c} is not reduced modulo {}",
                self.characteristic()
            )));
        }
        Ok(FieldElement::from_parts(coords, self.clone()))
    }

    /// Draw a uniformly random element.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        let coords = (0..self.degree())
            .map(|_| rng.gen_biguint_below(self.characteristic()))
            .collect();
        FieldElement::from_parts(coords, self.clone())
    }

    /// Iterate over all elements in integer-encoding order.
    ///
    /// This visits q elements; only use it on small fields.
    pub fn elements(&self) -> impl Iterator<Item = FieldElement> + '_ {
        let mut next = BigUint::zero();
        std::iter::from_fn(move || {
            if &next >= self.order() {
                return None;
            }
            let element = self.decode(next.clone());
            next += 1u32;
            Some(element)
        })
    }

    /// Whether `element` belongs to this field.
    #[must_use]
    pub fn contains(&self, element: &FieldElement) -> bool {
        element.field() == self
    }

    pub(crate) fn decode(&self, mut value: BigUint) -> FieldElement {
        let p = self.characteristic();
        let mut coords = Vec::with_capacity(self.degree());
        for _ in 0..self.degree() {
            let (q, r) = value.div_rem(p);
            coords.push(r);
            value = q;
        }
        FieldElement::from_parts(coords, self.clone())
    }

    pub(crate) fn mul_coords(&self, a: &[BigUint], b: &[BigUint]) -> Vec<BigUint> {
        let p = self.characteristic();
        if self.is_prime_field() {
            return vec![&a[0] * &b[0] % p];
        }
        poly::mul_mod(a, b, self.modulus(), p)
    }
}

/// Search the monic polynomials whose coefficients are all below
/// `min(p, SEARCH_DIGIT_BOUND)` for the first irreducible one.
fn search_irreducible(p: &BigUint, k: usize) -> Result<Vec<BigUint>> {
    let base = p.to_u32().map_or(SEARCH_DIGIT_BOUND, |small| small.min(SEARCH_DIGIT_BOUND));
    let mut digits = vec![0u32; k];
    digits[0] = 1;

    loop {
        let candidate: Vec<BigUint> = digits.iter().map(|&d| BigUint::from(d)).collect();
        if is_irreducible(&candidate, p) {
            return Ok(candidate);
        }

        // Little-endian counter in base `base`
        let mut pos = 0;
        loop {
            if pos == k {
                return Err(Error::invalid_modulus(format!(
                    "no irreducible polynomial of degree {k} over GF({p}) with coefficients below {base}"
                )));
            }
            digits[pos] += 1;
            if digits[pos] < base {
                break;
            }
            digits[pos] = 0;
            pos += 1;
        }
    }
}

impl PartialEq for FieldContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.characteristic == other.inner.characteristic
                && self.inner.modulus == other.inner.modulus)
    }
}

impl Eq for FieldContext {}

impl fmt::Debug for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_prime_field() {
            write!(f, "GF({})", self.characteristic())
        } else {
            write!(
                f,
                "GF({}^{}) mod {:?}",
                self.characteristic(),
                self.degree(),
                self.modulus()
            )
        }
    }
}

impl fmt::Display for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_prime_field() {
            write!(f, "GF({})", self.characteristic())
        } else {
            write!(f, "GF({}^{})", self.characteristic(), self.degree())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(values: &[u64]) -> Vec<BigUint> {
        values.iter().map(|&v| BigUint::from(v)).collect()
    }

    #[test]
    fn test_prime_field_creation() {
        let gf = FieldContext::prime(131_071u32).unwrap();
        assert_eq!(gf.degree(), 1);
        assert_eq!(gf.order(), &BigUint::from(131_071u32));
        assert!(gf.is_prime_field());
        assert_eq!(gf.to_string(), "GF(131071)");
    }

    #[test]
    fn test_from_order() {
        let gf9 = FieldContext::from_order(9).unwrap();
        assert_eq!(gf9.characteristic(), &BigUint::from(3u32));
        assert_eq!(gf9.degree(), 2);
        assert_eq!(gf9.order(), &BigUint::from(9u32));

        let gf = FieldContext::from_order(131_072).unwrap();
        assert_eq!(gf.degree(), 17);
        assert_eq!(gf.characteristic(), &BigUint::from(2u32));

        assert!(FieldContext::from_order(6).is_err());
        assert!(FieldContext::from_order(1).is_err());
        assert!(FieldContext::from_order(0).is_err());
    }

    #[test]
    fn test_invalid_prime() {
        assert_eq!(
            FieldContext::prime(15u32).unwrap_err(),
            Error::NotPrime(BigUint::from(15u32))
        );
        assert!(FieldContext::with_degree(15u32, 2).is_err());
        assert!(FieldContext::with_degree(7u32, 0).is_err());
    }

    #[test]
    fn test_extension_validation() {
        assert!(FieldContext::extension(3u32, big(&[1, 0])).is_ok());
        // x^2 + 1 splits over GF(5)
        assert!(matches!(
            FieldContext::extension(5u32, big(&[1, 0])),
            Err(Error::InvalidModulus { .. })
        ));
        // Unreduced coefficient
        assert!(matches!(
            FieldContext::extension(3u32, big(&[4, 0])),
            Err(Error::InvalidModulus { .. })
        ));
        assert!(matches!(
            FieldContext::extension(3u32, Vec::new()),
            Err(Error::InvalidModulus { .. })
        ));
    }

    #[test]
    fn test_search_finds_irreducible() {
        // No table entry for GF(19^3)
        let gf = FieldContext::with_degree(19u32, 3).unwrap();
        assert_eq!(gf.degree(), 3);
        assert!(is_irreducible(gf.modulus(), gf.characteristic()));

        // Large characteristic, quadratic extension
        let p = (BigUint::one() << 127u32) - BigUint::one();
        let gf = FieldContext::with_degree(p, 2).unwrap();
        assert!(is_irreducible(gf.modulus(), gf.characteristic()));
    }

    #[test]
    fn test_structure_constants_prime_field() {
        let gf = FieldContext::prime(17u32).unwrap();
        let c = gf.structure_constants();
        assert_eq!(c.shape(), &[1, 1, 1]);
        assert_eq!(c[[0, 0, 0]], BigUint::one());
    }

    #[test]
    fn test_structure_constants_gf9() {
        // GF(3)[x]/(x^2 + 1): 1*1 = 1, 1*x = x, x*x = 2
        let gf = FieldContext::from_order(9).unwrap();
        let c = gf.structure_constants();
        assert_eq!(c.shape(), &[2, 2, 2]);
        assert_eq!(c[[0, 0, 0]], BigUint::from(1u32));
        assert_eq!(c[[0, 0, 1]], BigUint::from(0u32));
        assert_eq!(c[[0, 1, 1]], BigUint::from(1u32));
        assert_eq!(c[[1, 0, 1]], BigUint::from(1u32));
        assert_eq!(c[[1, 1, 0]], BigUint::from(2u32));
        assert_eq!(c[[1, 1, 1]], BigUint::from(0u32));
    }

    #[test]
    fn test_vector_and_integer_validation() {
        let gf9 = FieldContext::from_order(9).unwrap();
        assert!(gf9.from_vector(big(&[1, 2])).is_ok());
        assert!(matches!(
            gf9.from_vector(big(&[1])),
            Err(Error::InvalidFieldElement { .. })
        ));
        assert!(matches!(
            gf9.from_vector(big(&[3, 0])),
            Err(Error::InvalidFieldElement { .. })
        ));
        assert!(gf9.from_integer(&BigUint::from(8u32)).is_ok());
        assert!(matches!(
            gf9.from_integer(&BigUint::from(9u32)),
            Err(Error::InvalidFieldElement { .. })
        ));

        // The literal constructor wraps instead
        assert_eq!(gf9.element(9), gf9.zero());
        assert_eq!(gf9.element(13), gf9.element(4));
    }

    #[test]
    fn test_element_iteration() {
        let gf9 = FieldContext::from_order(9).unwrap();
        let values: Vec<u64> = gf9.elements().filter_map(|e| e.to_u64()).collect();
        assert_eq!(values, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_context_equality() {
        let a = FieldContext::prime(17u32).unwrap();
        let b = FieldContext::prime(17u32).unwrap();
        let c = FieldContext::prime(19u32).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, FieldContext::from_order(289).unwrap());
    }

    #[test]
    fn test_linear_modulus_is_prime_field() {
        let prime = FieldContext::prime(7u32).unwrap();
        let linear = FieldContext::extension(7u32, big(&[3])).unwrap();
        assert_eq!(linear, prime);
        assert_eq!(linear.modulus(), prime.modulus());
        assert_eq!(linear.to_string(), "GF(7)");

        let product = linear.element(3).mul(&prime.element(5));
        assert_eq!(product, prime.element(1));
    }
}
