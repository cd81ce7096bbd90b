//! Elements of a runtime-configured finite field.
//!
//! A [`FieldElement`] is a coordinate vector over GF(p) together with a
//! handle to its [`FieldContext`]. All operations are pure: they return new
//! elements and never mutate their operands.

use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use super::FieldContext;
use crate::error::{Error, Result};
use crate::utils::legendre_symbol;

/// An element of GF(p^k), stored as its k coordinates over GF(p).
///
/// # Example
///
/// ```
/// use aiip::gf::FieldContext;
///
/// let gf7 = FieldContext::prime(7u32).unwrap();
/// let a = gf7.element(3);
/// let b = gf7.element(5);
///
/// assert_eq!(a.add(&b).to_u64(), Some(1)); // 3 + 5 = 8 ≡ 1 (mod 7)
/// assert_eq!(a.mul(&b).to_u64(), Some(1)); // 3 * 5 = 15 ≡ 1 (mod 7)
/// assert_eq!(a.inverse().unwrap().to_u64(), Some(5));
/// ```
#[derive(Clone)]
pub struct FieldElement {
    coords: Vec<BigUint>,
    field: FieldContext,
}

impl FieldElement {
    pub(crate) fn from_parts(coords: Vec<BigUint>, field: FieldContext) -> Self {
        debug_assert_eq!(coords.len(), field.degree());
        Self { coords, field }
    }

    /// The field this element belongs to.
    #[must_use]
    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    /// Borrow the coordinate vector.
    #[must_use]
    pub fn coordinates(&self) -> &[BigUint] {
        &self.coords
    }

    /// The coordinate vector over GF(p), of length k.
    #[must_use]
    pub fn to_vector(&self) -> Vec<BigUint> {
        self.coords.clone()
    }

    /// The integer encoding a_0 + a_1·p + ... + a_{k-1}·p^(k-1).
    #[must_use]
    pub fn to_integer(&self) -> BigUint {
        let p = self.field.characteristic();
        self.coords
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, c| acc * p + c)
    }

    /// The integer encoding, if it fits in a `u64`.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.to_integer().to_u64()
    }

    /// Check if this element is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coords.iter().all(Zero::is_zero)
    }

    /// Check if this element is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.coords[0].is_one() && self.coords[1..].iter().all(Zero::is_zero)
    }

    /// Field addition.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` belongs to a different field.
    #[must_use]
    pub fn add(&self, rhs: &Self) -> Self {
        assert!(self.field == rhs.field, "operands from different fields");
        let p = self.field.characteristic();
        let coords = self
            .coords
            .iter()
            .zip(&rhs.coords)
            .map(|(a, b)| (a + b) % p)
            .collect();
        Self::from_parts(coords, self.field.clone())
    }

    /// Field subtraction.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` belongs to a different field.
    #[must_use]
    pub fn sub(&self, rhs: &Self) -> Self {
        assert!(self.field == rhs.field, "operands from different fields");
        let p = self.field.characteristic();
        let coords = self
            .coords
            .iter()
            .zip(&rhs.coords)
            .map(|(a, b)| (a + p - b) % p)
            .collect();
        Self::from_parts(coords, self.field.clone())
    }

    /// Additive inverse (-a).
    #[must_use]
    pub fn neg(&self) -> Self {
        let p = self.field.characteristic();
        let coords = self.coords.iter().map(|a| (p - a) % p).collect();
        Self::from_parts(coords, self.field.clone())
    }

    /// Field multiplication.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` belongs to a different field.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        assert!(self.field == rhs.field, "operands from different fields");
        let coords = self.field.mul_coords(&self.coords, &rhs.coords);
        Self::from_parts(coords, self.field.clone())
    }

    /// Squaring, a·a.
    #[must_use]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation by squaring.
    #[must_use]
    pub fn pow(&self, exp: &BigUint) -> Self {
        let mut result = self.field.one();
        for i in (0..exp.bits()).rev() {
            result = result.square();
            if exp.bit(i) {
                result = result.mul(self);
            }
        }
        result
    }

    /// Multiplicative inverse (a^(-1)).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if called on zero.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::DivisionByZero {
                order: self.field.order().clone(),
            });
        }
        let p = self.field.characteristic();
        if self.field.is_prime_field() {
            let inv = self.coords[0].modpow(&(p - BigUint::from(2u32)), p);
            return Ok(Self::from_parts(vec![inv], self.field.clone()));
        }
        // a^(q-2) = a^(-1) in GF(q)
        Ok(self.pow(&(self.field.order() - BigUint::from(2u32))))
    }

    /// Field division.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if `rhs` is zero.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        Ok(self.mul(&rhs.inverse()?))
    }

    /// Quadratic character via Euler's criterion in GF(q).
    ///
    /// Returns:
    /// - `0` if self is zero
    /// - `1` if self is a non-zero square
    /// - `-1` if self is a non-square
    ///
    /// In characteristic 2 every element is a square.
    #[must_use]
    pub fn legendre(&self) -> i8 {
        if self.is_zero() {
            return 0;
        }
        let q = self.field.order();
        if self.field.is_prime_field() && q.bit(0) {
            return legendre_symbol(&self.coords[0], q);
        }
        if q.bit(0) {
            let e = (q - BigUint::one()) >> 1u32;
            if self.pow(&e).is_one() {
                1
            } else {
                -1
            }
        } else {
            1
        }
    }

    /// Check if this element is a non-zero square.
    #[must_use]
    pub fn is_quadratic_residue(&self) -> bool {
        self.legendre() == 1
    }

    /// Check if this element is a non-square.
    #[must_use]
    pub fn is_quadratic_nonresidue(&self) -> bool {
        self.legendre() == -1
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords && self.field == other.field
    }
}

impl Eq for FieldElement {}

impl Hash for FieldElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords.hash(state);
        self.field.characteristic().hash(state);
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.field, self.coords)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_prime_field() {
            write!(f, "{}", self.coords[0])
        } else {
            write!(f, "{:?}", self.coords)
        }
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl std::ops::$trait<&FieldElement> for &FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: &FieldElement) -> FieldElement {
                FieldElement::$method(self, rhs)
            }
        }

        impl std::ops::$trait for FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: FieldElement) -> FieldElement {
                FieldElement::$method(&self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);

impl std::ops::Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self::Output {
        FieldElement::neg(&self)
    }
}

impl std::ops::Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> Self::Output {
        FieldElement::neg(self)
    }
}
