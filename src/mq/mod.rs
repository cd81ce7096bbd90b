//! Multivariate quadratic (MQ) systems over a prime field.
//!
//! This module provides the data model produced by the AIIP reduction and
//! consumed by external MQ solvers.
//!
//! ## Overview
//!
//! - [`Monomial`]: a product of at most two variables, or the constant term
//! - [`QuadraticEquation`]: a polynomial of degree ≤ 2, kept in a canonical order
//! - [`MqSystem`]: variable count, base prime and an ordered list of equations
//! - [`VariableLayout`]: block/coordinate bookkeeping for the reduction
//! - [`reduce`]: the AIIP → MQ reduction engine
//!
//! ## Example
//!
//! ```
//! use aiip::gf::FieldContext;
//! use aiip::{mq, AiipInstance};
//!
//! let field = FieldContext::prime(131_071u32).unwrap();
//! let instance = AiipInstance::new(field.clone(), field.element(5), 4).unwrap();
//!
//! let chain = instance.chain(&field.element(123)).unwrap();
//! let system = mq::reduce(&instance, chain.target()).unwrap();
//!
//! assert_eq!(system.num_variables(), 5);
//! assert_eq!(system.len(), 5);
//! assert!(system.is_satisfied_by(&chain.to_assignment()).unwrap());
//! ```

mod format;
mod reduction;

pub use reduction::{reduce, VariableLayout};

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A monomial of degree at most two.
///
/// The derived ordering places quadratic monomials first, then linear ones,
/// then the constant term, each group sorted by variable index. This is the
/// canonical term order of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Monomial {
    /// The product X_i · X_j with `i <= j`.
    Quadratic(usize, usize),
    /// The single variable X_i.
    Linear(usize),
    /// The constant term.
    Constant,
}

impl Monomial {
    /// The product of two variables, normalized so the smaller index comes first.
    #[must_use]
    pub fn quadratic(i: usize, j: usize) -> Self {
        Self::Quadratic(i.min(j), i.max(j))
    }

    /// Total degree of the monomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        match self {
            Self::Quadratic(..) => 2,
            Self::Linear(_) => 1,
            Self::Constant => 0,
        }
    }

    /// Largest variable index referenced, if any.
    #[must_use]
    pub fn max_variable(&self) -> Option<usize> {
        match *self {
            Self::Quadratic(_, j) => Some(j),
            Self::Linear(i) => Some(i),
            Self::Constant => None,
        }
    }

    fn evaluate(&self, assignment: &[BigUint]) -> BigUint {
        match *self {
            Self::Quadratic(i, j) => &assignment[i] * &assignment[j],
            Self::Linear(i) => assignment[i].clone(),
            Self::Constant => BigUint::from(1u32),
        }
    }
}

/// A single `(monomial, coefficient)` entry of an equation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    /// The monomial.
    pub monomial: Monomial,
    /// Its coefficient in `[1, p)`.
    pub coefficient: BigUint,
}

/// A polynomial equation `Σ c_m · m = 0` of degree at most two over GF(p).
///
/// Coefficients are always reduced and zero coefficients are never stored, so
/// two equations describing the same polynomial compare equal. An equation
/// with no terms is the degenerate `0 = 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<Term>", into = "Vec<Term>")
)]
pub struct QuadraticEquation {
    terms: BTreeMap<Monomial, BigUint>,
}

impl QuadraticEquation {
    /// Create an empty equation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coefficient · monomial` to the equation, working modulo `p`.
    pub fn add_term(&mut self, monomial: Monomial, coefficient: &BigUint, p: &BigUint) {
        let coefficient = coefficient % p;
        if coefficient.is_zero() {
            return;
        }
        let entry = self.terms.entry(monomial).or_default();
        *entry = (&*entry + coefficient) % p;
        if entry.is_zero() {
            self.terms.remove(&monomial);
        }
    }

    /// Subtract `coefficient · monomial` from the equation, working modulo `p`.
    pub fn sub_term(&mut self, monomial: Monomial, coefficient: &BigUint, p: &BigUint) {
        let coefficient = coefficient % p;
        if coefficient.is_zero() {
            return;
        }
        self.add_term(monomial, &(p - coefficient), p);
    }

    /// The coefficient of `monomial` (zero if absent).
    #[must_use]
    pub fn coefficient(&self, monomial: &Monomial) -> BigUint {
        self.terms.get(monomial).cloned().unwrap_or_default()
    }

    /// Iterate over the non-zero terms in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigUint)> {
        self.terms.iter()
    }

    /// Number of non-zero terms.
    #[must_use]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Whether every coefficient is zero.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total degree (0 for a constant or trivial equation).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Largest variable index referenced, if any.
    #[must_use]
    pub fn max_variable(&self) -> Option<usize> {
        self.terms.keys().filter_map(Monomial::max_variable).max()
    }

    /// Evaluate the polynomial at `assignment`, modulo `p`.
    ///
    /// # Panics
    ///
    /// Panics if a referenced variable is outside `assignment`.
    #[must_use]
    pub fn evaluate(&self, assignment: &[BigUint], p: &BigUint) -> BigUint {
        self.terms
            .iter()
            .fold(BigUint::zero(), |acc, (m, c)| {
                (acc + c * m.evaluate(assignment)) % p
            })
    }
}

impl From<Vec<Term>> for QuadraticEquation {
    fn from(terms: Vec<Term>) -> Self {
        Self {
            terms: terms
                .into_iter()
                .filter(|t| !t.coefficient.is_zero())
                .map(|t| (t.monomial, t.coefficient))
                .collect(),
        }
    }
}

impl From<QuadraticEquation> for Vec<Term> {
    fn from(equation: QuadraticEquation) -> Self {
        equation
            .terms
            .into_iter()
            .map(|(monomial, coefficient)| Term {
                monomial,
                coefficient,
            })
            .collect()
    }
}

/// An ordered system of quadratic equations over GF(p).
///
/// Every variable index referenced by an equation lies in `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MqSystem {
    num_variables: usize,
    modulus: BigUint,
    equations: Vec<QuadraticEquation>,
}

impl MqSystem {
    /// Create an empty system in `num_variables` variables over GF(`modulus`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `modulus < 2`.
    pub fn new(num_variables: usize, modulus: BigUint) -> Result<Self> {
        if modulus < BigUint::from(2u32) {
            return Err(Error::invalid_params(format!(
                "MQ system modulus must be at least 2, got {modulus}"
            )));
        }
        Ok(Self {
            num_variables,
            modulus,
            equations: Vec::new(),
        })
    }

    /// Append an equation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VariableOutOfRange`] if the equation references a
    /// variable outside the system, or [`Error::InvalidParams`] if a
    /// coefficient is not reduced modulo p.
    pub fn push(&mut self, equation: QuadraticEquation) -> Result<()> {
        if let Some(index) = equation.max_variable() {
            if index >= self.num_variables {
                return Err(Error::VariableOutOfRange {
                    index,
                    count: self.num_variables,
                });
            }
        }
        if let Some((_, c)) = equation.terms().find(|(_, c)| **c >= self.modulus) {
            return Err(Error::invalid_params(format!(
                "coefficient {c} is not reduced modulo {}",
                self.modulus
            )));
        }
        self.equations.push(equation);
        Ok(())
    }

    /// Number of variables N.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// The base prime p.
    #[must_use]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The equations in emission order.
    #[must_use]
    pub fn equations(&self) -> &[QuadraticEquation] {
        &self.equations
    }

    /// Number of equations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    /// Whether the system has no equations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Highest total degree among the equations.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.equations
            .iter()
            .map(QuadraticEquation::degree)
            .max()
            .unwrap_or(0)
    }

    /// Evaluate every equation at `assignment`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the assignment does not have
    /// exactly N values.
    pub fn evaluate(&self, assignment: &[BigUint]) -> Result<Vec<BigUint>> {
        if assignment.len() != self.num_variables {
            return Err(Error::DimensionMismatch {
                expected: self.num_variables,
                actual: assignment.len(),
            });
        }
        Ok(self
            .equations
            .iter()
            .map(|eq| eq.evaluate(assignment, &self.modulus))
            .collect())
    }

    /// Whether `assignment` makes every equation vanish.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the assignment does not have
    /// exactly N values.
    pub fn is_satisfied_by(&self, assignment: &[BigUint]) -> Result<bool> {
        Ok(self.evaluate(assignment)?.iter().all(Zero::is_zero))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> BigUint {
        BigUint::from(7u32)
    }

    #[test]
    fn test_monomial_order() {
        let mut monomials = vec![
            Monomial::Constant,
            Monomial::Linear(0),
            Monomial::quadratic(2, 1),
            Monomial::Linear(3),
            Monomial::quadratic(0, 0),
        ];
        monomials.sort();
        assert_eq!(
            monomials,
            vec![
                Monomial::Quadratic(0, 0),
                Monomial::Quadratic(1, 2),
                Monomial::Linear(0),
                Monomial::Linear(3),
                Monomial::Constant,
            ]
        );
    }

    #[test]
    fn test_add_term_accumulates_and_cancels() {
        let p = p();
        let mut eq = QuadraticEquation::new();
        eq.add_term(Monomial::quadratic(0, 1), &BigUint::from(3u32), &p);
        eq.add_term(Monomial::quadratic(1, 0), &BigUint::from(2u32), &p);
        assert_eq!(eq.coefficient(&Monomial::Quadratic(0, 1)), BigUint::from(5u32));

        eq.add_term(Monomial::quadratic(0, 1), &BigUint::from(2u32), &p);
        assert!(eq.is_trivial());

        eq.add_term(Monomial::Constant, &BigUint::from(15u32), &p);
        assert_eq!(eq.coefficient(&Monomial::Constant), BigUint::from(1u32));
        eq.sub_term(Monomial::Constant, &BigUint::from(1u32), &p);
        assert!(eq.is_trivial());
    }

    #[test]
    fn test_evaluate() {
        // x0*x1 + 6*x2 + 3 over GF(7)
        let p = p();
        let mut eq = QuadraticEquation::new();
        eq.add_term(Monomial::quadratic(0, 1), &BigUint::from(1u32), &p);
        eq.sub_term(Monomial::Linear(2), &BigUint::from(1u32), &p);
        eq.add_term(Monomial::Constant, &BigUint::from(3u32), &p);
        assert_eq!(eq.degree(), 2);

        let assignment: Vec<BigUint> = [2u32, 3, 2].iter().map(|&v| BigUint::from(v)).collect();
        // 6 - 2 + 3 = 7 ≡ 0
        assert!(eq.evaluate(&assignment, &p).is_zero());

        let mut system = MqSystem::new(3, p).unwrap();
        system.push(eq).unwrap();
        assert!(system.is_satisfied_by(&assignment).unwrap());
        assert!(matches!(
            system.is_satisfied_by(&assignment[..2]),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_push_validates_indices() {
        let p = p();
        let mut eq = QuadraticEquation::new();
        eq.add_term(Monomial::Linear(4), &BigUint::from(1u32), &p);

        let mut system = MqSystem::new(3, p.clone()).unwrap();
        assert_eq!(
            system.push(eq).unwrap_err(),
            Error::VariableOutOfRange { index: 4, count: 3 }
        );

        let mut unreduced = QuadraticEquation::new();
        unreduced.add_term(Monomial::Constant, &BigUint::from(5u32), &BigUint::from(11u32));
        let mut small = MqSystem::new(1, BigUint::from(3u32)).unwrap();
        assert!(small.push(unreduced).is_err());

        assert!(MqSystem::new(1, BigUint::from(1u32)).is_err());
    }

    #[test]
    fn test_trivial_equation_is_valid() {
        let mut system = MqSystem::new(2, p()).unwrap();
        system.push(QuadraticEquation::new()).unwrap();
        assert_eq!(system.degree(), 0);
        assert!(system
            .is_satisfied_by(&[BigUint::from(1u32), BigUint::from(2u32)])
            .unwrap());
    }
}
