//! AIIP instances and forward iteration.
//!
//! An [`AiipInstance`] fixes a field, the affine constant α and the depth n of
//! the map f(x) = x² + α. Evaluating f⁽ⁿ⁾ is cheap; inverting it is the hard
//! problem the rest of the crate studies.

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::gf::{FieldContext, FieldElement};
use crate::params::SecurityParameters;

/// An instance of the Affine Iterated Inversion Problem.
///
/// # Example
///
/// ```
/// use aiip::gf::FieldContext;
/// use aiip::AiipInstance;
///
/// let field = FieldContext::prime(17u32).unwrap();
/// let alpha = field.element(5);
/// let instance = AiipInstance::new(field.clone(), alpha, 2).unwrap();
///
/// // 3 -> 9 + 5 = 14 -> 196 + 5 = 201 ≡ 14 (mod 17)
/// assert_eq!(instance.iterate(&field.element(3)).unwrap().to_u64(), Some(14));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiipInstance {
    field: FieldContext,
    alpha: FieldElement,
    depth: usize,
}

impl AiipInstance {
    /// Create an instance of f(x) = x² + α iterated `depth` times.
    ///
    /// A depth of zero is the identity map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `alpha` is not an element of `field`.
    pub fn new(field: FieldContext, alpha: FieldElement, depth: usize) -> Result<Self> {
        if !field.contains(&alpha) {
            return Err(Error::invalid_element(format!(
                "affine constant lives in {}, instance field is {field}",
                alpha.field()
            )));
        }
        Ok(Self {
            field,
            alpha,
            depth,
        })
    }

    /// Build the prime-field instance described by generated parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters do not describe a valid prime field.
    pub fn from_parameters(params: &SecurityParameters) -> Result<Self> {
        let field = FieldContext::prime(params.q().clone())?;
        let alpha = field.from_integer(params.alpha())?;
        Self::new(field, alpha, params.n())
    }

    /// The field the instance is defined over.
    #[must_use]
    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    /// The affine constant α.
    #[must_use]
    pub fn alpha(&self) -> &FieldElement {
        &self.alpha
    }

    /// The iteration depth n.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// One application of f: x² + α.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `x` is not in the instance's field.
    pub fn step(&self, x: &FieldElement) -> Result<FieldElement> {
        self.check_member(x)?;
        Ok(self.apply(x))
    }

    /// Apply f `steps` times.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `x` is not in the instance's field.
    pub fn iterate_n(&self, x: &FieldElement, steps: usize) -> Result<FieldElement> {
        self.check_member(x)?;
        let mut current = x.clone();
        for _ in 0..steps {
            current = self.apply(&current);
        }
        Ok(current)
    }

    /// Compute f⁽ⁿ⁾(x) using n field multiplications.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `x` is not in the instance's field.
    pub fn iterate(&self, x: &FieldElement) -> Result<FieldElement> {
        self.iterate_n(x, self.depth)
    }

    /// The full chain x₀ = x, x₁, ..., xₙ = f⁽ⁿ⁾(x).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldElement`] if `x` is not in the instance's field.
    pub fn chain(&self, x: &FieldElement) -> Result<IterationChain> {
        self.check_member(x)?;
        let mut values = Vec::with_capacity(self.depth + 1);
        values.push(x.clone());
        for i in 0..self.depth {
            let next = self.apply(&values[i]);
            values.push(next);
        }
        Ok(IterationChain { values })
    }

    fn check_member(&self, x: &FieldElement) -> Result<()> {
        if self.field.contains(x) {
            Ok(())
        } else {
            Err(Error::invalid_element(format!(
                "input lives in {}, instance field is {}",
                x.field(),
                self.field
            )))
        }
    }

    // Caller guarantees x is in the instance's field.
    fn apply(&self, x: &FieldElement) -> FieldElement {
        x.square().add(&self.alpha)
    }
}

/// A witness x₀, x₁, ..., xₙ with xᵢ = xᵢ₋₁² + α.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationChain {
    values: Vec<FieldElement>,
}

impl IterationChain {
    /// Rebuild a chain from a flat assignment of `k·(n+1)` base-field values,
    /// block i holding the coordinates of xᵢ.
    ///
    /// The result is not checked against any instance; use
    /// [`IterationChain::is_valid_for`] for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment is empty, its length is not a
    /// multiple of k, or a value is not reduced modulo p.
    pub fn from_assignment(field: &FieldContext, assignment: &[BigUint]) -> Result<Self> {
        let k = field.degree();
        if assignment.is_empty() || assignment.len() % k != 0 {
            return Err(Error::DimensionMismatch {
                expected: k * (assignment.len() / k).max(1),
                actual: assignment.len(),
            });
        }
        let values = assignment
            .chunks(k)
            .map(|block| field.from_vector(block.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    /// All values x₀ ... xₙ.
    #[must_use]
    pub fn values(&self) -> &[FieldElement] {
        &self.values
    }

    /// The number of steps n.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.values.len() - 1
    }

    /// The secret x₀.
    #[must_use]
    pub fn secret(&self) -> &FieldElement {
        &self.values[0]
    }

    /// The public target xₙ.
    #[must_use]
    pub fn target(&self) -> &FieldElement {
        &self.values[self.values.len() - 1]
    }

    /// Whether every link satisfies xᵢ = xᵢ₋₁² + α for `instance`.
    #[must_use]
    pub fn is_valid_for(&self, instance: &AiipInstance) -> bool {
        self.depth() == instance.depth()
            && self.values.iter().all(|v| instance.field().contains(v))
            && self
                .values
                .windows(2)
                .all(|pair| instance.apply(&pair[0]) == pair[1])
    }

    /// Flatten the chain into base-field values, block by block.
    #[must_use]
    pub fn to_assignment(&self) -> Vec<BigUint> {
        self.values
            .iter()
            .flat_map(|v| v.coordinates().iter().cloned())
            .collect()
    }
}
