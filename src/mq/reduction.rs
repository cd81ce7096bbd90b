//! Reduction of an AIIP instance to an MQ system over the base field.
//!
//! The relation xᵢ = xᵢ₋₁² + α is a single equation over GF(p^k). Writing
//! every xᵢ as a coordinate vector over GF(p) and expanding the square through
//! the structure constants c of the field turns it into k quadratic equations
//! over GF(p):
//!
//! ```text
//! Σ_{u,v} c[u][v][w] · X_{i-1,u} · X_{i-1,v} + α_w − X_{i,w} = 0    (w = 0..k)
//! ```
//!
//! The last block is pinned to the target with k linear equations
//! X_{n,w} − y_w = 0. The result has k·(n+1) variables and k·(n+1) equations.
//!
//! Equations are emitted by step ascending, then output coordinate ascending,
//! and every equation keeps its terms in canonical monomial order, so two
//! reductions of the same input are identical term for term.

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use super::{Monomial, MqSystem, QuadraticEquation};
use crate::error::{Error, Result};
use crate::gf::FieldElement;
use crate::instance::AiipInstance;

/// Maps (block, coordinate) pairs to flat variable indices.
///
/// Block i holds the k coordinates of xᵢ; block 0 is the secret and block n
/// the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    degree: usize,
    blocks: usize,
}

impl VariableLayout {
    /// The layout used for `instance`: n+1 blocks of k variables.
    #[must_use]
    pub fn for_instance(instance: &AiipInstance) -> Self {
        Self {
            degree: instance.field().degree(),
            blocks: instance.depth() + 1,
        }
    }

    /// Index of coordinate `coord` of block `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` or `coord` is out of range.
    #[must_use]
    pub fn index(&self, block: usize, coord: usize) -> usize {
        assert!(block < self.blocks, "block {block} out of range");
        assert!(coord < self.degree, "coordinate {coord} out of range");
        block * self.degree + coord
    }

    /// The variable indices of block `block`.
    #[must_use]
    pub fn block(&self, block: usize) -> std::ops::Range<usize> {
        let start = block * self.degree;
        start..start + self.degree
    }

    /// Variables per block (the extension degree k).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of blocks (n + 1).
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Total number of variables N = k·(n+1).
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.degree * self.blocks
    }
}

/// Build the MQ system whose solutions are exactly the iteration chains of
/// `instance` that end in `target`.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if `target` is not an element of the
/// instance's field. The reduction is total otherwise.
pub fn reduce(instance: &AiipInstance, target: &FieldElement) -> Result<MqSystem> {
    let field = instance.field();
    if !field.contains(target) {
        return Err(Error::InvalidTarget {
            expected: format!("{field:?}"),
            found: format!("{:?}", target.field()),
        });
    }

    let layout = VariableLayout::for_instance(instance);
    let k = layout.degree();
    let n = instance.depth();
    let p = field.characteristic();
    let c = field.structure_constants();
    let alpha = instance.alpha().coordinates();
    let one = BigUint::from(1u32);

    let mut system = MqSystem::new(layout.num_variables(), p.clone())?;

    for step in 1..=n {
        for w in 0..k {
            let mut eq = QuadraticEquation::new();
            for u in 0..k {
                for v in 0..k {
                    let coeff = &c[[u, v, w]];
                    if coeff.is_zero() {
                        continue;
                    }
                    let m = Monomial::quadratic(
                        layout.index(step - 1, u),
                        layout.index(step - 1, v),
                    );
                    eq.add_term(m, coeff, p);
                }
            }
            eq.add_term(Monomial::Constant, &alpha[w], p);
            eq.sub_term(Monomial::Linear(layout.index(step, w)), &one, p);
            system.push(eq)?;
        }
    }

    for (w, y_w) in target.coordinates().iter().enumerate() {
        let mut eq = QuadraticEquation::new();
        eq.add_term(Monomial::Linear(layout.index(n, w)), &one, p);
        eq.sub_term(Monomial::Constant, y_w, p);
        system.push(eq)?;
    }

    debug!(
        "reduced AIIP instance over {} (n = {}) to {} equations in {} variables",
        field,
        n,
        system.len(),
        system.num_variables()
    );

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::FieldContext;
    use crate::instance::IterationChain;

    fn instance(q: u64, alpha: u64, depth: usize) -> AiipInstance {
        let field = FieldContext::from_order(q).unwrap();
        let alpha = field.element(alpha);
        AiipInstance::new(field, alpha, depth).unwrap()
    }

    #[test]
    fn test_layout() {
        let inst = instance(27, 2, 4);
        let layout = VariableLayout::for_instance(&inst);
        assert_eq!(layout.degree(), 3);
        assert_eq!(layout.blocks(), 5);
        assert_eq!(layout.num_variables(), 15);
        assert_eq!(layout.index(0, 0), 0);
        assert_eq!(layout.index(2, 1), 7);
        assert_eq!(layout.block(4), 12..15);
    }

    #[test]
    fn test_prime_field_equation_shape() {
        // GF(17), alpha = 5, n = 2: x1 = x0^2 + 5, x2 = x1^2 + 5, x2 = y
        let inst = instance(17, 5, 2);
        let y = inst.field().element(9);
        let system = reduce(&inst, &y).unwrap();

        assert_eq!(system.num_variables(), 3);
        assert_eq!(system.len(), 3);

        let first = &system.equations()[0];
        assert_eq!(first.coefficient(&Monomial::Quadratic(0, 0)), BigUint::from(1u32));
        assert_eq!(first.coefficient(&Monomial::Linear(1)), BigUint::from(16u32));
        assert_eq!(first.coefficient(&Monomial::Constant), BigUint::from(5u32));
        assert_eq!(first.num_terms(), 3);

        let pin = &system.equations()[2];
        assert_eq!(pin.degree(), 1);
        assert_eq!(pin.coefficient(&Monomial::Linear(2)), BigUint::from(1u32));
        assert_eq!(pin.coefficient(&Monomial::Constant), BigUint::from(8u32));
    }

    #[test]
    fn test_extension_field_counts_and_degree() {
        let inst = instance(9, 4, 3);
        let y = inst.iterate(&inst.field().element(5)).unwrap();
        let system = reduce(&inst, &y).unwrap();

        assert_eq!(system.num_variables(), 2 * 4);
        assert_eq!(system.len(), 2 * 4);
        assert_eq!(system.degree(), 2);

        // Step equations never mix variables of different blocks in one product
        for (idx, eq) in system.equations().iter().enumerate().take(2 * 3) {
            let step = idx / 2 + 1;
            let prev = (step - 1) * 2..step * 2;
            for (m, _) in eq.terms() {
                if let Monomial::Quadratic(i, j) = *m {
                    assert!(prev.contains(&i) && prev.contains(&j));
                }
            }
        }
    }

    #[test]
    fn test_soundness_for_every_secret() {
        for q in [17u64, 9, 8] {
            let inst = instance(q, 3, 3);
            for x in inst.field().elements() {
                let chain = inst.chain(&x).unwrap();
                let system = reduce(&inst, chain.target()).unwrap();
                assert!(
                    system.is_satisfied_by(&chain.to_assignment()).unwrap(),
                    "chain from {x:?} does not satisfy its system over GF({q})"
                );
            }
        }
    }

    #[test]
    fn test_completeness_exhaustive_gf9() {
        // Enumerate all 3^4 assignments for GF(9), n = 1
        let inst = instance(9, 4, 1);
        let y = inst.field().element(7);
        let system = reduce(&inst, &y).unwrap();
        let p = 3u64;

        let mut solutions = 0;
        for code in 0..p.pow(4) {
            let assignment: Vec<BigUint> = (0..4)
                .map(|i| BigUint::from(code / p.pow(i) % p))
                .collect();
            if system.is_satisfied_by(&assignment).unwrap() {
                solutions += 1;
                let chain = IterationChain::from_assignment(inst.field(), &assignment).unwrap();
                assert!(chain.is_valid_for(&inst));
                assert_eq!(chain.target(), &y);
            }
        }

        let preimages = inst
            .field()
            .elements()
            .filter(|x| inst.iterate(x).unwrap() == y)
            .count();
        assert_eq!(solutions, preimages);
    }

    #[test]
    fn test_zero_depth_yields_single_pin() {
        let inst = instance(131_071, 5, 0);
        let y = inst.field().element(42);
        let system = reduce(&inst, &y).unwrap();
        assert_eq!(system.num_variables(), 1);
        assert_eq!(system.len(), 1);
        assert_eq!(system.degree(), 1);
        assert!(system.is_satisfied_by(&[BigUint::from(42u32)]).unwrap());
    }

    #[test]
    fn test_foreign_target_rejected() {
        let inst = instance(17, 5, 2);
        let other = FieldContext::prime(19u32).unwrap();
        assert!(matches!(
            reduce(&inst, &other.element(3)),
            Err(Error::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let inst = instance(25, 6, 5);
        let y = inst.iterate(&inst.field().element(13)).unwrap();
        let a = reduce(&inst, &y).unwrap();
        let b = reduce(&inst, &y).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_text(), b.to_text());
    }
}
