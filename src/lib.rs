//! # AIIP
//!
//! A toolkit for the Affine Iterated Inversion Problem: given a finite field
//! GF(q), the map f(x) = x² + α and a depth n, recover x from y = f⁽ⁿ⁾(x).
//!
//! ## Overview
//!
//! Evaluating f⁽ⁿ⁾ costs n field multiplications. Inverting it is the
//! hardness assumption behind a candidate post-quantum one-way function.
//! This library provides:
//! - Arithmetic over GF(p^k) with an explicit coordinate-vector isomorphism
//!   and precomputed structure constants
//! - The reduction of an instance to a multivariate quadratic (MQ) system over
//!   GF(p), plus a plain-text export for external MQ solvers
//! - Parameter generation from a target security level
//! - A brute-force oracle (sequential, range-partitioned, cancellable and
//!   parallel) and a timing benchmark with cost extrapolation
//!
//! ## Quick Start
//!
//! ```rust
//! use aiip::gf::FieldContext;
//! use aiip::{brute_force, reduce, AiipInstance};
//!
//! let field = FieldContext::prime(131_071u32).unwrap();
//! let instance = AiipInstance::new(field.clone(), field.element(5), 4).unwrap();
//!
//! let chain = instance.chain(&field.element(123)).unwrap();
//! let y = chain.target();
//!
//! // One quadratic equation per step plus the pinning equation
//! let system = reduce(&instance, y).unwrap();
//! assert_eq!(system.num_variables(), 5);
//! assert_eq!(system.len(), 5);
//! assert!(system.is_satisfied_by(&chain.to_assignment()).unwrap());
//!
//! // Exhaustive search is feasible for a 17-bit field
//! let x = brute_force(&instance, y).unwrap().unwrap();
//! assert_eq!(&instance.iterate(&x).unwrap(), y);
//! ```
//!
//! Parameters for a real security level:
//!
//! ```rust
//! use aiip::generate;
//!
//! let params = generate(128, None).unwrap();
//! assert_eq!(params.q().bits(), 256);
//! assert_eq!(params.n(), 16);
//! assert!(params.alpha_is_nonresidue());
//! ```
//!
//! ## Notation
//!
//! - **q = p^k**: field order, characteristic p, extension degree k
//! - **n**: iteration depth
//! - **N = k·(n+1)**: number of MQ variables, one block of k per xᵢ
//!
//! ## Features
//!
//! - `parallel` (default): parallel brute force using rayon
//! - `serde`: serialization of MQ systems and security parameters

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod analysis;
pub mod error;
pub mod gf;
pub mod instance;
pub mod mq;
pub mod params;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::{
        benchmark_iteration, benchmark_iteration_with, brute_force, brute_force_range, partition,
        CancellationToken, IterationBenchmark, ScanOutcome,
    };
    pub use crate::error::{Error, Result};
    pub use crate::gf::{FieldContext, FieldElement};
    pub use crate::instance::{AiipInstance, IterationChain};
    pub use crate::mq::{reduce, Monomial, MqSystem, QuadraticEquation, VariableLayout};
    pub use crate::params::{
        generate, DepthSource, ParameterGenerator, SecurityParameters, SecurityPolicy,
    };
    pub use crate::utils::{is_prime, is_probable_prime, legendre_symbol};

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_brute_force;
}

// Re-export commonly used items at crate root
pub use analysis::{benchmark_iteration, brute_force};
pub use error::{Error, Result};
pub use instance::{AiipInstance, IterationChain};
pub use mq::{reduce, MqSystem};
pub use params::{generate, SecurityParameters};

#[cfg(feature = "parallel")]
pub use parallel::par_brute_force;
