//! Finite field arithmetic over GF(p^k).
//!
//! This module provides runtime-configured finite fields whose elements are
//! coordinate vectors over the prime field GF(p). The explicit vector
//! representation is what allows the MQ reduction to express one
//! extension-field multiplication as k bilinear forms over GF(p).
//!
//! ## Overview
//!
//! - [`FieldContext`]: the field GF(p^k), its modulus and structure constants
//! - [`FieldElement`]: an element of a [`FieldContext`]
//! - [`IRREDUCIBLE_POLYS`]: tabulated moduli for common small extensions
//!
//! ## Example
//!
//! ```
//! use aiip::gf::FieldContext;
//! use num_bigint::BigUint;
//!
//! // GF(3^2) = GF(3)[x] / (x^2 + 1)
//! let gf9 = FieldContext::from_order(9).unwrap();
//!
//! let a = gf9.from_vector(vec![BigUint::from(1u32), BigUint::from(2u32)]).unwrap(); // 1 + 2x
//! let b = gf9.element(4); // 1 + x
//!
//! let prod = &a * &b; // 1 + 3x + 2x^2 = 1 + 0x - 2 = 2
//! assert_eq!(prod.to_vector(), vec![BigUint::from(2u32), BigUint::from(0u32)]);
//! ```

mod context;
mod element;
mod poly;

pub use context::FieldContext;
pub use element::FieldElement;
pub use poly::{get_irreducible_poly, is_irreducible, IRREDUCIBLE_POLYS};
