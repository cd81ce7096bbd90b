//! Error types for the aiip library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! variants for finite field operations, the MQ reduction, parameter
//! generation, and the text export format.

use num_bigint::BigUint;
use thiserror::Error;

/// The main error type for the aiip library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Finite Field Errors ============
    /// Attempted to invert zero in a finite field.
    #[error("division by zero in GF({order})")]
    DivisionByZero {
        /// The order of the field where division by zero occurred.
        order: BigUint,
    },

    /// A value or coordinate vector does not describe an element of the field.
    #[error("invalid field element: {reason}")]
    InvalidFieldElement {
        /// Description of what is wrong with the element.
        reason: String,
    },

    /// The characteristic supplied for a field is not prime.
    #[error("{0} is not prime")]
    NotPrime(BigUint),

    /// The polynomial supplied as an extension modulus is unusable.
    #[error("invalid field modulus: {reason}")]
    InvalidModulus {
        /// Description of why the modulus was rejected.
        reason: String,
    },

    // ============ Reduction Errors ============
    /// The reduction target does not live in the instance's field.
    #[error("target is an element of {found}, but the instance is defined over {expected}")]
    InvalidTarget {
        /// The instance's field.
        expected: String,
        /// The field of the supplied target.
        found: String,
    },

    /// An equation references a variable outside the system.
    #[error("variable index {index} is out of range for a system of {count} variables")]
    VariableOutOfRange {
        /// The offending variable index.
        index: usize,
        /// Number of variables in the system.
        count: usize,
    },

    /// An assignment or vector has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    // ============ Parameter Errors ============
    /// The prime search window contains no prime of the required bit length.
    #[error("no {bits}-bit prime found in [{lower}, {upper}]")]
    NoSuitablePrime {
        /// Required bit length of the prime.
        bits: u64,
        /// Lower end of the search window.
        lower: BigUint,
        /// Upper end of the search window.
        upper: BigUint,
    },

    /// Invalid parameters supplied by the caller.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },

    // ============ Format Errors ============
    /// A serialized MQ system could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// One-based line number of the failure.
        line: usize,
        /// Description of the failure.
        message: String,
    },
}

/// A specialized `Result` type for aiip operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create a new `InvalidFieldElement` error.
    #[must_use]
    pub fn invalid_element(reason: impl Into<String>) -> Self {
        Self::InvalidFieldElement {
            reason: reason.into(),
        }
    }

    /// Create a new `InvalidModulus` error.
    #[must_use]
    pub fn invalid_modulus(reason: impl Into<String>) -> Self {
        Self::InvalidModulus {
            reason: reason.into(),
        }
    }

    /// Create a new `Parse` error.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
