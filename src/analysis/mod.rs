//! Cryptanalysis harness: exhaustive search and cost extrapolation.
//!
//! Brute force evaluates f⁽ⁿ⁾ on every field element, which costs O(q·n)
//! field multiplications. It is a feasibility check for small fields only;
//! for anything realistic use [`benchmark_iteration`] and read the
//! extrapolated figure, which is an estimate and not an executed attack.
//!
//! Scans run in integer-encoding order (see
//! [`FieldElement::to_integer`](crate::gf::FieldElement::to_integer)), so a
//! range `[a, b)` of encodings is a well-defined unit of work that can be
//! handed to a worker. Every scan accepts a [`CancellationToken`].

mod benchmark;

pub use benchmark::{benchmark_iteration, benchmark_iteration_with, IterationBenchmark};

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::gf::FieldElement;
use crate::instance::AiipInstance;

/// A shared flag that asks running scans to stop.
///
/// Clones observe the same flag. A [child](CancellationToken::child) also
/// observes its parent, but cancelling the child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<CancellationToken>>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested on this token or an ancestor.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// A token that is cancelled with `self` and can also be cancelled on
    /// its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::default(),
            parent: Some(Arc::new(self.clone())),
        }
    }
}

/// Result of scanning a range of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A preimage of the target.
    Found(FieldElement),
    /// Every candidate in the range was tried without a match.
    Exhausted,
    /// The scan stopped early because its token was cancelled.
    Cancelled,
}

impl ScanOutcome {
    /// The witness, if one was found.
    #[must_use]
    pub fn found(self) -> Option<FieldElement> {
        match self {
            Self::Found(x) => Some(x),
            Self::Exhausted | Self::Cancelled => None,
        }
    }
}

/// Search the whole field for some x with f⁽ⁿ⁾(x) = `target`.
///
/// Returns the first match in encoding order, or `None` when `target` has no
/// preimage. Runs q full iterations in the worst case.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if `target` is not in the instance's field.
///
/// # Example
///
/// ```
/// use aiip::analysis::brute_force;
/// use aiip::gf::FieldContext;
/// use aiip::AiipInstance;
///
/// let field = FieldContext::prime(17u32).unwrap();
/// let instance = AiipInstance::new(field.clone(), field.element(5), 2).unwrap();
/// let y = instance.iterate(&field.element(3)).unwrap();
///
/// let x = brute_force(&instance, &y).unwrap().unwrap();
/// assert_eq!(instance.iterate(&x).unwrap(), y);
/// ```
pub fn brute_force(
    instance: &AiipInstance,
    target: &FieldElement,
) -> Result<Option<FieldElement>> {
    let q = instance.field().order().clone();
    info!(
        "starting brute force over {} (n = {})",
        instance.field(),
        instance.depth()
    );
    let start = Instant::now();
    let token = CancellationToken::new();
    let outcome = brute_force_range(instance, target, BigUint::zero()..q, &token)?;
    let elapsed = start.elapsed();

    let found = outcome.found();
    match &found {
        Some(x) => info!("preimage found: x = {x} after {elapsed:.2?}"),
        None => info!("no preimage exists; scan took {elapsed:.2?}"),
    }
    Ok(found)
}

/// Scan the candidates whose integer encodings lie in `range`.
///
/// The token is polled before every candidate.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] for a foreign target and
/// [`Error::InvalidParams`] if `range` extends past q.
pub fn brute_force_range(
    instance: &AiipInstance,
    target: &FieldElement,
    range: Range<BigUint>,
    token: &CancellationToken,
) -> Result<ScanOutcome> {
    let field = instance.field();
    if !field.contains(target) {
        return Err(Error::InvalidTarget {
            expected: format!("{field:?}"),
            found: format!("{:?}", target.field()),
        });
    }
    if range.end > *field.order() {
        return Err(Error::invalid_params(format!(
            "scan range end {} exceeds field order {}",
            range.end,
            field.order()
        )));
    }

    debug!("scanning [{}, {}) of {}", range.start, range.end, field);
    let mut candidate = range.start;
    while candidate < range.end {
        if token.is_cancelled() {
            return Ok(ScanOutcome::Cancelled);
        }
        let x = field.decode(candidate.clone());
        if instance.iterate(&x)? == *target {
            return Ok(ScanOutcome::Found(x));
        }
        candidate += 1u32;
    }
    Ok(ScanOutcome::Exhausted)
}

/// Split [0, q) into at most `parts` contiguous, non-empty ranges.
///
/// Range sizes differ by at most one. `parts = 0` is treated as one.
#[must_use]
pub fn partition(q: &BigUint, parts: usize) -> Vec<Range<BigUint>> {
    if q.is_zero() {
        return Vec::new();
    }
    let parts = BigUint::from(parts.max(1)).min(q.clone());
    let base = q / &parts;
    let extra = q % &parts;

    let mut ranges = Vec::new();
    let mut start = BigUint::zero();
    let mut i = BigUint::zero();
    while i < parts {
        let mut len = base.clone();
        if i < extra {
            len += BigUint::one();
        }
        let end = &start + len;
        ranges.push(start..end.clone());
        start = end;
        i += 1u32;
    }
    ranges
}
