//! Parallel brute-force search using Rayon.
//!
//! The field's integer encodings are split into contiguous partitions with
//! [`partition`], and each partition is scanned on the Rayon pool by
//! [`brute_force_range`]. Every worker holds its own clone of the instance,
//! and with it its own handle on the shared, immutable field.
//!
//! Enable with the `parallel` feature flag (on by default).
//!
//! # Usage
//!
//! ```
//! use aiip::analysis::CancellationToken;
//! use aiip::gf::FieldContext;
//! use aiip::parallel::par_brute_force;
//! use aiip::AiipInstance;
//!
//! let field = FieldContext::prime(1009u32).unwrap();
//! let instance = AiipInstance::new(field.clone(), field.element(11), 3).unwrap();
//! let y = instance.iterate(&field.element(700)).unwrap();
//!
//! let x = par_brute_force(&instance, &y, 8, &CancellationToken::new())
//!     .unwrap()
//!     .found()
//!     .unwrap();
//! assert_eq!(instance.iterate(&x).unwrap(), y);
//! ```
//!
//! # Ordering
//!
//! When several x map to the same target, any of them may be returned.

use log::info;
use rayon::prelude::*;

use crate::analysis::{brute_force_range, partition, CancellationToken, ScanOutcome};
use crate::error::{Error, Result};
use crate::gf::FieldElement;
use crate::instance::AiipInstance;

/// Search the field in `partitions` parallel ranges.
///
/// Workers poll a private stop flag that is raised by the first witness or
/// by cancellation of `token`; `token` itself is never cancelled here, so it
/// can be shared with other work. The result is
/// [`ScanOutcome::Exhausted`] only when every partition was scanned to the
/// end, which proves that `target` has no preimage.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if `target` is not in the instance's field.
pub fn par_brute_force(
    instance: &AiipInstance,
    target: &FieldElement,
    partitions: usize,
    token: &CancellationToken,
) -> Result<ScanOutcome> {
    let field = instance.field();
    if !field.contains(target) {
        return Err(Error::InvalidTarget {
            expected: format!("{field:?}"),
            found: format!("{:?}", target.field()),
        });
    }

    let ranges = partition(field.order(), partitions);
    info!(
        "starting parallel brute force over {field} (n = {}) in {} partitions",
        instance.depth(),
        ranges.len()
    );

    let stop = token.child();
    let outcomes = ranges
        .into_par_iter()
        .map_with(instance.clone(), |worker, range| {
            let outcome = brute_force_range(worker, target, range, &stop);
            if matches!(outcome, Ok(ScanOutcome::Found(_)) | Err(_)) {
                stop.cancel();
            }
            outcome
        })
        .collect::<Result<Vec<_>>>()?;

    let mut exhausted = true;
    for outcome in outcomes {
        match outcome {
            ScanOutcome::Found(x) => {
                info!("parallel brute force found x = {x}");
                return Ok(ScanOutcome::Found(x));
            }
            ScanOutcome::Cancelled => exhausted = false,
            ScanOutcome::Exhausted => {}
        }
    }

    if exhausted {
        info!("parallel brute force exhausted the field without a preimage");
        Ok(ScanOutcome::Exhausted)
    } else {
        info!("parallel brute force cancelled before a preimage was found");
        Ok(ScanOutcome::Cancelled)
    }
}
