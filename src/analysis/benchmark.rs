//! Per-iteration timing and brute-force cost extrapolation.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use log::info;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::Rng;

use crate::error::{Error, Result};
use crate::instance::AiipInstance;

/// Timing of full n-step iterations over random inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBenchmark {
    samples: usize,
    depth: usize,
    order: BigUint,
    total: Duration,
}

impl IterationBenchmark {
    /// Number of timed iterations.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// The depth n of each timed iteration.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total measured time.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Mean wall-clock time of one full iteration.
    #[must_use]
    pub fn average(&self) -> Duration {
        self.total.div_f64(self.samples as f64)
    }

    /// Mean wall-clock seconds of one full iteration.
    #[must_use]
    pub fn average_seconds(&self) -> f64 {
        self.total.as_secs_f64() / self.samples as f64
    }

    /// Estimated seconds to scan the whole field: average × q.
    ///
    /// This is an extrapolation from the measured average, not the cost of an
    /// executed attack. It saturates to infinity for fields too large for `f64`.
    #[must_use]
    pub fn extrapolated_brute_force_seconds(&self) -> f64 {
        self.average_seconds() * self.order.to_f64().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for IterationBenchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3e} s per iteration (n = {}, {} samples); extrapolated full scan: {:.3e} s",
            self.average_seconds(),
            self.depth,
            self.samples,
            self.extrapolated_brute_force_seconds()
        )
    }
}

/// Time `sample_count` full iterations on uniformly random inputs, using the
/// thread-local RNG.
///
/// # Errors
///
/// Returns [`Error::InvalidParams`] if `sample_count` is zero.
pub fn benchmark_iteration(
    instance: &AiipInstance,
    sample_count: usize,
) -> Result<IterationBenchmark> {
    benchmark_iteration_with(instance, sample_count, &mut rand::thread_rng())
}

/// Time `sample_count` full iterations on inputs drawn from `rng`.
///
/// Only the iteration is timed; drawing the input is not.
///
/// # Errors
///
/// Returns [`Error::InvalidParams`] if `sample_count` is zero.
pub fn benchmark_iteration_with<R: Rng + ?Sized>(
    instance: &AiipInstance,
    sample_count: usize,
    rng: &mut R,
) -> Result<IterationBenchmark> {
    if sample_count == 0 {
        return Err(Error::invalid_params("sample_count must be at least 1"));
    }

    let field = instance.field();
    let mut total = Duration::ZERO;
    for _ in 0..sample_count {
        let x = field.random_element(rng);
        let start = Instant::now();
        black_box(instance.iterate(black_box(&x))?);
        total += start.elapsed();
    }

    let bench = IterationBenchmark {
        samples: sample_count,
        depth: instance.depth(),
        order: field.order().clone(),
        total,
    };
    info!("benchmark over {field}: {bench}");
    Ok(bench)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::FieldContext;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn instance() -> AiipInstance {
        let field = FieldContext::prime(131_071u32).unwrap();
        AiipInstance::new(field.clone(), field.element(5), 4).unwrap()
    }

    #[test]
    fn test_benchmark_reports_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let bench = benchmark_iteration_with(&instance(), 25, &mut rng).unwrap();
        assert_eq!(bench.samples(), 25);
        assert_eq!(bench.depth(), 4);
        assert!(bench.average_seconds() >= 0.0);
        assert!(bench.average() <= bench.total());
    }

    #[test]
    fn test_extrapolation_scales_with_order() {
        let bench = IterationBenchmark {
            samples: 4,
            depth: 2,
            order: BigUint::from(1000u32),
            total: Duration::from_millis(8),
        };
        assert!((bench.average_seconds() - 0.002).abs() < 1e-12);
        assert!((bench.extrapolated_brute_force_seconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_samples_rejected() {
        assert!(matches!(
            benchmark_iteration(&instance(), 0),
            Err(Error::InvalidParams { .. })
        ));
    }
}
