//! Parameter generation for AIIP instances.
//!
//! Parameters are derived from a target classical security level `bit_sec`:
//!
//! - **Field size**: a prime q of exact bit length `bits_factor · bit_sec`
//!   (twice the security level by default, against square-root speedups).
//! - **Depth**: n from a table keyed by standard levels, or an explicit
//!   override, or a logged fallback.
//! - **Affine constant**: α uniform in [1, q−1], accepted only when it is a
//!   quadratic non-residue modulo q.
//!
//! # Example
//!
//! ```
//! use aiip::params::{DepthSource, ParameterGenerator};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let params = ParameterGenerator::new()
//!     .depth(4)
//!     .generate_with(16, &mut rng)
//!     .unwrap();
//!
//! assert_eq!(params.q().bits(), 32);
//! assert_eq!(params.n(), 4);
//! assert_eq!(params.depth_source(), DepthSource::Override);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gf::FieldContext;
use crate::instance::AiipInstance;
use crate::utils::{is_probable_prime, is_quadratic_nonresidue};

/// Windows with at most this many candidates are enumerated exhaustively.
const ENUMERATION_LIMIT: u64 = 1 << 16;

/// Heuristic constants that turn a security level into parameters.
///
/// The defaults follow the published table: {128 → 16, 192 → 20, 256 → 24},
/// a fallback depth of 16, field bits = 2 · `bit_sec` and a two-bit search
/// margin around 2^(2·`bit_sec`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityPolicy {
    depths: BTreeMap<u32, usize>,
    fallback_depth: usize,
    bits_factor: u32,
    search_margin: u32,
    prime_attempts: usize,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            depths: [(128, 16), (192, 20), (256, 24)].into_iter().collect(),
            fallback_depth: 16,
            bits_factor: 2,
            search_margin: 2,
            prime_attempts: 100_000,
        }
    }
}

impl SecurityPolicy {
    /// The default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth used for `bit_sec`.
    #[must_use]
    pub fn with_depth(mut self, bit_sec: u32, depth: usize) -> Self {
        self.depths.insert(bit_sec, depth);
        self
    }

    /// Set the depth used when `bit_sec` is not in the table.
    #[must_use]
    pub fn with_fallback_depth(mut self, depth: usize) -> Self {
        self.fallback_depth = depth;
        self
    }

    /// Set the field-size multiplier: q has `factor · bit_sec` bits.
    #[must_use]
    pub fn with_bits_factor(mut self, factor: u32) -> Self {
        self.bits_factor = factor;
        self
    }

    /// Set the search margin m: primes are sought in [2^(t−m), 2^(t+m)].
    #[must_use]
    pub fn with_search_margin(mut self, margin: u32) -> Self {
        self.search_margin = margin;
        self
    }

    /// Set how many random candidates a large prime search may draw.
    #[must_use]
    pub fn with_prime_attempts(mut self, attempts: usize) -> Self {
        self.prime_attempts = attempts;
        self
    }

    /// The tabulated depth for `bit_sec`, if any.
    #[must_use]
    pub fn depth_for(&self, bit_sec: u32) -> Option<usize> {
        self.depths.get(&bit_sec).copied()
    }

    /// Depth used for untabulated security levels.
    #[must_use]
    pub fn fallback_depth(&self) -> usize {
        self.fallback_depth
    }

    /// Field-size multiplier.
    #[must_use]
    pub fn bits_factor(&self) -> u32 {
        self.bits_factor
    }

    /// Search margin in bits.
    #[must_use]
    pub fn search_margin(&self) -> u32 {
        self.search_margin
    }

    /// Target bit length of q for `bit_sec`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the bit length overflows.
    pub fn field_bits(&self, bit_sec: u32) -> Result<u64> {
        u64::from(bit_sec)
            .checked_mul(u64::from(self.bits_factor))
            .filter(|&bits| bits > 0)
            .ok_or_else(|| {
                Error::invalid_params(format!(
                    "no field size for bit_sec = {bit_sec} with factor {}",
                    self.bits_factor
                ))
            })
    }
}

/// Where the iteration depth of generated parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DepthSource {
    /// Looked up in the policy table.
    Table,
    /// Supplied explicitly by the caller.
    Override,
    /// The security level was not tabulated; the fallback depth was used.
    Fallback,
}

/// A validated, immutable parameter set for an AIIP instance over GF(q).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SecurityParameters {
    bit_sec: u32,
    q: BigUint,
    n: usize,
    alpha: BigUint,
    depth_source: DepthSource,
}

impl SecurityParameters {
    /// Assemble a parameter set, checking that q is an odd prime and
    /// α ∈ [1, q).
    ///
    /// Non-residuosity of α is not required here; see
    /// [`SecurityParameters::alpha_is_nonresidue`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] for an even or too small q or an α
    /// out of range, and [`Error::NotPrime`] for a composite q.
    pub fn new(
        bit_sec: u32,
        q: BigUint,
        n: usize,
        alpha: BigUint,
        depth_source: DepthSource,
    ) -> Result<Self> {
        validate_field_size(&q)?;
        if alpha < BigUint::one() || alpha >= q {
            return Err(Error::invalid_params(format!(
                "alpha = {alpha} is outside [1, {q})"
            )));
        }
        Ok(Self {
            bit_sec,
            q,
            n,
            alpha,
            depth_source,
        })
    }

    /// The target security level in bits.
    #[must_use]
    pub fn bit_sec(&self) -> u32 {
        self.bit_sec
    }

    /// The field size q (an odd prime).
    #[must_use]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// The iteration depth n.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// The affine constant α as an integer in [1, q).
    #[must_use]
    pub fn alpha(&self) -> &BigUint {
        &self.alpha
    }

    /// Where n came from.
    #[must_use]
    pub fn depth_source(&self) -> DepthSource {
        self.depth_source
    }

    /// Euler's criterion: α^((q−1)/2) ≡ −1 (mod q).
    #[must_use]
    pub fn alpha_is_nonresidue(&self) -> bool {
        is_quadratic_nonresidue(&self.alpha, &self.q)
    }

    /// The prime field GF(q).
    ///
    /// # Errors
    ///
    /// Propagates field construction errors.
    pub fn field(&self) -> Result<FieldContext> {
        FieldContext::prime(self.q.clone())
    }

    /// The AIIP instance these parameters describe.
    ///
    /// # Errors
    ///
    /// Propagates field construction errors.
    pub fn instance(&self) -> Result<AiipInstance> {
        AiipInstance::from_parameters(self)
    }
}

impl fmt::Display for SecurityParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bit_sec={} q={} ({} bits) n={} ({:?}) alpha={}",
            self.bit_sec,
            self.q,
            self.q.bits(),
            self.n,
            self.depth_source,
            self.alpha
        )
    }
}

/// Builder for [`SecurityParameters`].
///
/// # Example
///
/// ```
/// use aiip::params::{ParameterGenerator, SecurityPolicy};
/// use num_bigint::BigUint;
///
/// let params = ParameterGenerator::new()
///     .policy(SecurityPolicy::new().with_depth(32, 6))
///     .field_size(BigUint::from(1021u32))
///     .generate(32)
///     .unwrap();
///
/// assert_eq!(params.q(), &BigUint::from(1021u32));
/// assert_eq!(params.n(), 6);
/// assert!(params.alpha_is_nonresidue());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterGenerator {
    policy: SecurityPolicy,
    depth: Option<usize>,
    field_size: Option<BigUint>,
}

impl ParameterGenerator {
    /// Create a generator with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom security policy.
    #[must_use]
    pub fn policy(mut self, policy: SecurityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the iteration depth.
    #[must_use]
    pub fn depth(mut self, n: usize) -> Self {
        self.depth = Some(n);
        self
    }

    /// Use a fixed field size instead of searching for one.
    ///
    /// α is still drawn for this q.
    #[must_use]
    pub fn field_size(mut self, q: BigUint) -> Self {
        self.field_size = Some(q);
        self
    }

    /// Generate parameters using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`ParameterGenerator::generate_with`].
    pub fn generate(&self, bit_sec: u32) -> Result<SecurityParameters> {
        self.generate_with(bit_sec, &mut rand::thread_rng())
    }

    /// Generate parameters for `bit_sec` bits of security from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `bit_sec` is zero or an overridden
    /// field size is not an odd prime (or [`Error::NotPrime`] if it is odd
    /// and composite), and [`Error::NoSuitablePrime`] if the search window
    /// holds no prime of the target bit length.
    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        bit_sec: u32,
        rng: &mut R,
    ) -> Result<SecurityParameters> {
        if bit_sec == 0 {
            return Err(Error::invalid_params("bit_sec must be at least 1"));
        }

        let q = match &self.field_size {
            Some(q) => {
                validate_field_size(q)?;
                q.clone()
            }
            None => {
                let bits = self.policy.field_bits(bit_sec)?;
                search_prime(bits, &self.policy, rng)?
            }
        };

        let (n, depth_source) = match (self.depth, self.policy.depth_for(bit_sec)) {
            (Some(n), _) => (n, DepthSource::Override),
            (None, Some(n)) => (n, DepthSource::Table),
            (None, None) => {
                let n = self.policy.fallback_depth();
                warn!(
                    "no tabulated depth for {bit_sec}-bit security, falling back to n = {n}; \
                     the security margin may be off"
                );
                (n, DepthSource::Fallback)
            }
        };

        let alpha = sample_nonresidue(&q, rng);
        let params = SecurityParameters::new(bit_sec, q, n, alpha, depth_source)?;
        debug!("generated parameters: {params}");
        Ok(params)
    }
}

/// Generate parameters for `bit_sec` with the default policy.
///
/// `n_override` replaces the tabulated depth.
///
/// # Errors
///
/// See [`ParameterGenerator::generate_with`].
pub fn generate(bit_sec: u32, n_override: Option<usize>) -> Result<SecurityParameters> {
    let mut generator = ParameterGenerator::new();
    if let Some(n) = n_override {
        generator = generator.depth(n);
    }
    generator.generate(bit_sec)
}

fn validate_field_size(q: &BigUint) -> Result<()> {
    if *q < BigUint::from(3u32) || q.is_even() {
        return Err(Error::invalid_params(format!(
            "field size must be an odd prime, got {q}"
        )));
    }
    if !is_probable_prime(q) {
        return Err(Error::NotPrime(q.clone()));
    }
    Ok(())
}

/// Pick a prime of exactly `bits` bits inside [2^(bits−m), 2^(bits+m)].
fn search_prime<R: Rng + ?Sized>(
    bits: u64,
    policy: &SecurityPolicy,
    rng: &mut R,
) -> Result<BigUint> {
    let margin = u64::from(policy.search_margin());
    let one = BigUint::one();
    let window_lower = &one << bits.saturating_sub(margin);
    let window_upper = &one << (bits + margin);
    let no_prime = || Error::NoSuitablePrime {
        bits,
        lower: window_lower.clone(),
        upper: window_upper.clone(),
    };

    // Exact bit length, intersected with the window; always odd at the top.
    let lower = (&one << (bits - 1)).max(window_lower.clone());
    let upper = ((&one << bits) - &one).min(window_upper.clone());
    if lower > upper {
        return Err(no_prime());
    }

    let span = &upper - &lower + &one;
    if span <= BigUint::from(ENUMERATION_LIMIT) {
        let mut primes = Vec::new();
        let mut candidate = lower.clone();
        while candidate <= upper {
            if candidate.is_odd() && is_probable_prime(&candidate) {
                primes.push(candidate.clone());
            }
            candidate += 1u32;
        }
        debug!("{} primes of {bits} bits in [{lower}, {upper}]", primes.len());
        if primes.is_empty() {
            return Err(no_prime());
        }
        let pick = rng.gen_range(0..primes.len());
        return Ok(primes.swap_remove(pick));
    }

    let bound = &upper + &one;
    for attempt in 1..=policy.prime_attempts {
        let candidate = rng.gen_biguint_range(&lower, &bound) | &one;
        if candidate <= upper && is_probable_prime(&candidate) {
            debug!("found {bits}-bit prime after {attempt} candidates");
            return Ok(candidate);
        }
    }

    warn!(
        "prime search for {bits} bits gave up after {} candidates",
        policy.prime_attempts
    );
    Err(no_prime())
}

/// Rejection-sample α ∈ [1, q−1] with α^((q−1)/2) ≡ −1 (mod q).
fn sample_nonresidue<R: Rng + ?Sized>(q: &BigUint, rng: &mut R) -> BigUint {
    let one = BigUint::one();
    loop {
        let alpha = rng.gen_biguint_range(&one, q);
        if is_quadratic_nonresidue(&alpha, q) {
            return alpha;
        }
    }
}
