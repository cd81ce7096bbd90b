//! Cryptanalysis walkthrough on a deliberately small AIIP instance.
//!
//! Generates low-security parameters over a 10-bit prime field, computes a
//! target from a fixed secret, times the iteration, reduces the instance to
//! an MQ system and finally recovers a preimage by exhaustive search.

use aiip::params::ParameterGenerator;
use aiip::{benchmark_iteration, brute_force, reduce};
use num_bigint::BigUint;

const FIELD_SIZE: u32 = 1021;
const DEPTH: usize = 4;
const SECRET: u64 = 42;
const BRUTE_FORCE_LIMIT: u32 = 1 << 14;

fn main() {
    println!("AIIP - Cryptanalysis Example\n");

    let params = ParameterGenerator::new()
        .depth(DEPTH)
        .field_size(BigUint::from(FIELD_SIZE))
        .generate(32)
        .expect("Failed to generate parameters");
    println!("Parameters:");
    println!("  Field (q)       : {} (prime)", params.q());
    println!("  Iterations (n)  : {}", params.n());
    println!(
        "  Constant (alpha): {} (non-residue: {})",
        params.alpha(),
        params.alpha_is_nonresidue()
    );
    println!();

    let instance = params.instance().expect("Failed to build instance");
    let field = instance.field();
    let secret = field.element(SECRET);
    let chain = instance.chain(&secret).expect("Secret is not in the field");
    let target = chain.target();
    println!("Secret x : {secret}");
    println!("Target y : {target}");
    println!();

    let bench = benchmark_iteration(&instance, 10).expect("Benchmark failed");
    println!("Benchmark:");
    println!("  Average per full iteration: {:.6} s", bench.average_seconds());
    println!(
        "  Extrapolated full-field scan (estimate, not executed): {:.6} h",
        bench.extrapolated_brute_force_seconds() / 3600.0
    );
    println!();

    let system = reduce(&instance, target).expect("Reduction failed");
    println!(
        "MQ system: {} equations in {} variables over GF({})",
        system.len(),
        system.num_variables(),
        system.modulus()
    );
    let satisfied = system
        .is_satisfied_by(&chain.to_assignment())
        .expect("Assignment has the wrong length");
    println!("Chain satisfies system: {satisfied}");
    println!();

    if FIELD_SIZE <= BRUTE_FORCE_LIMIT {
        match brute_force(&instance, target).expect("Brute force failed") {
            Some(x) if x == secret => println!("✓ Brute force recovered the secret: x = {x}"),
            Some(x) => println!("✓ Brute force found a colliding preimage: x = {x}"),
            None => println!("✗ No preimage found"),
        }
    } else {
        println!("Field size q = {FIELD_SIZE} is too large for a brute-force demo.");
    }

    #[cfg(feature = "parallel")]
    {
        use aiip::analysis::CancellationToken;

        let outcome = aiip::par_brute_force(&instance, target, 8, &CancellationToken::new())
            .expect("Parallel brute force failed");
        println!("Parallel search result: {outcome:?}");
    }
}
