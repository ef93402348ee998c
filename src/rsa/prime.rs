// Prime Generation
// Random primes of an exact bit length, verified with Miller-Rabin

use log::{debug, warn};
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{mod_pow, RsaBigInt};
use crate::config::KeyGenConfig;
use crate::error::{RsaError, RsaResult};

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, iterations: u32) -> bool {
    is_probable_prime_with_rng(n, iterations, &mut thread_rng())
}

/// Miller-Rabin primality test drawing witnesses from `rng`
pub fn is_probable_prime_with_rng<R: Rng + ?Sized>(
    n: &RsaBigInt,
    iterations: u32,
    rng: &mut R,
) -> bool {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return false;
    }
    if n == &two || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let n_minus_two = n - 2u8;

    'witness: for _ in 0..iterations {
        // Pick random witness a in [2, n-2)
        let a = rng.gen_biguint_range(&two, &n_minus_two);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Generate a random prime in [2^(bits-1), 2^bits - 1]
pub fn generate_prime(bits: u32) -> RsaResult<RsaBigInt> {
    generate_prime_with_rng(bits, &KeyGenConfig::default(), &mut thread_rng())
}

/// Generate a random prime of exactly `bits` bits using `rng`
///
/// Candidates are sampled uniformly from the bit-length range and kept only
/// if they pass `config.primality_rounds` Miller-Rabin rounds. Fails with
/// [`RsaError::GenerationExhausted`] after `config.prime_attempts` draws.
pub fn generate_prime_with_rng<R: Rng + ?Sized>(
    bits: u32,
    config: &KeyGenConfig,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    if bits < 2 {
        return Err(RsaError::InvalidKeySize { bits });
    }

    let lower = RsaBigInt::one() << (bits - 1);
    let upper = RsaBigInt::one() << bits;

    for attempt in 1..=config.prime_attempts {
        let candidate = rng.gen_biguint_range(&lower, &upper);
        if is_probable_prime_with_rng(&candidate, config.primality_rounds, rng) {
            debug!("found {}-bit prime after {} candidates", bits, attempt);
            return Ok(candidate);
        }
    }

    warn!(
        "no {}-bit prime found in {} candidates",
        bits, config.prime_attempts
    );
    Err(RsaError::GenerationExhausted {
        stage: "prime",
        attempts: config.prime_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_is_probable_prime() {
        // 2 is prime
        assert!(is_probable_prime(&from_u64(2), 5));
        // 3 is prime
        assert!(is_probable_prime(&from_u64(3), 5));
        // 7 is prime
        assert!(is_probable_prime(&from_u64(7), 5));
        // 4 is not prime
        assert!(!is_probable_prime(&from_u64(4), 5));
        // 9 is not prime
        assert!(!is_probable_prime(&from_u64(9), 5));
        // 0 and 1 are not prime
        assert!(!is_probable_prime(&from_u64(0), 5));
        assert!(!is_probable_prime(&from_u64(1), 5));
    }

    #[test]
    fn test_carmichael_numbers_rejected() {
        for n in [561u64, 1105, 1729, 2465, 2821, 6601] {
            assert!(!is_probable_prime(&from_u64(n), 20), "{} is composite", n);
        }
    }

    #[test]
    fn test_known_primes_accepted() {
        for n in [5u64, 53, 61, 7919, 104_729, 2_147_483_647] {
            assert!(is_probable_prime(&from_u64(n), 20), "{} is prime", n);
        }
    }

    #[test]
    fn test_generated_prime_has_exact_bit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = KeyGenConfig::default();
        for bits in [2u32, 3, 8, 16, 64] {
            let prime = generate_prime_with_rng(bits, &config, &mut rng).unwrap();
            assert_eq!(prime.bits(), u64::from(bits));
            assert!(is_probable_prime(&prime, 20));
        }
    }

    #[test]
    fn test_generate_prime_rejects_one_bit() {
        assert_eq!(generate_prime(1), Err(RsaError::InvalidKeySize { bits: 1 }));
    }

    #[test]
    fn test_generate_prime_exhausts_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = KeyGenConfig::default().with_prime_attempts(0);
        let result = generate_prime_with_rng(16, &config, &mut rng);
        assert_eq!(
            result,
            Err(RsaError::GenerationExhausted {
                stage: "prime",
                attempts: 0
            })
        );
    }
}
