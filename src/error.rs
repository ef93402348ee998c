// RSA Error Types
// Errors reported by key generation, the cipher and the factorization attack

use num_bigint::BigUint;
use thiserror::Error;

/// Errors produced by the RSA core.
///
/// None of these are fatal: the caller decides whether to retry with a
/// larger key size or a bigger attempt budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// Bit length too small to produce the requested primes.
    #[error("invalid key size: {bits} bits is too small")]
    InvalidKeySize { bits: u32 },

    /// A bounded search (prime, distinct prime, exponent) did not converge.
    #[error("{stage} search did not converge after {attempts} attempts")]
    GenerationExhausted { stage: &'static str, attempts: u32 },

    /// A symbol is not strictly below the modulus and cannot be recovered.
    #[error("symbol {symbol} at position {index} is not below the modulus {modulus}")]
    PreconditionViolation {
        index: usize,
        symbol: BigUint,
        modulus: BigUint,
    },

    /// The factorization attack ran out of random bases.
    #[error("factorization attempt limit exceeded after {attempts} attempts")]
    AttackExhausted { attempts: u32 },

    /// The modulus is too small to pick a random base from [2, n-1].
    #[error("modulus {modulus} is too small to factor")]
    ModulusTooSmall { modulus: BigUint },

    /// No modular inverse exists.
    #[error("{value} has no inverse modulo {modulus}")]
    NotInvertible { value: BigUint, modulus: BigUint },

    /// Key components violate the RSA invariants.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A decrypted symbol is not a Unicode scalar value.
    #[error("decrypted symbol {symbol} is not a valid character")]
    InvalidCharacter { symbol: BigUint },
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
