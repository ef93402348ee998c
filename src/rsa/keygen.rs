// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::{debug, info, warn};
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, mod_inverse, totient, RsaBigInt};
use super::prime::{generate_prime_with_rng, is_probable_prime};
use crate::config::KeyGenConfig;
use crate::error::{RsaError, RsaResult};

/// Smallest key size that can hold two primes of at least 2 bits
pub const MIN_KEY_BITS: u32 = 4;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt, // Public exponent
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt, // Private exponent
    pub n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair generated from the same two primes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub p: RsaBigInt,
    pub q: RsaBigInt,
}

impl RsaPublicKey {
    pub fn new(e: RsaBigInt, n: RsaBigInt) -> Self {
        Self { e, n }
    }

    /// Encrypt a sequence of symbol codes with this key
    pub fn encrypt(&self, message: &[RsaBigInt]) -> RsaResult<Vec<RsaBigInt>> {
        super::encrypt::encrypt(message, self)
    }
}

impl RsaPrivateKey {
    pub fn new(d: RsaBigInt, n: RsaBigInt) -> Self {
        Self { d, n }
    }

    /// Decrypt a sequence of ciphertext symbols with this key
    pub fn decrypt(&self, ciphertext: &[RsaBigInt]) -> RsaResult<Vec<RsaBigInt>> {
        super::decrypt::decrypt(ciphertext, self)
    }
}

impl RsaKeyPair {
    /// φ(n) = (p-1)(q-1)
    pub fn totient(&self) -> RsaBigInt {
        totient(&self.p, &self.q)
    }
}

/// Generate an RSA key pair whose primes each have `bits / 2` bits
pub fn generate_keys(bits: u32) -> RsaResult<RsaKeyPair> {
    generate_keys_with_rng(bits, &KeyGenConfig::default(), &mut thread_rng())
}

/// Generate an RSA key pair drawing all randomness from `rng`
///
/// The public exponent is drawn uniformly from [2, φ(n)-1] until it is
/// coprime with φ(n). Every search is bounded by `config`, so small bit
/// sizes fail with [`RsaError::GenerationExhausted`] instead of looping.
pub fn generate_keys_with_rng<R: Rng + ?Sized>(
    bits: u32,
    config: &KeyGenConfig,
    rng: &mut R,
) -> RsaResult<RsaKeyPair> {
    if bits < MIN_KEY_BITS {
        return Err(RsaError::InvalidKeySize { bits });
    }
    let half_bits = bits / 2;

    // Step 1: Generate two distinct random primes p and q
    let p = generate_prime_with_rng(half_bits, config, rng)?;
    let q = distinct_prime(&p, half_bits, config, rng)?;

    // Step 2: Compute φ(n) = (p-1)(q-1) and n = p * q
    let phi_n = totient(&p, &q);
    let n = &p * &q;

    // Step 3: Pick e coprime with φ(n)
    let e = choose_public_exponent(&phi_n, config, rng)?;

    // Step 4: Compute d = e^(-1) mod φ(n)
    let d = private_exponent(&e, &phi_n)?;

    info!("generated {}-bit key pair (modulus {} bits)", bits, n.bits());

    Ok(RsaKeyPair {
        public_key: RsaPublicKey::new(e, n.clone()),
        private_key: RsaPrivateKey::new(d, n),
        p,
        q,
    })
}

/// Build a key pair from explicit primes and public exponent
///
/// Rejects equal or composite primes and exponents outside (1, φ(n)).
pub fn keypair_from_primes(
    p: RsaBigInt,
    q: RsaBigInt,
    e: RsaBigInt,
) -> RsaResult<RsaKeyPair> {
    if p == q {
        return Err(RsaError::InvalidKey("p and q must be distinct".to_string()));
    }
    for prime in [&p, &q] {
        if !is_probable_prime(prime, KeyGenConfig::default().primality_rounds) {
            return Err(RsaError::InvalidKey(format!("{} is not prime", prime)));
        }
    }

    let phi_n = totient(&p, &q);
    if e <= RsaBigInt::one() || e >= phi_n {
        return Err(RsaError::InvalidKey(format!(
            "public exponent {} is outside (1, {})",
            e, phi_n
        )));
    }

    let d = private_exponent(&e, &phi_n)?;
    let n = &p * &q;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey::new(e, n.clone()),
        private_key: RsaPrivateKey::new(d, n),
        p,
        q,
    })
}

/// d = e^(-1) mod φ(n), normalized to a non-negative residue
pub fn private_exponent(e: &RsaBigInt, phi_n: &RsaBigInt) -> RsaResult<RsaBigInt> {
    mod_inverse(e, phi_n).ok_or_else(|| RsaError::NotInvertible {
        value: e.clone(),
        modulus: phi_n.clone(),
    })
}

fn distinct_prime<R: Rng + ?Sized>(
    p: &RsaBigInt,
    bits: u32,
    config: &KeyGenConfig,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    for attempt in 1..=config.distinct_prime_attempts {
        let q = generate_prime_with_rng(bits, config, rng)?;
        if &q != p {
            return Ok(q);
        }
        debug!("q collided with p on attempt {}, redrawing", attempt);
    }

    warn!("could not draw a second distinct {}-bit prime", bits);
    Err(RsaError::GenerationExhausted {
        stage: "distinct prime",
        attempts: config.distinct_prime_attempts,
    })
}

fn choose_public_exponent<R: Rng + ?Sized>(
    phi_n: &RsaBigInt,
    config: &KeyGenConfig,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    let two = from_u64(2);

    // [2, φ(n)-1] is empty
    if phi_n <= &two {
        warn!("φ(n) = {} leaves no admissible public exponent", phi_n);
        return Err(RsaError::GenerationExhausted {
            stage: "public exponent",
            attempts: 0,
        });
    }

    for _ in 0..config.exponent_attempts {
        let e = rng.gen_biguint_range(&two, phi_n);
        if e.gcd(phi_n).is_one() {
            return Ok(e);
        }
    }

    warn!("no exponent coprime with {} found", phi_n);
    Err(RsaError::GenerationExhausted {
        stage: "public exponent",
        attempts: config.exponent_attempts,
    })
}
