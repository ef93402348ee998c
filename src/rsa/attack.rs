// Classical Order-Finding Attack
// Recovers a private exponent by factoring n through the period of a random base
//
// This is the classical skeleton of Shor's algorithm with the quantum period
// finding replaced by a linear scan. It only finishes for demonstration-sized
// moduli.

use log::{debug, info, warn};
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, mod_pow, totient, RsaBigInt};
use super::keygen::{private_exponent, RsaPrivateKey, RsaPublicKey};
use crate::config::AttackConfig;
use crate::error::{RsaError, RsaResult};

/// Two factors of a modulus, smaller first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    /// Random bases tried, including the successful one
    pub attempts: u32,
}

/// Outcome of a single random base
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    Factor(RsaBigInt),
    NoPeriod,
    OddPeriod(u64),
    TrivialFactor,
}

/// Recover a private key for `public_key` from the public key alone
pub fn recover_private_key(public_key: &RsaPublicKey) -> RsaResult<RsaPrivateKey> {
    recover_private_key_with_rng(public_key, &AttackConfig::default(), &mut thread_rng())
}

/// Recover a private key drawing random bases from `rng`
///
/// Factors n with [`factor_modulus_with_rng`], then inverts e modulo
/// (p-1)(q-1) exactly as key generation does.
pub fn recover_private_key_with_rng<R: Rng + ?Sized>(
    public_key: &RsaPublicKey,
    config: &AttackConfig,
    rng: &mut R,
) -> RsaResult<RsaPrivateKey> {
    let factors = factor_modulus_with_rng(&public_key.n, config, rng)?;
    let phi_n = totient(&factors.p, &factors.q);
    let d = private_exponent(&public_key.e, &phi_n)?;

    info!(
        "recovered private exponent for n = {} after {} attempts",
        public_key.n, factors.attempts
    );
    Ok(RsaPrivateKey::new(d, public_key.n.clone()))
}

/// Factor `n` using the default attempt budget
pub fn factor_modulus(n: &RsaBigInt) -> RsaResult<Factorization> {
    factor_modulus_with_rng(n, &AttackConfig::default(), &mut thread_rng())
}

/// Factor `n` by random-base order finding
///
/// Each attempt is independent. The loop stops at the first nontrivial
/// factor, or fails with [`RsaError::AttackExhausted`] once
/// `config.max_attempts` bases have been tried.
pub fn factor_modulus_with_rng<R: Rng + ?Sized>(
    n: &RsaBigInt,
    config: &AttackConfig,
    rng: &mut R,
) -> RsaResult<Factorization> {
    if n < &from_u64(4) {
        return Err(RsaError::ModulusTooSmall { modulus: n.clone() });
    }

    let two = from_u64(2);
    let limit = period_limit(n, config);

    for attempt in 1..=config.max_attempts {
        // g in [2, n-1]
        let g = rng.gen_biguint_range(&two, n);

        match try_base(&g, n, limit) {
            Attempt::Factor(p) => {
                let q = n / &p;
                let (p, q) = if p <= q { (p, q) } else { (q, p) };
                info!("factored {} = {} * {} (base {})", n, p, q, g);
                return Ok(Factorization {
                    p,
                    q,
                    attempts: attempt,
                });
            }
            Attempt::NoPeriod => {
                debug!("attempt {}: no period within {} for base {}", attempt, limit, g)
            }
            Attempt::OddPeriod(r) => debug!("attempt {}: odd period {} for base {}", attempt, r, g),
            Attempt::TrivialFactor => {
                debug!("attempt {}: base {} gave a trivial factor", attempt, g)
            }
        }
    }

    warn!(
        "factorization of {} gave up after {} attempts",
        n, config.max_attempts
    );
    Err(RsaError::AttackExhausted {
        attempts: config.max_attempts,
    })
}

fn try_base(g: &RsaBigInt, n: &RsaBigInt, limit: u64) -> Attempt {
    // Lucky draw: g already shares a factor with n
    let common = g.gcd(n);
    if !common.is_one() && &common != n {
        return Attempt::Factor(common);
    }

    let r = match find_period(g, n, limit) {
        Some(r) => r,
        None => return Attempt::NoPeriod,
    };
    if r.is_odd() {
        return Attempt::OddPeriod(r);
    }
    debug!("base {} has period {}", g, r);

    // g^(r/2) - 1 mod n
    let half = mod_pow(g, &from_u64(r / 2), n);
    let candidate = (half + n - 1u8) % n;
    let p = candidate.gcd(n);

    if p.is_zero() || p.is_one() || &p == n {
        Attempt::TrivialFactor
    } else {
        Attempt::Factor(p)
    }
}

/// Smallest r in [1, limit] with g^r ≡ 1 (mod n)
fn find_period(g: &RsaBigInt, n: &RsaBigInt, limit: u64) -> Option<u64> {
    let base = g % n;
    let mut power = base.clone();

    for r in 1..=limit {
        if power.is_one() {
            return Some(r);
        }
        power = (&power * &base) % n;
    }

    None
}

fn period_limit(n: &RsaBigInt, config: &AttackConfig) -> u64 {
    let n_bound = n.to_u64().unwrap_or(u64::MAX);
    match config.period_limit {
        Some(limit) => limit.min(n_bound),
        None => n_bound,
    }
}
