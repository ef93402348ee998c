// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::mem;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// Runs as a loop over signed Bézout coefficients, so the depth does not
/// grow with the size of the inputs.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let mut old_r = BigInt::from(a.clone());
    let mut r = BigInt::from(b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = mem::replace(&mut t, next_t);
    }

    (old_r.magnitude().clone(), old_s, old_t)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let (gcd, x, _) = extended_gcd(a, m);
    if !gcd.is_one() {
        return None;
    }

    // Normalize to the non-negative residue
    let residue = x.mod_floor(&BigInt::from_biguint(Sign::Plus, m.clone()));
    residue.to_biguint()
}

/// Euler's totient of n = p*q for distinct primes p, q
pub fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}
