//! Textbook RSA for small, demonstration-sized keys.
//!
//! The crate generates key pairs from two random primes, encrypts and
//! decrypts sequences of symbol codes one symbol at a time, and runs a
//! classical order-finding attack that rebuilds the private exponent from
//! the public key alone.
//!
//! There is no padding and no timing-attack resistance. Encryption is
//! deterministic and malleable, and the attack is a brute-force period
//! scan that only finishes for tiny moduli.
//!
//! # Examples
//!
//! ```
//! use toy_rsa::{decrypt_text, encrypt_text, keypair_from_primes, recover_private_key};
//! use num_bigint::BigUint;
//!
//! let keypair = keypair_from_primes(
//!     BigUint::from(61u32),
//!     BigUint::from(53u32),
//!     BigUint::from(17u32),
//! )
//! .unwrap();
//!
//! let ciphertext = encrypt_text("Hi", &keypair.public_key).unwrap();
//! assert_eq!(decrypt_text(&ciphertext, &keypair.private_key).unwrap(), "Hi");
//!
//! let cracked = recover_private_key(&keypair.public_key).unwrap();
//! assert_eq!(cracked.d, BigUint::from(2753u32));
//! ```

pub mod config;
pub mod error;
pub mod rsa;
pub mod util;

pub use config::{AttackConfig, KeyGenConfig};
pub use error::{RsaError, RsaResult};
pub use rsa::{
    decrypt, decrypt_text, encrypt, encrypt_text, factor_modulus, generate_keys, generate_prime,
    keypair_from_primes, recover_private_key, Factorization, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
