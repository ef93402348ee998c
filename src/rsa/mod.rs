// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod attack;
pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod prime;

pub use attack::{factor_modulus, recover_private_key, Factorization};
pub use decrypt::{decrypt, decrypt_text};
pub use encrypt::{encrypt, encrypt_text};
pub use keygen::{generate_keys, keypair_from_primes, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use prime::{generate_prime, is_probable_prime};
