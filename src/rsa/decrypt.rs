// RSA Decryption Implementation
// Textbook RSA applied symbol by symbol: m = c^d mod n

use log::debug;
use num_traits::ToPrimitive;

use super::bigint::{mod_pow, RsaBigInt};
use super::encrypt::check_below_modulus;
use super::keygen::RsaPrivateKey;
use crate::error::{RsaError, RsaResult};

/// Decrypt ciphertext symbols using an RSA private key
///
/// Ciphertext symbols must lie in [0, n); anything else cannot have been
/// produced by [`encrypt`](super::encrypt::encrypt) under the same modulus.
pub fn decrypt(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<Vec<RsaBigInt>> {
    check_below_modulus(ciphertext, &private_key.n)?;

    let message = ciphertext
        .iter()
        .map(|c| mod_pow(c, &private_key.d, &private_key.n))
        .collect::<Vec<_>>();

    debug!("decrypted {} symbols", message.len());
    Ok(message)
}

/// Decrypt ciphertext symbols to a string
pub fn decrypt_text(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<String> {
    decrypt(ciphertext, private_key)?
        .into_iter()
        .map(|symbol| {
            symbol
                .to_u32()
                .and_then(char::from_u32)
                .ok_or(RsaError::InvalidCharacter { symbol })
        })
        .collect()
}
