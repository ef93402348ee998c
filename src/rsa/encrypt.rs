// RSA Encryption Implementation
// Textbook RSA applied symbol by symbol: c = m^e mod n

use log::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;
use crate::error::{RsaError, RsaResult};

/// Encrypt a sequence of symbol codes using an RSA public key
///
/// Each symbol is encrypted independently, with no padding and no
/// randomization: equal symbols always give equal ciphertext symbols, and
/// ciphertexts are malleable. Every symbol must be strictly below `n`;
/// larger values would wrap and could not be recovered, so they are
/// rejected with [`RsaError::PreconditionViolation`].
pub fn encrypt(message: &[RsaBigInt], public_key: &RsaPublicKey) -> RsaResult<Vec<RsaBigInt>> {
    check_below_modulus(message, &public_key.n)?;

    let ciphertext = message
        .iter()
        .map(|m| mod_pow(m, &public_key.e, &public_key.n))
        .collect::<Vec<_>>();

    debug!("encrypted {} symbols", ciphertext.len());
    Ok(ciphertext)
}

/// Encrypt a string, one Unicode code point per symbol
pub fn encrypt_text(plaintext: &str, public_key: &RsaPublicKey) -> RsaResult<Vec<RsaBigInt>> {
    let symbols = plaintext
        .chars()
        .map(|c| RsaBigInt::from(u32::from(c)))
        .collect::<Vec<_>>();
    encrypt(&symbols, public_key)
}

/// Reject any symbol that is not strictly below the modulus
pub(crate) fn check_below_modulus(symbols: &[RsaBigInt], modulus: &RsaBigInt) -> RsaResult<()> {
    match symbols.iter().position(|s| s >= modulus) {
        Some(index) => Err(RsaError::PreconditionViolation {
            index,
            symbol: symbols[index].clone(),
            modulus: modulus.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    fn textbook_key() -> RsaPublicKey {
        RsaPublicKey::new(from_u64(17), from_u64(3233))
    }

    #[test]
    fn test_encrypt_known_value() {
        let ciphertext = encrypt(&[from_u64(65)], &textbook_key()).unwrap();
        assert_eq!(ciphertext, vec![from_u64(2790)]);
    }

    #[test]
    fn test_encrypt_is_deterministic() {
        let key = textbook_key();
        let message = vec![from_u64(72), from_u64(72), from_u64(105)];

        let first = encrypt(&message, &key).unwrap();
        let second = encrypt(&message, &key).unwrap();

        assert_eq!(first, second);
        // Same symbol, same ciphertext symbol
        assert_eq!(first[0], first[1]);
    }

    #[test]
    fn test_encrypt_text() {
        let ciphertext = encrypt_text("AA", &textbook_key()).unwrap();
        assert_eq!(ciphertext, vec![from_u64(2790), from_u64(2790)]);
    }

    #[test]
    fn test_encrypt_empty() {
        assert_eq!(encrypt(&[], &textbook_key()).unwrap(), Vec::<RsaBigInt>::new());
    }

    #[test]
    fn test_encrypt_rejects_symbol_at_modulus() {
        let message = vec![from_u64(1), from_u64(3233)];
        let result = encrypt(&message, &textbook_key());
        assert_eq!(
            result,
            Err(RsaError::PreconditionViolation {
                index: 1,
                symbol: from_u64(3233),
                modulus: from_u64(3233),
            })
        );
    }

    #[test]
    fn test_encrypt_text_rejects_wide_characters() {
        // U+4E2D is 20013, above n = 3233
        let result = encrypt_text("a中", &textbook_key());
        assert!(matches!(
            result,
            Err(RsaError::PreconditionViolation { index: 1, .. })
        ));
    }
}
