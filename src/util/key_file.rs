// Key File Operations
// Reads and merges keys and messages in a single JSON object on disk

use std::fs;
use std::io;
use std::path::Path;

use log::info;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::rsa::bigint::RsaBigInt;
use crate::rsa::keygen::{RsaPrivateKey, RsaPublicKey};

/// Errors that can occur while reading or writing a key file
#[derive(Debug, Error)]
pub enum KeyFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key file has no `{field}`. {hint}")]
    Missing {
        field: &'static str,
        hint: &'static str,
    },

    #[error("malformed `{field}`: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Result type for key file operations
pub type KeyFileResult<T> = Result<T, KeyFileError>;

const GENERATE_HINT: &str = "Generate keys first with `generate-keys`.";
const ENCRYPT_HINT: &str = "Encrypt a message first with `encrypt`.";

/// Contents of a key file
///
/// Keys are stored as `[exponent, modulus]` and ciphertext as a list, all
/// written as decimal strings so moduli of any size survive JSON. Plain
/// JSON integers are accepted on read. Unknown fields are carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFile {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_pair"
    )]
    pub public_key: Option<[String; 2]>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_pair"
    )]
    pub private_key: Option<[String; 2]>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_list"
    )]
    pub encrypted_message: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypted_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyFile {
    /// Read a key file
    pub fn load(path: &Path) -> KeyFileResult<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the key file, replacing what is on disk
    pub fn save(&self, path: &Path) -> KeyFileResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Load `path` (or start empty if it does not exist), apply `f`, write back
    pub fn update<F>(path: &Path, f: F) -> KeyFileResult<Self>
    where
        F: FnOnce(&mut KeyFile),
    {
        let mut file = if path.exists() {
            Self::load(path)?
        } else {
            info!("{} does not exist, creating it", path.display());
            Self::default()
        };
        f(&mut file);
        file.save(path)?;
        Ok(file)
    }

    pub fn set_public_key(&mut self, key: &RsaPublicKey) {
        self.public_key = Some([key.e.to_string(), key.n.to_string()]);
    }

    pub fn set_private_key(&mut self, key: &RsaPrivateKey) {
        self.private_key = Some([key.d.to_string(), key.n.to_string()]);
    }

    pub fn set_encrypted_message(&mut self, ciphertext: &[RsaBigInt]) {
        self.encrypted_message = Some(ciphertext.iter().map(ToString::to_string).collect());
    }

    pub fn public_key(&self) -> KeyFileResult<RsaPublicKey> {
        let [e, n] = self.public_key.as_ref().ok_or(KeyFileError::Missing {
            field: "public_key",
            hint: GENERATE_HINT,
        })?;
        Ok(RsaPublicKey::new(
            parse_number("public_key", e)?,
            parse_number("public_key", n)?,
        ))
    }

    pub fn private_key(&self) -> KeyFileResult<RsaPrivateKey> {
        let [d, n] = self.private_key.as_ref().ok_or(KeyFileError::Missing {
            field: "private_key",
            hint: GENERATE_HINT,
        })?;
        Ok(RsaPrivateKey::new(
            parse_number("private_key", d)?,
            parse_number("private_key", n)?,
        ))
    }

    pub fn encrypted_message(&self) -> KeyFileResult<Vec<RsaBigInt>> {
        self.encrypted_message
            .as_ref()
            .ok_or(KeyFileError::Missing {
                field: "encrypted_message",
                hint: ENCRYPT_HINT,
            })?
            .iter()
            .map(|s| parse_number("encrypted_message", s))
            .collect()
    }

    /// Compare a recovered private key with the stored one
    pub fn matches_private_key(&self, candidate: &RsaPrivateKey) -> KeyFileResult<bool> {
        Ok(&self.private_key()? == candidate)
    }
}

/// A stored integer, either a decimal string or a plain JSON integer
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredNumber {
    Int(u64),
    Text(String),
}

impl From<StoredNumber> for String {
    fn from(number: StoredNumber) -> Self {
        match number {
            StoredNumber::Int(value) => value.to_string(),
            StoredNumber::Text(text) => text,
        }
    }
}

fn number_pair<'de, D>(deserializer: D) -> Result<Option<[String; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let pair = Option::<[StoredNumber; 2]>::deserialize(deserializer)?;
    Ok(pair.map(|pair| pair.map(String::from)))
}

fn number_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<Vec<StoredNumber>>::deserialize(deserializer)?;
    Ok(list.map(|list| list.into_iter().map(String::from).collect()))
}

fn parse_number(field: &'static str, value: &str) -> KeyFileResult<RsaBigInt> {
    value.parse().map_err(|e| KeyFileError::Malformed {
        field,
        reason: format!("{:?} is not a decimal integer ({})", value, e),
    })
}
