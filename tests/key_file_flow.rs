//! The generate → encrypt → decrypt → crack sequence the `toy-rsa` binary
//! runs, driven through one key file.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use toy_rsa::rsa::attack::recover_private_key_with_rng;
use toy_rsa::rsa::keygen::generate_keys_with_rng;
use toy_rsa::util::key_file::{KeyFile, KeyFileError};
use toy_rsa::{decrypt_text, encrypt_text, AttackConfig, KeyGenConfig, RsaPrivateKey};

#[test]
fn commands_share_one_key_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let mut rng = StdRng::seed_from_u64(31);

    // generate-keys
    let keypair = generate_keys_with_rng(16, &KeyGenConfig::default(), &mut rng).unwrap();
    KeyFile::update(&path, |f| {
        f.set_public_key(&keypair.public_key);
        f.set_private_key(&keypair.private_key);
    })
    .unwrap();

    // encrypt
    let public_key = KeyFile::load(&path).unwrap().public_key().unwrap();
    let ciphertext = encrypt_text("hello", &public_key).unwrap();
    KeyFile::update(&path, |f| f.set_encrypted_message(&ciphertext)).unwrap();

    // decrypt
    let stored = KeyFile::load(&path).unwrap();
    let message =
        decrypt_text(&stored.encrypted_message().unwrap(), &stored.private_key().unwrap()).unwrap();
    assert_eq!(message, "hello");
    KeyFile::update(&path, |f| f.decrypted_message = Some(message.clone())).unwrap();

    // Every write merged into the same object
    let merged = KeyFile::load(&path).unwrap();
    assert_eq!(merged.public_key().unwrap(), keypair.public_key);
    assert_eq!(merged.private_key().unwrap(), keypair.private_key);
    assert_eq!(merged.encrypted_message().unwrap(), ciphertext);
    assert_eq!(merged.decrypted_message.as_deref(), Some("hello"));

    // crack
    let cracked = recover_private_key_with_rng(
        &merged.public_key().unwrap(),
        &AttackConfig::default(),
        &mut rng,
    )
    .unwrap();
    assert!(merged.matches_private_key(&cracked).unwrap());

    let wrong = RsaPrivateKey::new(&cracked.d + 1u8, cracked.n.clone());
    assert!(!merged.matches_private_key(&wrong).unwrap());
}

#[test]
fn crack_reads_integer_key_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keys.json");
    std::fs::write(
        &path,
        r#"{"public_key": [17, 3233], "private_key": [2753, 3233], "encrypted_message": [2790]}"#,
    )
    .unwrap();

    let key_file = KeyFile::load(&path).unwrap();
    let mut rng = StdRng::seed_from_u64(12);
    let cracked = recover_private_key_with_rng(
        &key_file.public_key().unwrap(),
        &AttackConfig::default(),
        &mut rng,
    )
    .unwrap();

    assert!(key_file.matches_private_key(&cracked).unwrap());
    assert_eq!(
        decrypt_text(&key_file.encrypted_message().unwrap(), &cracked).unwrap(),
        "A"
    );
}

#[test]
fn encrypt_without_keys_asks_for_generation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    KeyFile::update(&path, |_| {}).unwrap();

    let result = KeyFile::load(&path).unwrap().public_key();
    assert!(matches!(
        result,
        Err(KeyFileError::Missing {
            field: "public_key",
            ..
        })
    ));
}
