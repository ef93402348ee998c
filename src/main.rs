use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, LevelFilter};
use toy_rsa::util::key_file::KeyFile;
use toy_rsa::{
    decrypt_text, encrypt_text, generate_keys, rsa::attack::recover_private_key_with_rng,
    AttackConfig,
};

#[derive(Parser)]
#[command(
    name = "toy-rsa",
    author,
    version,
    about = "Generate RSA keys, encrypt/decrypt messages, and crack small keys"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair and optionally store it in a key file.
    GenerateKeys {
        #[arg(short, long, default_value_t = 32)]
        bits: u32,
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Encrypt a message with the public key stored in a key file.
    Encrypt {
        #[arg(short, long, value_name = "TEXT")]
        message: String,
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Decrypt the stored ciphertext with the stored private key.
    Decrypt {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Recover the private key from the stored public key alone.
    Crack {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "N", default_value_t = 1_000)]
        max_attempts: u32,
        #[arg(long, value_name = "N")]
        period_limit: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::GenerateKeys { bits, file } => {
            println!("Generating {}-bit keys...", bits);
            let keypair = generate_keys(bits).context("key generation failed")?;
            println!("Public key: ({}, {})", keypair.public_key.e, keypair.public_key.n);
            println!("Private key: ({}, {})", keypair.private_key.d, keypair.private_key.n);
            if let Some(path) = file {
                KeyFile::update(&path, |f| {
                    f.set_public_key(&keypair.public_key);
                    f.set_private_key(&keypair.private_key);
                })
                .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Commands::Encrypt { message, file } => {
            println!("Encrypting message: {}", message);
            let public_key = read_key_file(&file)?.public_key()?;
            let ciphertext = encrypt_text(&message, &public_key)
                .context("message does not fit under the modulus; use a larger key")?;
            let rendered = ciphertext.iter().map(ToString::to_string).collect::<Vec<_>>();
            println!("Encrypted message: [{}]", rendered.join(", "));
            KeyFile::update(&file, |f| f.set_encrypted_message(&ciphertext))
                .with_context(|| format!("failed to write {}", file.display()))?;
        }
        Commands::Decrypt { file } => {
            let key_file = read_key_file(&file)?;
            let ciphertext = key_file.encrypted_message()?;
            let private_key = key_file.private_key()?;
            let message = decrypt_text(&ciphertext, &private_key).context("decryption failed")?;
            println!("Decrypted message: {}", message);
            KeyFile::update(&file, |f| f.decrypted_message = Some(message.clone()))
                .with_context(|| format!("failed to write {}", file.display()))?;
        }
        Commands::Crack {
            file,
            max_attempts,
            period_limit,
        } => {
            let key_file = read_key_file(&file)?;
            let public_key = key_file.public_key()?;
            println!(
                "Cracking private key of the following public key: ({}, {})",
                public_key.e, public_key.n
            );

            let mut config = AttackConfig::default().with_max_attempts(max_attempts);
            if let Some(limit) = period_limit {
                config = config.with_period_limit(limit);
            }
            let cracked = recover_private_key_with_rng(&public_key, &config, &mut rand::thread_rng())
                .context("could not recover the private key")?;
            println!("Cracked private key: ({}, {})", cracked.d, cracked.n);

            match key_file.matches_private_key(&cracked) {
                Ok(matched) => println!(
                    "The cracking operation was {}.",
                    if matched { "successful" } else { "unsuccessful" }
                ),
                Err(e) => debug!("no stored private key to compare against: {}", e),
            }
        }
    }

    Ok(())
}

fn read_key_file(path: &Path) -> Result<KeyFile> {
    KeyFile::load(path).with_context(|| format!("failed to read key file {}", path.display()))
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}
