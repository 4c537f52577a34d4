//! Wallet signer CLI
//!
//! Offline tooling around the signing core: inspect config, sign raw bytes
//! with an environment-held key, and render amino sign bytes.

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wallet_signer::config::env_vars;
use wallet_signer::gateway::EnvVault;
use wallet_signer::tx::{self, AccountInfo, SignDoc};
use wallet_signer::wallet::SignedBytes;
use wallet_signer::{Config, Error, Result, SignMode, Tx, WalletSession};

#[derive(Parser)]
#[command(name = "wallet-signer")]
#[command(about = "Self-custodial wallet signing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,

    /// Sign raw bytes with the key in WALLET_PRIVATE_KEY
    SignBytes {
        /// Bytes to sign, hex encoded (with or without 0x prefix)
        #[arg(long)]
        hex: String,

        /// Wallet address recorded for the key
        #[arg(long)]
        address: String,

        /// Wallet name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Print the canonical amino-JSON sign bytes of a document
    SignDoc {
        /// JSON file with `account_number`, `sequence` and `tx`
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Input for the `sign-doc` command
#[derive(Deserialize)]
struct SignDocInput {
    #[serde(default)]
    chain_id: Option<String>,
    account_number: u64,
    sequence: u64,
    tx: Tx,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::SignBytes { hex, address, name } => {
            let signed = sign_bytes(&name, &address, &hex)?;
            println!("{}", serde_json::to_string_pretty(&signed)?);
        }
        Commands::SignDoc { file } => {
            let bytes = render_sign_doc(&config, &file)?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
    }

    Ok(())
}

fn sign_bytes(name: &str, address: &str, hex: &str) -> Result<SignedBytes> {
    let bytes = alloy::hex::decode(hex.strip_prefix("0x").unwrap_or(hex))
        .map_err(|e| Error::InvalidArgument(format!("Invalid hex string: {}", e)))?;

    let vault = Arc::new(EnvVault::from_env(name, address)?);
    let mut session = WalletSession::load(vault.clone());
    let wallet = session.connect(name)?;

    let password = SecretString::from(std::env::var(env_vars::PASSWORD).unwrap_or_default());

    tracing::info!(address = %wallet.address, len = bytes.len(), "Signing bytes");
    tx::sign_bytes(vault.as_ref(), &session, &bytes, &password)
}

fn render_sign_doc(config: &Config, file: &Path) -> Result<Vec<u8>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| Error::InvalidArgument(format!("{}: {}", file.display(), e)))?;
    let input: SignDocInput = serde_json::from_str(&content)?;

    let doc = SignDoc::new(
        input.chain_id.unwrap_or_else(|| config.chain_id.clone()),
        AccountInfo {
            account_number: input.account_number,
            sequence: input.sequence,
        },
        &input.tx,
    );
    doc.sign_bytes(SignMode::LegacyAminoJson)
}
