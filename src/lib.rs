//! Wallet signing core
//!
//! Manages a single connected wallet session and signs transactions with
//! either a password-protected software key or a hardware device:
//! - Builds chain signing documents from live account state
//! - Signs in direct or legacy amino-JSON mode
//! - Broadcasts through a pluggable chain client
//! - Exports and imports portable encrypted wallet bundles
//!
//! # Security Model
//!
//! - Decrypted keys are zeroized on drop and never outlive the call that
//!   unlocked them
//! - Hardware wallets never sign arbitrary bytes
//! - Passwords, keys and signatures are never logged
//!
//! Storage, chain RPC and device transport are external collaborators;
//! see [`gateway`].

pub mod client;
pub mod config;
pub mod export;
pub mod gateway;
pub mod tx;
pub mod wallet;

mod encoding;
mod error;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use client::WalletClient;
pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportGateway, WalletBundle};
pub use tx::{CreateTxOptions, SignMode, TransactionSigner, Tx};
pub use wallet::{KeyProvider, WalletDescriptor, WalletSession, WalletVariant};
