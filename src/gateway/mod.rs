//! Contracts for the external collaborators
//!
//! - [`VaultGateway`]: encrypted-at-rest key storage (owns the cipher)
//! - [`ChainClient`]: account lookup, tx construction, broadcast
//! - [`DeviceGateway`]: hardware signer transport
//!
//! Only the chain client and the device suspend; the vault is synchronous.

mod env;

pub use env::EnvVault;

use crate::export::WalletBundle;
use crate::tx::{AccountInfo, BroadcastResult, CreateTxOptions, SignerData, Tx};
use crate::wallet::{DecryptedKey, WalletDescriptor};
use crate::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A wallet as listed by the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWallet {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub multisig: bool,
}

pub trait VaultGateway: Send + Sync {
    /// Decrypt the key of `name`. `None` means the password did not open it.
    fn decrypt(&self, name: &str, password: &SecretString) -> Result<Option<DecryptedKey>>;

    fn test_password(&self, name: &str, password: &SecretString) -> Result<bool>;

    /// Encrypt `key` under `password` in the vault's portable format
    fn encrypt(&self, key: &DecryptedKey, password: &SecretString) -> Result<String>;

    /// Store the wallet carried by an exported bundle
    fn import(&self, bundle: &WalletBundle, password: &SecretString) -> Result<StoredWallet>;

    /// Fails with [`crate::Error::NotFound`] for unknown names
    fn load(&self, name: &str) -> Result<StoredWallet>;

    fn wallets(&self) -> Result<Vec<StoredWallet>>;

    /// Persist the "current wallet" record. Every field must round-trip.
    fn store_current(&self, wallet: &WalletDescriptor) -> Result<()>;

    fn load_current(&self) -> Result<Option<WalletDescriptor>>;

    fn clear_current(&self) -> Result<()>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn account_info(&self, address: &str) -> Result<AccountInfo>;

    /// Build an unsigned transaction (fee estimated when not given)
    async fn create_unsigned_tx(
        &self,
        signers: &[SignerData],
        options: &CreateTxOptions,
    ) -> Result<Tx>;

    async fn broadcast_sync(&self, tx: &Tx) -> Result<BroadcastResult>;
}

#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Compressed public key, or `None` when the device is locked or absent
    async fn public_key(&self) -> Result<Option<Vec<u8>>>;

    /// Sign canonical amino-JSON bytes; returns a 64-byte `r||s` signature
    async fn sign_amino(&self, sign_bytes: &[u8]) -> Result<Vec<u8>>;
}
