//! Wallet client
//!
//! Owns the session and the collaborators, and exposes the public
//! operations: connect, sign, post, export.

use crate::config::Config;
use crate::export::ExportGateway;
use crate::gateway::{ChainClient, DeviceGateway, StoredWallet, VaultGateway};
use crate::tx::{BroadcastResult, CreateTxOptions, TransactionSigner, Tx, TxSignature};
use crate::wallet::{SessionEvent, SignedBytes, WalletDescriptor, WalletSession};
use crate::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::watch;

pub struct WalletClient {
    session: WalletSession,
    signer: TransactionSigner,
    export: ExportGateway,
}

impl WalletClient {
    /// Build a client; the session is restored from the vault
    pub fn new(
        config: &Config,
        vault: Arc<dyn VaultGateway>,
        chain: Arc<dyn ChainClient>,
        device: Arc<dyn DeviceGateway>,
    ) -> Result<Self> {
        config.validate()?;
        tracing::info!(chain_id = %config.chain_id, "Wallet client ready");

        Ok(Self {
            session: WalletSession::load(vault.clone()),
            signer: TransactionSigner::new(config, vault.clone(), chain, device),
            export: ExportGateway::new(vault),
        })
    }

    pub fn connect(&mut self, name: &str) -> Result<WalletDescriptor> {
        self.session.connect(name)
    }

    pub fn connect_ledger(&mut self, address: &str) -> Result<WalletDescriptor> {
        self.session.connect_ledger(address)
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.session.disconnect()
    }

    pub fn connected_wallet(&self) -> Result<&WalletDescriptor> {
        self.session.connected_wallet()
    }

    pub fn wallets(&self) -> Result<Vec<StoredWallet>> {
        self.session.wallets()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub fn encode_encrypted_wallet(&self, password: &SecretString) -> Result<String> {
        self.export.encode_encrypted_wallet(&self.session, password)
    }

    pub fn import_wallet(&self, encoded: &str, password: &SecretString) -> Result<StoredWallet> {
        self.export.import_wallet(encoded, password)
    }

    pub fn validate_password(&self, password: &SecretString) -> bool {
        self.export.validate_password(&self.session, password)
    }

    pub async fn create(&self, options: &CreateTxOptions) -> Result<Tx> {
        self.signer.create(&self.session, options).await
    }

    pub async fn create_signature(
        &self,
        tx: &Tx,
        address: &str,
        password: &SecretString,
    ) -> Result<TxSignature> {
        self.signer
            .create_signature(&self.session, tx, address, password)
            .await
    }

    pub async fn sign(&self, options: &CreateTxOptions, password: &SecretString) -> Result<Tx> {
        self.signer.sign(&self.session, options, password).await
    }

    pub fn sign_bytes(&self, bytes: &[u8], password: &SecretString) -> Result<SignedBytes> {
        self.signer.sign_bytes(&self.session, bytes, password)
    }

    pub async fn post(
        &self,
        options: &CreateTxOptions,
        password: &SecretString,
    ) -> Result<BroadcastResult> {
        self.signer.post(&self.session, options, password).await
    }
}
