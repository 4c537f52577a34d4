//! Transaction signing orchestration
//!
//! ```text
//! Idle → Created(unsigned tx) → Signed → Broadcast → { Success | Rejected }
//! ```
//!
//! Every operation first requires a connected session, then picks a key
//! provider from the wallet variant. Nothing is retried here: a failure
//! surfaces immediately and retry policy belongs to the caller. Callers must
//! serialize signing per account, since each attempt reads the live sequence.

use super::chain_wallet::ChainWallet;
use super::sign_doc::SigningDocumentBuilder;
use super::types::{BroadcastResult, CreateTxOptions, SignMode, SignerData, Tx, TxSignature};
use crate::config::Config;
use crate::gateway::{ChainClient, DeviceGateway, VaultGateway};
use crate::wallet::{
    HardwareKeyProvider, KeyProvider, SignedBytes, SoftwareKeyProvider, WalletDescriptor,
    WalletSession, WalletVariant,
};
use crate::{Error, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Where a transaction is in its lifecycle; reported in log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Created,
    Signed,
    Broadcast,
    Success,
    Rejected,
}

pub struct TransactionSigner {
    vault: Arc<dyn VaultGateway>,
    chain: Arc<dyn ChainClient>,
    device: Arc<dyn DeviceGateway>,
    builder: SigningDocumentBuilder,
    software_mode: SignMode,
    gas_adjustment: f64,
    default_memo: Option<String>,
}

impl TransactionSigner {
    pub fn new(
        config: &Config,
        vault: Arc<dyn VaultGateway>,
        chain: Arc<dyn ChainClient>,
        device: Arc<dyn DeviceGateway>,
    ) -> Self {
        Self {
            builder: SigningDocumentBuilder::new(chain.clone(), config.chain_id.clone()),
            vault,
            chain,
            device,
            software_mode: config.software_sign_mode,
            gas_adjustment: config.gas_adjustment,
            default_memo: config.default_memo.clone(),
        }
    }

    /// Request an unsigned transaction for the connected wallet
    pub async fn create(&self, session: &WalletSession, options: &CreateTxOptions) -> Result<Tx> {
        let wallet = session.connected_wallet()?;
        let signer = SignerData {
            address: wallet.address.clone(),
            public_key: None,
            sequence: None,
        };

        let tx = self
            .chain
            .create_unsigned_tx(&[signer], &self.with_defaults(options))
            .await?;
        tracing::debug!(address = %wallet.address, state = ?TxState::Created, "Transaction created");
        Ok(tx)
    }

    /// Sign `tx` as `address` without attaching the signature (co-signing)
    pub async fn create_signature(
        &self,
        session: &WalletSession,
        tx: &Tx,
        address: &str,
        password: &SecretString,
    ) -> Result<TxSignature> {
        let wallet = session.connected_wallet()?;
        let key = self.key_for(wallet, password).await?;
        let mode = key.effective_mode(self.software_mode);

        let doc = self
            .builder
            .build_for_signer(tx, address, key.public_key(), mode)
            .await?;
        let signature = key.sign_document(&doc, mode).await?;

        tracing::info!(
            address = %address,
            variant = wallet.variant.name(),
            mode = mode.as_str(),
            "Signature created"
        );
        Ok(TxSignature::new(signature, mode, doc.sequence()))
    }

    /// Create and sign a transaction for the connected wallet.
    ///
    /// The key is unlocked before any chain call, so a wrong password fails
    /// without touching the network.
    pub async fn sign(
        &self,
        session: &WalletSession,
        options: &CreateTxOptions,
        password: &SecretString,
    ) -> Result<Tx> {
        let wallet = session.connected_wallet()?;
        let key = self.key_for(wallet, password).await?;
        let mode = key.effective_mode(self.software_mode);

        let tx = ChainWallet::new(self.chain.clone(), &self.builder, &key, &wallet.address)
            .create_and_sign_tx(&self.with_defaults(options), mode)
            .await?;

        tracing::info!(
            address = %wallet.address,
            variant = wallet.variant.name(),
            mode = mode.as_str(),
            state = ?TxState::Signed,
            "Transaction signed"
        );
        Ok(tx)
    }

    /// Sign arbitrary bytes with the connected wallet's key; see [`sign_bytes`]
    pub fn sign_bytes(
        &self,
        session: &WalletSession,
        bytes: &[u8],
        password: &SecretString,
    ) -> Result<SignedBytes> {
        sign_bytes(self.vault.as_ref(), session, bytes, password)
    }

    /// Sign and broadcast.
    ///
    /// A non-zero result code fails with [`Error::Broadcast`] carrying the raw log.
    pub async fn post(
        &self,
        session: &WalletSession,
        options: &CreateTxOptions,
        password: &SecretString,
    ) -> Result<BroadcastResult> {
        let span = tracing::info_span!("post", attempt = %Uuid::new_v4());

        async {
            tracing::debug!(state = ?TxState::Idle, "Posting transaction");
            let tx = self.sign(session, options, password).await?;

            tracing::debug!(state = ?TxState::Broadcast, "Broadcasting transaction");
            let result = self.chain.broadcast_sync(&tx).await?;

            if result.is_rejected() {
                tracing::warn!(
                    tx_hash = %result.tx_hash,
                    code = result.code,
                    state = ?TxState::Rejected,
                    "Transaction rejected"
                );
                return Err(Error::Broadcast {
                    code: result.code,
                    raw_log: result.raw_log,
                });
            }

            tracing::info!(
                tx_hash = %result.tx_hash,
                height = result.height,
                state = ?TxState::Success,
                "Transaction broadcast"
            );
            Ok::<_, Error>(result)
        }
        .instrument(span)
        .await
    }

    async fn key_for(
        &self,
        wallet: &WalletDescriptor,
        password: &SecretString,
    ) -> Result<KeyProvider> {
        match wallet.variant {
            WalletVariant::Local => Ok(SoftwareKeyProvider::unlock(
                self.vault.as_ref(),
                wallet.require_name()?,
                password,
            )?
            .into()),
            WalletVariant::Ledger => Ok(HardwareKeyProvider::connect(self.device.clone())
                .await?
                .into()),
            WalletVariant::Multisig => Err(multisig_unsupported()),
        }
    }

    fn with_defaults(&self, options: &CreateTxOptions) -> CreateTxOptions {
        let mut options = options.clone();
        if options.memo.is_none() {
            options.memo = self.default_memo.clone();
        }
        if options.gas_adjustment.is_none() {
            options.gas_adjustment = Some(self.gas_adjustment);
        }
        options
    }
}

/// Sign arbitrary bytes with the session's wallet, outside any signing
/// document. Only needs the vault, so it also serves offline tools.
///
/// Ledger wallets always fail with [`Error::UnsupportedOperation`] and
/// never reach the vault.
pub fn sign_bytes(
    vault: &dyn VaultGateway,
    session: &WalletSession,
    bytes: &[u8],
    password: &SecretString,
) -> Result<SignedBytes> {
    let wallet = session.connected_wallet()?;
    match wallet.variant {
        WalletVariant::Local => {
            let key = KeyProvider::from(SoftwareKeyProvider::unlock(
                vault,
                wallet.require_name()?,
                password,
            )?);
            let signature = key.sign_raw_bytes(bytes)?;
            tracing::info!(address = %wallet.address, len = bytes.len(), "Bytes signed");
            SignedBytes::try_from(signature)
        }
        WalletVariant::Ledger => Err(Error::UnsupportedOperation(
            "hardware wallets can only sign transactions, not arbitrary bytes".to_string(),
        )),
        WalletVariant::Multisig => Err(multisig_unsupported()),
    }
}

fn multisig_unsupported() -> Error {
    Error::UnsupportedOperation(
        "multisig wallets must be signed cooperatively outside this wallet".to_string(),
    )
}
