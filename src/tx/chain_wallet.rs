//! A key provider bound to the chain client
//!
//! Combines account lookup, transaction creation and signing into one call.

use super::sign_doc::SigningDocumentBuilder;
use super::types::{AccountInfo, CreateTxOptions, SignMode, SignerData, Tx, TxSignature};
use crate::gateway::ChainClient;
use crate::wallet::KeyProvider;
use crate::Result;
use std::sync::Arc;

pub struct ChainWallet<'a> {
    chain: Arc<dyn ChainClient>,
    builder: &'a SigningDocumentBuilder,
    key: &'a KeyProvider,
    address: &'a str,
}

impl<'a> ChainWallet<'a> {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        builder: &'a SigningDocumentBuilder,
        key: &'a KeyProvider,
        address: &'a str,
    ) -> Self {
        Self {
            chain,
            builder,
            key,
            address,
        }
    }

    pub async fn account_number_and_sequence(&self) -> Result<AccountInfo> {
        self.chain.account_info(self.address).await
    }

    /// Sign `tx` as this wallet and attach the signature.
    ///
    /// The signed document already contains this wallet's signer info, so
    /// the attached transaction verifies as broadcast. Returns the signature
    /// that was attached. The mode may be overridden by the key (hardware
    /// keys always use amino JSON).
    pub async fn sign_tx(&self, tx: &mut Tx, mode: SignMode) -> Result<TxSignature> {
        let mode = self.key.effective_mode(mode);
        let doc = self
            .builder
            .build_for_signer(tx, self.address, self.key.public_key(), mode)
            .await?;
        let signature = self.key.sign_document(&doc, mode).await?;

        let signature = TxSignature::new(signature, mode, doc.sequence());
        tx.append_signature(signature.clone());
        Ok(signature)
    }

    /// Create an unsigned transaction for this wallet and sign it
    pub async fn create_and_sign_tx(&self, options: &CreateTxOptions, mode: SignMode) -> Result<Tx> {
        let signer = SignerData {
            address: self.address.to_string(),
            public_key: Some(self.key.public_key().clone()),
            sequence: None,
        };
        let mut tx = self.chain.create_unsigned_tx(&[signer], options).await?;
        self.sign_tx(&mut tx, mode).await?;
        Ok(tx)
    }
}
