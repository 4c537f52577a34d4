//! Signing documents
//!
//! A [`SignDoc`] is what a key actually signs. It is built fresh for every
//! signing attempt because the account sequence advances with each confirmed
//! transaction, and a stale sequence is rejected by the chain.

use super::proto;
use super::types::{AccountInfo, AuthInfo, SignMode, SignerInfo, Tx, TxBody};
use crate::gateway::ChainClient;
use crate::wallet::PublicKey;
use crate::{Error, Result};
use prost::Message;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct SignDoc {
    chain_id: String,
    account_number: u64,
    sequence: u64,
    auth_info: AuthInfo,
    body: TxBody,
}

impl SignDoc {
    pub fn new(chain_id: impl Into<String>, account: AccountInfo, tx: &Tx) -> Self {
        Self {
            chain_id: chain_id.into(),
            account_number: account.account_number,
            sequence: account.sequence,
            auth_info: tx.auth_info.clone(),
            body: tx.body.clone(),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn account_number(&self) -> u64 {
        self.account_number
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn auth_info(&self) -> &AuthInfo {
        &self.auth_info
    }

    pub fn body(&self) -> &TxBody {
        &self.body
    }

    /// Canonical bytes to sign under `mode`
    pub fn sign_bytes(&self, mode: SignMode) -> Result<Vec<u8>> {
        match mode {
            SignMode::LegacyAminoJson => canonical_json(&self.to_amino_json()?),
            SignMode::Direct => self.to_direct_bytes(),
        }
    }

    /// The amino `StdSignDoc`. Integers are rendered as strings.
    pub fn to_amino_json(&self) -> Result<Value> {
        let msgs = self
            .body
            .messages
            .iter()
            .map(|msg| -> Result<Value> {
                let amino_type = msg.amino_type.as_deref().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "message {} has no amino encoding",
                        msg.type_url
                    ))
                })?;
                Ok(json!({ "type": amino_type, "value": msg.value }))
            })
            .collect::<Result<Vec<_>>>()?;

        let fee = &self.auth_info.fee;
        let mut amino_fee = json!({
            "amount": fee.amount,
            "gas": fee.gas_limit.to_string(),
        });
        if let Some(payer) = &fee.payer {
            amino_fee["payer"] = json!(payer);
        }
        if let Some(granter) = &fee.granter {
            amino_fee["granter"] = json!(granter);
        }

        let mut doc = json!({
            "account_number": self.account_number.to_string(),
            "chain_id": self.chain_id,
            "fee": amino_fee,
            "memo": self.body.memo,
            "msgs": msgs,
            "sequence": self.sequence.to_string(),
        });
        if self.body.timeout_height > 0 {
            doc["timeout_height"] = json!(self.body.timeout_height.to_string());
        }
        Ok(doc)
    }

    /// Protobuf `SignDoc`. Covers the signer infos, so they must be in
    /// place before signing.
    fn to_direct_bytes(&self) -> Result<Vec<u8>> {
        Ok(proto::SignDoc {
            body_bytes: proto::body_bytes(&self.body)?,
            auth_info_bytes: proto::auth_info_bytes(&self.auth_info),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        }
        .encode_to_vec())
    }
}

/// Compact JSON with object keys sorted at every level
pub fn canonical_json(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&sorted(value))?)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Builds signing documents from live account state
pub struct SigningDocumentBuilder {
    chain: Arc<dyn ChainClient>,
    chain_id: String,
}

impl SigningDocumentBuilder {
    pub fn new(chain: Arc<dyn ChainClient>, chain_id: impl Into<String>) -> Self {
        Self {
            chain,
            chain_id: chain_id.into(),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Fetch the account number and sequence for `address` (never cached)
    /// and combine them with `tx` into a signing document.
    pub async fn build(&self, tx: &Tx, address: &str) -> Result<SignDoc> {
        let account = self.chain.account_info(address).await?;
        tracing::debug!(
            address = %address,
            account_number = account.account_number,
            sequence = account.sequence,
            "Fetched signer account"
        );
        Ok(SignDoc::new(self.chain_id.clone(), account, tx))
    }

    /// Like [`build`](Self::build), with the signer info for `public_key`
    /// added to the document's auth info at the live sequence. This is the
    /// document a signature from that key must cover.
    pub async fn build_for_signer(
        &self,
        tx: &Tx,
        address: &str,
        public_key: &PublicKey,
        mode: SignMode,
    ) -> Result<SignDoc> {
        let mut doc = self.build(tx, address).await?;
        let info = SignerInfo {
            public_key: Some(public_key.clone()),
            mode,
            sequence: doc.sequence,
        };
        if !doc.auth_info.signer_infos.contains(&info) {
            doc.auth_info.signer_infos.push(info);
        }
        Ok(doc)
    }
}
