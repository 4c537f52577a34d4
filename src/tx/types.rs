//! Transaction types exchanged with the chain client

use crate::wallet::{PublicKey, Signature};
use crate::{Error, Result};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a signing document is serialized before it is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignMode {
    #[default]
    Direct,
    /// Historical amino-JSON convention; the only mode hardware signers accept
    LegacyAminoJson,
}

impl SignMode {
    /// Protocol enum name
    pub fn as_str(&self) -> &'static str {
        match self {
            SignMode::Direct => "SIGN_MODE_DIRECT",
            SignMode::LegacyAminoJson => "SIGN_MODE_LEGACY_AMINO_JSON",
        }
    }

    /// `cosmos.tx.signing.v1beta1.SignMode` number
    pub fn proto_value(&self) -> i32 {
        match self {
            SignMode::Direct => 1,
            SignMode::LegacyAminoJson => 127,
        }
    }
}

impl FromStr for SignMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "sign_mode_direct" => Ok(SignMode::Direct),
            "amino" | "legacy_amino_json" | "sign_mode_legacy_amino_json" => {
                Ok(SignMode::LegacyAminoJson)
            }
            other => Err(Error::Config(format!("Unknown sign mode: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    /// Integer amount as a decimal string
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granter: Option<String>,
}

/// A transaction message.
///
/// `value` is the message body as JSON, used for amino signing together with
/// the legacy `amino_type` name. `proto_value` is the protobuf encoding of
/// the same body, used for direct signing and `TxRaw`. A message missing
/// either form cannot be signed in the matching mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Msg {
    pub type_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amino_type: Option<String>,
    pub value: serde_json::Value,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::encoding::base64_option"
    )]
    pub proto_value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxBody {
    pub messages: Vec<Msg>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub timeout_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub public_key: Option<PublicKey>,
    pub mode: SignMode,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub signer_infos: Vec<SignerInfo>,
    pub fee: Fee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tx {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    #[serde(with = "crate::encoding::base64_list")]
    pub signatures: Vec<Vec<u8>>,
}

impl Tx {
    /// Attach a signature. Its signer info is added unless already present,
    /// since direct-mode signatures cover the signer infos.
    pub fn append_signature(&mut self, signature: TxSignature) {
        self.add_signer_info(signature.signer_info());
        self.signatures.push(signature.signature);
    }

    pub fn add_signer_info(&mut self, info: SignerInfo) {
        if !self.auth_info.signer_infos.contains(&info) {
            self.auth_info.signer_infos.push(info);
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Protobuf `TxRaw` bytes, ready for broadcast
    pub fn to_raw_bytes(&self) -> Result<Vec<u8>> {
        Ok(super::proto::TxRaw {
            body_bytes: super::proto::body_bytes(&self.body)?,
            auth_info_bytes: super::proto::auth_info_bytes(&self.auth_info),
            signatures: self.signatures.clone(),
        }
        .encode_to_vec())
    }
}

/// A signature bound to the signer info it was produced under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    pub public_key: PublicKey,
    pub mode: SignMode,
    pub sequence: u64,
    #[serde(with = "crate::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

impl TxSignature {
    pub fn new(signature: Signature, mode: SignMode, sequence: u64) -> Self {
        Self {
            public_key: signature.public_key,
            mode,
            sequence,
            signature: signature.bytes,
        }
    }

    pub fn signer_info(&self) -> SignerInfo {
        SignerInfo {
            public_key: Some(self.public_key.clone()),
            mode: self.mode,
            sequence: self.sequence,
        }
    }
}

/// Request for a new transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTxOptions {
    pub msgs: Vec<Msg>,
    #[serde(default)]
    pub memo: Option<String>,
    /// Estimated by the chain client when absent
    #[serde(default)]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub gas_adjustment: Option<f64>,
    #[serde(default)]
    pub timeout_height: Option<u64>,
}

/// Who will sign a transaction being created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerData {
    pub address: String,
    pub public_key: Option<PublicKey>,
    /// Looked up by the chain client when absent
    pub sequence: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub tx_hash: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: Option<String>,
    #[serde(default)]
    pub raw_log: String,
}

impl BroadcastResult {
    /// Non-zero code, or an error codespace.
    ///
    /// `raw_log` is free text and is never parsed; a failed check always
    /// reports its module in `codespace` alongside the log.
    pub fn is_rejected(&self) -> bool {
        self.code != 0 || self.codespace.as_deref().is_some_and(|c| !c.is_empty())
    }
}
