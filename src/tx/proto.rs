//! Protobuf wire forms of the transaction types
//!
//! Only the messages needed to produce `SIGN_MODE_DIRECT` sign bytes and a
//! broadcastable `TxRaw` are modelled. Field tags follow `cosmos.tx.v1beta1`.

use super::types::{self, SignMode};
use crate::wallet::{PublicKey, SECP256K1_PUBKEY_TYPE_URL};
use crate::{Error, Result};
use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// `cosmos.crypto.secp256k1.PubKey`
#[derive(Clone, PartialEq, Message)]
pub struct PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// `ModeInfo` restricted to its `single` arm (oneof tag 1)
#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
    #[prost(message, optional, tag = "1")]
    pub single: Option<ModeInfoSingle>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoSingle {
    #[prost(int32, tag = "1")]
    pub mode: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

impl From<SignMode> for ModeInfo {
    fn from(mode: SignMode) -> Self {
        Self {
            single: Some(ModeInfoSingle {
                mode: mode.proto_value(),
            }),
        }
    }
}

pub fn public_key_any(key: &PublicKey) -> Any {
    Any {
        type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
        value: PubKey {
            key: key.as_bytes().to_vec(),
        }
        .encode_to_vec(),
    }
}

/// Encoded `TxBody`; every message must carry its protobuf value
pub fn body_bytes(body: &types::TxBody) -> Result<Vec<u8>> {
    let messages = body
        .messages
        .iter()
        .map(|msg| -> Result<Any> {
            let value = msg.proto_value.clone().ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "message {} has no protobuf encoding",
                    msg.type_url
                ))
            })?;
            Ok(Any {
                type_url: msg.type_url.clone(),
                value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TxBody {
        messages,
        memo: body.memo.clone(),
        timeout_height: body.timeout_height,
    }
    .encode_to_vec())
}

/// Encoded `AuthInfo`, signer infos included
pub fn auth_info_bytes(auth_info: &types::AuthInfo) -> Vec<u8> {
    let signer_infos = auth_info
        .signer_infos
        .iter()
        .map(|info| SignerInfo {
            public_key: info.public_key.as_ref().map(public_key_any),
            mode_info: Some(info.mode.into()),
            sequence: info.sequence,
        })
        .collect();

    let fee = &auth_info.fee;
    AuthInfo {
        signer_infos,
        fee: Some(Fee {
            amount: fee
                .amount
                .iter()
                .map(|coin| Coin {
                    denom: coin.denom.clone(),
                    amount: coin.amount.clone(),
                })
                .collect(),
            gas_limit: fee.gas_limit,
            payer: fee.payer.clone().unwrap_or_default(),
            granter: fee.granter.clone().unwrap_or_default(),
        }),
    }
    .encode_to_vec()
}
