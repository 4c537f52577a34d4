//! secp256k1 public keys and signature verification

use crate::{encoding, Error, Result};
use alloy::primitives::{Signature as EcdsaSignature, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Proto type URL of a secp256k1 public key
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Amino type name of a secp256k1 public key
pub const SECP256K1_PUBKEY_AMINO_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Length of a SEC1 compressed point
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Compressed secp256k1 public key (33 bytes, `0x02`/`0x03` prefix)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() != COMPRESSED_PUBKEY_LEN || !matches!(bytes[0], 0x02 | 0x03) {
            return Err(Error::InvalidArgument(format!(
                "expected a {}-byte compressed secp256k1 key, got {} bytes",
                COMPRESSED_PUBKEY_LEN,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encoding::encode(&self.0)
    }

    /// `{"@type": "/cosmos.crypto.secp256k1.PubKey", "key": "<base64>"}`
    pub fn to_proto_json(&self) -> Value {
        json!({ "@type": SECP256K1_PUBKEY_TYPE_URL, "key": self.to_base64() })
    }

    /// `{"type": "tendermint/PubKeySecp256k1", "value": "<base64>"}`
    pub fn to_amino_json(&self) -> Value {
        json!({ "type": SECP256K1_PUBKEY_AMINO_TYPE, "value": self.to_base64() })
    }

    /// Verify a 64-byte `r||s` signature over `SHA-256(message)`.
    ///
    /// The recovery id is not needed: both parities are tried and the
    /// recovered key is compared against this one.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        if signature.len() != 64 {
            return false;
        }
        let digest = B256::from_slice(&Sha256::digest(message));

        [false, true].into_iter().any(|parity| {
            EcdsaSignature::from_bytes_and_parity(signature, parity)
                .recover_from_prehash(&digest)
                .map(|key| key.to_encoded_point(true).as_bytes() == self.0.as_slice())
                .unwrap_or(false)
        })
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", alloy::hex::encode(&self.0))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ProtoPublicKey {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            key: self.to_base64(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let proto = ProtoPublicKey::deserialize(deserializer)?;
        if proto.type_url != SECP256K1_PUBKEY_TYPE_URL {
            return Err(serde::de::Error::custom(format!(
                "unsupported public key type {}",
                proto.type_url
            )));
        }
        let bytes = encoding::decode(&proto.key).map_err(serde::de::Error::custom)?;
        PublicKey::from_bytes(bytes).map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct ProtoPublicKey {
    #[serde(rename = "@type")]
    type_url: String,
    key: String,
}
