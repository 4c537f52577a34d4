//! Key provider dispatch
//!
//! A closed enum rather than a trait object: every caller matches both
//! variants, so adding a backend is a compile error until it is handled.

use super::hardware::HardwareKeyProvider;
use super::keys::PublicKey;
use super::signer::SoftwareKeyProvider;
use crate::tx::{SignDoc, SignMode};
use crate::{encoding, Error, Result};
use serde::Serialize;

/// A signature produced by a key provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 64-byte `r||s`
    pub bytes: Vec<u8>,
    pub public_key: PublicKey,
    /// Only set for raw-byte signing by software keys
    pub recovery_id: Option<u8>,
}

/// Result of signing arbitrary bytes, in the fixed wire encoding
/// (`signature` and `public_key` as base64).
#[derive(Debug, Clone, Serialize)]
pub struct SignedBytes {
    pub recid: u8,
    pub signature: String,
    pub public_key: String,
}

impl TryFrom<Signature> for SignedBytes {
    type Error = Error;

    fn try_from(signature: Signature) -> Result<Self> {
        let recid = signature.recovery_id.ok_or_else(|| {
            Error::Internal("raw-byte signature is missing its recovery id".to_string())
        })?;
        Ok(Self {
            recid,
            signature: encoding::encode(&signature.bytes),
            public_key: signature.public_key.to_base64(),
        })
    }
}

#[derive(Debug)]
pub enum KeyProvider {
    Software(SoftwareKeyProvider),
    Hardware(HardwareKeyProvider),
}

impl KeyProvider {
    pub fn public_key(&self) -> &PublicKey {
        match self {
            KeyProvider::Software(key) => key.public_key(),
            KeyProvider::Hardware(key) => key.public_key(),
        }
    }

    /// The mode this provider actually signs with when `requested` is asked for
    pub fn effective_mode(&self, requested: SignMode) -> SignMode {
        match self {
            KeyProvider::Software(_) => requested,
            KeyProvider::Hardware(_) => super::hardware::HARDWARE_SIGN_MODE,
        }
    }

    pub async fn sign_document(&self, doc: &SignDoc, mode: SignMode) -> Result<Signature> {
        match self {
            KeyProvider::Software(key) => key.sign(&doc.sign_bytes(mode)?),
            KeyProvider::Hardware(key) => key.sign_document(doc).await,
        }
    }

    /// Sign arbitrary bytes, bypassing the signing-document protocol.
    ///
    /// Hardware keys always fail with [`Error::UnsupportedOperation`].
    pub fn sign_raw_bytes(&self, bytes: &[u8]) -> Result<Signature> {
        match self {
            KeyProvider::Software(key) => key.sign(bytes),
            KeyProvider::Hardware(_) => Err(Error::UnsupportedOperation(
                "hardware wallets can only sign transactions, not arbitrary bytes".to_string(),
            )),
        }
    }
}

impl From<SoftwareKeyProvider> for KeyProvider {
    fn from(key: SoftwareKeyProvider) -> Self {
        KeyProvider::Software(key)
    }
}

impl From<HardwareKeyProvider> for KeyProvider {
    fn from(key: HardwareKeyProvider) -> Self {
        KeyProvider::Hardware(key)
    }
}
