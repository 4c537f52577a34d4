//! Software key provider
//!
//! SECURITY: This is the ONLY place where decrypted private keys exist.
//! - Key bytes arrive from the vault as a [`DecryptedKey`] and are zeroized on drop
//! - The signer lives only as long as the operation that unlocked it
//! - Keys are never serialized, logged, or returned to callers

use super::keys::PublicKey;
use super::provider::Signature;
use crate::gateway::VaultGateway;
use crate::{Error, Result};
use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use sha2::{Digest, Sha256};

/// Raw private key bytes handed out by the vault for a single call.
///
/// The bytes are zeroized when this value is dropped.
pub struct DecryptedKey(SecretSlice<u8>);

impl DecryptedKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(SecretSlice::from(bytes))
    }

    /// Parse a hex-encoded key (with or without `0x`)
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        alloy::hex::decode(key_hex)
            .map(Self::new)
            .map_err(|e| Error::InvalidArgument(format!("Invalid private key: {}", e)))
    }

    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for DecryptedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DecryptedKey([REDACTED])")
    }
}

/// Signs with a key decrypted from the vault.
///
/// The key is:
/// - Held in alloy's PrivateKeySigner (zeroized on drop)
/// - Never serialized (no Serialize impl)
/// - Only reachable through signing operations
pub struct SoftwareKeyProvider {
    signer: PrivateKeySigner,
    public_key: PublicKey,
}

impl SoftwareKeyProvider {
    /// Decrypt `name` with `password` and build a provider from the result.
    ///
    /// Fails with [`Error::IncorrectPassword`] when the vault yields no key.
    pub fn unlock(vault: &dyn VaultGateway, name: &str, password: &SecretString) -> Result<Self> {
        let key = vault.decrypt(name, password)?.ok_or_else(|| {
            tracing::debug!(wallet = %name, "Vault returned no key");
            Error::IncorrectPassword
        })?;
        Self::from_key(&key)
    }

    pub fn from_key(key: &DecryptedKey) -> Result<Self> {
        let signer = PrivateKeySigner::from_slice(key.expose())
            .map_err(|e| Error::InvalidArgument(format!("Invalid private key: {}", e)))?;

        let encoded = signer.credential().verifying_key().to_encoded_point(true);
        let public_key = PublicKey::from_bytes(encoded.as_bytes().to_vec())?;

        Ok(Self { signer, public_key })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// ECDSA over `SHA-256(message)`: 64-byte `r||s` (low-s) plus recovery id
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let digest = B256::from_slice(&Sha256::digest(message));

        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| Error::Internal(format!("Signing failed: {}", e)))?;

        Ok(Signature {
            bytes: signature.as_bytes()[..64].to_vec(),
            public_key: self.public_key.clone(),
            recovery_id: Some(u8::from(signature.v())),
        })
    }
}

impl std::fmt::Debug for SoftwareKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareKeyProvider")
            .field("public_key", &self.public_key)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
