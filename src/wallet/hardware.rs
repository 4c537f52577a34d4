//! Hardware (Ledger) key provider
//!
//! The device only signs structured documents in legacy amino-JSON mode.

use super::keys::PublicKey;
use super::provider::Signature;
use crate::gateway::DeviceGateway;
use crate::tx::{SignDoc, SignMode};
use crate::{Error, Result};
use std::sync::Arc;

/// Sign mode the device understands. Not configurable.
pub const HARDWARE_SIGN_MODE: SignMode = SignMode::LegacyAminoJson;

pub struct HardwareKeyProvider {
    device: Arc<dyn DeviceGateway>,
    public_key: PublicKey,
}

impl HardwareKeyProvider {
    /// Ask the device for its public key.
    ///
    /// Fails with [`Error::Device`] when the device returns none.
    pub async fn connect(device: Arc<dyn DeviceGateway>) -> Result<Self> {
        let bytes = device.public_key().await?.ok_or_else(|| {
            Error::Device("device returned no public key; is it unlocked with the app open?".into())
        })?;
        let public_key = PublicKey::from_bytes(bytes)
            .map_err(|e| Error::Device(format!("device returned a malformed public key: {}", e)))?;

        tracing::debug!(public_key = ?public_key, "Hardware key connected");
        Ok(Self { device, public_key })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub async fn sign_document(&self, doc: &SignDoc) -> Result<Signature> {
        let sign_bytes = doc.sign_bytes(HARDWARE_SIGN_MODE)?;
        let bytes = self.device.sign_amino(&sign_bytes).await?;
        if bytes.len() != 64 {
            return Err(Error::Device(format!(
                "device returned a {}-byte signature, expected 64",
                bytes.len()
            )));
        }

        Ok(Signature {
            bytes,
            public_key: self.public_key.clone(),
            recovery_id: None,
        })
    }
}

impl std::fmt::Debug for HardwareKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareKeyProvider")
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_tx, MockDevice, TEST_KEY};
    use crate::tx::AccountInfo;

    #[tokio::test]
    async fn test_connect_without_public_key_is_device_error() {
        let device = Arc::new(MockDevice::disconnected());
        let err = HardwareKeyProvider::connect(device).await.unwrap_err();
        assert!(matches!(err, Error::Device(_)));
    }

    #[tokio::test]
    async fn test_signs_amino_bytes_on_device() {
        let device = Arc::new(MockDevice::with_key(TEST_KEY));
        let provider = HardwareKeyProvider::connect(device.clone()).await.unwrap();

        let doc = SignDoc::new(
            "phoenix-1",
            AccountInfo {
                account_number: 7,
                sequence: 3,
            },
            &sample_tx(),
        );
        let signature = provider.sign_document(&doc).await.unwrap();

        let amino = doc.sign_bytes(SignMode::LegacyAminoJson).unwrap();
        assert_eq!(device.signed_payloads(), vec![amino.clone()]);
        assert!(signature.recovery_id.is_none());
        assert!(provider.public_key().verify(&amino, &signature.bytes));
    }
}
