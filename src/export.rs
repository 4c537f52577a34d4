//! Portable encrypted wallet bundles
//!
//! A bundle is `base64(JSON { name, address, encrypted_key })`. The key is
//! re-encrypted by the vault under the same password it was unlocked with;
//! this module never sees a cipher.

use crate::gateway::{StoredWallet, VaultGateway};
use crate::wallet::{WalletSession, WalletVariant};
use crate::{encoding, Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBundle {
    pub name: String,
    pub address: String,
    pub encrypted_key: String,
}

impl WalletBundle {
    pub fn encode(&self) -> Result<String> {
        Ok(encoding::encode(serde_json::to_vec(self)?))
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_slice(&encoding::decode(encoded)?)?;
        if bundle.name.is_empty() || bundle.address.is_empty() || bundle.encrypted_key.is_empty()
        {
            return Err(Error::InvalidArgument(
                "wallet bundle is missing name, address or key".to_string(),
            ));
        }
        Ok(bundle)
    }
}

pub struct ExportGateway {
    vault: Arc<dyn VaultGateway>,
}

impl ExportGateway {
    pub fn new(vault: Arc<dyn VaultGateway>) -> Self {
        Self { vault }
    }

    /// Export the connected wallet as an encoded bundle.
    ///
    /// Fails with [`Error::IncorrectPassword`] when the password does not
    /// open the key.
    pub fn encode_encrypted_wallet(
        &self,
        session: &WalletSession,
        password: &SecretString,
    ) -> Result<String> {
        let wallet = session.connected_wallet()?;
        let name = match wallet.variant {
            WalletVariant::Local => wallet.require_name()?,
            WalletVariant::Ledger => {
                return Err(Error::UnsupportedOperation(
                    "hardware keys cannot be exported".to_string(),
                ))
            }
            WalletVariant::Multisig => {
                return Err(Error::UnsupportedOperation(
                    "multisig wallets hold no exportable key".to_string(),
                ))
            }
        };

        let encrypted_key = {
            let key = self
                .vault
                .decrypt(name, password)?
                .ok_or(Error::IncorrectPassword)?;
            self.vault.encrypt(&key, password)?
        };

        tracing::info!(wallet = %name, "Wallet exported");
        WalletBundle {
            name: name.to_string(),
            address: wallet.address.clone(),
            encrypted_key,
        }
        .encode()
    }

    /// Store the wallet from an encoded bundle in the vault
    pub fn import_wallet(&self, encoded: &str, password: &SecretString) -> Result<StoredWallet> {
        let bundle = WalletBundle::decode(encoded)?;
        let stored = self.vault.import(&bundle, password)?;
        tracing::info!(wallet = %stored.name, address = %stored.address, "Wallet imported");
        Ok(stored)
    }

    /// Whether `password` opens the connected wallet.
    ///
    /// Every failure (wrong password, no session, vault error) reads as
    /// `false`; use [`ExportGateway::check_password`] to tell them apart.
    pub fn validate_password(&self, session: &WalletSession, password: &SecretString) -> bool {
        match self.check_password(session, password) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Password validation failed");
                false
            }
        }
    }

    /// Like [`ExportGateway::validate_password`] but keeps the cause
    pub fn check_password(&self, session: &WalletSession, password: &SecretString) -> Result<()> {
        let wallet = session.connected_wallet()?;
        match wallet.variant {
            WalletVariant::Local | WalletVariant::Multisig => {
                if self.vault.test_password(wallet.require_name()?, password)? {
                    Ok(())
                } else {
                    Err(Error::IncorrectPassword)
                }
            }
            WalletVariant::Ledger => Err(Error::UnsupportedOperation(
                "hardware wallets have no password".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryVault, TEST_KEY};
    use crate::wallet::SoftwareKeyProvider;

    fn connected(vault: Arc<MemoryVault>) -> WalletSession {
        let mut session = WalletSession::load(vault);
        session.connect("alice").unwrap();
        session
    }

    fn alice_vault() -> Arc<MemoryVault> {
        Arc::new(MemoryVault::new().with_wallet("alice", "addr1", "pw1", TEST_KEY))
    }

    #[test]
    fn test_exported_bundle_reimports_with_same_password() {
        let vault = alice_vault();
        let session = connected(vault.clone());
        let export = ExportGateway::new(vault.clone());
        let password = SecretString::from("pw1");

        let encoded = export.encode_encrypted_wallet(&session, &password).unwrap();

        let bundle = WalletBundle::decode(&encoded).unwrap();
        assert_eq!(bundle.name, "alice");
        assert_eq!(bundle.address, "addr1");

        let fresh = Arc::new(MemoryVault::new());
        let stored = ExportGateway::new(fresh.clone())
            .import_wallet(&encoded, &password)
            .unwrap();
        assert_eq!(stored.name, "alice");
        assert_eq!(stored.address, "addr1");

        let before = SoftwareKeyProvider::unlock(vault.as_ref(), "alice", &password).unwrap();
        let imported = SoftwareKeyProvider::unlock(fresh.as_ref(), "alice", &password).unwrap();
        assert_eq!(before.public_key(), imported.public_key());
    }

    #[test]
    fn test_import_with_other_password_fails() {
        let vault = alice_vault();
        let session = connected(vault.clone());
        let encoded = ExportGateway::new(vault)
            .encode_encrypted_wallet(&session, &SecretString::from("pw1"))
            .unwrap();

        let err = ExportGateway::new(Arc::new(MemoryVault::new()))
            .import_wallet(&encoded, &SecretString::from("pw2"))
            .unwrap_err();
        assert!(matches!(err, Error::IncorrectPassword));
    }

    #[test]
    fn test_export_with_wrong_password_fails() {
        let vault = alice_vault();
        let session = connected(vault.clone());

        let err = ExportGateway::new(vault)
            .encode_encrypted_wallet(&session, &SecretString::from("nope"))
            .unwrap_err();
        assert!(matches!(err, Error::IncorrectPassword));
    }

    #[test]
    fn test_export_requires_session() {
        let vault = alice_vault();
        let session = WalletSession::load(vault.clone());

        let err = ExportGateway::new(vault)
            .encode_encrypted_wallet(&session, &SecretString::from("pw1"))
            .unwrap_err();
        assert!(matches!(err, Error::Session));
    }

    #[test]
    fn test_validate_password_collapses_failures() {
        let vault = alice_vault();
        let export = ExportGateway::new(vault.clone());
        let disconnected = WalletSession::load(vault.clone());
        let session = connected(vault);

        assert!(export.validate_password(&session, &SecretString::from("pw1")));
        assert!(!export.validate_password(&session, &SecretString::from("wrong")));
        assert!(!export.validate_password(&disconnected, &SecretString::from("pw1")));

        assert!(matches!(
            export.check_password(&disconnected, &SecretString::from("pw1")),
            Err(Error::Session)
        ));
        assert!(matches!(
            export.check_password(&session, &SecretString::from("wrong")),
            Err(Error::IncorrectPassword)
        ));
    }

    #[test]
    fn test_validate_password_hides_vault_errors() {
        let vault = Arc::new(
            MemoryVault::new()
                .with_wallet("alice", "addr1", "pw1", TEST_KEY)
                .unavailable(),
        );
        let export = ExportGateway::new(vault.clone());
        let session = connected(vault);
        let password = SecretString::from("pw1");

        assert!(!export.validate_password(&session, &password));
        assert!(matches!(
            export.check_password(&session, &password),
            Err(Error::Gateway(_))
        ));
    }

    #[test]
    fn test_multisig_export_is_unsupported() {
        let vault = Arc::new(MemoryVault::new().with_multisig("team", "addr9"));
        let mut session = WalletSession::load(vault.clone());
        session.connect("team").unwrap();

        let err = ExportGateway::new(vault.clone())
            .encode_encrypted_wallet(&session, &SecretString::from("pw1"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
        assert_eq!(vault.decrypt_calls(), 0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(WalletBundle::decode("%%%").is_err());
        let empty = encoding::encode(r#"{"name":"","address":"a","encrypted_key":"k"}"#);
        assert!(matches!(
            WalletBundle::decode(&empty),
            Err(Error::InvalidArgument(_))
        ));
    }
}
