//! Environment-backed vault holding a single wallet
//!
//! SECURITY: intended for local tooling and CI only. The key comes from
//! `WALLET_PRIVATE_KEY` (hex); when `WALLET_PASSWORD` is set, it must be
//! supplied to unlock the key. The "current wallet" record lives in memory.

use super::{StoredWallet, VaultGateway};
use crate::config::env_vars;
use crate::export::WalletBundle;
use crate::wallet::{DecryptedKey, WalletDescriptor};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;

pub struct EnvVault {
    wallet: StoredWallet,
    key_hex: SecretString,
    password: Option<SecretString>,
    current: Mutex<Option<WalletDescriptor>>,
}

impl EnvVault {
    /// Load the wallet from the environment.
    ///
    /// The wallet is listed under `name` with `address`.
    pub fn from_env(name: &str, address: &str) -> Result<Self> {
        let key_hex = std::env::var(env_vars::PRIVATE_KEY).map_err(|_| {
            Error::Config(format!(
                "Environment variable {} not set. Required for the environment vault.",
                env_vars::PRIVATE_KEY
            ))
        })?;
        let password = std::env::var(env_vars::PASSWORD).ok().map(SecretString::from);

        Ok(Self::new(name, address, SecretString::from(key_hex), password))
    }

    pub fn new(
        name: &str,
        address: &str,
        key_hex: SecretString,
        password: Option<SecretString>,
    ) -> Self {
        Self {
            wallet: StoredWallet {
                name: name.to_string(),
                address: address.to_string(),
                multisig: false,
            },
            key_hex,
            password,
            current: Mutex::new(None),
        }
    }

    fn opens(&self, password: &SecretString) -> bool {
        match &self.password {
            Some(expected) => expected.expose_secret() == password.expose_secret(),
            None => true,
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if name == self.wallet.name {
            Ok(())
        } else {
            Err(Error::NotFound(name.to_string()))
        }
    }

    fn current(&self) -> Result<std::sync::MutexGuard<'_, Option<WalletDescriptor>>> {
        self.current
            .lock()
            .map_err(|_| Error::Internal("current wallet lock poisoned".to_string()))
    }
}

impl VaultGateway for EnvVault {
    fn decrypt(&self, name: &str, password: &SecretString) -> Result<Option<DecryptedKey>> {
        self.check_name(name)?;
        if !self.opens(password) {
            return Ok(None);
        }
        DecryptedKey::from_hex(self.key_hex.expose_secret()).map(Some)
    }

    fn test_password(&self, name: &str, password: &SecretString) -> Result<bool> {
        self.check_name(name)?;
        Ok(self.opens(password))
    }

    fn encrypt(&self, _key: &DecryptedKey, _password: &SecretString) -> Result<String> {
        Err(Error::UnsupportedOperation(
            "the environment vault cannot export keys".to_string(),
        ))
    }

    fn import(&self, _bundle: &WalletBundle, _password: &SecretString) -> Result<StoredWallet> {
        Err(Error::UnsupportedOperation(
            "the environment vault is read-only".to_string(),
        ))
    }

    fn load(&self, name: &str) -> Result<StoredWallet> {
        self.check_name(name)?;
        Ok(self.wallet.clone())
    }

    fn wallets(&self) -> Result<Vec<StoredWallet>> {
        Ok(vec![self.wallet.clone()])
    }

    fn store_current(&self, wallet: &WalletDescriptor) -> Result<()> {
        *self.current()? = Some(wallet.clone());
        Ok(())
    }

    fn load_current(&self) -> Result<Option<WalletDescriptor>> {
        Ok(self.current()?.clone())
    }

    fn clear_current(&self) -> Result<()> {
        *self.current()? = None;
        Ok(())
    }
}
