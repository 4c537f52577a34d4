//! Connected wallet identity

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How a wallet signs. Closed set: every branching operation matches all variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletVariant {
    /// Password-protected key held by the vault
    Local,
    /// Recognized but signed cooperatively outside this crate
    Multisig,
    /// Hardware signing device
    Ledger,
}

impl WalletVariant {
    pub fn name(&self) -> &'static str {
        match self {
            WalletVariant::Local => "local",
            WalletVariant::Multisig => "multisig",
            WalletVariant::Ledger => "ledger",
        }
    }
}

/// The wallet a session is connected to.
///
/// `address` is always present; `name` is required unless the variant is
/// [`WalletVariant::Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: String,
    pub variant: WalletVariant,
}

impl WalletDescriptor {
    pub fn local(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
            variant: WalletVariant::Local,
        }
    }

    pub fn multisig(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
            variant: WalletVariant::Multisig,
        }
    }

    pub fn ledger(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
            variant: WalletVariant::Ledger,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "wallet address must not be empty".to_string(),
            ));
        }
        match self.variant {
            WalletVariant::Ledger => Ok(()),
            WalletVariant::Local | WalletVariant::Multisig => match self.name.as_deref() {
                Some(name) if !name.trim().is_empty() => Ok(()),
                _ => Err(Error::InvalidArgument(format!(
                    "{} wallet {} has no name",
                    self.variant.name(),
                    self.address
                ))),
            },
        }
    }

    /// Vault name of a named wallet. Ledger descriptors have none.
    pub fn require_name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(|| {
            Error::InvalidArgument(format!("{} wallet has no vault name", self.variant.name()))
        })
    }
}
