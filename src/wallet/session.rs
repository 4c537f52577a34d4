//! The single connected-wallet session
//!
//! Lifecycle: [`WalletSession::load`] restores the persisted "current wallet"
//! record, `connect`/`connect_ledger`/`disconnect` are the only mutations,
//! and the session is dropped at process exit. Every mutation is published
//! to [`WalletSession::subscribe`] receivers so UI layers never touch storage.

use super::descriptor::WalletDescriptor;
use crate::gateway::{StoredWallet, VaultGateway};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// Published on every session change
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub wallet: Option<WalletDescriptor>,
    pub at: DateTime<Utc>,
}

pub struct WalletSession {
    vault: Arc<dyn VaultGateway>,
    current: Option<WalletDescriptor>,
    events: watch::Sender<SessionEvent>,
}

impl WalletSession {
    /// Restore the session from the vault's "current wallet" record.
    ///
    /// A missing, unreadable or invalid record yields a disconnected session.
    pub fn load(vault: Arc<dyn VaultGateway>) -> Self {
        let current = match vault.load_current() {
            Ok(Some(descriptor)) => match descriptor.validate() {
                Ok(()) => Some(descriptor),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid persisted wallet record");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted wallet record");
                None
            }
        };

        if let Some(wallet) = &current {
            tracing::info!(
                address = %wallet.address,
                variant = wallet.variant.name(),
                "Restored wallet session"
            );
        }

        let (events, _) = watch::channel(SessionEvent {
            wallet: current.clone(),
            at: Utc::now(),
        });

        Self {
            vault,
            current,
            events,
        }
    }

    /// Connect to a stored wallet by name.
    ///
    /// Fails with [`Error::NotFound`] when the vault has no such wallet.
    pub fn connect(&mut self, name: &str) -> Result<WalletDescriptor> {
        let stored = self.vault.load(name)?;

        let descriptor = if stored.multisig {
            WalletDescriptor::multisig(stored.name, stored.address)
        } else {
            WalletDescriptor::local(stored.name, stored.address)
        };
        descriptor.validate()?;

        self.vault.store_current(&descriptor)?;
        tracing::info!(
            wallet = %name,
            address = %descriptor.address,
            variant = descriptor.variant.name(),
            "Wallet connected"
        );
        self.set(Some(descriptor.clone()));
        Ok(descriptor)
    }

    /// Connect to a hardware wallet by address. No name is recorded.
    pub fn connect_ledger(&mut self, address: &str) -> Result<WalletDescriptor> {
        let descriptor = WalletDescriptor::ledger(address);
        descriptor.validate()?;

        self.vault.store_current(&descriptor)?;
        tracing::info!(address = %address, "Ledger connected");
        self.set(Some(descriptor.clone()));
        Ok(descriptor)
    }

    /// Clear the persisted record and the in-memory session.
    ///
    /// The in-memory session is cleared even when the vault fails; that
    /// failure is still returned.
    pub fn disconnect(&mut self) -> Result<()> {
        let cleared = self.vault.clear_current();
        self.set(None);
        tracing::info!("Wallet disconnected");

        if let Err(e) = &cleared {
            tracing::warn!(error = %e, "Failed to clear persisted wallet record");
        }
        cleared
    }

    /// The connected wallet, or [`Error::Session`]
    pub fn connected_wallet(&self) -> Result<&WalletDescriptor> {
        self.current.as_ref().ok_or(Error::Session)
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_some()
    }

    /// Stored wallets known to the vault
    pub fn wallets(&self) -> Result<Vec<StoredWallet>> {
        self.vault.wallets()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn set(&mut self, wallet: Option<WalletDescriptor>) {
        self.events.send_replace(SessionEvent {
            wallet: wallet.clone(),
            at: Utc::now(),
        });
        self.current = wallet;
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("current", &self.current)
            .finish()
    }
}
