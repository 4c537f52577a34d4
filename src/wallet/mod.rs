//! Wallet identity, session and key providers
//!
//! Decrypted private keys exist only inside [`SoftwareKeyProvider`] and only
//! for the duration of the operation that unlocked them.

mod descriptor;
mod hardware;
mod keys;
mod provider;
mod session;
mod signer;

pub use descriptor::{WalletDescriptor, WalletVariant};
pub use hardware::{HardwareKeyProvider, HARDWARE_SIGN_MODE};
pub use keys::{PublicKey, SECP256K1_PUBKEY_AMINO_TYPE, SECP256K1_PUBKEY_TYPE_URL};
pub use provider::{KeyProvider, Signature, SignedBytes};
pub use session::{SessionEvent, WalletSession};
pub use signer::{DecryptedKey, SoftwareKeyProvider};
