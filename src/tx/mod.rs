//! Transactions: types, signing documents and the signing pipeline

mod chain_wallet;
pub mod proto;
mod sign_doc;
mod signer;
mod types;

pub use chain_wallet::ChainWallet;
pub use sign_doc::{canonical_json, SignDoc, SigningDocumentBuilder};
pub use signer::{sign_bytes, TransactionSigner, TxState};
pub use types::{
    AccountInfo, AuthInfo, BroadcastResult, Coin, CreateTxOptions, Fee, Msg, SignMode,
    SignerData, SignerInfo, Tx, TxBody, TxSignature,
};
