//! In-memory collaborators for unit tests

use crate::export::WalletBundle;
use crate::gateway::{ChainClient, DeviceGateway, StoredWallet, VaultGateway};
use crate::tx::{
    AccountInfo, AuthInfo, BroadcastResult, Coin, CreateTxOptions, Fee, Msg, SignerData, Tx,
    TxBody,
};
use crate::tx::proto;
use crate::wallet::{DecryptedKey, PublicKey, SoftwareKeyProvider, WalletDescriptor};
use crate::{Error, Result};
use alloy::hex;
use async_trait::async_trait;
use prost::Message;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Test private key (DO NOT use in production!)
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// XOR with SHA-256(password), prefixed by a password tag
fn seal(key: &[u8], password: &str) -> String {
    let pad = Sha256::digest(password.as_bytes());
    let body: Vec<u8> = key.iter().zip(pad.iter().cycle()).map(|(k, p)| k ^ p).collect();
    format!("{}:{}", &hex::encode(pad)[..8], hex::encode(body))
}

fn open(sealed: &str, password: &str) -> Option<Vec<u8>> {
    let pad = Sha256::digest(password.as_bytes());
    let (tag, body) = sealed.split_once(':')?;
    if tag != &hex::encode(pad)[..8] {
        return None;
    }
    let body = hex::decode(body).ok()?;
    Some(body.iter().zip(pad.iter().cycle()).map(|(b, p)| b ^ p).collect())
}

struct Entry {
    wallet: StoredWallet,
    sealed: Option<String>,
}

#[derive(Default)]
pub struct MemoryVault {
    entries: Mutex<Vec<Entry>>,
    current: Mutex<Option<WalletDescriptor>>,
    fail_clear: bool,
    unavailable: bool,
    decrypts: AtomicUsize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(self, name: &str, address: &str, password: &str, key_hex: &str) -> Self {
        let key = DecryptedKey::from_hex(key_hex).unwrap();
        self.entries.lock().unwrap().push(Entry {
            wallet: StoredWallet {
                name: name.to_string(),
                address: address.to_string(),
                multisig: false,
            },
            sealed: Some(seal(key.expose(), password)),
        });
        self
    }

    pub fn with_multisig(self, name: &str, address: &str) -> Self {
        self.entries.lock().unwrap().push(Entry {
            wallet: StoredWallet {
                name: name.to_string(),
                address: address.to_string(),
                multisig: true,
            },
            sealed: None,
        });
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    /// Storage that errors on every key access
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Seed the persisted "current wallet" record without validation
    pub fn with_current(self, wallet: WalletDescriptor) -> Self {
        *self.current.lock().unwrap() = Some(wallet);
        self
    }

    pub fn current(&self) -> Option<WalletDescriptor> {
        self.current.lock().unwrap().clone()
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypts.load(Ordering::SeqCst)
    }

    fn sealed(&self, name: &str) -> Result<Option<String>> {
        if self.unavailable {
            return Err(Error::Gateway("storage unavailable".to_string()));
        }
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|e| e.wallet.name == name)
            .map(|e| e.sealed.clone())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}

impl VaultGateway for MemoryVault {
    fn decrypt(&self, name: &str, password: &SecretString) -> Result<Option<DecryptedKey>> {
        self.decrypts.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sealed(name)?
            .and_then(|sealed| open(&sealed, password.expose_secret()))
            .map(DecryptedKey::new))
    }

    fn test_password(&self, name: &str, password: &SecretString) -> Result<bool> {
        Ok(self
            .sealed(name)?
            .is_some_and(|sealed| open(&sealed, password.expose_secret()).is_some()))
    }

    fn encrypt(&self, key: &DecryptedKey, password: &SecretString) -> Result<String> {
        Ok(seal(key.expose(), password.expose_secret()))
    }

    fn import(&self, bundle: &WalletBundle, password: &SecretString) -> Result<StoredWallet> {
        if open(&bundle.encrypted_key, password.expose_secret()).is_none() {
            return Err(Error::IncorrectPassword);
        }
        let wallet = StoredWallet {
            name: bundle.name.clone(),
            address: bundle.address.clone(),
            multisig: false,
        };
        self.entries.lock().unwrap().push(Entry {
            wallet: wallet.clone(),
            sealed: Some(bundle.encrypted_key.clone()),
        });
        Ok(wallet)
    }

    fn load(&self, name: &str) -> Result<StoredWallet> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|e| e.wallet.name == name)
            .map(|e| e.wallet.clone())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn wallets(&self) -> Result<Vec<StoredWallet>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.wallet.clone())
            .collect())
    }

    fn store_current(&self, wallet: &WalletDescriptor) -> Result<()> {
        // persist through JSON so every field must survive serialization
        let json = serde_json::to_string(wallet)?;
        *self.current.lock().unwrap() = Some(serde_json::from_str(&json)?);
        Ok(())
    }

    fn load_current(&self) -> Result<Option<WalletDescriptor>> {
        Ok(self.current())
    }

    fn clear_current(&self) -> Result<()> {
        if self.fail_clear {
            return Err(Error::Gateway("storage unavailable".to_string()));
        }
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

pub struct MockChain {
    account_number: u64,
    sequence: AtomicU64,
    lookups: AtomicUsize,
    broadcasts: AtomicUsize,
    created_for: Mutex<Vec<String>>,
    last_options: Mutex<Option<CreateTxOptions>>,
    last_broadcast: Mutex<Option<Tx>>,
    rejection: Mutex<Option<(u32, String)>>,
}

impl MockChain {
    pub fn new(account_number: u64, sequence: u64) -> Self {
        Self {
            account_number,
            sequence: AtomicU64::new(sequence),
            lookups: AtomicUsize::new(0),
            broadcasts: AtomicUsize::new(0),
            created_for: Mutex::new(Vec::new()),
            last_options: Mutex::new(None),
            last_broadcast: Mutex::new(None),
            rejection: Mutex::new(None),
        }
    }

    pub fn set_sequence(&self, sequence: u64) {
        self.sequence.store(sequence, Ordering::SeqCst);
    }

    pub fn reject_with(&self, code: u32, raw_log: &str) {
        *self.rejection.lock().unwrap() = Some((code, raw_log.to_string()));
    }

    pub fn account_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    pub fn created_for(&self) -> Vec<String> {
        self.created_for.lock().unwrap().clone()
    }

    pub fn last_options(&self) -> Option<CreateTxOptions> {
        self.last_options.lock().unwrap().clone()
    }

    pub fn last_broadcast(&self) -> Option<Tx> {
        self.last_broadcast.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn account_info(&self, _address: &str) -> Result<AccountInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(AccountInfo {
            account_number: self.account_number,
            sequence: self.sequence.load(Ordering::SeqCst),
        })
    }

    async fn create_unsigned_tx(
        &self,
        signers: &[SignerData],
        options: &CreateTxOptions,
    ) -> Result<Tx> {
        self.created_for
            .lock()
            .unwrap()
            .extend(signers.iter().map(|s| s.address.clone()));
        *self.last_options.lock().unwrap() = Some(options.clone());

        Ok(Tx {
            body: TxBody {
                messages: options.msgs.clone(),
                memo: options.memo.clone().unwrap_or_default(),
                timeout_height: options.timeout_height.unwrap_or(0),
            },
            auth_info: AuthInfo {
                signer_infos: Vec::new(),
                fee: options.fee.clone().unwrap_or_else(sample_fee),
            },
            signatures: Vec::new(),
        })
    }

    async fn broadcast_sync(&self, tx: &Tx) -> Result<BroadcastResult> {
        // a real node only accepts the protobuf form
        tx.to_raw_bytes()?;
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        *self.last_broadcast.lock().unwrap() = Some(tx.clone());
        if let Some((code, raw_log)) = self.rejection.lock().unwrap().clone() {
            return Ok(BroadcastResult {
                tx_hash: "REJECTED".to_string(),
                height: 0,
                code,
                codespace: Some("sdk".to_string()),
                raw_log,
            });
        }
        self.sequence.fetch_add(1, Ordering::SeqCst);
        Ok(BroadcastResult {
            tx_hash: "ABCDEF".to_string(),
            height: 100,
            code: 0,
            codespace: None,
            raw_log: "[]".to_string(),
        })
    }
}

/// Device that signs with a software key, or has no key at all
pub struct MockDevice {
    key: Option<SoftwareKeyProvider>,
    signed: Mutex<Vec<Vec<u8>>>,
}

impl MockDevice {
    pub fn with_key(key_hex: &str) -> Self {
        let key = SoftwareKeyProvider::from_key(&DecryptedKey::from_hex(key_hex).unwrap()).unwrap();
        Self {
            key: Some(key),
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            key: None,
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_payloads(&self) -> Vec<Vec<u8>> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceGateway for MockDevice {
    async fn public_key(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.key.as_ref().map(|k| k.public_key().as_bytes().to_vec()))
    }

    async fn sign_amino(&self, sign_bytes: &[u8]) -> Result<Vec<u8>> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::Device("no device".to_string()))?;
        self.signed.lock().unwrap().push(sign_bytes.to_vec());
        Ok(key.sign(sign_bytes)?.bytes)
    }
}

pub fn test_public_key() -> PublicKey {
    SoftwareKeyProvider::from_key(&DecryptedKey::from_hex(TEST_KEY).unwrap())
        .unwrap()
        .public_key()
        .clone()
}

/// `cosmos.bank.v1beta1.MsgSend`
#[derive(Clone, PartialEq, Message)]
struct MsgSend {
    #[prost(string, tag = "1")]
    from_address: String,
    #[prost(string, tag = "2")]
    to_address: String,
    #[prost(message, repeated, tag = "3")]
    amount: Vec<proto::Coin>,
}

pub fn sample_fee() -> Fee {
    Fee {
        amount: vec![Coin::new("uluna", 1000)],
        gas_limit: 200_000,
        payer: None,
        granter: None,
    }
}

pub fn sample_options() -> CreateTxOptions {
    CreateTxOptions {
        msgs: vec![Msg {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            amino_type: Some("bank/MsgSend".to_string()),
            value: json!({
                "from_address": "addr1",
                "to_address": "addr3",
                "amount": [{ "denom": "uluna", "amount": "1000" }]
            }),
            proto_value: Some(
                MsgSend {
                    from_address: "addr1".to_string(),
                    to_address: "addr3".to_string(),
                    amount: vec![proto::Coin {
                        denom: "uluna".to_string(),
                        amount: "1000".to_string(),
                    }],
                }
                .encode_to_vec(),
            ),
        }],
        memo: None,
        fee: Some(sample_fee()),
        gas_adjustment: None,
        timeout_height: None,
    }
}

pub fn sample_tx() -> Tx {
    let options = sample_options();
    Tx {
        body: TxBody {
            messages: options.msgs,
            memo: String::new(),
            timeout_height: 0,
        },
        auth_info: AuthInfo {
            signer_infos: Vec::new(),
            fee: sample_fee(),
        },
        signatures: Vec::new(),
    }
}
