use async_trait::async_trait;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};

use crate::error::LedgerError;

pub mod rpc;

pub use rpc::{RpcLedger, RpcLedgerConfig};

/// The ledger connection the verifier talks to.
///
/// Each method is one round trip. Implementations own their commitment level
/// and any polling; callers never retry.
#[async_trait]
pub trait LedgerClient: Send {
    async fn latest_blockhash(&mut self) -> Result<Hash, LedgerError>;

    /// Submits a signed transaction and returns once it reaches the
    /// client's commitment level.
    async fn send_and_confirm(&mut self, transaction: Transaction)
        -> Result<Signature, LedgerError>;

    async fn get_account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;
}
