use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use tokio::time::sleep;
use tracing::{debug, info};

use super::LedgerClient;
use crate::error::LedgerError;

pub const LOCALNET_URL: &str = "http://127.0.0.1:8899";

#[derive(Clone, Debug)]
pub struct RpcLedgerConfig {
    pub url: String,
    pub commitment: CommitmentConfig,
    pub poll_interval: Duration,
    /// Signature status polls before confirmation is abandoned.
    pub max_polls: u32,
}

impl Default for RpcLedgerConfig {
    fn default() -> Self {
        RpcLedgerConfig {
            url: LOCALNET_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            poll_interval: Duration::from_millis(500),
            max_polls: 120,
        }
    }
}

pub struct RpcLedger {
    client: RpcClient,
    config: RpcLedgerConfig,
}

impl Debug for RpcLedger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RpcLedger {{ url: {:?} }}", self.client.url())
    }
}

impl RpcLedger {
    pub fn new(config: RpcLedgerConfig) -> Self {
        let client = RpcClient::new_with_commitment(config.url.clone(), config.commitment);
        Self::new_with_client(client, config)
    }

    /// Wraps an existing client; `config.url` is informational only.
    pub fn new_with_client(client: RpcClient, config: RpcLedgerConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Funds `to` and waits until the airdrop is confirmed.
    pub async fn airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        let signature = self.client.request_airdrop(to, lamports).await?;
        self.wait_for_confirmation(&signature).await?;
        info!(%to, lamports, %signature, "airdrop confirmed");
        Ok(signature)
    }

    async fn wait_for_confirmation(&self, signature: &Signature) -> Result<(), LedgerError> {
        for poll in 1..=self.config.max_polls {
            match self
                .client
                .get_signature_status_with_commitment(signature, self.config.commitment)
                .await?
            {
                Some(Ok(())) => {
                    debug!(%signature, poll, "signature confirmed");
                    return Ok(());
                }
                Some(Err(err)) => return Err(LedgerError::Transaction(err)),
                None => sleep(self.config.poll_interval).await,
            }
        }
        Err(LedgerError::ConfirmationTimeout {
            signature: *signature,
            polls: self.config.max_polls,
        })
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn latest_blockhash(&mut self) -> Result<Hash, LedgerError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, LedgerError> {
        let signature = self.client.send_transaction(&transaction).await?;
        debug!(%signature, "transaction sent");
        self.wait_for_confirmation(&signature).await?;
        Ok(signature)
    }

    async fn get_account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        Ok(self
            .client
            .get_account_with_commitment(address, self.config.commitment)
            .await?
            .value)
    }
}
