use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use extended_memo_client::{
    ledger::rpc::LOCALNET_URL, RpcLedger, RpcLedgerConfig, SizeCheck, Verifier, VerifierConfig,
    COMPRESSED_MEMO_ACCOUNT_LEN,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Submit a CreateCompressedMemo instruction and verify the created account.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Address of the deployed memo program.
    #[arg(long, env = "MEMO_PROGRAM_ID")]
    program_id: Pubkey,

    #[arg(long, env = "MEMO_RPC_URL", default_value = LOCALNET_URL)]
    rpc_url: String,

    #[arg(long, default_value = "Hello from TypeScript test!")]
    memo: String,

    /// Lamports airdropped to the freshly generated payer.
    #[arg(long, env = "MEMO_AIRDROP_LAMPORTS", default_value = "1000000000")]
    airdrop_lamports: u64,

    #[arg(long, default_value_t = COMPRESSED_MEMO_ACCOUNT_LEN)]
    expected_len: usize,

    #[arg(long)]
    no_round_trip: bool,

    #[arg(long, default_value = "500")]
    poll_interval_ms: u64,

    #[arg(long, default_value = "120")]
    max_polls: u32,
}

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let ledger = RpcLedger::new(RpcLedgerConfig {
        url: cli.rpc_url.clone(),
        commitment: CommitmentConfig::confirmed(),
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        max_polls: cli.max_polls,
    });
    info!(program_id = %cli.program_id, url = %cli.rpc_url, "using program");

    let payer = Keypair::new();
    ledger
        .airdrop(&payer.pubkey(), cli.airdrop_lamports)
        .await
        .context("failed to fund payer")?;

    let mut verifier = Verifier::new(
        ledger,
        VerifierConfig {
            expected_account_len: cli.expected_len,
            round_trip_check: !cli.no_round_trip,
        },
    );
    let report = verifier
        .verify_memo(&cli.program_id, &payer, &cli.memo)
        .await
        .context("verification failed")?;

    println!("Transaction Signature: {}", report.signature);
    println!("Account: {}", report.account);
    println!("Account data length: {}", report.data.len());
    println!("Account data: {:?}", report.data);

    match report.size {
        SizeCheck::Matched => println!(
            "Success: the account data is {} bytes as expected!",
            cli.expected_len
        ),
        SizeCheck::Mismatch { actual, .. } => {
            warn!(actual, "verification finished with an unexpected account size")
        }
    }
    Ok(())
}
