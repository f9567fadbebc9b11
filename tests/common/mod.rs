use async_trait::async_trait;
use extended_memo_client::{
    LedgerClient, LedgerError, MemoInstruction, MemoProgramError, MAX_MEMO_LEN,
};
use light_hasher::{DataHasher, Poseidon};
use light_sdk_macros::LightHasher;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};
use solana_program_test::{BanksClient, BanksClientError, ProgramTest};
use solana_sdk::{
    account::Account, hash::Hash, signature::Keypair, signature::Signature,
    transaction::Transaction,
};

pub const PROGRAM_NAME: &str = "extended_memo";

pub fn program_error(e: MemoProgramError) -> ProgramError {
    ProgramError::Custom(e as u32)
}

#[derive(LightHasher)]
pub struct CompressedMemo {
    #[truncate]
    pub memo: String,
}

impl CompressedMemo {
    pub fn hash_memo(memo: &str) -> Result<[u8; 32], ProgramError> {
        CompressedMemo {
            memo: memo.to_string(),
        }
        .hash::<Poseidon>()
        .map_err(|_| program_error(MemoProgramError::HashingError))
    }
}

/// Stand-in for the deployed memo program: stores the memo's Poseidon hash
/// in a new 32 byte account.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match unpack(instruction_data)? {
        MemoInstruction::CreateCompressedMemo { memo } => {
            let hashed = CompressedMemo::hash_memo(&memo)?;
            store(program_id, accounts, &hashed)
        }
    }
}

/// Same program, but it allocates a 64 byte account.
pub fn process_instruction_padded(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match unpack(instruction_data)? {
        MemoInstruction::CreateCompressedMemo { memo } => {
            let mut padded = CompressedMemo::hash_memo(&memo)?.to_vec();
            padded.resize(64, 0);
            store(program_id, accounts, &padded)
        }
    }
}

/// Accepts the instruction and never creates the account.
pub fn process_instruction_without_account(
    _program_id: &Pubkey,
    _accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    unpack(instruction_data)?;
    msg!("Memo accepted, no account created");
    Ok(())
}

fn unpack(instruction_data: &[u8]) -> Result<MemoInstruction, ProgramError> {
    let instruction = MemoInstruction::unpack(instruction_data)
        .map_err(|_| program_error(MemoProgramError::InvalidInstruction))?;
    let MemoInstruction::CreateCompressedMemo { memo } = &instruction;
    if memo.len() > MAX_MEMO_LEN {
        return Err(program_error(MemoProgramError::MemoTooLong));
    }
    Ok(instruction)
}

fn store(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer_info = next_account_info(account_info_iter)?;
    let new_account_info = next_account_info(account_info_iter)?;

    if !payer_info.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    if new_account_info.data_is_empty() {
        let rent = Rent::get()?;
        let create_ix = system_instruction::create_account(
            payer_info.key,
            new_account_info.key,
            rent.minimum_balance(data.len()),
            data.len() as u64,
            program_id,
        );
        invoke(&create_ix, &[payer_info.clone(), new_account_info.clone()])?;
    }

    new_account_info
        .try_borrow_mut_data()?
        .get_mut(..data.len())
        .ok_or(program_error(MemoProgramError::AccountDataTooSmall))?
        .copy_from_slice(data);

    msg!("Compressed memo created and stored!");
    Ok(())
}

/// [`LedgerClient`] over the in-process banks client.
pub struct BanksLedger {
    pub client: BanksClient,
}

fn banks_error(err: BanksClientError) -> LedgerError {
    match err {
        BanksClientError::TransactionError(err) => LedgerError::Transaction(err),
        BanksClientError::SimulationError { err, .. } => LedgerError::Transaction(err),
        other => LedgerError::Custom(other.to_string()),
    }
}

#[async_trait]
impl LedgerClient for BanksLedger {
    async fn latest_blockhash(&mut self) -> Result<Hash, LedgerError> {
        self.client.get_latest_blockhash().await.map_err(banks_error)
    }

    async fn send_and_confirm(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, LedgerError> {
        let signature = transaction.signatures[0];
        let result = self
            .client
            .process_transaction_with_metadata(transaction)
            .await
            .map_err(banks_error)?;
        result.result.map_err(LedgerError::Transaction)?;
        Ok(signature)
    }

    async fn get_account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        self.client.get_account(*address).await.map_err(banks_error)
    }
}

/// Starts the program test and returns a ledger plus the funded payer.
pub async fn start(test: ProgramTest) -> (BanksLedger, Keypair) {
    let (client, payer, _recent_blockhash) = test.start().await;
    (BanksLedger { client }, payer)
}
