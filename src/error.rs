use std::str::Utf8Error;

use solana_client::client_error::ClientError;
use solana_program::{instruction::InstructionError, pubkey::Pubkey};
use solana_sdk::{signature::Signature, transaction::TransactionError};
use thiserror::Error;

use crate::instruction::VariantTag;

/// Failures of the instruction wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Truncated buffer: needed {needed} bytes, got {available}")]
    TruncatedBuffer { needed: usize, available: usize },
    #[error("Memo is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    #[error("Memo of {len} bytes does not fit a u32 length prefix")]
    MemoTooLarge { len: usize },
    #[error("Unknown variant tag {0}")]
    UnknownVariant(u8),
    #[error("Variant {0:?} has no client-side layout")]
    UnsupportedVariant(VariantTag),
}

/// Custom error codes raised by the extended memo program.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoProgramError {
    #[error("Invalid Instruction")]
    InvalidInstruction,
    #[error("Memo too long")]
    MemoTooLong,
    #[error("Account data too small")]
    AccountDataTooSmall,
    #[error("Hashing error")]
    HashingError,
}

impl TryFrom<u32> for MemoProgramError {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MemoProgramError::InvalidInstruction),
            1 => Ok(MemoProgramError::MemoTooLong),
            2 => Ok(MemoProgramError::AccountDataTooSmall),
            3 => Ok(MemoProgramError::HashingError),
            other => Err(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ClientError: {0}")]
    Client(#[from] Box<ClientError>),

    #[error("TransactionError: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Transaction {signature} not confirmed after {polls} polls")]
    ConfirmationTimeout { signature: Signature, polls: u32 },

    #[error("Error: `{0}`")]
    Custom(String),
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        // Preflight failures carry the program's own error; keep it typed.
        match err.get_transaction_error() {
            Some(tx_err) => LedgerError::Transaction(tx_err),
            None => LedgerError::Client(Box::new(err)),
        }
    }
}

impl LedgerError {
    /// The `InstructionError::Custom` code, if the failure came from a program.
    pub fn custom_program_error(&self) -> Option<u32> {
        match self {
            LedgerError::Transaction(TransactionError::InstructionError(
                _,
                InstructionError::Custom(code),
            )) => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Submission rejected: {source}")]
    SubmissionRejected {
        #[source]
        source: LedgerError,
        program_error: Option<MemoProgramError>,
    },

    #[error("Account {0} not found after confirmation")]
    AccountNotFound(Pubkey),

    #[error("Read-back failed: {0}")]
    ReadBack(#[source] LedgerError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl VerifierError {
    pub(crate) fn rejected(source: LedgerError) -> Self {
        let program_error = source
            .custom_program_error()
            .and_then(|code| MemoProgramError::try_from(code).ok());
        VerifierError::SubmissionRejected {
            source,
            program_error,
        }
    }
}
