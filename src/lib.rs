//! Client for the extended SPL memo program.
//!
//! [`codec`] defines the instruction wire format, [`instruction`] the typed
//! instructions built on it, and [`verifier`] submits a
//! `CreateCompressedMemo` through a [`ledger::LedgerClient`] and checks the
//! account the program creates.

pub mod codec;
pub mod error;
pub mod instruction;
pub mod ledger;
pub mod verifier;

pub use error::{CodecError, LedgerError, MemoProgramError, VerifierError};
pub use instruction::{InstructionPayload, MemoInstruction, VariantTag, MAX_MEMO_LEN};
pub use ledger::{LedgerClient, RpcLedger, RpcLedgerConfig};
pub use verifier::{
    RoundTripCheck, SizeCheck, VerificationReport, Verifier, VerifierConfig,
    COMPRESSED_MEMO_ACCOUNT_LEN,
};
