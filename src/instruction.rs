use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::{codec, error::CodecError};

/// Longest memo, in bytes, the program accepts.
pub const MAX_MEMO_LEN: usize = 128;

/// Discriminants understood by the extended memo program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VariantTag {
    /// Original SPL Memo functionality. Logs the memo, no account data changes.
    OriginalMemo = 0,
    /// Create a new account and store the compressed memo in it.
    CreateCompressedMemo = 1,
}

impl TryFrom<u8> for VariantTag {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(VariantTag::OriginalMemo),
            1 => Ok(VariantTag::CreateCompressedMemo),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

impl From<VariantTag> for u8 {
    fn from(tag: VariantTag) -> Self {
        tag as u8
    }
}

/// The raw instruction payload: a discriminant byte and a memo string.
///
/// Any tag is representable here; [`MemoInstruction::unpack`] is where tags
/// are validated.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload {
    pub variant_tag: u8,
    pub memo_text: String,
}

impl InstructionPayload {
    pub fn new(variant_tag: impl Into<u8>, memo_text: impl Into<String>) -> Self {
        Self {
            variant_tag: variant_tag.into(),
            memo_text: memo_text.into(),
        }
    }

    pub fn create_compressed_memo(memo_text: impl Into<String>) -> Self {
        Self::new(VariantTag::CreateCompressedMemo, memo_text)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        codec::decode(bytes)
    }
}

/// Instructions this client knows how to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoInstruction {
    /// Create a compressed account and store the memo in it.
    ///   0. `[signer, writable]` Payer for account creation
    ///   1. `[signer, writable]` The newly created account
    ///   2. `[]` System program
    CreateCompressedMemo { memo: String },
}

impl MemoInstruction {
    pub fn variant_tag(&self) -> VariantTag {
        match self {
            MemoInstruction::CreateCompressedMemo { .. } => VariantTag::CreateCompressedMemo,
        }
    }

    pub fn pack(&self) -> Result<Vec<u8>, CodecError> {
        InstructionPayload::from(self.clone()).encode()
    }

    pub fn unpack(data: &[u8]) -> Result<Self, CodecError> {
        Self::try_from(codec::decode(data)?)
    }
}

impl From<MemoInstruction> for InstructionPayload {
    fn from(instruction: MemoInstruction) -> Self {
        let tag = instruction.variant_tag();
        match instruction {
            MemoInstruction::CreateCompressedMemo { memo } => InstructionPayload::new(tag, memo),
        }
    }
}

impl TryFrom<InstructionPayload> for MemoInstruction {
    type Error = CodecError;

    fn try_from(payload: InstructionPayload) -> Result<Self, Self::Error> {
        match VariantTag::try_from(payload.variant_tag)? {
            VariantTag::CreateCompressedMemo => Ok(MemoInstruction::CreateCompressedMemo {
                memo: payload.memo_text,
            }),
            VariantTag::OriginalMemo => {
                Err(CodecError::UnsupportedVariant(VariantTag::OriginalMemo))
            }
        }
    }
}

/// Builds an instruction carrying `payload` for the memo program.
///
/// Account order is part of the program's interface and must not change.
pub fn memo_instruction(
    program_id: &Pubkey,
    payer: &Pubkey,
    new_account: &Pubkey,
    payload: &InstructionPayload,
) -> Result<Instruction, CodecError> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &payload.encode()?,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*new_account, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    ))
}

pub fn create_compressed_memo(
    program_id: &Pubkey,
    payer: &Pubkey,
    new_account: &Pubkey,
    memo: &str,
) -> Result<Instruction, CodecError> {
    memo_instruction(
        program_id,
        payer,
        new_account,
        &InstructionPayload::create_compressed_memo(memo),
    )
}
