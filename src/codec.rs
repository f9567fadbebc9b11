//! Wire format of the memo instruction data.
//!
//! ```text
//! +-----+----------------+---------------------+
//! | tag | len: u32 (LE)  | memo: [u8; len]     |
//! +-----+----------------+---------------------+
//! ```
//!
//! This is the Borsh layout of `{ u8, String }`. Encoding goes through
//! borsh; decoding is written out by hand so failures keep their cause.

use borsh::BorshSerialize;

use crate::{error::CodecError, instruction::InstructionPayload};

/// Tag byte plus the length prefix.
pub const HEADER_LEN: usize = 1 + 4;

pub fn encoded_len(payload: &InstructionPayload) -> usize {
    HEADER_LEN + payload.memo_text.len()
}

/// The memo's byte length as written in the length prefix.
pub fn length_prefix(len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::MemoTooLarge { len })
}

pub fn encode(payload: &InstructionPayload) -> Result<Vec<u8>, CodecError> {
    let len = payload.memo_text.len();
    length_prefix(len)?;

    let mut out = Vec::with_capacity(encoded_len(payload));
    payload
        .serialize(&mut out)
        .map_err(|_| CodecError::MemoTooLarge { len })?;
    Ok(out)
}

/// Decodes a payload. The tag is not validated and bytes past the memo are
/// ignored.
pub fn decode(bytes: &[u8]) -> Result<InstructionPayload, CodecError> {
    let header = bytes
        .get(..HEADER_LEN)
        .ok_or(CodecError::TruncatedBuffer {
            needed: HEADER_LEN,
            available: bytes.len(),
        })?;

    let variant_tag = header[0];
    let len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]) as usize;
    let needed = HEADER_LEN.saturating_add(len);

    let memo = bytes
        .get(HEADER_LEN..needed)
        .ok_or(CodecError::TruncatedBuffer {
            needed,
            available: bytes.len(),
        })?;

    Ok(InstructionPayload {
        variant_tag,
        memo_text: std::str::from_utf8(memo)?.to_owned(),
    })
}
