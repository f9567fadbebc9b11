//! Submit, confirm, read back and verify one `CreateCompressedMemo`.
//!
//! Every phase gates the next and none retries. A wrong account size is
//! reported and logged, not returned as an error.

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{
    codec,
    error::{CodecError, VerifierError},
    instruction::{memo_instruction, InstructionPayload},
    ledger::LedgerClient,
};

/// Size of the account the program creates: one Poseidon hash.
pub const COMPRESSED_MEMO_ACCOUNT_LEN: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierConfig {
    pub expected_account_len: usize,
    /// Decode the sent instruction data and compare it with the payload.
    pub round_trip_check: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            expected_account_len: COMPRESSED_MEMO_ACCOUNT_LEN,
            round_trip_check: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeCheck {
    Matched,
    Mismatch { expected: usize, actual: usize },
}

impl SizeCheck {
    pub fn evaluate(expected: usize, actual: usize) -> Self {
        if expected == actual {
            SizeCheck::Matched
        } else {
            SizeCheck::Mismatch { expected, actual }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundTripCheck {
    Matched,
    Mismatch { decoded: InstructionPayload },
}

impl RoundTripCheck {
    pub fn evaluate(original: &InstructionPayload, sent: &[u8]) -> Result<Self, CodecError> {
        let decoded = codec::decode(sent)?;
        if &decoded == original {
            Ok(RoundTripCheck::Matched)
        } else {
            Ok(RoundTripCheck::Mismatch { decoded })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    pub signature: Signature,
    pub account: Pubkey,
    pub owner: Pubkey,
    pub data: Vec<u8>,
    pub size: SizeCheck,
    /// `None` when round-trip checking is disabled.
    pub round_trip: Option<RoundTripCheck>,
}

impl VerificationReport {
    /// True when no check reported a mismatch.
    pub fn is_clean(&self) -> bool {
        self.size == SizeCheck::Matched
            && !matches!(self.round_trip, Some(RoundTripCheck::Mismatch { .. }))
    }
}

#[derive(Debug)]
pub struct Verifier<L> {
    ledger: L,
    config: VerifierConfig,
}

impl<L: LedgerClient> Verifier<L> {
    pub fn new(ledger: L, config: VerifierConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    pub async fn verify_memo(
        &mut self,
        program_id: &Pubkey,
        payer: &Keypair,
        memo: &str,
    ) -> Result<VerificationReport, VerifierError> {
        self.verify(
            program_id,
            payer,
            &InstructionPayload::create_compressed_memo(memo),
        )
        .await
    }

    /// Runs one verification against a freshly generated account.
    pub async fn verify(
        &mut self,
        program_id: &Pubkey,
        payer: &Keypair,
        payload: &InstructionPayload,
    ) -> Result<VerificationReport, VerifierError> {
        let new_account = Keypair::new();
        let span = info_span!(
            "verify",
            program = %program_id,
            account = %new_account.pubkey(),
            tag = payload.variant_tag,
        );
        self.run(program_id, payer, &new_account, payload)
            .instrument(span)
            .await
    }

    async fn run(
        &mut self,
        program_id: &Pubkey,
        payer: &Keypair,
        new_account: &Keypair,
        payload: &InstructionPayload,
    ) -> Result<VerificationReport, VerifierError> {
        let address = new_account.pubkey();

        // Submit
        let instruction = memo_instruction(program_id, &payer.pubkey(), &address, payload)?;
        let sent = instruction.data.clone();
        let blockhash = self
            .ledger
            .latest_blockhash()
            .await
            .map_err(VerifierError::rejected)?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            &[payer, new_account],
            blockhash,
        );
        debug!(bytes = sent.len(), "submitting");

        // Confirm
        let signature = self
            .ledger
            .send_and_confirm(transaction)
            .await
            .map_err(|err| {
                let err = VerifierError::rejected(err);
                warn!(%err, "submission rejected");
                err
            })?;
        info!(%signature, "transaction confirmed");

        // Read back
        let account = self
            .ledger
            .get_account(&address)
            .await
            .map_err(VerifierError::ReadBack)?
            .ok_or(VerifierError::AccountNotFound(address))?;
        debug!(owner = %account.owner, len = account.data.len(), "account read back");

        // Verify
        let size = SizeCheck::evaluate(self.config.expected_account_len, account.data.len());
        match size {
            SizeCheck::Matched => info!(len = account.data.len(), "account size as expected"),
            SizeCheck::Mismatch { expected, actual } => {
                warn!(expected, actual, "unexpected account data length")
            }
        }

        let round_trip = if self.config.round_trip_check {
            let check = RoundTripCheck::evaluate(payload, &sent)?;
            match &check {
                RoundTripCheck::Matched => info!("decoded instruction matches payload"),
                RoundTripCheck::Mismatch { decoded } => {
                    warn!(?decoded, "decoded instruction differs from payload")
                }
            }
            Some(check)
        } else {
            None
        };

        Ok(VerificationReport {
            signature,
            account: address,
            owner: account.owner,
            data: account.data,
            size,
            round_trip,
        })
    }
}
