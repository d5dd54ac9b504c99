use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solana_message::{MessageHeader, VersionedMessage};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::parser::decoders::{InstructionView, ResolvedAccount, decoder_for};
use crate::programs::Program;
use crate::types::ParsedTransaction;

/// Decodes a base64, bincode-encoded `VersionedTransaction` and extracts every
/// Raydium action in it.
///
/// Only envelope failures are errors. Instructions for unknown programs,
/// unknown opcodes, and instructions whose accounts or arguments cannot be
/// decoded are skipped.
pub fn parse_transaction(encoded: &str, slot: u64) -> Result<ParsedTransaction, Error> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(Error::EmptyInput);
    }

    let bytes = STANDARD.decode(encoded).map_err(|e| Error::Decode {
        reason: format!("invalid base64: {e}"),
    })?;
    let transaction: VersionedTransaction =
        bincode::deserialize(&bytes).map_err(|e| Error::Decode {
            reason: format!("invalid transaction encoding: {e}"),
        })?;

    let signature = transaction
        .signatures
        .first()
        .copied()
        .unwrap_or_default();
    parse_message(signature, &transaction.message, slot)
}

/// Extracts Raydium actions from an already decoded message.
pub fn parse_message(
    signature: Signature,
    message: &VersionedMessage,
    slot: u64,
) -> Result<ParsedTransaction, Error> {
    let keys = message.static_account_keys();
    let header = message.header();
    let mut tx = ParsedTransaction::new(signature, slot);

    for (index, ix) in message.instructions().iter().enumerate() {
        let program_id = keys
            .get(usize::from(ix.program_id_index))
            .ok_or_else(|| Error::Decode {
                reason: format!(
                    "instruction {index} program index {} outside {} account keys",
                    ix.program_id_index,
                    keys.len()
                ),
            })?;

        let Some(program) = Program::from_program_id(program_id) else {
            trace!(instruction_index = index, %program_id, "skipping unknown program");
            continue;
        };
        let Some(decoder) = decoder_for(program) else {
            trace!(instruction_index = index, %program, "no decoder for program");
            continue;
        };
        let Some((&opcode, args)) = ix.data.split_first() else {
            debug!(instruction_index = index, %program, "skipping empty instruction data");
            continue;
        };
        let Some(kind) = decoder.classify(opcode) else {
            debug!(instruction_index = index, %program, opcode, "skipping unknown opcode");
            continue;
        };

        let Some(accounts) = resolve_accounts(keys, header, &ix.accounts) else {
            warn!(
                instruction_index = index,
                %kind,
                "instruction references accounts outside the static key table"
            );
            continue;
        };

        let view = InstructionView {
            index,
            kind,
            accounts,
            args,
        };
        if let Err(e) = decoder.decode(&view, &mut tx) {
            warn!(instruction_index = index, %kind, error = %e, "failed to decode instruction");
        }
    }

    debug!(
        signature = %tx.signature,
        slot,
        creates = tx.create.len(),
        trades = tx.trade.len(),
        migrations = tx.migrate.len(),
        swap_buys = tx.swap_buys.len(),
        swap_sells = tx.swap_sells.len(),
        "parsed transaction"
    );
    Ok(tx)
}

fn resolve_accounts(
    keys: &[Pubkey],
    header: &MessageHeader,
    indices: &[u8],
) -> Option<Vec<ResolvedAccount>> {
    indices
        .iter()
        .map(|&i| {
            let i = usize::from(i);
            keys.get(i).map(|&pubkey| ResolvedAccount {
                pubkey,
                is_signer: is_signer(header, i),
                is_writable: is_writable(header, keys.len(), i),
            })
        })
        .collect()
}

fn is_signer(header: &MessageHeader, index: usize) -> bool {
    index < usize::from(header.num_required_signatures)
}

fn is_writable(header: &MessageHeader, key_count: usize, index: usize) -> bool {
    let signers = usize::from(header.num_required_signatures);
    if index < signers {
        index < signers.saturating_sub(usize::from(header.num_readonly_signed_accounts))
    } else {
        index < key_count.saturating_sub(usize::from(header.num_readonly_unsigned_accounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(signers: u8, ro_signed: u8, ro_unsigned: u8) -> MessageHeader {
        MessageHeader {
            num_required_signatures: signers,
            num_readonly_signed_accounts: ro_signed,
            num_readonly_unsigned_accounts: ro_unsigned,
        }
    }

    #[test]
    fn header_partitions_key_table() {
        // [writable signer, readonly signer, writable, readonly, readonly]
        let h = header(2, 1, 2);
        let flags: Vec<(bool, bool)> = (0..5)
            .map(|i| (is_signer(&h, i), is_writable(&h, 5, i)))
            .collect();
        assert_eq!(
            flags,
            vec![
                (true, true),
                (true, false),
                (false, true),
                (false, false),
                (false, false),
            ]
        );
    }

    #[test]
    fn inconsistent_header_saturates() {
        let h = header(1, 3, 9);
        assert!(!is_writable(&h, 4, 0));
        assert!(!is_writable(&h, 4, 2));
    }

    #[test]
    fn unresolvable_index_fails_whole_instruction() {
        let keys = [Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32])];
        let h = header(1, 0, 0);
        assert!(resolve_accounts(&keys, &h, &[0, 1]).is_some());
        assert!(resolve_accounts(&keys, &h, &[0, 2]).is_none());
    }
}
