//! Argument blocks that follow the opcode byte. Integers are little-endian,
//! strings carry a `u32` length prefix (borsh layout).

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::Error;
use crate::instruction::InstructionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SwapArgs {
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

/// Buy and sell share one block. `sol_limit` is the maximum SOL cost for a
/// buy and the minimum SOL received for a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TradeArgs {
    pub amount: u64,
    pub sol_limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MigrateArgs {
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreatePoolArgs {
    pub decimals: u8,
    pub initial_supply: u64,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

pub fn encode<T: BorshSerialize>(kind: InstructionKind, args: &T) -> Result<Vec<u8>, Error> {
    let mut data = vec![kind.opcode()];
    args.serialize(&mut data).map_err(|e| Error::Payload {
        reason: format!("failed to encode {kind} args: {e}"),
    })?;
    Ok(data)
}

/// Decodes the bytes after the opcode. Trailing bytes are rejected.
pub fn decode<T: BorshDeserialize>(kind: InstructionKind, args: &[u8]) -> Result<T, Error> {
    borsh::from_slice(args).map_err(|e| Error::Decode {
        reason: format!("failed to decode {kind} args: {e}"),
    })
}
