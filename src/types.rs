use std::fmt::Display;

use serde::{Serialize, Serializer};
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use crate::programs::base_currency_account_mint;

fn base58<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// A launchpad token creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInfo {
    /// Position of the originating instruction within the transaction.
    pub instruction_index: usize,
    /// Payer and creator of the token.
    #[serde(serialize_with = "base58")]
    pub creator: Pubkey,
    /// The newly created token mint.
    #[serde(serialize_with = "base58")]
    pub mint: Pubkey,
    /// Launchpad pool backing the token.
    #[serde(serialize_with = "base58")]
    pub pool: Pubkey,
    /// Mint authority assigned at creation.
    #[serde(serialize_with = "base58")]
    pub mint_authority: Pubkey,
    /// Freeze authority assigned at creation.
    #[serde(serialize_with = "base58")]
    pub freeze_authority: Pubkey,
    /// Token name from the create payload.
    pub name: String,
    /// Token symbol from the create payload.
    pub symbol: String,
    /// Metadata URI from the create payload.
    pub uri: String,
    /// Decimal places of the mint.
    pub decimals: u8,
    /// Supply minted at creation, in base units.
    pub initial_supply: u64,
    /// Whether the creator slot is a signer of the enclosing message.
    pub signer_verified: bool,
}

/// A launchpad buy or sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeInfo {
    /// Position of the originating instruction within the transaction.
    pub instruction_index: usize,
    /// Buyer or seller authority.
    #[serde(serialize_with = "base58")]
    pub user: Pubkey,
    /// Token being traded.
    #[serde(serialize_with = "base58")]
    pub mint: Pubkey,
    /// Launchpad pool the trade executes against.
    #[serde(serialize_with = "base58")]
    pub pool: Pubkey,
    /// Pool vault holding the token side.
    #[serde(serialize_with = "base58")]
    pub token_vault: Pubkey,
    /// Pool vault holding the SOL side.
    #[serde(serialize_with = "base58")]
    pub sol_vault: Pubkey,
    /// Token amount in base units.
    pub token_amount: u64,
    /// Max SOL cost on a buy, min SOL received on a sell.
    pub sol_limit: u64,
    /// Buy when true, sell otherwise. Taken from the opcode.
    pub is_buy: bool,
    /// Whether the user slot is a signer of the enclosing message.
    pub signer_verified: bool,
}

/// Liquidity moved from one pool to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Position of the originating instruction within the transaction.
    pub instruction_index: usize,
    /// Authority that signed the migration.
    #[serde(serialize_with = "base58")]
    pub authority: Pubkey,
    /// Pool liquidity leaves.
    #[serde(serialize_with = "base58")]
    pub from_pool: Pubkey,
    /// Pool liquidity enters.
    #[serde(serialize_with = "base58")]
    pub to_pool: Pubkey,
    /// Token account moved with the liquidity.
    #[serde(serialize_with = "base58")]
    pub token_account: Pubkey,
    /// Amount migrated, in base units.
    pub amount: u64,
}

/// An AMM v4 swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapInfo {
    /// Position of the originating instruction within the transaction.
    pub instruction_index: usize,
    /// Owner of the user token accounts; the swap signer.
    #[serde(serialize_with = "base58")]
    pub owner: Pubkey,
    /// AMM pool the swap executes against.
    #[serde(serialize_with = "base58")]
    pub amm_id: Pubkey,
    /// User token account paying into the pool.
    #[serde(serialize_with = "base58")]
    pub source: Pubkey,
    /// User token account receiving from the pool.
    #[serde(serialize_with = "base58")]
    pub destination: Pubkey,
    /// Exact input amount, in base units of the source token.
    pub amount_in: u64,
    /// Slippage floor on the output, in base units of the destination token.
    pub minimum_amount_out: u64,
}

impl SwapInfo {
    /// A swap is a buy when the user pays from their associated token account
    /// for a base currency.
    pub fn is_buy(&self) -> bool {
        base_currency_account_mint(&self.owner, &self.source).is_some()
    }
}

/// Everything recovered from one transaction, in instruction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTransaction {
    #[serde(serialize_with = "base58")]
    pub signature: Signature,
    pub slot: u64,
    pub create: Vec<CreateInfo>,
    pub trade: Vec<TradeInfo>,
    /// Indices into `trade`.
    pub trade_buys: Vec<usize>,
    /// Indices into `trade`.
    pub trade_sells: Vec<usize>,
    pub migrate: Vec<Migration>,
    pub swap_buys: Vec<SwapInfo>,
    pub swap_sells: Vec<SwapInfo>,
}

impl ParsedTransaction {
    pub fn new(signature: Signature, slot: u64) -> Self {
        Self {
            signature,
            slot,
            create: Vec::new(),
            trade: Vec::new(),
            trade_buys: Vec::new(),
            trade_sells: Vec::new(),
            migrate: Vec::new(),
            swap_buys: Vec::new(),
            swap_sells: Vec::new(),
        }
    }

    pub fn push_create(&mut self, create: CreateInfo) {
        self.create.push(create);
    }

    /// Appends a trade and records its index on the matching side.
    pub fn push_trade(&mut self, trade: TradeInfo) {
        let index = self.trade.len();
        if trade.is_buy {
            self.trade_buys.push(index);
        } else {
            self.trade_sells.push(index);
        }
        self.trade.push(trade);
    }

    pub fn push_migration(&mut self, migration: Migration) {
        self.migrate.push(migration);
    }

    pub fn push_swap(&mut self, swap: SwapInfo) {
        if swap.is_buy() {
            self.swap_buys.push(swap);
        } else {
            self.swap_sells.push(swap);
        }
    }

    pub fn buys(&self) -> impl Iterator<Item = &TradeInfo> {
        self.trade_buys.iter().filter_map(|&i| self.trade.get(i))
    }

    pub fn sells(&self) -> impl Iterator<Item = &TradeInfo> {
        self.trade_sells.iter().filter_map(|&i| self.trade.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.trade.is_empty()
            && self.migrate.is_empty()
            && self.swap_buys.is_empty()
            && self.swap_sells.is_empty()
    }
}
