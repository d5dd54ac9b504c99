#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod error;
pub mod instruction;
pub mod parser;
pub mod programs;
pub mod types;
pub mod validation;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::Error;
pub use instruction::payload::{CreatePoolArgs, MigrateArgs, SwapArgs, TradeArgs};
pub use instruction::{AccountRef, AccountRole, InstructionDescriptor, InstructionKind};
pub use parser::decoders::{InstructionView, ProgramDecoder, ResolvedAccount, decoder_for};
#[cfg(feature = "native")]
pub use parser::{parse_message, parse_transaction};
pub use programs::amm_v4::{AmmV4Decoder, MigrateConfig, SwapConfig};
pub use programs::launchpad::{BuyConfig, CreateTokenConfig, LaunchpadDecoder, SellConfig};
pub use programs::{
    Program, associated_token_address, base_currency_account_mint, is_base_currency,
    is_known_program,
};
pub use types::{CreateInfo, Migration, ParsedTransaction, SwapInfo, TradeInfo};
pub use validation::{
    IssueKind, ValidationIssue, ValidatorConfig, validate_transaction, validate_transaction_with,
};
