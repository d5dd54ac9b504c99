use solana_pubkey::Pubkey;
use tracing::warn;

use crate::error::Error;
use crate::instruction::payload::{CreatePoolArgs, TradeArgs};
use crate::instruction::{
    AccountRole, InstructionDescriptor, InstructionKind, required, required_str, with_setters,
};
use crate::parser::decoders::{InstructionView, ProgramDecoder};
use crate::programs::{Program, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::types::{CreateInfo, ParsedTransaction, TradeInfo};

/// Accounts shared by launchpad buys and sells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TradeAccounts {
    user_authority: Option<Pubkey>,
    token_mint: Option<Pubkey>,
    amm_id: Option<Pubkey>,
    amm_authority: Option<Pubkey>,
    token_vault: Option<Pubkey>,
    sol_vault: Option<Pubkey>,
    user_token_account: Option<Pubkey>,
    user_sol_account: Option<Pubkey>,
}

impl TradeAccounts {
    fn keys(&self) -> Result<[Pubkey; 10], Error> {
        Ok([
            required(self.user_authority, "user_authority")?,
            required(self.token_mint, "token_mint")?,
            required(self.amm_id, "amm_id")?,
            required(self.amm_authority, "amm_authority")?,
            required(self.token_vault, "token_vault")?,
            required(self.sol_vault, "sol_vault")?,
            required(self.user_token_account, "user_token_account")?,
            required(self.user_sol_account, "user_sol_account")?,
            TOKEN_PROGRAM_ID,
            SYSTEM_PROGRAM_ID,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyConfig {
    pub user_authority: Option<Pubkey>,
    pub token_mint: Option<Pubkey>,
    pub amm_id: Option<Pubkey>,
    pub amm_authority: Option<Pubkey>,
    pub token_vault: Option<Pubkey>,
    pub sol_vault: Option<Pubkey>,
    pub user_token_account: Option<Pubkey>,
    pub user_sol_account: Option<Pubkey>,
    pub amount: Option<u64>,
    pub max_sol_cost: Option<u64>,
}

with_setters!(BuyConfig {
    with_user_authority => user_authority: Pubkey,
    with_token_mint => token_mint: Pubkey,
    with_amm_id => amm_id: Pubkey,
    with_amm_authority => amm_authority: Pubkey,
    with_token_vault => token_vault: Pubkey,
    with_sol_vault => sol_vault: Pubkey,
    with_user_token_account => user_token_account: Pubkey,
    with_user_sol_account => user_sol_account: Pubkey,
    with_amount => amount: u64,
    with_max_sol_cost => max_sol_cost: u64,
});

impl BuyConfig {
    fn trade_accounts(&self) -> TradeAccounts {
        TradeAccounts {
            user_authority: self.user_authority,
            token_mint: self.token_mint,
            amm_id: self.amm_id,
            amm_authority: self.amm_authority,
            token_vault: self.token_vault,
            sol_vault: self.sol_vault,
            user_token_account: self.user_token_account,
            user_sol_account: self.user_sol_account,
        }
    }

    pub fn build(&self) -> Result<InstructionDescriptor, Error> {
        let keys = self.trade_accounts().keys()?;
        let args = TradeArgs {
            amount: required(self.amount, "amount")?,
            sol_limit: required(self.max_sol_cost, "max_sol_cost")?,
        };
        InstructionDescriptor::assemble(InstructionKind::Buy, keys, &args)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellConfig {
    pub user_authority: Option<Pubkey>,
    pub token_mint: Option<Pubkey>,
    pub amm_id: Option<Pubkey>,
    pub amm_authority: Option<Pubkey>,
    pub token_vault: Option<Pubkey>,
    pub sol_vault: Option<Pubkey>,
    pub user_token_account: Option<Pubkey>,
    pub user_sol_account: Option<Pubkey>,
    pub amount: Option<u64>,
    pub min_sol_received: Option<u64>,
}

with_setters!(SellConfig {
    with_user_authority => user_authority: Pubkey,
    with_token_mint => token_mint: Pubkey,
    with_amm_id => amm_id: Pubkey,
    with_amm_authority => amm_authority: Pubkey,
    with_token_vault => token_vault: Pubkey,
    with_sol_vault => sol_vault: Pubkey,
    with_user_token_account => user_token_account: Pubkey,
    with_user_sol_account => user_sol_account: Pubkey,
    with_amount => amount: u64,
    with_min_sol_received => min_sol_received: u64,
});

impl SellConfig {
    fn trade_accounts(&self) -> TradeAccounts {
        TradeAccounts {
            user_authority: self.user_authority,
            token_mint: self.token_mint,
            amm_id: self.amm_id,
            amm_authority: self.amm_authority,
            token_vault: self.token_vault,
            sol_vault: self.sol_vault,
            user_token_account: self.user_token_account,
            user_sol_account: self.user_sol_account,
        }
    }

    pub fn build(&self) -> Result<InstructionDescriptor, Error> {
        let keys = self.trade_accounts().keys()?;
        let args = TradeArgs {
            amount: required(self.amount, "amount")?,
            sol_limit: required(self.min_sol_received, "min_sol_received")?,
        };
        InstructionDescriptor::assemble(InstructionKind::Sell, keys, &args)
    }
}

/// Launchpad token creation. The payload carries the token metadata after
/// the decimals/supply block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTokenConfig {
    pub payer: Option<Pubkey>,
    pub mint: Option<Pubkey>,
    pub pool: Option<Pubkey>,
    pub mint_authority: Option<Pubkey>,
    pub freeze_authority: Option<Pubkey>,
    pub decimals: Option<u8>,
    pub initial_supply: Option<u64>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
}

with_setters!(CreateTokenConfig {
    with_payer => payer: Pubkey,
    with_mint => mint: Pubkey,
    with_pool => pool: Pubkey,
    with_mint_authority => mint_authority: Pubkey,
    with_freeze_authority => freeze_authority: Pubkey,
    with_decimals => decimals: u8,
    with_initial_supply => initial_supply: u64,
    with_name => name: String,
    with_symbol => symbol: String,
    with_uri => uri: String,
});

impl CreateTokenConfig {
    pub fn build(&self) -> Result<InstructionDescriptor, Error> {
        let keys = [
            required(self.payer, "payer")?,
            required(self.mint, "mint")?,
            required(self.pool, "pool")?,
            required(self.mint_authority, "mint_authority")?,
            required(self.freeze_authority, "freeze_authority")?,
            TOKEN_PROGRAM_ID,
        ];
        let args = CreatePoolArgs {
            decimals: required(self.decimals, "decimals")?,
            initial_supply: required(self.initial_supply, "initial_supply")?,
            name: required_str(&self.name, "name")?,
            symbol: required_str(&self.symbol, "symbol")?,
            uri: required_str(&self.uri, "uri")?,
        };
        InstructionDescriptor::assemble(InstructionKind::CreatePool, keys, &args)
    }
}

#[derive(Debug)]
pub struct LaunchpadDecoder;

impl LaunchpadDecoder {
    fn signer_verified(ix: &InstructionView<'_>, role: AccountRole) -> Result<bool, Error> {
        let account = ix.account(role)?;
        if !account.is_signer {
            warn!(
                instruction_index = ix.index,
                kind = %ix.kind,
                %role,
                pubkey = %account.pubkey,
                "launchpad signer slot is not a transaction signer"
            );
        }
        Ok(account.is_signer)
    }
}

impl ProgramDecoder for LaunchpadDecoder {
    fn program(&self) -> Program {
        Program::LaunchpadV1
    }

    fn decode(&self, ix: &InstructionView<'_>, tx: &mut ParsedTransaction) -> Result<(), Error> {
        match ix.kind {
            InstructionKind::CreatePool => {
                let CreatePoolArgs {
                    decimals,
                    initial_supply,
                    name,
                    symbol,
                    uri,
                } = ix.args::<CreatePoolArgs>()?;
                tx.push_create(CreateInfo {
                    instruction_index: ix.index,
                    creator: ix.key(AccountRole::Payer)?,
                    mint: ix.key(AccountRole::TokenMint)?,
                    pool: ix.key(AccountRole::Pool)?,
                    mint_authority: ix.key(AccountRole::MintAuthority)?,
                    freeze_authority: ix.key(AccountRole::FreezeAuthority)?,
                    name,
                    symbol,
                    uri,
                    decimals,
                    initial_supply,
                    signer_verified: Self::signer_verified(ix, AccountRole::Payer)?,
                });
                Ok(())
            }
            InstructionKind::Buy | InstructionKind::Sell => {
                let TradeArgs { amount, sol_limit } = ix.args::<TradeArgs>()?;
                tx.push_trade(TradeInfo {
                    instruction_index: ix.index,
                    user: ix.key(AccountRole::UserAuthority)?,
                    mint: ix.key(AccountRole::TokenMint)?,
                    pool: ix.key(AccountRole::Pool)?,
                    token_vault: ix.key(AccountRole::TokenVault)?,
                    sol_vault: ix.key(AccountRole::SolVault)?,
                    token_amount: amount,
                    sol_limit,
                    is_buy: ix.kind == InstructionKind::Buy,
                    signer_verified: Self::signer_verified(ix, AccountRole::UserAuthority)?,
                });
                Ok(())
            }
            InstructionKind::Swap | InstructionKind::Migrate => Err(Error::Decode {
                reason: format!("{} is not a launchpad instruction", ix.kind),
            }),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use super::*;
    use crate::parser::decoders::ResolvedAccount;
    use crate::programs::RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID;
    use solana_signature::Signature;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn full_buy() -> BuyConfig {
        BuyConfig::default()
            .with_user_authority(key(1))
            .with_user_token_account(key(2))
            .with_user_sol_account(key(3))
            .with_amm_id(key(4))
            .with_amm_authority(key(5))
            .with_token_vault(key(6))
            .with_sol_vault(key(7))
            .with_token_mint(key(8))
            .with_amount(1_000_000)
            .with_max_sol_cost(500_000)
    }

    fn full_sell() -> SellConfig {
        SellConfig {
            user_authority: Some(key(1)),
            token_mint: Some(key(8)),
            amm_id: Some(key(4)),
            amm_authority: Some(key(5)),
            token_vault: Some(key(6)),
            sol_vault: Some(key(7)),
            user_token_account: Some(key(2)),
            user_sol_account: Some(key(3)),
            amount: Some(1_000_000),
            min_sol_received: Some(400_000),
        }
    }

    fn full_create() -> CreateTokenConfig {
        CreateTokenConfig::default()
            .with_payer(key(1))
            .with_mint(key(2))
            .with_pool(key(3))
            .with_mint_authority(key(4))
            .with_freeze_authority(key(5))
            .with_decimals(6)
            .with_name("Test Token".to_string())
            .with_symbol("TEST".to_string())
            .with_uri("https://example.com/token.json".to_string())
            .with_initial_supply(1_000_000_000_000)
    }

    fn view<'a>(
        descriptor: &InstructionDescriptor,
        args: &'a [u8],
        signers: &[usize],
    ) -> InstructionView<'a> {
        InstructionView {
            index: 0,
            kind: descriptor.kind(),
            accounts: descriptor
                .accounts()
                .iter()
                .enumerate()
                .map(|(i, a)| ResolvedAccount {
                    pubkey: a.pubkey,
                    is_signer: signers.contains(&i),
                    is_writable: a.is_writable,
                })
                .collect(),
            args,
        }
    }

    #[test]
    fn buy_matches_wire_layout() {
        let ix = full_buy().build().unwrap();
        assert_eq!(ix.program_id(), RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID);
        assert_eq!(ix.accounts().len(), 10);
        assert_eq!(ix.payload().len(), 17);
        assert_eq!(ix.payload()[0], InstructionKind::BUY_OPCODE);
        assert_eq!(ix.accounts()[0].pubkey, key(1));
        assert!(ix.accounts()[0].is_signer);
        assert_eq!(ix.accounts()[1].pubkey, key(8));
        assert_eq!(ix.accounts()[2].pubkey, key(4));
        assert_eq!(ix.accounts()[8].pubkey, TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts()[9].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(&ix.payload()[9..17], &500_000_u64.to_le_bytes());
    }

    #[test]
    fn sell_matches_wire_layout() {
        let ix = full_sell().build().unwrap();
        assert_eq!(ix.program_id(), RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID);
        assert_eq!(ix.accounts().len(), 10);
        assert_eq!(ix.payload().len(), 17);
        assert_eq!(ix.payload()[0], InstructionKind::SELL_OPCODE);
        assert_eq!(&ix.payload()[9..17], &400_000_u64.to_le_bytes());
    }

    #[test]
    fn create_matches_wire_layout() {
        let ix = full_create().build().unwrap();
        assert_eq!(ix.program_id(), RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID);
        assert_eq!(ix.accounts().len(), 6);
        assert_eq!(ix.payload()[0], InstructionKind::CREATE_POOL_OPCODE);
        assert_eq!(ix.payload().len(), 1 + 1 + 8 + 14 + 8 + 34);
        assert!(ix.accounts()[0].is_signer);
        assert!(ix.accounts()[1].is_signer);
        assert_eq!(ix.accounts()[5].pubkey, TOKEN_PROGRAM_ID);
    }

    #[test]
    fn create_payload_grows_with_metadata() {
        let short = full_create().with_name("A".to_string()).build().unwrap();
        let long = full_create()
            .with_name("A much longer token name".to_string())
            .build()
            .unwrap();
        assert_eq!(long.payload().len() - short.payload().len(), 23);
        assert_eq!(short.payload()[0], long.payload()[0]);
    }

    #[test]
    fn missing_fields_are_named() {
        let cases: Vec<(Result<InstructionDescriptor, Error>, &str)> = vec![
            (BuyConfig::default().build(), "user_authority"),
            (
                BuyConfig {
                    token_mint: None,
                    ..full_buy()
                }
                .build(),
                "token_mint",
            ),
            (
                BuyConfig {
                    max_sol_cost: None,
                    ..full_buy()
                }
                .build(),
                "max_sol_cost",
            ),
            (
                SellConfig {
                    min_sol_received: None,
                    ..full_sell()
                }
                .build(),
                "min_sol_received",
            ),
            (
                CreateTokenConfig {
                    pool: None,
                    ..full_create()
                }
                .build(),
                "pool",
            ),
            (
                CreateTokenConfig {
                    uri: None,
                    ..full_create()
                }
                .build(),
                "uri",
            ),
        ];
        for (result, expected) in cases {
            match result {
                Err(Error::MissingField { field }) => assert_eq!(field, expected),
                other => panic!("expected MissingField({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn decoder_maps_buy_roles() {
        let ix = full_buy().build().unwrap();
        let mut tx = ParsedTransaction::new(Signature::default(), 1);
        LaunchpadDecoder
            .decode(&view(&ix, &ix.payload()[1..], &[0]), &mut tx)
            .unwrap();
        assert_eq!(tx.trade_buys, vec![0]);
        let trade = &tx.trade[0];
        assert_eq!(trade.user, key(1));
        assert_eq!(trade.mint, key(8));
        assert_eq!(trade.pool, key(4));
        assert_eq!(trade.token_vault, key(6));
        assert_eq!(trade.sol_vault, key(7));
        assert_eq!(trade.token_amount, 1_000_000);
        assert_eq!(trade.sol_limit, 500_000);
        assert!(trade.is_buy);
        assert!(trade.signer_verified);
    }

    #[test]
    fn decoder_marks_unsigned_seller() {
        let ix = full_sell().build().unwrap();
        let mut tx = ParsedTransaction::new(Signature::default(), 1);
        LaunchpadDecoder
            .decode(&view(&ix, &ix.payload()[1..], &[]), &mut tx)
            .unwrap();
        assert_eq!(tx.trade_sells, vec![0]);
        assert!(!tx.trade[0].is_buy);
        assert!(!tx.trade[0].signer_verified);
    }

    #[test]
    fn decoder_recovers_create_metadata() {
        let ix = full_create().build().unwrap();
        let mut tx = ParsedTransaction::new(Signature::default(), 1);
        LaunchpadDecoder
            .decode(&view(&ix, &ix.payload()[1..], &[0, 1]), &mut tx)
            .unwrap();
        let create = &tx.create[0];
        assert_eq!(create.creator, key(1));
        assert_eq!(create.mint, key(2));
        assert_eq!(create.pool, key(3));
        assert_eq!(create.name, "Test Token");
        assert_eq!(create.symbol, "TEST");
        assert_eq!(create.uri, "https://example.com/token.json");
        assert_eq!(create.decimals, 6);
        assert_eq!(create.initial_supply, 1_000_000_000_000);
        assert!(create.signer_verified);
    }

    #[test]
    fn decoder_rejects_bad_args() {
        let ix = full_buy().build().unwrap();
        let mut tx = ParsedTransaction::new(Signature::default(), 1);
        let result = LaunchpadDecoder.decode(&view(&ix, &ix.payload()[1..9], &[0]), &mut tx);
        assert!(matches!(result, Err(Error::Decode { .. })));
        assert!(tx.trade.is_empty());
    }
}
