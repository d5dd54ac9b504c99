use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::instruction::payload::{MigrateArgs, SwapArgs};
use crate::instruction::{
    AccountRole, InstructionDescriptor, InstructionKind, required, with_setters,
};
use crate::parser::decoders::{InstructionView, ProgramDecoder};
use crate::programs::{Program, TOKEN_PROGRAM_ID};
use crate::types::{Migration, ParsedTransaction, SwapInfo};

/// AMM v4 `swap` (base in). The SPL token program slot is filled in by
/// `build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapConfig {
    pub amm_id: Option<Pubkey>,
    pub amm_authority: Option<Pubkey>,
    pub amm_open_orders: Option<Pubkey>,
    pub amm_target_orders: Option<Pubkey>,
    pub pool_coin_token: Option<Pubkey>,
    pub pool_pc_token: Option<Pubkey>,
    pub serum_program: Option<Pubkey>,
    pub serum_market: Option<Pubkey>,
    pub serum_bids: Option<Pubkey>,
    pub serum_asks: Option<Pubkey>,
    pub serum_event_queue: Option<Pubkey>,
    pub serum_coin_vault: Option<Pubkey>,
    pub serum_pc_vault: Option<Pubkey>,
    pub serum_vault_signer: Option<Pubkey>,
    pub user_source_token: Option<Pubkey>,
    pub user_destination_token: Option<Pubkey>,
    pub user_owner: Option<Pubkey>,
    pub amount_in: Option<u64>,
    pub minimum_amount_out: Option<u64>,
}

with_setters!(SwapConfig {
    with_amm_id => amm_id: Pubkey,
    with_amm_authority => amm_authority: Pubkey,
    with_amm_open_orders => amm_open_orders: Pubkey,
    with_amm_target_orders => amm_target_orders: Pubkey,
    with_pool_coin_token => pool_coin_token: Pubkey,
    with_pool_pc_token => pool_pc_token: Pubkey,
    with_serum_program => serum_program: Pubkey,
    with_serum_market => serum_market: Pubkey,
    with_serum_bids => serum_bids: Pubkey,
    with_serum_asks => serum_asks: Pubkey,
    with_serum_event_queue => serum_event_queue: Pubkey,
    with_serum_coin_vault => serum_coin_vault: Pubkey,
    with_serum_pc_vault => serum_pc_vault: Pubkey,
    with_serum_vault_signer => serum_vault_signer: Pubkey,
    with_user_source_token => user_source_token: Pubkey,
    with_user_destination_token => user_destination_token: Pubkey,
    with_user_owner => user_owner: Pubkey,
    with_amount_in => amount_in: u64,
    with_minimum_amount_out => minimum_amount_out: u64,
});

impl SwapConfig {
    pub fn build(&self) -> Result<InstructionDescriptor, Error> {
        let keys = [
            TOKEN_PROGRAM_ID,
            required(self.amm_id, "amm_id")?,
            required(self.amm_authority, "amm_authority")?,
            required(self.amm_open_orders, "amm_open_orders")?,
            required(self.amm_target_orders, "amm_target_orders")?,
            required(self.pool_coin_token, "pool_coin_token")?,
            required(self.pool_pc_token, "pool_pc_token")?,
            required(self.serum_program, "serum_program")?,
            required(self.serum_market, "serum_market")?,
            required(self.serum_bids, "serum_bids")?,
            required(self.serum_asks, "serum_asks")?,
            required(self.serum_event_queue, "serum_event_queue")?,
            required(self.serum_coin_vault, "serum_coin_vault")?,
            required(self.serum_pc_vault, "serum_pc_vault")?,
            required(self.serum_vault_signer, "serum_vault_signer")?,
            required(self.user_source_token, "user_source_token")?,
            required(self.user_destination_token, "user_destination_token")?,
            required(self.user_owner, "user_owner")?,
        ];
        let args = SwapArgs {
            amount_in: required(self.amount_in, "amount_in")?,
            minimum_amount_out: required(self.minimum_amount_out, "minimum_amount_out")?,
        };
        InstructionDescriptor::assemble(InstructionKind::Swap, keys, &args)
    }
}

/// Moves liquidity between two AMM v4 pools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateConfig {
    pub user_authority: Option<Pubkey>,
    pub from_pool: Option<Pubkey>,
    pub to_pool: Option<Pubkey>,
    pub token_account: Option<Pubkey>,
    pub amount: Option<u64>,
}

with_setters!(MigrateConfig {
    with_user_authority => user_authority: Pubkey,
    with_from_pool => from_pool: Pubkey,
    with_to_pool => to_pool: Pubkey,
    with_token_account => token_account: Pubkey,
    with_amount => amount: u64,
});

impl MigrateConfig {
    pub fn build(&self) -> Result<InstructionDescriptor, Error> {
        let keys = [
            required(self.user_authority, "user_authority")?,
            required(self.from_pool, "from_pool")?,
            required(self.to_pool, "to_pool")?,
            required(self.token_account, "token_account")?,
            TOKEN_PROGRAM_ID,
        ];
        let args = MigrateArgs {
            amount: required(self.amount, "amount")?,
        };
        InstructionDescriptor::assemble(InstructionKind::Migrate, keys, &args)
    }
}

#[derive(Debug)]
pub struct AmmV4Decoder;

impl ProgramDecoder for AmmV4Decoder {
    fn program(&self) -> Program {
        Program::AmmV4
    }

    fn decode(&self, ix: &InstructionView<'_>, tx: &mut ParsedTransaction) -> Result<(), Error> {
        match ix.kind {
            InstructionKind::Swap => {
                let SwapArgs {
                    amount_in,
                    minimum_amount_out,
                } = ix.args::<SwapArgs>()?;
                tx.push_swap(SwapInfo {
                    instruction_index: ix.index,
                    owner: ix.key(AccountRole::UserOwner)?,
                    amm_id: ix.key(AccountRole::AmmId)?,
                    source: ix.key(AccountRole::UserSourceToken)?,
                    destination: ix.key(AccountRole::UserDestinationToken)?,
                    amount_in,
                    minimum_amount_out,
                });
                Ok(())
            }
            InstructionKind::Migrate => {
                let MigrateArgs { amount } = ix.args::<MigrateArgs>()?;
                tx.push_migration(Migration {
                    instruction_index: ix.index,
                    authority: ix.key(AccountRole::UserAuthority)?,
                    from_pool: ix.key(AccountRole::FromPool)?,
                    to_pool: ix.key(AccountRole::ToPool)?,
                    token_account: ix.key(AccountRole::TokenAccount)?,
                    amount,
                });
                Ok(())
            }
            InstructionKind::CreatePool | InstructionKind::Buy | InstructionKind::Sell => {
                Err(Error::Decode {
                    reason: format!("{} is not an AMM v4 instruction", ix.kind),
                })
            }
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
    use crate::programs::{
        RAYDIUM_AMM_V4_PROGRAM_ID, USDC_MINT, WSOL_MINT, associated_token_address,
    };
    use solana_instruction::Instruction;
    use solana_signature::Signature;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn wsol_account() -> Pubkey {
        associated_token_address(&key(1), &WSOL_MINT)
    }

    fn usdc_account() -> Pubkey {
        associated_token_address(&key(1), &USDC_MINT)
    }

    fn full_swap() -> SwapConfig {
        SwapConfig::default()
            .with_user_source_token(wsol_account())
            .with_user_destination_token(usdc_account())
            .with_user_owner(key(1))
            .with_amm_id(key(2))
            .with_amm_authority(key(3))
            .with_amm_open_orders(key(4))
            .with_amm_target_orders(key(5))
            .with_pool_coin_token(key(6))
            .with_pool_pc_token(key(7))
            .with_serum_program(key(8))
            .with_serum_market(key(9))
            .with_serum_bids(key(10))
            .with_serum_asks(key(11))
            .with_serum_event_queue(key(12))
            .with_serum_coin_vault(key(13))
            .with_serum_pc_vault(key(14))
            .with_serum_vault_signer(key(15))
            .with_amount_in(1_000_000)
            .with_minimum_amount_out(900_000)
    }

    fn full_migrate() -> MigrateConfig {
        MigrateConfig {
            user_authority: Some(key(1)),
            from_pool: Some(key(2)),
            to_pool: Some(key(3)),
            token_account: Some(key(4)),
            amount: Some(1_000_000),
        }
    }

    fn view<'a>(descriptor: &InstructionDescriptor, args: &'a [u8]) -> InstructionView<'a> {
        InstructionView {
            index: 3,
            kind: descriptor.kind(),
            accounts: descriptor
                .accounts()
                .iter()
                .map(|a| ResolvedAccount {
                    pubkey: a.pubkey,
                    is_signer: a.is_signer,
                    is_writable: a.is_writable,
                })
                .collect(),
            args,
        }
    }

    #[test]
    fn swap_matches_wire_layout() {
        let ix = full_swap().build().unwrap();
        assert_eq!(ix.program_id(), RAYDIUM_AMM_V4_PROGRAM_ID);
        assert_eq!(ix.accounts().len(), 18);
        assert_eq!(ix.payload().len(), 17);
        assert_eq!(ix.payload()[0], InstructionKind::SWAP_OPCODE);
        assert_eq!(ix.accounts()[0].pubkey, TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts()[15].pubkey, wsol_account());
        assert_eq!(ix.accounts()[16].pubkey, usdc_account());
        assert_eq!(ix.accounts()[17].pubkey, key(1));
        assert!(ix.accounts()[17].is_signer);
    }

    #[test]
    fn swap_setters_are_last_write_wins() {
        let ix = full_swap()
            .with_amount_in(1)
            .with_amount_in(42)
            .with_amm_id(key(99))
            .build()
            .unwrap();
        assert_eq!(&ix.payload()[1..9], &42_u64.to_le_bytes());
        assert_eq!(ix.account(AccountRole::AmmId).unwrap().pubkey, key(99));
    }

    #[test]
    fn swap_reports_each_missing_field() {
        let cases: [(SwapConfig, &str); 4] = [
            (
                SwapConfig {
                    amm_id: None,
                    ..full_swap()
                },
                "amm_id",
            ),
            (
                SwapConfig {
                    user_owner: None,
                    ..full_swap()
                },
                "user_owner",
            ),
            (
                SwapConfig {
                    amount_in: None,
                    ..full_swap()
                },
                "amount_in",
            ),
            (
                SwapConfig {
                    minimum_amount_out: None,
                    ..full_swap()
                },
                "minimum_amount_out",
            ),
        ];
        for (config, expected) in cases {
            match config.build() {
                Err(Error::MissingField { field }) => assert_eq!(field, expected),
                other => panic!("expected MissingField({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_swap_fails_on_first_account() {
        assert!(matches!(
            SwapConfig::default().build(),
            Err(Error::MissingField { field: "amm_id" })
        ));
    }

    #[test]
    fn migrate_matches_wire_layout() {
        let ix = full_migrate().build().unwrap();
        assert_eq!(ix.program_id(), RAYDIUM_AMM_V4_PROGRAM_ID);
        assert_eq!(ix.accounts().len(), 5);
        assert_eq!(ix.payload().len(), 9);
        assert_eq!(ix.payload()[0], InstructionKind::MIGRATE_OPCODE);
        assert_eq!(ix.accounts()[4].pubkey, TOKEN_PROGRAM_ID);
    }

    #[test]
    fn migrate_requires_amount() {
        let config = MigrateConfig {
            amount: None,
            ..full_migrate()
        };
        assert!(matches!(
            config.build(),
            Err(Error::MissingField { field: "amount" })
        ));
    }

    #[test]
    fn descriptor_converts_to_instruction() {
        let descriptor = full_swap().build().unwrap();
        let expected_payload = descriptor.payload().to_vec();
        let ix: Instruction = descriptor.into();
        assert_eq!(ix.program_id, RAYDIUM_AMM_V4_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 18);
        assert!(!ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_writable);
        assert!(ix.accounts[17].is_signer);
        assert!(!ix.accounts[17].is_writable);
        assert_eq!(ix.data, expected_payload);
    }

    #[test]
    fn decoder_recovers_swap_and_migration() {
        let mut tx = ParsedTransaction::new(Signature::default(), 10);

        let swap = full_swap().build().unwrap();
        AmmV4Decoder
            .decode(&view(&swap, &swap.payload()[1..]), &mut tx)
            .unwrap();
        assert_eq!(tx.swap_buys.len(), 1);
        let decoded = &tx.swap_buys[0];
        assert_eq!(decoded.instruction_index, 3);
        assert_eq!(decoded.owner, key(1));
        assert_eq!(decoded.amm_id, key(2));
        assert_eq!(decoded.source, wsol_account());
        assert_eq!(decoded.amount_in, 1_000_000);
        assert_eq!(decoded.minimum_amount_out, 900_000);

        let reverse = full_swap()
            .with_user_source_token(usdc_account())
            .with_user_destination_token(wsol_account())
            .build()
            .unwrap();
        AmmV4Decoder
            .decode(&view(&reverse, &reverse.payload()[1..]), &mut tx)
            .unwrap();
        assert_eq!(tx.swap_buys.len(), 2);

        let sell = full_swap()
            .with_user_source_token(key(40))
            .with_user_destination_token(wsol_account())
            .build()
            .unwrap();
        AmmV4Decoder
            .decode(&view(&sell, &sell.payload()[1..]), &mut tx)
            .unwrap();
        assert_eq!(tx.swap_sells.len(), 1);
        assert_eq!(tx.swap_sells[0].source, key(40));

        let migrate = full_migrate().build().unwrap();
        AmmV4Decoder
            .decode(&view(&migrate, &migrate.payload()[1..]), &mut tx)
            .unwrap();
        assert_eq!(tx.migrate.len(), 1);
        assert_eq!(tx.migrate[0].from_pool, key(2));
        assert_eq!(tx.migrate[0].to_pool, key(3));
        assert_eq!(tx.migrate[0].amount, 1_000_000);
    }

    #[test]
    fn decoder_rejects_truncated_account_list() {
        let swap = full_swap().build().unwrap();
        let mut short = view(&swap, &swap.payload()[1..]);
        short.accounts.truncate(10);
        let mut tx = ParsedTransaction::new(Signature::default(), 10);
        assert!(AmmV4Decoder.decode(&short, &mut tx).is_err());
        assert!(tx.is_empty());
    }
}
