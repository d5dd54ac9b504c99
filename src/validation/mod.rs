use serde::{Deserialize, Serialize};
use solana_signature::Signature;

use crate::types::ParsedTransaction;

/// Bounds applied by [`validate_transaction_with`]. Missing fields fall back
/// to the defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub min_slot: u64,
    pub max_slot: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_slot: 1,
            max_slot: 1_000_000_000,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueKind {
    ZeroSignature,
    ImplausibleSlot,
    TradeIndexOutOfRange,
    TradeIndexPartition,
    TradeDirectionMismatch,
    DuplicateCreateMint,
    InvalidMigration,
    ZeroAmount,
    UnverifiedSigner,
    OutOfOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

type Check = fn(&ParsedTransaction, &ValidatorConfig, &mut Vec<ValidationIssue>);

const CHECKS: [Check; 10] = [
    check_signature,
    check_slot,
    check_trade_index_range,
    check_trade_partition,
    check_trade_direction,
    check_create_mints,
    check_migrations,
    check_amounts,
    check_signers,
    check_order,
];

pub fn validate_transaction(tx: &ParsedTransaction) -> Vec<ValidationIssue> {
    validate_transaction_with(tx, &ValidatorConfig::default())
}

/// Runs every check and collects all issues. An empty result means the
/// transaction is consistent.
pub fn validate_transaction_with(
    tx: &ParsedTransaction,
    config: &ValidatorConfig,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for check in CHECKS {
        check(tx, config, &mut issues);
    }
    issues
}

fn check_signature(tx: &ParsedTransaction, _: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    if tx.signature == Signature::default() {
        out.push(ValidationIssue::new(
            IssueKind::ZeroSignature,
            "transaction signature is all zeros",
        ));
    }
}

fn check_slot(tx: &ParsedTransaction, config: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    if !(config.min_slot..=config.max_slot).contains(&tx.slot) {
        out.push(ValidationIssue::new(
            IssueKind::ImplausibleSlot,
            format!(
                "slot {} outside [{}, {}]",
                tx.slot, config.min_slot, config.max_slot
            ),
        ));
    }
}

fn check_trade_index_range(
    tx: &ParsedTransaction,
    _: &ValidatorConfig,
    out: &mut Vec<ValidationIssue>,
) {
    let sides = [("buy", &tx.trade_buys), ("sell", &tx.trade_sells)];
    for (side, indices) in sides {
        for &i in indices {
            if i >= tx.trade.len() {
                out.push(ValidationIssue::new(
                    IssueKind::TradeIndexOutOfRange,
                    format!(
                        "{side} index {i} out of range for {} trades",
                        tx.trade.len()
                    ),
                ));
            }
        }
    }
}

fn check_trade_partition(
    tx: &ParsedTransaction,
    _: &ValidatorConfig,
    out: &mut Vec<ValidationIssue>,
) {
    let mut seen = vec![0_usize; tx.trade.len()];
    for &i in tx.trade_buys.iter().chain(&tx.trade_sells) {
        if let Some(count) = seen.get_mut(i) {
            *count += 1;
        }
    }
    for (i, count) in seen.into_iter().enumerate() {
        match count {
            1 => {}
            0 => out.push(ValidationIssue::new(
                IssueKind::TradeIndexPartition,
                format!("trade {i} is in neither the buy nor the sell set"),
            )),
            n => out.push(ValidationIssue::new(
                IssueKind::TradeIndexPartition,
                format!("trade {i} is listed {n} times across buy and sell sets"),
            )),
        }
    }
}

fn check_trade_direction(
    tx: &ParsedTransaction,
    _: &ValidatorConfig,
    out: &mut Vec<ValidationIssue>,
) {
    let sides = [(true, &tx.trade_buys), (false, &tx.trade_sells)];
    for (expect_buy, indices) in sides {
        for &i in indices {
            if let Some(trade) = tx.trade.get(i)
                && trade.is_buy != expect_buy
            {
                let listed = if expect_buy { "buy" } else { "sell" };
                out.push(ValidationIssue::new(
                    IssueKind::TradeDirectionMismatch,
                    format!("trade {i} is listed as a {listed} but is_buy={}", trade.is_buy),
                ));
            }
        }
    }
}

fn check_create_mints(
    tx: &ParsedTransaction,
    _: &ValidatorConfig,
    out: &mut Vec<ValidationIssue>,
) {
    for (i, create) in tx.create.iter().enumerate() {
        if tx.create[..i].iter().any(|earlier| earlier.mint == create.mint) {
            out.push(ValidationIssue::new(
                IssueKind::DuplicateCreateMint,
                format!("mint {} created more than once", create.mint),
            ));
        }
    }
}

fn check_migrations(tx: &ParsedTransaction, _: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    for migration in &tx.migrate {
        if migration.from_pool == migration.to_pool {
            out.push(ValidationIssue::new(
                IssueKind::InvalidMigration,
                format!(
                    "migration at instruction {} moves pool {} onto itself",
                    migration.instruction_index, migration.from_pool
                ),
            ));
        }
        if migration.amount == 0 {
            out.push(ValidationIssue::new(
                IssueKind::InvalidMigration,
                format!(
                    "migration at instruction {} has zero amount",
                    migration.instruction_index
                ),
            ));
        }
    }
}

fn check_amounts(tx: &ParsedTransaction, _: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    for trade in &tx.trade {
        if trade.token_amount == 0 {
            out.push(ValidationIssue::new(
                IssueKind::ZeroAmount,
                format!("trade at instruction {} has zero token amount", trade.instruction_index),
            ));
        }
    }
    for swap in tx.swap_buys.iter().chain(&tx.swap_sells) {
        if swap.amount_in == 0 {
            out.push(ValidationIssue::new(
                IssueKind::ZeroAmount,
                format!("swap at instruction {} has zero amount in", swap.instruction_index),
            ));
        }
    }
}

fn check_signers(tx: &ParsedTransaction, _: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    for create in tx.create.iter().filter(|c| !c.signer_verified) {
        out.push(ValidationIssue::new(
            IssueKind::UnverifiedSigner,
            format!(
                "creator {} at instruction {} did not sign",
                create.creator, create.instruction_index
            ),
        ));
    }
    for trade in tx.trade.iter().filter(|t| !t.signer_verified) {
        out.push(ValidationIssue::new(
            IssueKind::UnverifiedSigner,
            format!(
                "trader {} at instruction {} did not sign",
                trade.user, trade.instruction_index
            ),
        ));
    }
}

fn check_order(tx: &ParsedTransaction, _: &ValidatorConfig, out: &mut Vec<ValidationIssue>) {
    let accumulators: [(&str, Vec<usize>); 5] = [
        ("create", tx.create.iter().map(|r| r.instruction_index).collect()),
        ("trade", tx.trade.iter().map(|r| r.instruction_index).collect()),
        ("migrate", tx.migrate.iter().map(|r| r.instruction_index).collect()),
        ("swap_buys", tx.swap_buys.iter().map(|r| r.instruction_index).collect()),
        ("swap_sells", tx.swap_sells.iter().map(|r| r.instruction_index).collect()),
    ];
    for (name, indices) in accumulators {
        if indices.windows(2).any(|pair| pair[0] > pair[1]) {
            out.push(ValidationIssue::new(
                IssueKind::OutOfOrder,
                format!("{name} records are not in instruction order"),
            ));
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::types::{CreateInfo, Migration, SwapInfo, TradeInfo};
    use solana_pubkey::Pubkey;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn signed_tx() -> ParsedTransaction {
        ParsedTransaction::new(Signature::from([7_u8; 64]), 250_000_000)
    }

    fn trade(index: usize, is_buy: bool) -> TradeInfo {
        TradeInfo {
            instruction_index: index,
            user: key(1),
            mint: key(2),
            pool: key(3),
            token_vault: key(4),
            sol_vault: key(5),
            token_amount: 1_000,
            sol_limit: 10,
            is_buy,
            signer_verified: true,
        }
    }

    fn create(index: usize, mint: Pubkey) -> CreateInfo {
        CreateInfo {
            instruction_index: index,
            creator: key(1),
            mint,
            pool: key(3),
            mint_authority: key(4),
            freeze_authority: key(5),
            name: "Test Token".to_string(),
            symbol: "TEST".to_string(),
            uri: "https://example.com/token.json".to_string(),
            decimals: 6,
            initial_supply: 1_000_000,
            signer_verified: true,
        }
    }

    fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
        issues.iter().map(|issue| issue.kind).collect()
    }

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        *state
    }

    #[test]
    fn empty_signed_transaction_is_valid() {
        assert!(validate_transaction(&signed_tx()).is_empty());
    }

    #[test]
    fn default_signature_and_zero_slot_are_flagged() {
        let tx = ParsedTransaction::new(Signature::default(), 0);
        assert_eq!(
            kinds(&validate_transaction(&tx)),
            vec![IssueKind::ZeroSignature, IssueKind::ImplausibleSlot]
        );
    }

    #[test]
    fn slot_bounds_come_from_config() {
        let tx = signed_tx();
        let tight = ValidatorConfig {
            min_slot: 1,
            max_slot: 100,
        };
        assert_eq!(
            kinds(&validate_transaction_with(&tx, &tight)),
            vec![IssueKind::ImplausibleSlot]
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ValidatorConfig = serde_json::from_str(r#"{"max_slot": 42}"#).unwrap();
        assert_eq!(config.min_slot, 1);
        assert_eq!(config.max_slot, 42);
    }

    #[test]
    fn out_of_range_index_does_not_stop_other_checks() {
        let mut tx = signed_tx();
        tx.push_trade(trade(0, true));
        tx.trade_buys.push(5);
        tx.trade[0].signer_verified = false;
        let found = kinds(&validate_transaction(&tx));
        assert!(found.contains(&IssueKind::TradeIndexOutOfRange));
        assert!(found.contains(&IssueKind::UnverifiedSigner));
        assert!(!found.contains(&IssueKind::TradeIndexPartition));
    }

    #[test]
    fn overlapping_and_missing_indices_break_partition() {
        let mut tx = signed_tx();
        tx.push_trade(trade(0, true));
        tx.push_trade(trade(1, false));
        tx.trade_sells.clear();
        tx.trade_sells.push(0);
        let issues = validate_transaction(&tx);
        let partition: Vec<&ValidationIssue> = issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::TradeIndexPartition)
            .collect();
        assert_eq!(partition.len(), 2);
        assert!(
            kinds(&issues).contains(&IssueKind::TradeDirectionMismatch),
            "{issues:?}"
        );
    }

    #[test]
    fn duplicate_mints_and_bad_migrations() {
        let mut tx = signed_tx();
        tx.push_create(create(0, key(9)));
        tx.push_create(create(1, key(9)));
        tx.push_migration(Migration {
            instruction_index: 2,
            authority: key(1),
            from_pool: key(3),
            to_pool: key(3),
            token_account: key(4),
            amount: 0,
        });
        assert_eq!(
            kinds(&validate_transaction(&tx)),
            vec![
                IssueKind::DuplicateCreateMint,
                IssueKind::InvalidMigration,
                IssueKind::InvalidMigration,
            ]
        );
    }

    #[test]
    fn zero_amounts_and_ordering() {
        let mut tx = signed_tx();
        let swap = |index, amount_in| SwapInfo {
            instruction_index: index,
            owner: key(1),
            amm_id: key(2),
            source: key(7),
            destination: key(8),
            amount_in,
            minimum_amount_out: 1,
        };
        tx.push_swap(swap(4, 10));
        tx.push_swap(swap(2, 0));
        let found = kinds(&validate_transaction(&tx));
        assert_eq!(found, vec![IssueKind::ZeroAmount, IssueKind::OutOfOrder]);
    }

    #[test]
    fn issue_kinds_render_as_snake_case() {
        assert_eq!(IssueKind::TradeIndexOutOfRange.to_string(), "trade_index_out_of_range");
        let json = serde_json::to_value(ValidationIssue::new(IssueKind::ZeroAmount, "x")).unwrap();
        assert_eq!(json["kind"], "zero_amount");
    }

    #[test]
    fn push_trade_sequences_always_validate() {
        let mut state = 0x5eed_u64;
        for _ in 0..200 {
            let mut tx = signed_tx();
            let len = usize::try_from(lcg_next(&mut state) % 12).unwrap();
            for index in 0..len {
                tx.push_trade(trade(index, lcg_next(&mut state) % 2 == 0));
            }
            assert!(validate_transaction(&tx).is_empty(), "{tx:?}");
        }
    }
}
