pub mod amm_v4;
pub mod launchpad;

use serde::Serialize;
use solana_pubkey::{Pubkey, pubkey};

pub const RAYDIUM_AMM_V4_PROGRAM_ID: Pubkey =
    pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");
pub const RAYDIUM_AMM_V5_PROGRAM_ID: Pubkey =
    pubkey!("5quBtoiQqxF9Jv6KYKctB59NT3gtJD2Y65kdnB1Uev3h");
pub const RAYDIUM_STAKING_PROGRAM_ID: Pubkey =
    pubkey!("EhhTKczWMGQt46ynNeRX1WfeagwwJd7ufHvCDjRxjo5Q");
pub const RAYDIUM_LIQUIDITY_PROGRAM_ID: Pubkey =
    pubkey!("27haf8L6oxUeXrHrgEgsexjSY5hbVUWEmvv9Nyxg8vQv");
pub const RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID: Pubkey =
    pubkey!("LanMV9sAd7wArD4vJFi2qDdfnVhFxYSUg6eADduJ3uj");

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

pub const WSOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
pub const USDC_MINT: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
pub const USDT_MINT: Pubkey = pubkey!("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB");

const ALL_PROGRAM_IDS: [Pubkey; 5] = [
    RAYDIUM_AMM_V4_PROGRAM_ID,
    RAYDIUM_AMM_V5_PROGRAM_ID,
    RAYDIUM_STAKING_PROGRAM_ID,
    RAYDIUM_LIQUIDITY_PROGRAM_ID,
    RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID,
];

const BASE_CURRENCY_MINTS: [Pubkey; 3] = [WSOL_MINT, USDC_MINT, USDT_MINT];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Program {
    AmmV4,
    AmmV5,
    Staking,
    Liquidity,
    LaunchpadV1,
}

impl Program {
    pub const ALL: [Self; 5] = [
        Self::AmmV4,
        Self::AmmV5,
        Self::Staking,
        Self::Liquidity,
        Self::LaunchpadV1,
    ];

    pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|program| program.program_id() == *program_id)
    }

    pub fn program_id(self) -> Pubkey {
        match self {
            Self::AmmV4 => RAYDIUM_AMM_V4_PROGRAM_ID,
            Self::AmmV5 => RAYDIUM_AMM_V5_PROGRAM_ID,
            Self::Staking => RAYDIUM_STAKING_PROGRAM_ID,
            Self::Liquidity => RAYDIUM_LIQUIDITY_PROGRAM_ID,
            Self::LaunchpadV1 => RAYDIUM_LAUNCHPAD_V1_PROGRAM_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmmV4 => "amm_v4",
            Self::AmmV5 => "amm_v5",
            Self::Staking => "staking",
            Self::Liquidity => "liquidity",
            Self::LaunchpadV1 => "launchpad_v1",
        }
    }

    /// True for the AMM-family programs (everything except the launchpad).
    pub fn is_amm(self) -> bool {
        !matches!(self, Self::LaunchpadV1)
    }

    pub fn all_program_ids() -> &'static [Pubkey] {
        &ALL_PROGRAM_IDS
    }
}

pub fn is_known_program(program_id: &Pubkey) -> bool {
    ALL_PROGRAM_IDS.contains(program_id)
}

/// Base currencies are the reference side of a trade: wrapped SOL and the
/// two major stablecoins.
pub fn is_base_currency(mint: &Pubkey) -> bool {
    BASE_CURRENCY_MINTS.contains(mint)
}

/// Associated token account of `owner` for `mint` under the SPL Token program.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds = [owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()];
    Pubkey::find_program_address(&seeds, &ASSOCIATED_TOKEN_PROGRAM_ID).0
}

/// The base currency held in `account`, if it is `owner`'s associated token
/// account for one of the base mints.
pub fn base_currency_account_mint(owner: &Pubkey, account: &Pubkey) -> Option<Pubkey> {
    BASE_CURRENCY_MINTS
        .into_iter()
        .find(|mint| associated_token_address(owner, mint) == *account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enumerated_program_is_known() {
        for program in Program::ALL {
            assert!(is_known_program(&program.program_id()), "{program}");
            assert_eq!(
                Program::from_program_id(&program.program_id()),
                Some(program)
            );
        }
    }

    #[test]
    fn unrelated_ids_are_not_known() {
        assert!(!is_known_program(&TOKEN_PROGRAM_ID));
        assert!(!is_known_program(&SYSTEM_PROGRAM_ID));
        assert!(!is_known_program(&WSOL_MINT));
        assert_eq!(Program::from_program_id(&TOKEN_PROGRAM_ID), None);
    }

    #[test]
    fn amm_family_excludes_launchpad() {
        assert!(Program::AmmV4.is_amm());
        assert!(Program::AmmV5.is_amm());
        assert!(Program::Staking.is_amm());
        assert!(Program::Liquidity.is_amm());
        assert!(!Program::LaunchpadV1.is_amm());
    }

    #[test]
    fn base_currency_lookup() {
        assert!(is_base_currency(&WSOL_MINT));
        assert!(is_base_currency(&USDC_MINT));
        assert!(is_base_currency(&USDT_MINT));
        assert!(!is_base_currency(&SYSTEM_PROGRAM_ID));
        assert!(!is_base_currency(&RAYDIUM_AMM_V4_PROGRAM_ID));
    }

    #[test]
    fn base_currency_accounts_are_owner_atas() {
        let owner = Pubkey::new_from_array([7; 32]);
        let wsol_ata = associated_token_address(&owner, &WSOL_MINT);
        assert_ne!(wsol_ata, WSOL_MINT);
        assert_eq!(
            base_currency_account_mint(&owner, &wsol_ata),
            Some(WSOL_MINT)
        );
        let usdt_ata = associated_token_address(&owner, &USDT_MINT);
        assert_eq!(
            base_currency_account_mint(&owner, &usdt_ata),
            Some(USDT_MINT)
        );

        let other_owner = Pubkey::new_from_array([8; 32]);
        assert_eq!(base_currency_account_mint(&other_owner, &wsol_ata), None);
        assert_eq!(base_currency_account_mint(&owner, &WSOL_MINT), None);
        let token_ata = associated_token_address(&owner, &Pubkey::new_from_array([9; 32]));
        assert_eq!(base_currency_account_mint(&owner, &token_ata), None);
    }

    #[test]
    fn program_names_are_stable() {
        for program in Program::ALL {
            assert_eq!(program.as_str(), program.as_ref());
            assert_eq!(program.as_str(), program.to_string());
        }
        assert_eq!(Program::all_program_ids().len(), Program::ALL.len());
    }

    #[test]
    fn program_names_parse_back() {
        assert_eq!("launchpad_v1".parse::<Program>().ok(), Some(Program::LaunchpadV1));
        assert_eq!("amm_v4".parse::<Program>().ok(), Some(Program::AmmV4));
        assert_eq!("raydium".parse::<Program>().ok(), None);
    }
}
