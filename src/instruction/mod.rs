pub mod payload;

use borsh::BorshSerialize;
use serde::Serialize;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::programs::Program;

/// Semantic meaning of one slot in an instruction's account list.
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
pub enum AccountRole {
    TokenProgram,
    SystemProgram,
    AmmId,
    AmmAuthority,
    AmmOpenOrders,
    AmmTargetOrders,
    PoolCoinToken,
    PoolPcToken,
    SerumProgram,
    SerumMarket,
    SerumBids,
    SerumAsks,
    SerumEventQueue,
    SerumCoinVault,
    SerumPcVault,
    SerumVaultSigner,
    UserSourceToken,
    UserDestinationToken,
    UserOwner,
    UserAuthority,
    TokenMint,
    Pool,
    PoolAuthority,
    TokenVault,
    SolVault,
    UserTokenAccount,
    UserSolAccount,
    Payer,
    MintAuthority,
    FreezeAuthority,
    FromPool,
    ToPool,
    TokenAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub role: AccountRole,
    pub is_signer: bool,
    pub is_writable: bool,
}

const fn readonly(role: AccountRole) -> RoleSpec {
    RoleSpec {
        role,
        is_signer: false,
        is_writable: false,
    }
}

const fn writable(role: AccountRole) -> RoleSpec {
    RoleSpec {
        role,
        is_signer: false,
        is_writable: true,
    }
}

const fn readonly_signer(role: AccountRole) -> RoleSpec {
    RoleSpec {
        role,
        is_signer: true,
        is_writable: false,
    }
}

const fn writable_signer(role: AccountRole) -> RoleSpec {
    RoleSpec {
        role,
        is_signer: true,
        is_writable: true,
    }
}

const SWAP_LAYOUT: [RoleSpec; 18] = [
    readonly(AccountRole::TokenProgram),
    writable(AccountRole::AmmId),
    readonly(AccountRole::AmmAuthority),
    writable(AccountRole::AmmOpenOrders),
    writable(AccountRole::AmmTargetOrders),
    writable(AccountRole::PoolCoinToken),
    writable(AccountRole::PoolPcToken),
    readonly(AccountRole::SerumProgram),
    writable(AccountRole::SerumMarket),
    writable(AccountRole::SerumBids),
    writable(AccountRole::SerumAsks),
    writable(AccountRole::SerumEventQueue),
    writable(AccountRole::SerumCoinVault),
    writable(AccountRole::SerumPcVault),
    readonly(AccountRole::SerumVaultSigner),
    writable(AccountRole::UserSourceToken),
    writable(AccountRole::UserDestinationToken),
    readonly_signer(AccountRole::UserOwner),
];

// Shared by buy and sell: signer first, then mint, then pool.
const TRADE_LAYOUT: [RoleSpec; 10] = [
    writable_signer(AccountRole::UserAuthority),
    readonly(AccountRole::TokenMint),
    writable(AccountRole::Pool),
    readonly(AccountRole::PoolAuthority),
    writable(AccountRole::TokenVault),
    writable(AccountRole::SolVault),
    writable(AccountRole::UserTokenAccount),
    writable(AccountRole::UserSolAccount),
    readonly(AccountRole::TokenProgram),
    readonly(AccountRole::SystemProgram),
];

const CREATE_POOL_LAYOUT: [RoleSpec; 6] = [
    writable_signer(AccountRole::Payer),
    writable_signer(AccountRole::TokenMint),
    writable(AccountRole::Pool),
    readonly(AccountRole::MintAuthority),
    readonly(AccountRole::FreezeAuthority),
    readonly(AccountRole::TokenProgram),
];

const MIGRATE_LAYOUT: [RoleSpec; 5] = [
    writable_signer(AccountRole::UserAuthority),
    writable(AccountRole::FromPool),
    writable(AccountRole::ToPool),
    writable(AccountRole::TokenAccount),
    readonly(AccountRole::TokenProgram),
];

/// One entry per action family. Builders and the transaction parser both
/// resolve opcodes and account positions through this table.
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
pub enum InstructionKind {
    Swap,
    Migrate,
    CreatePool,
    Buy,
    Sell,
}

impl InstructionKind {
    pub const ALL: [Self; 5] = [
        Self::Swap,
        Self::Migrate,
        Self::CreatePool,
        Self::Buy,
        Self::Sell,
    ];

    pub const SWAP_OPCODE: u8 = 9;
    pub const MIGRATE_OPCODE: u8 = 5;
    pub const CREATE_POOL_OPCODE: u8 = 0;
    pub const BUY_OPCODE: u8 = 1;
    pub const SELL_OPCODE: u8 = 2;

    pub fn program(self) -> Program {
        match self {
            Self::Swap | Self::Migrate => Program::AmmV4,
            Self::CreatePool | Self::Buy | Self::Sell => Program::LaunchpadV1,
        }
    }

    pub fn opcode(self) -> u8 {
        match self {
            Self::Swap => Self::SWAP_OPCODE,
            Self::Migrate => Self::MIGRATE_OPCODE,
            Self::CreatePool => Self::CREATE_POOL_OPCODE,
            Self::Buy => Self::BUY_OPCODE,
            Self::Sell => Self::SELL_OPCODE,
        }
    }

    pub fn layout(self) -> &'static [RoleSpec] {
        match self {
            Self::Swap => &SWAP_LAYOUT,
            Self::Migrate => &MIGRATE_LAYOUT,
            Self::CreatePool => &CREATE_POOL_LAYOUT,
            Self::Buy | Self::Sell => &TRADE_LAYOUT,
        }
    }

    pub fn account_count(self) -> usize {
        self.layout().len()
    }

    /// Position of `role` in this kind's account list.
    pub fn position(self, role: AccountRole) -> Option<usize> {
        self.layout().iter().position(|spec| spec.role == role)
    }

    pub fn from_opcode(program: Program, opcode: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.program() == program && kind.opcode() == opcode)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Migrate => "migrate",
            Self::CreatePool => "create_pool",
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub pubkey: Pubkey,
    pub role: AccountRole,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A fully assembled instruction: program id, ordered accounts and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDescriptor {
    kind: InstructionKind,
    program_id: Pubkey,
    accounts: Vec<AccountRef>,
    payload: Vec<u8>,
}

impl InstructionDescriptor {
    pub(crate) fn assemble<const N: usize, T: BorshSerialize>(
        kind: InstructionKind,
        keys: [Pubkey; N],
        args: &T,
    ) -> Result<Self, Error> {
        let layout = kind.layout();
        if layout.len() != N {
            return Err(Error::Payload {
                reason: format!(
                    "{kind} expects {} accounts, builder supplied {N}",
                    layout.len()
                ),
            });
        }

        let accounts = keys
            .into_iter()
            .zip(layout)
            .map(|(pubkey, spec)| AccountRef {
                pubkey,
                role: spec.role,
                is_signer: spec.is_signer,
                is_writable: spec.is_writable,
            })
            .collect();

        Ok(Self {
            kind,
            program_id: kind.program().program_id(),
            accounts,
            payload: payload::encode(kind, args)?,
        })
    }

    pub fn kind(&self) -> InstructionKind {
        self.kind
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn accounts(&self) -> &[AccountRef] {
        &self.accounts
    }

    pub fn account(&self, role: AccountRole) -> Option<&AccountRef> {
        self.accounts.iter().find(|account| account.role == role)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl From<InstructionDescriptor> for Instruction {
    fn from(descriptor: InstructionDescriptor) -> Self {
        let accounts = descriptor
            .accounts
            .iter()
            .map(|account| {
                if account.is_writable {
                    AccountMeta::new(account.pubkey, account.is_signer)
                } else {
                    AccountMeta::new_readonly(account.pubkey, account.is_signer)
                }
            })
            .collect();

        Instruction {
            program_id: descriptor.program_id,
            accounts,
            data: descriptor.payload,
        }
    }
}

pub(crate) fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or(Error::MissingField { field })
}

pub(crate) fn required_str(value: &Option<String>, field: &'static str) -> Result<String, Error> {
    value.clone().ok_or(Error::MissingField { field })
}

/// Generates consuming `with_*` setters for `Option` fields of a builder
/// config. Later calls overwrite earlier ones.
macro_rules! with_setters {
    ($ty:ty { $($setter:ident => $field:ident : $value:ty),* $(,)? }) => {
        impl $ty {
            $(
                pub fn $setter(mut self, value: $value) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*
        }
    };
}

pub(crate) use with_setters;
