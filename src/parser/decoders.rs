use borsh::BorshDeserialize;
use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::instruction::{AccountRole, InstructionKind, payload};
use crate::programs::Program;
use crate::programs::amm_v4::AmmV4Decoder;
use crate::programs::launchpad::LaunchpadDecoder;
use crate::types::ParsedTransaction;

/// An instruction account resolved against the enclosing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// One classified instruction, ready for a program decoder.
#[derive(Debug, Clone)]
pub struct InstructionView<'a> {
    /// Position within the message's top-level instructions.
    pub index: usize,
    pub kind: InstructionKind,
    pub accounts: Vec<ResolvedAccount>,
    /// Instruction data after the opcode byte.
    pub args: &'a [u8],
}

impl InstructionView<'_> {
    pub fn account(&self, role: AccountRole) -> Result<&ResolvedAccount, Error> {
        let position = self.kind.position(role).ok_or_else(|| Error::Decode {
            reason: format!("{} has no {role} account", self.kind),
        })?;
        self.accounts.get(position).ok_or_else(|| Error::Decode {
            reason: format!(
                "{} expects {role} at position {position}, instruction has {} accounts",
                self.kind,
                self.accounts.len()
            ),
        })
    }

    pub fn key(&self, role: AccountRole) -> Result<Pubkey, Error> {
        self.account(role).map(|account| account.pubkey)
    }

    pub fn args<T: BorshDeserialize>(&self) -> Result<T, Error> {
        payload::decode(self.kind, self.args)
    }
}

pub trait ProgramDecoder: Sync {
    fn program(&self) -> Program;

    fn classify(&self, opcode: u8) -> Option<InstructionKind> {
        InstructionKind::from_opcode(self.program(), opcode)
    }

    fn decode(&self, ix: &InstructionView<'_>, tx: &mut ParsedTransaction) -> Result<(), Error>;
}

/// Programs that are recognized but carry no instruction decoder return
/// `None`; their instructions are skipped.
pub fn decoder_for(program: Program) -> Option<&'static dyn ProgramDecoder> {
    match program {
        Program::AmmV4 => Some(&AmmV4Decoder),
        Program::LaunchpadV1 => Some(&LaunchpadDecoder),
        Program::AmmV5 | Program::Staking | Program::Liquidity => None,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    fn account(n: u8, is_signer: bool) -> ResolvedAccount {
        ResolvedAccount {
            pubkey: Pubkey::new_from_array([n; 32]),
            is_signer,
            is_writable: true,
        }
    }

    #[test]
    fn decoder_selection_matches_program() {
        assert_eq!(
            decoder_for(Program::AmmV4).unwrap().program(),
            Program::AmmV4
        );
        assert_eq!(
            decoder_for(Program::LaunchpadV1).unwrap().program(),
            Program::LaunchpadV1
        );
        assert!(decoder_for(Program::AmmV5).is_none());
        assert!(decoder_for(Program::Staking).is_none());
        assert!(decoder_for(Program::Liquidity).is_none());
    }

    #[test]
    fn classify_uses_program_opcodes() {
        let amm = decoder_for(Program::AmmV4).unwrap();
        assert_eq!(amm.classify(9), Some(InstructionKind::Swap));
        assert_eq!(amm.classify(5), Some(InstructionKind::Migrate));
        assert_eq!(amm.classify(1), None);

        let launchpad = decoder_for(Program::LaunchpadV1).unwrap();
        assert_eq!(launchpad.classify(0), Some(InstructionKind::CreatePool));
        assert_eq!(launchpad.classify(1), Some(InstructionKind::Buy));
        assert_eq!(launchpad.classify(2), Some(InstructionKind::Sell));
        assert_eq!(launchpad.classify(9), None);
    }

    #[test]
    fn view_resolves_roles_by_position() {
        let view = InstructionView {
            index: 0,
            kind: InstructionKind::Buy,
            accounts: (0..10).map(|n| account(n, n == 0)).collect(),
            args: &[],
        };
        assert_eq!(
            view.key(AccountRole::Pool).unwrap(),
            Pubkey::new_from_array([2; 32])
        );
        assert!(view.account(AccountRole::UserAuthority).unwrap().is_signer);
        assert!(matches!(
            view.account(AccountRole::AmmId),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn view_reports_short_account_list() {
        let view = InstructionView {
            index: 0,
            kind: InstructionKind::Buy,
            accounts: vec![account(0, true)],
            args: &[],
        };
        assert!(view.key(AccountRole::UserAuthority).is_ok());
        assert!(matches!(
            view.key(AccountRole::TokenMint),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn view_decodes_args_for_its_kind() {
        let mut data = 7_u64.to_le_bytes().to_vec();
        data.extend_from_slice(&3_u64.to_le_bytes());
        let view = InstructionView {
            index: 0,
            kind: InstructionKind::Sell,
            accounts: Vec::new(),
            args: &data,
        };
        let args = view.args::<payload::TradeArgs>().unwrap();
        assert_eq!(args.amount, 7);
        assert_eq!(args.sol_limit, 3);
    }
}
