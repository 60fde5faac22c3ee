//! Decoded instruction records consumed by the execution engine.
//!
//! These types are produced by an [`InstructionDecoder`](crate::InstructionDecoder)
//! and read, never modified, by the executors.

use crate::state::{Register, RegisterAccess};

/// Operation tag of a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Operation {
    Mov,
    Add,
    Sub,
    Cmp,
    Jne,
    Je,
    Jl,
    Jle,
    Jb,
    Jbe,
    Jp,
    Jo,
    Js,
    Jnl,
    Jg,
    Jnb,
    Ja,
    Jnp,
    Jno,
    Jns,
    Loop,
    Loopz,
    Loopnz,
    Jcxz,
}

impl Operation {
    /// Lower-case assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Cmp => "cmp",
            Self::Jne => "jne",
            Self::Je => "je",
            Self::Jl => "jl",
            Self::Jle => "jle",
            Self::Jb => "jb",
            Self::Jbe => "jbe",
            Self::Jp => "jp",
            Self::Jo => "jo",
            Self::Js => "js",
            Self::Jnl => "jnl",
            Self::Jg => "jg",
            Self::Jnb => "jnb",
            Self::Ja => "ja",
            Self::Jnp => "jnp",
            Self::Jno => "jno",
            Self::Jns => "jns",
            Self::Loop => "loop",
            Self::Loopz => "loopz",
            Self::Loopnz => "loopnz",
            Self::Jcxz => "jcxz",
        }
    }

    /// Returns true for operations the core has an executor for.
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        matches!(
            self,
            Self::Mov | Self::Add | Self::Sub | Self::Cmp | Self::Jne
        )
    }
}

/// Immediate operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Immediate {
    /// Sign-extended value.
    pub value: i32,
    /// Set when the value is a jump displacement relative to the next instruction.
    pub relative: bool,
}

impl Immediate {
    /// A plain (non-relative) immediate.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self {
            value,
            relative: false,
        }
    }

    /// A jump displacement.
    #[must_use]
    pub const fn relative(value: i32) -> Self {
        Self {
            value,
            relative: true,
        }
    }

    /// The value truncated to 16 bits, two's complement.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn as_u16(self) -> u16 {
        self.value as u16
    }
}

/// Memory operand addressing expression: up to two register terms and a displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EffectiveAddress {
    /// Base/index register terms; an empty slot contributes nothing.
    pub terms: [Option<Register>; 2],
    /// Signed constant displacement; `None` when absent.
    pub displacement: Option<i16>,
}

impl EffectiveAddress {
    /// `[base + index]` form.
    #[must_use]
    pub const fn pair(base: Register, index: Register) -> Self {
        Self {
            terms: [Some(base), Some(index)],
            displacement: None,
        }
    }

    /// `[register]` form.
    #[must_use]
    pub const fn register(register: Register) -> Self {
        Self {
            terms: [Some(register), None],
            displacement: None,
        }
    }

    /// Direct `[displacement]` form.
    #[must_use]
    pub const fn direct(displacement: i16) -> Self {
        Self {
            terms: [None, None],
            displacement: Some(displacement),
        }
    }

    /// Returns a copy carrying `displacement`.
    #[must_use]
    pub const fn with_displacement(mut self, displacement: i16) -> Self {
        self.displacement = Some(displacement);
        self
    }
}

/// One operand slot of a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operand {
    /// Unused slot.
    #[default]
    None,
    /// Register or register half.
    Register(RegisterAccess),
    /// Constant value or jump displacement.
    Immediate(Immediate),
    /// Memory cell addressed by an effective-address expression.
    Memory(EffectiveAddress),
}

impl Operand {
    /// Returns the addressing expression of a memory operand.
    #[must_use]
    pub const fn memory(&self) -> Option<&EffectiveAddress> {
        match self {
            Self::Memory(address) => Some(address),
            Self::None | Self::Register(_) | Self::Immediate(_) => None,
        }
    }
}

/// A fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instruction {
    /// Operation tag.
    pub op: Operation,
    /// Destination (slot 0) and source (slot 1) operands.
    pub operands: [Operand; 2],
    /// Word (`true`) or byte (`false`) operation width.
    pub wide: bool,
    /// Encoded length in bytes.
    pub size: u8,
}

impl Instruction {
    /// Builds a word-width instruction from its parts.
    #[must_use]
    pub const fn new(op: Operation, destination: Operand, source: Operand, size: u8) -> Self {
        Self {
            op,
            operands: [destination, source],
            wide: true,
            size,
        }
    }

    /// Returns a copy with the given operation width.
    #[must_use]
    pub const fn with_width(mut self, wide: bool) -> Self {
        self.wide = wide;
        self
    }

    /// Destination operand (slot 0).
    #[must_use]
    pub const fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    /// Source operand (slot 1).
    #[must_use]
    pub const fn source(&self) -> &Operand {
        &self.operands[1]
    }

    /// Returns true when any operand references memory.
    #[must_use]
    pub fn touches_memory(&self) -> bool {
        self.operands.iter().any(|operand| operand.memory().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectiveAddress, Immediate, Instruction, Operand, Operation};
    use crate::state::{Register, RegisterAccess};

    #[test]
    fn only_the_modelled_subset_is_implemented() {
        let implemented = [
            Operation::Mov,
            Operation::Add,
            Operation::Sub,
            Operation::Cmp,
            Operation::Jne,
        ];
        for op in implemented {
            assert!(op.is_implemented(), "{} should execute", op.mnemonic());
        }
        for op in [Operation::Je, Operation::Loop, Operation::Jcxz] {
            assert!(!op.is_implemented(), "{} should not execute", op.mnemonic());
        }
    }

    #[test]
    fn negative_immediates_truncate_to_twos_complement() {
        assert_eq!(Immediate::new(-1).as_u16(), 0xFFFF);
        assert_eq!(Immediate::relative(-5).as_u16(), 0xFFFB);
        assert_eq!(Immediate::new(0x1234).as_u16(), 0x1234);
    }

    #[test]
    fn touches_memory_checks_both_slots() {
        let reg_only = Instruction::new(
            Operation::Mov,
            Operand::Register(RegisterAccess::word(Register::Ax)),
            Operand::Immediate(Immediate::new(1)),
            3,
        );
        assert!(!reg_only.touches_memory());

        let store = Instruction::new(
            Operation::Mov,
            Operand::Memory(EffectiveAddress::pair(Register::Bx, Register::Si)),
            Operand::Register(RegisterAccess::word(Register::Ax)),
            2,
        );
        assert!(store.touches_memory());
        assert_eq!(
            store.destination().memory(),
            Some(&EffectiveAddress::pair(Register::Bx, Register::Si))
        );
    }
}
