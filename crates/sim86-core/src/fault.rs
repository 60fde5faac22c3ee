use thiserror::Error;

/// Fault classes used for reporting and halt policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// The decoder could not produce an instruction.
    Decode,
    /// A memory access fell outside the memory array.
    Memory,
    /// The instruction was decoded but cannot be executed.
    Execute,
    /// Cycle estimation had no table entry for an operand.
    Timing,
}

/// Stable fault taxonomy for decode, execute, and estimation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// No known opcode at the current instruction pointer.
    #[error("unrecognized instruction")]
    UnrecognizedInstruction = 0x01,
    /// The program ended in the middle of an instruction.
    #[error("instruction truncated by end of program")]
    TruncatedInstruction = 0x02,
    /// An effective address resolved outside the memory array.
    #[error("memory address out of range")]
    AddressOutOfRange = 0x03,
    /// The operation is recognized but has no executor.
    #[error("operation not implemented")]
    UnimplementedOperation = 0x04,
    /// The executor does not accept this operand combination.
    #[error("unsupported operand combination")]
    UnsupportedOperands = 0x05,
    /// A memory operand was used while memory-operand support is disabled.
    #[error("memory operands are disabled")]
    MemoryOperandsDisabled = 0x06,
    /// The addressing-mode shape has no entry in the cycle cost table.
    #[error("no cycle cost for addressing-mode shape")]
    UnmatchedAddressShape = 0x07,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::UnrecognizedInstruction),
            0x02 => Some(Self::TruncatedInstruction),
            0x03 => Some(Self::AddressOutOfRange),
            0x04 => Some(Self::UnimplementedOperation),
            0x05 => Some(Self::UnsupportedOperands),
            0x06 => Some(Self::MemoryOperandsDisabled),
            0x07 => Some(Self::UnmatchedAddressShape),
            _ => None,
        }
    }

    /// Returns the reporting class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::UnrecognizedInstruction | Self::TruncatedInstruction => FaultClass::Decode,
            Self::AddressOutOfRange => FaultClass::Memory,
            Self::UnimplementedOperation
            | Self::UnsupportedOperands
            | Self::MemoryOperandsDisabled => FaultClass::Execute,
            Self::UnmatchedAddressShape => FaultClass::Timing,
        }
    }

    /// Faults that stop the execution loop.
    ///
    /// Execute-class faults skip the instruction and the loop continues.
    /// Timing faults are terminal only under strict cycle estimation, which
    /// the loop decides from its configuration.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self.class(), FaultClass::Decode | FaultClass::Memory)
    }
}
