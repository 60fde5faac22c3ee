/// Number of register slots in the register file (slot 0 is reserved).
pub const REGISTER_SLOT_COUNT: usize = 9;
/// `FLAGS` bit for a zero result.
pub const FLAGS_ZERO: u16 = 0x0040;
/// `FLAGS` bit for a negative (bit 15 set) result.
pub const FLAGS_SIGN: u16 = 0x0080;
/// Mask of the `FLAGS` bits maintained by the core.
pub const FLAGS_TRACKED_MASK: u16 = FLAGS_ZERO | FLAGS_SIGN;

/// Addressable 16-bit register, numbered by the decoder's register-index convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    Ax = 1,
    Bx = 2,
    Cx = 3,
    Dx = 4,
    Sp = 5,
    Bp = 6,
    Si = 7,
    Di = 8,
}

impl Register {
    /// Addressable registers in slot order.
    pub const ALL: [Self; 8] = [
        Self::Ax,
        Self::Bx,
        Self::Cx,
        Self::Dx,
        Self::Sp,
        Self::Bp,
        Self::Si,
        Self::Di,
    ];

    /// Returns the register-file slot for this register (`1..=8`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a register-file slot back to its register.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Self::Ax),
            2 => Some(Self::Bx),
            3 => Some(Self::Cx),
            4 => Some(Self::Dx),
            5 => Some(Self::Sp),
            6 => Some(Self::Bp),
            7 => Some(Self::Si),
            8 => Some(Self::Di),
            _ => None,
        }
    }

    /// Lower-case name of the full 16-bit register.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ax => "ax",
            Self::Bx => "bx",
            Self::Cx => "cx",
            Self::Dx => "dx",
            Self::Sp => "sp",
            Self::Bp => "bp",
            Self::Si => "si",
            Self::Di => "di",
        }
    }

    /// Returns true for the four registers with separately addressable bytes.
    #[must_use]
    pub const fn has_byte_halves(self) -> bool {
        matches!(self, Self::Ax | Self::Bx | Self::Cx | Self::Dx)
    }
}

/// Which part of a register an operand touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterPart {
    /// Bits 0..8 (`al`, `bl`, ...).
    Low,
    /// Bits 8..16 (`ah`, `bh`, ...).
    High,
    /// All 16 bits.
    Word,
}

/// A register operand: a register plus the part being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterAccess {
    /// Register slot accessed.
    pub register: Register,
    /// Byte or word selection.
    pub part: RegisterPart,
}

impl RegisterAccess {
    /// Full-width access to `register`.
    #[must_use]
    pub const fn word(register: Register) -> Self {
        Self {
            register,
            part: RegisterPart::Word,
        }
    }

    /// Low-byte access to `register`.
    #[must_use]
    pub const fn low(register: Register) -> Self {
        Self {
            register,
            part: RegisterPart::Low,
        }
    }

    /// High-byte access to `register`.
    #[must_use]
    pub const fn high(register: Register) -> Self {
        Self {
            register,
            part: RegisterPart::High,
        }
    }

    /// Returns true when the access covers the whole register.
    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self.part, RegisterPart::Word)
    }

    /// Assembly name of the accessed register part (`ax`, `al`, `ah`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match (self.register, self.part) {
            (Register::Ax, RegisterPart::Low) => "al",
            (Register::Ax, RegisterPart::High) => "ah",
            (Register::Bx, RegisterPart::Low) => "bl",
            (Register::Bx, RegisterPart::High) => "bh",
            (Register::Cx, RegisterPart::Low) => "cl",
            (Register::Cx, RegisterPart::High) => "ch",
            (Register::Dx, RegisterPart::Low) => "dl",
            (Register::Dx, RegisterPart::High) => "dh",
            (register, _) => register.name(),
        }
    }
}

/// Register slot storage for the simulated core.
///
/// Slot 0 is reserved and never written by instruction execution; slots
/// `1..=8` hold `ax, bx, cx, dx, sp, bp, si, di`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    slots: [u16; REGISTER_SLOT_COUNT],
}

impl RegisterFile {
    /// Reads a full 16-bit register.
    #[must_use]
    pub const fn get(&self, register: Register) -> u16 {
        self.slots[register.index()]
    }

    /// Writes a full 16-bit register.
    pub const fn set(&mut self, register: Register, value: u16) {
        self.slots[register.index()] = value;
    }

    /// Reads the part of a register selected by `access`, zero-extended.
    #[must_use]
    pub const fn read(&self, access: RegisterAccess) -> u16 {
        let value = self.get(access.register);
        match access.part {
            RegisterPart::Low => value & 0x00FF,
            RegisterPart::High => value >> 8,
            RegisterPart::Word => value,
        }
    }

    /// Writes the part of a register selected by `access`.
    ///
    /// Byte writes take the low 8 bits of `value` and keep the other half.
    pub const fn write(&mut self, access: RegisterAccess, value: u16) {
        let current = self.get(access.register);
        let next = match access.part {
            RegisterPart::Low => (current & 0xFF00) | (value & 0x00FF),
            RegisterPart::High => (current & 0x00FF) | ((value & 0x00FF) << 8),
            RegisterPart::Word => value,
        };
        self.set(access.register, next);
    }

    /// Raw view of all slots, including reserved slot 0.
    #[must_use]
    pub const fn slots(&self) -> &[u16; REGISTER_SLOT_COUNT] {
        &self.slots
    }

    /// Display name of a raw slot index.
    #[must_use]
    pub const fn slot_name(index: usize) -> &'static str {
        match Register::from_index(index) {
            Some(register) => register.name(),
            None => "reserved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Register, RegisterAccess, RegisterFile, FLAGS_SIGN, FLAGS_TRACKED_MASK, FLAGS_ZERO,
        REGISTER_SLOT_COUNT,
    };

    #[test]
    fn register_indices_follow_decoder_convention() {
        assert_eq!(REGISTER_SLOT_COUNT, 9);

        for (slot, register) in (1_usize..).zip(Register::ALL) {
            assert_eq!(register.index(), slot);
            assert_eq!(Register::from_index(slot), Some(register));
        }

        assert!(Register::from_index(0).is_none());
        assert!(Register::from_index(9).is_none());
    }

    #[test]
    fn register_file_tracks_each_register_independently() {
        let mut registers = RegisterFile::default();

        for (offset, register) in (0_u16..).zip(Register::ALL) {
            registers.set(register, 0x1000 + offset);
        }

        for (offset, register) in (0_u16..).zip(Register::ALL) {
            assert_eq!(registers.get(register), 0x1000 + offset);
        }
        assert_eq!(registers.slots()[0], 0);
    }

    #[test]
    fn byte_writes_preserve_the_other_half() {
        let mut registers = RegisterFile::default();
        registers.set(Register::Cx, 0x1234);

        registers.write(RegisterAccess::low(Register::Cx), 0xABFF);
        assert_eq!(registers.get(Register::Cx), 0x12FF);

        registers.write(RegisterAccess::high(Register::Cx), 0x0056);
        assert_eq!(registers.get(Register::Cx), 0x56FF);

        assert_eq!(registers.read(RegisterAccess::low(Register::Cx)), 0x00FF);
        assert_eq!(registers.read(RegisterAccess::high(Register::Cx)), 0x0056);
        assert_eq!(registers.read(RegisterAccess::word(Register::Cx)), 0x56FF);
    }

    #[test]
    fn access_names_match_assembly_syntax() {
        assert_eq!(RegisterAccess::word(Register::Ax).name(), "ax");
        assert_eq!(RegisterAccess::low(Register::Bx).name(), "bl");
        assert_eq!(RegisterAccess::high(Register::Dx).name(), "dh");
        assert_eq!(RegisterAccess::word(Register::Si).name(), "si");
        assert_eq!(RegisterFile::slot_name(0), "reserved");
        assert_eq!(RegisterFile::slot_name(6), "bp");
    }

    #[test]
    fn tracked_flag_bits_are_sign_and_zero() {
        assert_eq!(FLAGS_SIGN, 0x0080);
        assert_eq!(FLAGS_ZERO, 0x0040);
        assert_eq!(FLAGS_TRACKED_MASK, 0x00C0);
    }
}
