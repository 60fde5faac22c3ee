use sim86_core::{Operation, Register, RegisterAccess};

/// Encoding layouts of the recognized first opcode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// `oooooodw mod reg r/m`: register to or from register/memory.
    RegMemWithReg(Operation),
    /// `1100011w mod 000 r/m data`: immediate to register/memory.
    ImmToRegMem(Operation),
    /// `1011wreg data`: immediate to register.
    ImmToReg(Operation),
    /// `1010000w addr`: memory to accumulator.
    MemToAcc(Operation),
    /// `1010001w addr`: accumulator to memory.
    AccToMem(Operation),
    /// `100000sw mod ooo r/m data`: arithmetic immediate, operation in `reg`.
    ArithImmToRegMem,
    /// `oooooo0w data`: arithmetic immediate to accumulator.
    ImmToAcc(Operation),
    /// `opcode disp8`: short relative jump or loop.
    ShortJump(Operation),
}

/// Single source-of-truth `(mask, pattern, form)` table for first opcode bytes.
///
/// A byte matches an entry when `byte & mask == pattern`. Bytes matching no
/// entry are unrecognized.
pub const OPCODE_TABLE: &[(u8, u8, Form)] = &[
    (0xFC, 0x88, Form::RegMemWithReg(Operation::Mov)),
    (0xFE, 0xC6, Form::ImmToRegMem(Operation::Mov)),
    (0xF0, 0xB0, Form::ImmToReg(Operation::Mov)),
    (0xFE, 0xA0, Form::MemToAcc(Operation::Mov)),
    (0xFE, 0xA2, Form::AccToMem(Operation::Mov)),
    (0xFC, 0x00, Form::RegMemWithReg(Operation::Add)),
    (0xFC, 0x28, Form::RegMemWithReg(Operation::Sub)),
    (0xFC, 0x38, Form::RegMemWithReg(Operation::Cmp)),
    (0xFC, 0x80, Form::ArithImmToRegMem),
    (0xFE, 0x04, Form::ImmToAcc(Operation::Add)),
    (0xFE, 0x2C, Form::ImmToAcc(Operation::Sub)),
    (0xFE, 0x3C, Form::ImmToAcc(Operation::Cmp)),
    (0xFF, 0x70, Form::ShortJump(Operation::Jo)),
    (0xFF, 0x71, Form::ShortJump(Operation::Jno)),
    (0xFF, 0x72, Form::ShortJump(Operation::Jb)),
    (0xFF, 0x73, Form::ShortJump(Operation::Jnb)),
    (0xFF, 0x74, Form::ShortJump(Operation::Je)),
    (0xFF, 0x75, Form::ShortJump(Operation::Jne)),
    (0xFF, 0x76, Form::ShortJump(Operation::Jbe)),
    (0xFF, 0x77, Form::ShortJump(Operation::Ja)),
    (0xFF, 0x78, Form::ShortJump(Operation::Js)),
    (0xFF, 0x79, Form::ShortJump(Operation::Jns)),
    (0xFF, 0x7A, Form::ShortJump(Operation::Jp)),
    (0xFF, 0x7B, Form::ShortJump(Operation::Jnp)),
    (0xFF, 0x7C, Form::ShortJump(Operation::Jl)),
    (0xFF, 0x7D, Form::ShortJump(Operation::Jnl)),
    (0xFF, 0x7E, Form::ShortJump(Operation::Jle)),
    (0xFF, 0x7F, Form::ShortJump(Operation::Jg)),
    (0xFF, 0xE0, Form::ShortJump(Operation::Loopnz)),
    (0xFF, 0xE1, Form::ShortJump(Operation::Loopz)),
    (0xFF, 0xE2, Form::ShortJump(Operation::Loop)),
    (0xFF, 0xE3, Form::ShortJump(Operation::Jcxz)),
];

/// Returns the encoding form of a first opcode byte.
#[must_use]
pub fn classify_opcode(byte: u8) -> Option<Form> {
    OPCODE_TABLE
        .iter()
        .find_map(|(mask, pattern, form)| (byte & mask == *pattern).then_some(*form))
}

/// Maps the `reg` extension of a `100000sw` instruction to its operation.
///
/// Only `add` (000), `sub` (101) and `cmp` (111) are recognized.
#[must_use]
pub const fn arithmetic_extension(reg: u8) -> Option<Operation> {
    match reg & 0x07 {
        0b000 => Some(Operation::Add),
        0b101 => Some(Operation::Sub),
        0b111 => Some(Operation::Cmp),
        _ => None,
    }
}

/// Decodes a 3-bit register field for a byte (`wide == false`) or word access.
#[must_use]
pub const fn register_field(field: u8, wide: bool) -> RegisterAccess {
    const WORD: [Register; 8] = [
        Register::Ax,
        Register::Cx,
        Register::Dx,
        Register::Bx,
        Register::Sp,
        Register::Bp,
        Register::Si,
        Register::Di,
    ];
    const BYTE: [Register; 4] = [Register::Ax, Register::Cx, Register::Dx, Register::Bx];

    let field = (field & 0x07) as usize;
    if wide {
        RegisterAccess::word(WORD[field])
    } else if field < 4 {
        RegisterAccess::low(BYTE[field])
    } else {
        RegisterAccess::high(BYTE[field - 4])
    }
}

/// Base/index register terms selected by the `r/m` field of a memory operand.
pub const RM_TERMS: [[Option<Register>; 2]; 8] = [
    [Some(Register::Bx), Some(Register::Si)],
    [Some(Register::Bx), Some(Register::Di)],
    [Some(Register::Bp), Some(Register::Si)],
    [Some(Register::Bp), Some(Register::Di)],
    [Some(Register::Si), None],
    [Some(Register::Di), None],
    [Some(Register::Bp), None],
    [Some(Register::Bx), None],
];
