//! Byte-level 8086 instruction decoder.
//!
//! Recognizes the `mov`, `add`, `sub` and `cmp` encodings plus the short
//! conditional jumps and loops, and produces [`Instruction`] records for the
//! execution engine.

use sim86_core::{
    DecodeError, EffectiveAddress, Immediate, Instruction, InstructionDecoder, Operand,
};

use crate::disasm::format_instruction;
use crate::table::{arithmetic_extension, classify_opcode, register_field, Form, RM_TERMS};

/// Interface version implemented by [`Decoder8086`].
pub const DECODER_VERSION: u32 = 4;

/// Longest encoding the decoder produces: opcode, ModRM, disp16, data16.
pub const MAX_INSTRUCTION_BYTES: usize = 6;

/// Forward-only reader over one instruction's bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(DecodeError::Truncated {
                needed: self.pos + 1,
                available: self.bytes.len(),
            })?;
        self.pos += 1;
        Ok(byte)
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        if self.bytes.len() < self.pos + 2 {
            return Err(DecodeError::Truncated {
                needed: self.pos + 2,
                available: self.bytes.len(),
            });
        }
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn i8(&mut self) -> Result<i8, DecodeError> {
        self.u8().map(|byte| byte as i8)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn i16(&mut self) -> Result<i16, DecodeError> {
        self.u16().map(|word| word as i16)
    }

    /// Reads immediate data: a word, a zero-extended byte, or (for the
    /// `s` bit) a sign-extended byte.
    fn data(&mut self, wide: bool, sign_extend: bool) -> Result<i32, DecodeError> {
        if wide && sign_extend {
            self.i8().map(i32::from)
        } else if wide {
            self.u16().map(i32::from)
        } else {
            self.u8().map(i32::from)
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn size(&self) -> u8 {
        self.pos as u8
    }
}

/// Fields of a ModRM byte.
#[derive(Debug, Clone, Copy)]
struct ModRm {
    mode: u8,
    reg: u8,
    rm: u8,
}

impl ModRm {
    const fn split(byte: u8) -> Self {
        Self {
            mode: byte >> 6,
            reg: (byte >> 3) & 0x07,
            rm: byte & 0x07,
        }
    }
}

/// Decodes the `mod`/`r/m` operand, reading any displacement that follows.
///
/// A zero 8- or 16-bit displacement is normalized to "absent"; the direct
/// address form always carries its address.
fn rm_operand(cursor: &mut Cursor<'_>, modrm: ModRm, wide: bool) -> Result<Operand, DecodeError> {
    match modrm.mode {
        0b11 => return Ok(Operand::Register(register_field(modrm.rm, wide))),
        0b00 if modrm.rm == 0b110 => {
            return Ok(Operand::Memory(EffectiveAddress::direct(cursor.i16()?)));
        }
        _ => {}
    }

    let displacement = match modrm.mode {
        0b01 => Some(i16::from(cursor.i8()?)),
        0b10 => Some(cursor.i16()?),
        _ => None,
    };

    Ok(Operand::Memory(EffectiveAddress {
        terms: RM_TERMS[usize::from(modrm.rm)],
        displacement: displacement.filter(|disp| *disp != 0),
    }))
}

const fn accumulator(wide: bool) -> Operand {
    Operand::Register(register_field(0, wide))
}

/// Decoder for the modelled 8086 subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder8086;

impl Decoder8086 {
    /// Creates a decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes one instruction from the start of `window`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Unrecognized`] for opcodes outside the modelled
    /// subset and [`DecodeError::Truncated`] when `window` ends early.
    pub fn decode_window(window: &[u8]) -> Result<Instruction, DecodeError> {
        let mut cursor = Cursor::new(window);
        let opcode = cursor.u8()?;
        let Some(form) = classify_opcode(opcode) else {
            log::trace!("unrecognized opcode {opcode:#04x}");
            return Err(DecodeError::Unrecognized { byte: opcode });
        };

        let wide_bit = opcode & 0x01 != 0;
        let (op, destination, source, wide) = match form {
            Form::RegMemWithReg(op) => {
                let modrm = ModRm::split(cursor.u8()?);
                let reg = Operand::Register(register_field(modrm.reg, wide_bit));
                let rm = rm_operand(&mut cursor, modrm, wide_bit)?;
                if opcode & 0x02 == 0 {
                    (op, rm, reg, wide_bit)
                } else {
                    (op, reg, rm, wide_bit)
                }
            }
            Form::ImmToRegMem(op) => {
                let modrm = ModRm::split(cursor.u8()?);
                if modrm.reg != 0 {
                    return Err(DecodeError::Unrecognized { byte: opcode });
                }
                let rm = rm_operand(&mut cursor, modrm, wide_bit)?;
                let data = cursor.data(wide_bit, false)?;
                (op, rm, Operand::Immediate(Immediate::new(data)), wide_bit)
            }
            Form::ImmToReg(op) => {
                let wide = opcode & 0x08 != 0;
                let reg = Operand::Register(register_field(opcode, wide));
                let data = cursor.data(wide, false)?;
                (op, reg, Operand::Immediate(Immediate::new(data)), wide)
            }
            Form::MemToAcc(op) => {
                let address = Operand::Memory(EffectiveAddress::direct(cursor.i16()?));
                (op, accumulator(wide_bit), address, wide_bit)
            }
            Form::AccToMem(op) => {
                let address = Operand::Memory(EffectiveAddress::direct(cursor.i16()?));
                (op, address, accumulator(wide_bit), wide_bit)
            }
            Form::ArithImmToRegMem => {
                let modrm = ModRm::split(cursor.u8()?);
                let Some(op) = arithmetic_extension(modrm.reg) else {
                    return Err(DecodeError::Unrecognized { byte: opcode });
                };
                let rm = rm_operand(&mut cursor, modrm, wide_bit)?;
                let data = cursor.data(wide_bit, opcode & 0x02 != 0)?;
                (op, rm, Operand::Immediate(Immediate::new(data)), wide_bit)
            }
            Form::ImmToAcc(op) => {
                let data = cursor.data(wide_bit, false)?;
                (
                    op,
                    accumulator(wide_bit),
                    Operand::Immediate(Immediate::new(data)),
                    wide_bit,
                )
            }
            Form::ShortJump(op) => {
                let displacement = i32::from(cursor.i8()?);
                (
                    op,
                    Operand::Immediate(Immediate::relative(displacement)),
                    Operand::None,
                    true,
                )
            }
        };

        Ok(Instruction::new(op, destination, source, cursor.size()).with_width(wide))
    }
}

impl InstructionDecoder for Decoder8086 {
    fn version(&self) -> u32 {
        DECODER_VERSION
    }

    fn decode(&self, window: &[u8]) -> Result<Instruction, DecodeError> {
        Self::decode_window(window)
    }

    fn describe(&self, instruction: &Instruction) -> String {
        format_instruction(instruction)
    }
}
