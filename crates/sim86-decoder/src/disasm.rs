//! Assembly-text rendering of decoded instructions.
//!
//! Output follows NASM syntax: `mov word [bx + si + 4], 7`, `jne $-3`.

use sim86_core::{EffectiveAddress, Immediate, Instruction, Operand};

/// Formats an instruction as one line of assembly.
#[must_use]
pub fn format_instruction(instr: &Instruction) -> String {
    let sized = needs_size_prefix(instr);
    let operands: Vec<String> = instr
        .operands
        .iter()
        .filter(|operand| !matches!(operand, Operand::None))
        .map(|operand| format_operand(operand, instr, sized))
        .collect();

    if operands.is_empty() {
        instr.op.mnemonic().to_string()
    } else {
        format!("{} {}", instr.op.mnemonic(), operands.join(", "))
    }
}

/// Memory operands paired with an immediate have no register to imply a width.
fn needs_size_prefix(instr: &Instruction) -> bool {
    matches!(
        instr.operands,
        [Operand::Memory(_), Operand::Immediate(_)] | [Operand::Immediate(_), Operand::Memory(_)]
    )
}

fn format_operand(operand: &Operand, instr: &Instruction, sized: bool) -> String {
    match operand {
        Operand::None => String::new(),
        Operand::Register(access) => access.name().to_string(),
        Operand::Immediate(immediate) => format_immediate(*immediate, instr.size),
        Operand::Memory(address) if sized => {
            let width = if instr.wide { "word" } else { "byte" };
            format!("{width} {}", format_address(address))
        }
        Operand::Memory(address) => format_address(address),
    }
}

fn format_immediate(immediate: Immediate, size: u8) -> String {
    if !immediate.relative {
        return immediate.value.to_string();
    }
    let offset = immediate.value + i32::from(size);
    if offset < 0 {
        format!("$-{}", offset.unsigned_abs())
    } else {
        format!("$+{offset}")
    }
}

/// Formats an effective address as `[terms +/- displacement]`.
#[must_use]
pub fn format_address(address: &EffectiveAddress) -> String {
    let terms: Vec<&str> = address
        .terms
        .iter()
        .flatten()
        .map(|register| register.name())
        .collect();

    if terms.is_empty() {
        #[allow(clippy::cast_sign_loss)]
        let direct = address.displacement.unwrap_or(0) as u16;
        return format!("[{direct}]");
    }

    let mut text = format!("[{}", terms.join(" + "));
    match address.displacement {
        Some(disp) if disp < 0 => text.push_str(&format!(" - {}", disp.unsigned_abs())),
        Some(disp) if disp > 0 => text.push_str(&format!(" + {disp}")),
        _ => {}
    }
    text.push(']');
    text
}
