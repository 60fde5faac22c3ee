//! Final machine-state dump.

use std::io::{self, Write};

use crate::api::MachineState;
use crate::state::{Register, FLAGS_SIGN, FLAGS_ZERO};

/// Writes every addressable register, the tracked flags, the instruction
/// pointer, and the total cycle count.
///
/// ```text
/// Final registers:
///       ax: 0x0008 (8)
///       ...
///    flags: SF: 0, ZF: 1
///       ip: 0x0006 (6)
///   cycles: 7
/// ```
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_final_report<W: Write>(state: &MachineState, out: &mut W) -> io::Result<()> {
    writeln!(out, "Final registers:")?;
    for register in Register::ALL {
        let value = state.registers.get(register);
        writeln!(out, "{:>8}: {value:#06x} ({value})", register.name())?;
    }
    writeln!(
        out,
        "{:>8}: SF: {}, ZF: {}",
        "flags",
        u8::from(state.flag_is_set(FLAGS_SIGN)),
        u8::from(state.flag_is_set(FLAGS_ZERO))
    )?;
    writeln!(out, "{:>8}: {:#06x} ({})", "ip", state.ip, state.ip)?;
    writeln!(out, "{:>8}: {}", "cycles", state.cycles)
}
