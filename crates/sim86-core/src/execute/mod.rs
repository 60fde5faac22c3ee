//! Instruction execution pipeline.
//!
//! Each step runs in two phases:
//! 1. [`execute_instruction`] reads operands, computes the result and
//!    records every pending side effect in an [`ExecuteState`] without
//!    touching the machine.
//! 2. [`commit_execution`] applies the memory write, register write, FLAGS
//!    update and instruction pointer, in that order.
//!
//! A faulting instruction therefore leaves no partial side effects.

mod flags;
mod helpers;

pub use flags::{apply_result_flags, flag_operand, FlagsUpdate};
pub use helpers::{memory_address, read_operand};

use crate::api::{MachineState, RunOutcome, SimConfig, StepOutcome, TraceEvent, TraceSink};
use crate::decoder::InstructionDecoder;
use crate::diff::diff;
use crate::fault::FaultCode;
use crate::instruction::{Instruction, Operand, Operation};
use crate::state::{RegisterAccess, RunState, FLAGS_ZERO};
use crate::timing;

/// Pending memory store produced by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWrite {
    /// Validated byte offset.
    pub addr: usize,
    /// Value to store; byte stores take the low 8 bits.
    pub value: u16,
    /// Word (`true`) or byte store.
    pub wide: bool,
}

/// Side effects accumulated by an executor, applied by [`commit_execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteState {
    /// Destination register and the value to write into it.
    pub register_write: Option<(RegisterAccess, u16)>,
    /// Destination memory cell and the value to store.
    pub memory_write: Option<MemoryWrite>,
    /// FLAGS update derived from the result.
    pub flags_update: FlagsUpdate,
    /// Instruction pointer after the step.
    pub next_ip: u16,
}

impl ExecuteState {
    /// An execute state that only advances the instruction pointer.
    #[must_use]
    pub const fn new(next_ip: u16) -> Self {
        Self {
            register_write: None,
            memory_write: None,
            flags_update: FlagsUpdate::None,
            next_ip,
        }
    }
}

/// Executes one decoded instruction against a read-only view of the machine.
///
/// `next_ip` is the instruction pointer already advanced past `instr`.
///
/// # Errors
///
/// Returns [`FaultCode::UnimplementedOperation`] for operations without an
/// executor, [`FaultCode::MemoryOperandsDisabled`] when a memory operand is
/// used with the capability off, [`FaultCode::UnsupportedOperands`] for
/// operand combinations the executor does not accept, and
/// [`FaultCode::AddressOutOfRange`] for memory accesses past the end.
pub fn execute_instruction(
    instr: &Instruction,
    state: &MachineState,
    next_ip: u16,
    config: &SimConfig,
) -> Result<ExecuteState, FaultCode> {
    if !instr.op.is_implemented() {
        return Err(FaultCode::UnimplementedOperation);
    }
    if !config.memory_operands && instr.touches_memory() {
        return Err(FaultCode::MemoryOperandsDisabled);
    }

    let mut exec = ExecuteState::new(next_ip);
    match instr.op {
        Operation::Mov => execute_mov(instr, state, config, &mut exec)?,
        Operation::Add => execute_add(instr, state, &mut exec)?,
        Operation::Sub => execute_subtract(instr, state, &mut exec, true)?,
        Operation::Cmp => execute_subtract(instr, state, &mut exec, false)?,
        Operation::Jne => execute_jne(instr, state, &mut exec)?,
        _ => return Err(FaultCode::UnimplementedOperation),
    }
    Ok(exec)
}

/// Applies the side effects recorded by [`execute_instruction`].
///
/// The memory store is applied first; if it fails nothing else is touched.
/// Cycles are accounted separately by the execution loop.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when the pending store does not
/// fit in memory.
pub fn commit_execution(state: &mut MachineState, exec: &ExecuteState) -> Result<(), FaultCode> {
    if let Some(store) = exec.memory_write {
        state.memory.write(store.addr, store.value, store.wide)?;
    }

    if let Some((access, value)) = exec.register_write {
        state.registers.write(access, value);
    }

    if let FlagsUpdate::FromResult(result) = exec.flags_update {
        apply_result_flags(result, &mut state.flags);
    }

    state.ip = exec.next_ip;
    Ok(())
}

fn execute_mov(
    instr: &Instruction,
    state: &MachineState,
    config: &SimConfig,
    exec: &mut ExecuteState,
) -> Result<(), FaultCode> {
    let value = read_operand(instr.source(), instr.wide, state, config)?;

    match instr.destination() {
        Operand::Register(access) => exec.register_write = Some((*access, value)),
        Operand::Memory(address) => {
            let addr = memory_address(address, instr.wide, state, config)?;
            exec.memory_write = Some(MemoryWrite {
                addr,
                value,
                wide: instr.wide,
            });
        }
        Operand::None | Operand::Immediate(_) => return Err(FaultCode::UnsupportedOperands),
    }
    Ok(())
}

/// Reads the register destination and register-or-immediate source of an
/// arithmetic instruction.
fn arithmetic_operands(
    instr: &Instruction,
    state: &MachineState,
) -> Result<(RegisterAccess, u16, u16), FaultCode> {
    let Operand::Register(destination) = *instr.destination() else {
        return Err(FaultCode::UnsupportedOperands);
    };
    let rhs = match *instr.source() {
        Operand::Register(source) => state.registers.read(source),
        Operand::Immediate(immediate) => immediate.as_u16(),
        Operand::None | Operand::Memory(_) => return Err(FaultCode::UnsupportedOperands),
    };
    Ok((destination, state.registers.read(destination), rhs))
}

fn execute_add(
    instr: &Instruction,
    state: &MachineState,
    exec: &mut ExecuteState,
) -> Result<(), FaultCode> {
    let (destination, lhs, rhs) = arithmetic_operands(instr, state)?;
    let result = lhs.wrapping_add(rhs);

    exec.register_write = Some((destination, result));
    exec.flags_update = FlagsUpdate::FromResult(flag_operand(result, destination.is_wide()));
    Ok(())
}

/// Shared body of `sub` and `cmp`; only `sub` writes the difference back.
fn execute_subtract(
    instr: &Instruction,
    state: &MachineState,
    exec: &mut ExecuteState,
    write_back: bool,
) -> Result<(), FaultCode> {
    let (destination, lhs, rhs) = arithmetic_operands(instr, state)?;
    let result = lhs.wrapping_sub(rhs);

    if write_back {
        exec.register_write = Some((destination, result));
    }
    exec.flags_update = FlagsUpdate::FromResult(flag_operand(result, destination.is_wide()));
    Ok(())
}

fn execute_jne(
    instr: &Instruction,
    state: &MachineState,
    exec: &mut ExecuteState,
) -> Result<(), FaultCode> {
    let Operand::Immediate(displacement) = *instr.destination() else {
        return Err(FaultCode::UnsupportedOperands);
    };

    if !state.flag_is_set(FLAGS_ZERO) {
        exec.next_ip = exec.next_ip.wrapping_add(displacement.as_u16());
    }
    Ok(())
}

/// Runs one step of the execution loop over `program`.
///
/// The step decodes at `state.ip`, executes, adds the estimated cycles and
/// reports the result to `sink`. Halted machines return their halt outcome
/// again without emitting events.
///
/// An instruction whose end would lie past offset `0xFFFF` halts the machine
/// normally without executing, since the pointer has no further room.
pub fn step_one(
    state: &mut MachineState,
    program: &[u8],
    decoder: &dyn InstructionDecoder,
    config: &SimConfig,
    sink: &mut dyn TraceSink,
) -> StepOutcome {
    match state.run_state {
        RunState::HaltedNormal => return StepOutcome::Halted,
        RunState::HaltedError(cause) => return StepOutcome::Fault { cause },
        RunState::Running => {}
    }

    let ip = state.ip;
    let window = match program.get(usize::from(ip)..) {
        Some(window) if !window.is_empty() => window,
        _ => {
            log::debug!("ip {ip:#06x} reached end of program");
            state.run_state = RunState::HaltedNormal;
            sink.on_event(TraceEvent::Halted {
                ip,
                run_state: state.run_state,
            });
            return StepOutcome::Halted;
        }
    };

    let instruction = match decoder.decode(window) {
        Ok(instruction) => instruction,
        Err(error) => {
            log::error!("decode failed at ip {ip:#06x}: {error}");
            return halt_with_fault(state, error.code(), sink);
        }
    };

    let Some(next_ip) = ip.checked_add(u16::from(instruction.size)) else {
        log::warn!(
            "{} at ip {ip:#06x} runs past the end of the 64 KiB address space",
            decoder.describe(&instruction)
        );
        state.run_state = RunState::HaltedNormal;
        sink.on_event(TraceEvent::Halted {
            ip,
            run_state: state.run_state,
        });
        return StepOutcome::Halted;
    };
    let before = state.snapshot();

    let exec = match execute_instruction(&instruction, state, next_ip, config) {
        Ok(exec) => exec,
        Err(cause) if cause.is_terminal() => {
            log::error!(
                "{} at ip {ip:#06x} faulted: {cause}",
                decoder.describe(&instruction)
            );
            return halt_with_fault(state, cause, sink);
        }
        Err(cause) => {
            log::warn!(
                "skipping {} at ip {ip:#06x}: {cause}",
                decoder.describe(&instruction)
            );
            state.ip = next_ip;
            sink.on_event(TraceEvent::Skipped {
                ip,
                instruction: &instruction,
                cause,
            });
            return StepOutcome::Skipped { cause };
        }
    };

    let (cycles, cycle_fault) = match timing::estimate(&instruction) {
        Ok(cycles) => (cycles, None),
        Err(cause) if config.strict_cycle_estimates => {
            log::error!(
                "no cycle estimate for {} at ip {ip:#06x}",
                decoder.describe(&instruction)
            );
            return halt_with_fault(state, cause, sink);
        }
        Err(cause) => {
            log::warn!(
                "no cycle estimate for {} at ip {ip:#06x}, charging 0",
                decoder.describe(&instruction)
            );
            (0, Some(cause))
        }
    };

    if let Err(cause) = commit_execution(state, &exec) {
        log::error!("commit failed at ip {ip:#06x}: {cause}");
        return halt_with_fault(state, cause, sink);
    }
    state.cycles = state.cycles.wrapping_add(cycles);

    let changes = diff(&before, &state.snapshot());
    log::debug!("{} ; {changes}", decoder.describe(&instruction));
    sink.on_event(TraceEvent::Executed {
        ip,
        instruction: &instruction,
        diff: &changes,
        cycle_fault,
    });

    StepOutcome::Retired { cycles }
}

fn halt_with_fault(
    state: &mut MachineState,
    cause: FaultCode,
    sink: &mut dyn TraceSink,
) -> StepOutcome {
    state.run_state = RunState::HaltedError(cause);
    sink.on_event(TraceEvent::Halted {
        ip: state.ip,
        run_state: state.run_state,
    });
    StepOutcome::Fault { cause }
}

/// Drives [`step_one`] until the machine halts or the step limit is hit.
pub fn run(
    state: &mut MachineState,
    program: &[u8],
    decoder: &dyn InstructionDecoder,
    config: &SimConfig,
    sink: &mut dyn TraceSink,
) -> RunOutcome {
    let mut steps = 0_u32;
    loop {
        if config.step_limit.is_some_and(|limit| steps >= limit) {
            log::warn!("step limit reached after {steps} steps at ip {:#06x}", state.ip);
            return RunOutcome {
                steps,
                run_state: state.run_state,
                step_limit_reached: true,
            };
        }

        match step_one(state, program, decoder, config, sink) {
            StepOutcome::Retired { .. } | StepOutcome::Skipped { .. } => {
                steps = steps.saturating_add(1);
            }
            StepOutcome::Halted | StepOutcome::Fault { .. } => {
                return RunOutcome {
                    steps,
                    run_state: state.run_state,
                    step_limit_reached: false,
                };
            }
        }
    }
}
