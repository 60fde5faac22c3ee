//! Public host-facing API contracts for driving the execution engine.

use crate::diff::StateDiff;
use crate::instruction::Instruction;
use crate::memory::{Memory, DEFAULT_MEMORY_BYTES};
use crate::state::{RegisterFile, RunState, FLAGS_SIGN, FLAGS_ZERO};
use crate::FaultCode;

/// Top-level immutable configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SimConfig {
    /// Enables memory operands; when disabled they are reported and skipped.
    pub memory_operands: bool,
    /// Size of the data memory array in bytes.
    pub memory_bytes: usize,
    /// Halts the run when a memory operand has no cycle cost entry.
    pub strict_cycle_estimates: bool,
    /// Stops [`run`](crate::run) after this many steps.
    pub step_limit: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_operands: true,
            memory_bytes: DEFAULT_MEMORY_BYTES,
            strict_cycle_estimates: false,
            step_limit: None,
        }
    }
}

/// Complete machine state mutated in place by the execution loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Register slots (slot 0 reserved).
    pub registers: RegisterFile,
    /// Data memory.
    pub memory: Memory,
    /// FLAGS register; only sign and zero are maintained.
    pub flags: u16,
    /// Offset of the next instruction in the loaded program.
    pub ip: u16,
    /// Running cycle estimate.
    pub cycles: u16,
    /// Execution-loop state.
    pub run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::with_config(&SimConfig::default())
    }
}

impl MachineState {
    /// Creates an all-zero machine sized by `config`.
    #[must_use]
    pub fn with_config(config: &SimConfig) -> Self {
        Self {
            registers: RegisterFile::default(),
            memory: Memory::new(config.memory_bytes),
            flags: 0,
            ip: 0,
            cycles: 0,
            run_state: RunState::Running,
        }
    }

    /// Returns `true` when a specific FLAGS bit is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: u16) -> bool {
        (self.flags & flag) != 0
    }

    /// Copies every field the state differ compares.
    #[must_use]
    pub const fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            registers: self.registers,
            flags: self.flags,
            ip: self.ip,
            cycles: self.cycles,
        }
    }
}

/// Memory-free copy of a [`MachineState`], cheap enough to take every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StateSnapshot {
    /// Register slots.
    pub registers: RegisterFile,
    /// FLAGS register.
    pub flags: u16,
    /// Instruction pointer.
    pub ip: u16,
    /// Cycle count.
    pub cycles: u16,
}

impl StateSnapshot {
    /// Sign flag state.
    #[must_use]
    pub const fn sign(&self) -> bool {
        (self.flags & FLAGS_SIGN) != 0
    }

    /// Zero flag state.
    #[must_use]
    pub const fn zero(&self) -> bool {
        (self.flags & FLAGS_ZERO) != 0
    }
}

/// Output status from one step of the execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction executed and its estimated cycles were added.
    Retired {
        /// Cycles added by this instruction.
        cycles: u16,
    },
    /// Instruction was decoded but not executed; only the pointer advanced.
    Skipped {
        /// Why the instruction was skipped.
        cause: FaultCode,
    },
    /// Pointer reached the end of the program.
    Halted,
    /// A terminal fault stopped the run.
    Fault {
        /// Fault that halted the loop.
        cause: FaultCode,
    },
}

/// Aggregated outcome from [`run`](crate::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of instructions retired or skipped.
    pub steps: u32,
    /// Run state when the loop returned.
    pub run_state: RunState,
    /// Set when the loop returned because the configured step limit was hit.
    pub step_limit_reached: bool,
}

/// Trace events emitted by the execution loop, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// An instruction executed.
    Executed {
        /// Pointer the instruction was decoded at.
        ip: u16,
        /// The executed instruction.
        instruction: &'a Instruction,
        /// Fields changed by the step.
        diff: &'a StateDiff,
        /// Cycle estimation failure that was charged as zero cycles.
        cycle_fault: Option<FaultCode>,
    },
    /// An instruction was decoded but skipped.
    Skipped {
        /// Pointer the instruction was decoded at.
        ip: u16,
        /// The skipped instruction.
        instruction: &'a Instruction,
        /// Why it was skipped.
        cause: FaultCode,
    },
    /// The loop halted.
    Halted {
        /// Pointer at the time of the halt.
        ip: u16,
        /// Halt reason.
        run_state: RunState,
    },
}

/// Sink trait for execution trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent<'_>);
}

impl<F> TraceSink for F
where
    F: FnMut(TraceEvent<'_>),
{
    fn on_event(&mut self, event: TraceEvent<'_>) {
        self(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_event(&mut self, _event: TraceEvent<'_>) {}
}
