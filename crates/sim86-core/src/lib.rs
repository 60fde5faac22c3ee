//! Execution engine for a subset of the 8086 instruction set.
//!
//! The crate executes already-decoded instructions (`mov`, `add`, `sub`,
//! `cmp`, `jne`) against a register file and a bounds-checked memory,
//! maintains the sign and zero flags, estimates cycle costs, and reports a
//! per-step state diff. Byte decoding is delegated to an
//! [`InstructionDecoder`] implementation.

/// Register file, flag bits, and run state.
pub mod state;
pub use state::{
    Register, RegisterAccess, RegisterFile, RegisterPart, RunState, FLAGS_SIGN,
    FLAGS_TRACKED_MASK, FLAGS_ZERO, REGISTER_SLOT_COUNT,
};

/// Bounds-checked data memory.
pub mod memory;
pub use memory::{Memory, DEFAULT_MEMORY_BYTES};

/// Fault taxonomy shared by decode, execute, and estimation.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// Decoded instruction records.
pub mod instruction;
pub use instruction::{EffectiveAddress, Immediate, Instruction, Operand, Operation};

/// Decoder collaborator trait and version handshake.
pub mod decoder;
pub use decoder::{
    check_decoder_version, DecodeError, InstructionDecoder, VersionMismatch,
    EXPECTED_DECODER_VERSION,
};

/// Effective-address resolution and addressing-mode cost table.
pub mod address;
pub use address::{AddressShape, TermPair, EFFECTIVE_ADDRESS_COST_TABLE};

/// Static cycle estimation.
pub mod timing;
pub use timing::{base_cost, estimate, BASE_CYCLE_TABLE};

/// Per-step state differ.
pub mod diff;
pub use diff::{diff, FieldChange, StateDiff};

/// Final machine-state dump.
pub mod report;
pub use report::write_final_report;

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    MachineState, NullTrace, RunOutcome, SimConfig, StateSnapshot, StepOutcome, TraceEvent,
    TraceSink,
};

/// Instruction execution pipeline and execution loop.
pub mod execute;
pub use execute::{
    commit_execution, execute_instruction, run, step_one, ExecuteState, FlagsUpdate, MemoryWrite,
};

#[cfg(test)]
use proptest as _;
