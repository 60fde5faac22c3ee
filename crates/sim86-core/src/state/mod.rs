//! Machine state primitives: register file, flag bits, and run state.

/// Register file types and flag bit constants.
pub mod registers;
/// Execution-loop run state.
pub mod run_state;

pub use registers::{
    Register, RegisterAccess, RegisterFile, RegisterPart, FLAGS_SIGN, FLAGS_TRACKED_MASK,
    FLAGS_ZERO, REGISTER_SLOT_COUNT,
};
pub use run_state::RunState;
