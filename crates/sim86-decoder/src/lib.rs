//! 8086 machine-code decoder for the sim86 execution engine.
//!
//! [`Decoder8086`] implements [`sim86_core::InstructionDecoder`] for the
//! `mov`/`add`/`sub`/`cmp` encodings, the short conditional jumps and the
//! loop family.

/// First-byte opcode classification and register field tables.
pub mod table;
pub use table::{arithmetic_extension, classify_opcode, register_field, Form, OPCODE_TABLE};

/// Byte decoder implementing the core's decoder trait.
pub mod decoder;
pub use decoder::{Decoder8086, DECODER_VERSION, MAX_INSTRUCTION_BYTES};

/// Assembly-text rendering.
pub mod disasm;
pub use disasm::{format_address, format_instruction};

#[cfg(test)]
use proptest as _;
