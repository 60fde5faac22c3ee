//! Decoder seam between raw program bytes and the execution engine.
//!
//! The core never decodes bytes itself; a collaborator implementing
//! [`InstructionDecoder`] turns a byte window into an [`Instruction`].

use thiserror::Error;

use crate::fault::FaultCode;
use crate::instruction::Instruction;

/// Decoder interface version the core is built against.
pub const EXPECTED_DECODER_VERSION: u32 = 4;

/// Reasons a byte window does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// The leading byte (or opcode extension) matches no known instruction.
    #[error("unrecognized opcode byte {byte:#04x}")]
    Unrecognized {
        /// The offending opcode byte.
        byte: u8,
    },
    /// The window ends before the instruction does.
    #[error("instruction needs {needed} bytes but only {available} remain")]
    Truncated {
        /// Bytes required to finish decoding.
        needed: usize,
        /// Bytes left in the window.
        available: usize,
    },
}

impl DecodeError {
    /// Maps the decode failure onto the fault taxonomy.
    #[must_use]
    pub const fn code(self) -> FaultCode {
        match self {
            Self::Unrecognized { .. } => FaultCode::UnrecognizedInstruction,
            Self::Truncated { .. } => FaultCode::TruncatedInstruction,
        }
    }
}

/// Raised when a decoder does not speak the interface version the core expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("decoder version {found} does not match expected version {expected}")]
pub struct VersionMismatch {
    /// Version the core was built against.
    pub expected: u32,
    /// Version reported by the decoder.
    pub found: u32,
}

/// Binary decoder collaborator.
pub trait InstructionDecoder {
    /// Interface version implemented by this decoder.
    fn version(&self) -> u32;

    /// Decodes one instruction from the start of `window`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the bytes are not a recognized
    /// instruction or the window is too short.
    fn decode(&self, window: &[u8]) -> Result<Instruction, DecodeError>;

    /// Renders an instruction as assembly text for traces and logs.
    fn describe(&self, instruction: &Instruction) -> String;
}

/// Checks that `decoder` implements [`EXPECTED_DECODER_VERSION`].
///
/// # Errors
///
/// Returns [`VersionMismatch`] when the versions differ.
pub fn check_decoder_version(decoder: &dyn InstructionDecoder) -> Result<(), VersionMismatch> {
    let found = decoder.version();
    if found == EXPECTED_DECODER_VERSION {
        Ok(())
    } else {
        Err(VersionMismatch {
            expected: EXPECTED_DECODER_VERSION,
            found,
        })
    }
}
