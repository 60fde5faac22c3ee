//! Command-line front end for the sim86 execution engine.
//!
//! Loads a flat binary program, runs it with [`sim86_decoder::Decoder8086`],
//! prints one trace line per instruction followed by the final register
//! dump, and optionally writes the final memory image.

use std::fs;
use std::io::Write;

use anyhow::{bail, Context as _};
use env_logger as _;
use sim86_core::{
    check_decoder_version, run, write_final_report, InstructionDecoder, MachineState, RunOutcome,
    EXPECTED_DECODER_VERSION,
};
use sim86_decoder::Decoder8086;

/// Command-line argument definitions.
pub mod args;
pub use args::Args;

/// Trace line rendering.
pub mod trace;
pub use trace::TraceWriter;

/// Largest program the 16-bit instruction pointer can walk to its end.
pub const MAX_PROGRAM_BYTES: usize = 0xFFFF;

/// Runs the program named by `args`, writing the trace and final dump to `out`.
///
/// A run halted by a fault still produces the partial trace and final dump;
/// the returned [`RunOutcome`] carries the halt reason.
///
/// # Errors
///
/// Fails before execution when the decoder version does not match, or when
/// the program cannot be read or exceeds [`MAX_PROGRAM_BYTES`]. Fails
/// afterwards when writing output or the memory dump fails.
pub fn simulate<W: Write>(args: &Args, out: &mut W) -> anyhow::Result<RunOutcome> {
    let decoder = Decoder8086::new();
    writeln!(
        out,
        "sim86 decoder version: {} (expected {EXPECTED_DECODER_VERSION})",
        decoder.version()
    )?;
    check_decoder_version(&decoder)?;

    let program = fs::read(&args.program)
        .with_context(|| format!("failed to read program {}", args.program.display()))?;
    if program.len() > MAX_PROGRAM_BYTES {
        bail!(
            "program {} is {} bytes; at most {MAX_PROGRAM_BYTES} bytes are addressable",
            args.program.display(),
            program.len()
        );
    }
    log::debug!("loaded {} program bytes", program.len());

    let config = args.sim_config();
    let mut state = MachineState::with_config(&config);

    writeln!(out, "--- {} execution ---", args.program.display())?;
    let mut trace = TraceWriter::new(out, &decoder);
    let outcome = run(&mut state, &program, &decoder, &config, &mut trace);
    trace.finish().context("failed to write trace")?;

    writeln!(out)?;
    write_final_report(&state, out).context("failed to write final report")?;

    if let Some(path) = &args.dump {
        fs::write(path, state.memory.as_slice())
            .with_context(|| format!("failed to write memory dump {}", path.display()))?;
        log::info!("wrote {} byte memory dump to {}", state.memory.len(), path.display());
    }

    Ok(outcome)
}
