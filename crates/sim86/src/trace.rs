use std::io::{self, Write};

use sim86_core::{InstructionDecoder, TraceEvent, TraceSink};

/// Writes one line per trace event: `<disassembly> ; <diff>`.
///
/// The first write error is kept and returned by [`TraceWriter::finish`];
/// later events are dropped.
pub struct TraceWriter<'a, W: Write> {
    out: &'a mut W,
    decoder: &'a dyn InstructionDecoder,
    error: Option<io::Error>,
}

impl<'a, W: Write> TraceWriter<'a, W> {
    /// Creates a writer rendering instructions with `decoder`.
    pub fn new(out: &'a mut W, decoder: &'a dyn InstructionDecoder) -> Self {
        Self {
            out,
            decoder,
            error: None,
        }
    }

    /// Returns the first write error, if any.
    ///
    /// # Errors
    ///
    /// Propagates the first failed write.
    pub fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    fn write_event(&mut self, event: TraceEvent<'_>) -> io::Result<()> {
        match event {
            TraceEvent::Executed {
                instruction,
                diff,
                cycle_fault,
                ..
            } => {
                write!(self.out, "{} ; {diff}", self.decoder.describe(instruction))?;
                if let Some(cause) = cycle_fault {
                    write!(self.out, " ; {cause}")?;
                }
                writeln!(self.out)
            }
            TraceEvent::Skipped {
                instruction, cause, ..
            } => writeln!(
                self.out,
                "{} ; skipped: {cause}",
                self.decoder.describe(instruction)
            ),
            TraceEvent::Halted { ip, run_state } => match run_state.halting_fault() {
                Some(cause) => writeln!(self.out, "halted at ip {ip:#x}: {cause}"),
                None => Ok(()),
            },
        }
    }
}

impl<W: Write> TraceSink for TraceWriter<'_, W> {
    fn on_event(&mut self, event: TraceEvent<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.write_event(event) {
            log::error!("failed to write trace: {error}");
            self.error = Some(error);
        }
    }
}
