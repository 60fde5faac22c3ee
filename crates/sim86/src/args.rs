use std::path::PathBuf;

use clap::Parser;
use sim86_core::SimConfig;

/// Command-line arguments for the `sim86` binary.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "sim86", version, about = "Simulate an 8086 machine-code program")]
pub struct Args {
    /// Flat binary program to execute.
    pub program: PathBuf,

    /// Write the final memory image to this file.
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    /// Skip instructions with memory operands instead of executing them.
    #[arg(long)]
    pub no_memory_operands: bool,

    /// Halt when an addressing mode has no cycle cost entry.
    #[arg(long)]
    pub strict_cycles: bool,

    /// Stop after this many instructions.
    #[arg(long, value_name = "N")]
    pub max_steps: Option<u32>,

    /// Log every step to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the simulator configuration selected by the flags.
    #[must_use]
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            memory_operands: !self.no_memory_operands,
            strict_cycle_estimates: self.strict_cycles,
            step_limit: self.max_steps,
            ..SimConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use sim86_core::SimConfig;

    use super::Args;

    #[test]
    fn program_path_is_the_only_required_argument() {
        let args = Args::try_parse_from(["sim86", "listing.bin"]).expect("valid arguments");

        assert_eq!(args.program, PathBuf::from("listing.bin"));
        assert_eq!(args.dump, None);
        assert!(!args.verbose);
        assert_eq!(args.sim_config(), SimConfig::default());
    }

    #[test]
    fn missing_program_is_rejected() {
        assert!(Args::try_parse_from(["sim86"]).is_err());
    }

    #[test]
    fn flags_map_onto_the_config() {
        let args = Args::try_parse_from([
            "sim86",
            "prog.bin",
            "--dump",
            "out.data",
            "--no-memory-operands",
            "--strict-cycles",
            "--max-steps",
            "50",
            "-v",
        ])
        .expect("valid arguments");

        assert_eq!(args.dump, Some(PathBuf::from("out.data")));
        assert!(args.verbose);

        let config = args.sim_config();
        assert!(!config.memory_operands);
        assert!(config.strict_cycle_estimates);
        assert_eq!(config.step_limit, Some(50));
    }
}
