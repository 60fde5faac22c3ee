use crate::FaultCode;

/// Execution-loop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// The instruction pointer is inside the loaded program.
    #[default]
    Running,
    /// The instruction pointer reached the end of the loaded program.
    HaltedNormal,
    /// A terminal fault stopped the run.
    HaltedError(FaultCode),
}

impl RunState {
    /// Returns the fault that halted the run, if any.
    #[must_use]
    pub const fn halting_fault(self) -> Option<FaultCode> {
        match self {
            Self::HaltedError(cause) => Some(cause),
            Self::Running | Self::HaltedNormal => None,
        }
    }

    /// Returns true once the loop can make no further progress.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        !matches!(self, Self::Running)
    }
}
