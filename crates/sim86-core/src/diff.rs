//! Per-step state differ.

use std::fmt;

use crate::api::StateSnapshot;
use crate::state::{RegisterFile, REGISTER_SLOT_COUNT};

/// One field that differs between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FieldChange {
    /// Cycle counter changed.
    Cycles {
        /// Old value.
        before: u16,
        /// New value.
        after: u16,
    },
    /// A register slot changed.
    Register {
        /// Register-file slot index.
        slot: usize,
        /// Old value.
        before: u16,
        /// New value.
        after: u16,
    },
    /// Sign flag changed.
    Sign {
        /// Old state.
        before: bool,
        /// New state.
        after: bool,
    },
    /// Zero flag changed.
    Zero {
        /// Old state.
        before: bool,
        /// New state.
        after: bool,
    },
    /// Instruction pointer changed.
    InstructionPointer {
        /// Old value.
        before: u16,
        /// New value.
        after: u16,
    },
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Cycles { before, after } => write!(f, "cycles: {before:#x} -> {after:#x}"),
            Self::Register {
                slot,
                before,
                after,
            } => write!(
                f,
                "{}: {before:#x} -> {after:#x}",
                RegisterFile::slot_name(slot)
            ),
            Self::Sign { before, after } => {
                write!(f, "SF: {} -> {}", u8::from(before), u8::from(after))
            }
            Self::Zero { before, after } => {
                write!(f, "ZF: {} -> {}", u8::from(before), u8::from(after))
            }
            Self::InstructionPointer { before, after } => {
                write!(f, "ip: {before:#x} -> {after:#x}")
            }
        }
    }
}

/// Ordered list of changed fields: cycles, registers by slot, sign, zero, ip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StateDiff {
    changes: Vec<FieldChange>,
}

impl StateDiff {
    /// Changed fields in report order.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl fmt::Display for StateDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, change) in self.changes.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{change}")?;
        }
        Ok(())
    }
}

/// Compares two snapshots and lists every field that differs.
///
/// Memory is never compared. Reserved register slot 0 is included so a
/// corrupted slot cannot go unnoticed.
#[must_use]
pub fn diff(before: &StateSnapshot, after: &StateSnapshot) -> StateDiff {
    let mut changes = Vec::new();

    if before.cycles != after.cycles {
        changes.push(FieldChange::Cycles {
            before: before.cycles,
            after: after.cycles,
        });
    }

    let old = before.registers.slots();
    let new = after.registers.slots();
    for slot in 0..REGISTER_SLOT_COUNT {
        if old[slot] != new[slot] {
            changes.push(FieldChange::Register {
                slot,
                before: old[slot],
                after: new[slot],
            });
        }
    }

    if before.sign() != after.sign() {
        changes.push(FieldChange::Sign {
            before: before.sign(),
            after: after.sign(),
        });
    }
    if before.zero() != after.zero() {
        changes.push(FieldChange::Zero {
            before: before.zero(),
            after: after.zero(),
        });
    }

    if before.ip != after.ip {
        changes.push(FieldChange::InstructionPointer {
            before: before.ip,
            after: after.ip,
        });
    }

    StateDiff { changes }
}
