use crate::address;
use crate::fault::FaultCode;
use crate::instruction::{Instruction, Operation};

/// Per-operation base cycle cost, charged before any operand costs.
///
/// Every executed operation is currently charged zero base cycles; operations
/// absent from the table also cost zero.
pub const BASE_CYCLE_TABLE: &[(Operation, u16)] = &[
    (Operation::Mov, 0),
    (Operation::Add, 0),
    (Operation::Sub, 0),
    (Operation::Cmp, 0),
    (Operation::Jne, 0),
];

/// Looks up the base cycle cost for an operation.
#[must_use]
pub fn base_cost(op: Operation) -> u16 {
    BASE_CYCLE_TABLE
        .iter()
        .find_map(|(entry_op, cycles)| (*entry_op == op).then_some(*cycles))
        .unwrap_or(0)
}

/// Estimates the cycles an instruction adds to the running cycle count.
///
/// The estimate is the operation's base cost plus the effective-address cost
/// of every memory operand.
///
/// # Errors
///
/// Returns [`FaultCode::UnmatchedAddressShape`] when a memory operand's
/// addressing shape has no cost entry.
pub fn estimate(instruction: &Instruction) -> Result<u16, FaultCode> {
    instruction
        .operands
        .iter()
        .filter_map(|operand| operand.memory())
        .try_fold(base_cost(instruction.op), |total, address| {
            address::cost(address).map(|cycles| total.wrapping_add(cycles))
        })
}
