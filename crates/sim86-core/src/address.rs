//! Effective-address resolution and addressing-mode cycle costs.

use crate::fault::FaultCode;
use crate::instruction::EffectiveAddress;
use crate::state::{Register, RegisterFile};

/// Base/index register pairs accepted by the cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermPair {
    /// `bx + si`
    BxSi,
    /// `bp + di`
    BpDi,
    /// `bx + di`
    BxDi,
    /// `bp + si`
    BpSi,
}

impl TermPair {
    /// Classifies two registers as a base/index pair, in either order.
    #[must_use]
    pub const fn of(first: Register, second: Register) -> Option<Self> {
        match (first, second) {
            (Register::Bx, Register::Si) | (Register::Si, Register::Bx) => Some(Self::BxSi),
            (Register::Bp, Register::Di) | (Register::Di, Register::Bp) => Some(Self::BpDi),
            (Register::Bx, Register::Di) | (Register::Di, Register::Bx) => Some(Self::BxDi),
            (Register::Bp, Register::Si) | (Register::Si, Register::Bp) => Some(Self::BpSi),
            _ => None,
        }
    }
}

/// Addressing-mode shapes that carry a cycle cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressShape {
    /// `[disp]`
    DisplacementOnly,
    /// Only the first register term is populated, no displacement.
    FirstTermOnly,
    /// Only the second register term is populated, no displacement.
    SecondTermOnly,
    /// Both terms populated, no displacement.
    Pair(TermPair),
    /// Both terms populated plus a displacement.
    PairDisplaced(TermPair),
}

impl AddressShape {
    /// Classifies an addressing expression.
    ///
    /// Returns `None` for shapes without a cost entry: a single register with
    /// a displacement, an empty expression, or an unsupported register pair.
    #[must_use]
    pub const fn classify(address: &EffectiveAddress) -> Option<Self> {
        let displaced = address.displacement.is_some();
        match (address.terms, displaced) {
            ([None, None], true) => Some(Self::DisplacementOnly),
            ([Some(_), None], false) => Some(Self::FirstTermOnly),
            ([None, Some(_)], false) => Some(Self::SecondTermOnly),
            ([Some(first), Some(second)], displaced) => match TermPair::of(first, second) {
                Some(pair) if displaced => Some(Self::PairDisplaced(pair)),
                Some(pair) => Some(Self::Pair(pair)),
                None => None,
            },
            _ => None,
        }
    }
}

/// Single source-of-truth effective-address cycle cost table.
pub const EFFECTIVE_ADDRESS_COST_TABLE: &[(AddressShape, u16)] = &[
    (AddressShape::DisplacementOnly, 5),
    (AddressShape::SecondTermOnly, 9),
    (AddressShape::FirstTermOnly, 9),
    (AddressShape::Pair(TermPair::BxSi), 7),
    (AddressShape::Pair(TermPair::BpDi), 7),
    (AddressShape::Pair(TermPair::BxDi), 8),
    (AddressShape::Pair(TermPair::BpSi), 8),
    (AddressShape::PairDisplaced(TermPair::BxSi), 11),
    (AddressShape::PairDisplaced(TermPair::BpDi), 11),
    (AddressShape::PairDisplaced(TermPair::BxDi), 12),
    (AddressShape::PairDisplaced(TermPair::BpSi), 12),
];

/// Computes the memory offset addressed by `address`.
///
/// Register terms and the displacement are summed modulo 2^16. Range
/// checking against the memory array is left to the memory model.
#[must_use]
pub fn resolve(registers: &RegisterFile, address: &EffectiveAddress) -> u16 {
    let terms = address
        .terms
        .iter()
        .flatten()
        .fold(0_u16, |sum, register| {
            sum.wrapping_add(registers.get(*register))
        });

    #[allow(clippy::cast_sign_loss)]
    let displacement = address.displacement.unwrap_or(0) as u16;
    terms.wrapping_add(displacement)
}

/// Looks up the cycle cost of a classified shape.
#[must_use]
pub fn shape_cost(shape: AddressShape) -> Option<u16> {
    EFFECTIVE_ADDRESS_COST_TABLE
        .iter()
        .find_map(|(entry_shape, cycles)| (*entry_shape == shape).then_some(*cycles))
}

/// Returns the estimated cycle cost of computing `address`.
///
/// # Errors
///
/// Returns [`FaultCode::UnmatchedAddressShape`] when the addressing-mode shape
/// has no entry in [`EFFECTIVE_ADDRESS_COST_TABLE`].
pub fn cost(address: &EffectiveAddress) -> Result<u16, FaultCode> {
    AddressShape::classify(address)
        .and_then(shape_cost)
        .ok_or(FaultCode::UnmatchedAddressShape)
}
