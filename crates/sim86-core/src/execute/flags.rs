//! FLAGS update behaviors for flag-affecting instructions.

use crate::state::{FLAGS_SIGN, FLAGS_ZERO};

/// Describes how FLAGS should be updated after an instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// No change to FLAGS.
    #[default]
    None,
    /// Derive sign and zero from a 16-bit result.
    FromResult(u16),
}

/// Sets the sign flag iff bit 15 of `result` is set and the zero flag iff
/// `result == 0`. No other bit of `flags` is touched.
pub const fn apply_result_flags(result: u16, flags: &mut u16) {
    if result & 0x8000 == 0 {
        *flags &= !FLAGS_SIGN;
    } else {
        *flags |= FLAGS_SIGN;
    }

    if result == 0 {
        *flags |= FLAGS_ZERO;
    } else {
        *flags &= !FLAGS_ZERO;
    }
}

/// Sign-extends a byte-width result so bit 15 mirrors bit 7.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn flag_operand(value: u16, wide: bool) -> u16 {
    if wide {
        value
    } else {
        (value as u8) as i8 as i16 as u16
    }
}
