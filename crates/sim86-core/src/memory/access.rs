//! Bounds and width policy for data memory accesses.

use crate::FaultCode;

/// Byte width of a 16-bit data access.
pub const WORD_ACCESS_BYTES: usize = 2;
/// Byte width of an 8-bit data access.
pub const BYTE_ACCESS_BYTES: usize = 1;

/// Returns the access width for a byte (`wide == false`) or word operation.
#[must_use]
pub const fn access_width(wide: bool) -> usize {
    if wide {
        WORD_ACCESS_BYTES
    } else {
        BYTE_ACCESS_BYTES
    }
}

/// Validates that `width` bytes starting at `addr` fit in a memory of `len` bytes.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when any byte of the access falls
/// at or beyond `len`.
pub const fn validate_access(addr: usize, width: usize, len: usize) -> Result<(), FaultCode> {
    match addr.checked_add(width) {
        Some(end) if end <= len => Ok(()),
        _ => Err(FaultCode::AddressOutOfRange),
    }
}
