//! Byte-addressable data memory with bounds-checked access.

/// Bounds and width validation helpers.
pub mod access;

pub use access::{access_width, validate_access, BYTE_ACCESS_BYTES, WORD_ACCESS_BYTES};

use crate::FaultCode;

/// Default memory size: the full 1 MiB 8086 address space.
pub const DEFAULT_MEMORY_BYTES: usize = 1024 * 1024;

/// Zero-initialized data memory.
///
/// Words are stored little-endian. Every access is validated against the
/// array length, so an effective address can never index past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BYTES)
    }
}

impl Memory {
    /// Allocates `len` zeroed bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len].into_boxed_slice(),
        }
    }

    /// Size of the memory array in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for a zero-sized memory.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Full memory image, e.g. for dumping to a file.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when `addr` is past the end.
    pub fn read_u8(&self, addr: usize) -> Result<u8, FaultCode> {
        validate_access(addr, BYTE_ACCESS_BYTES, self.len())?;
        Ok(self.bytes[addr])
    }

    /// Reads a little-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when either byte is past the end.
    pub fn read_u16(&self, addr: usize) -> Result<u16, FaultCode> {
        validate_access(addr, WORD_ACCESS_BYTES, self.len())?;
        Ok(u16::from_le_bytes([self.bytes[addr], self.bytes[addr + 1]]))
    }

    /// Reads a byte or word depending on `wide`; bytes are zero-extended.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when the access is out of range.
    pub fn read(&self, addr: usize, wide: bool) -> Result<u16, FaultCode> {
        if wide {
            self.read_u16(addr)
        } else {
            self.read_u8(addr).map(u16::from)
        }
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when `addr` is past the end.
    pub fn write_u8(&mut self, addr: usize, value: u8) -> Result<(), FaultCode> {
        validate_access(addr, BYTE_ACCESS_BYTES, self.len())?;
        self.bytes[addr] = value;
        Ok(())
    }

    /// Writes a little-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when either byte is past the end.
    pub fn write_u16(&mut self, addr: usize, value: u16) -> Result<(), FaultCode> {
        validate_access(addr, WORD_ACCESS_BYTES, self.len())?;
        let [lo, hi] = value.to_le_bytes();
        self.bytes[addr] = lo;
        self.bytes[addr + 1] = hi;
        Ok(())
    }

    /// Writes a byte (low 8 bits of `value`) or a word depending on `wide`.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when the access is out of range.
    pub fn write(&mut self, addr: usize, value: u16, wide: bool) -> Result<(), FaultCode> {
        if wide {
            self.write_u16(addr, value)
        } else {
            self.write_u8(addr, value.to_le_bytes()[0])
        }
    }
}
