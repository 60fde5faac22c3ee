//! Operand access helpers shared by the executors.

use crate::address;
use crate::api::{MachineState, SimConfig};
use crate::fault::FaultCode;
use crate::instruction::{EffectiveAddress, Operand};
use crate::memory::access::{access_width, validate_access};

/// Resolves a memory operand to a checked byte offset.
///
/// The capability check duplicates the one in
/// [`execute_instruction`](super::execute_instruction) and guards direct
/// callers of this helper.
///
/// # Errors
///
/// Returns [`FaultCode::MemoryOperandsDisabled`] when the capability is off
/// and [`FaultCode::AddressOutOfRange`] when the access does not fit.
pub fn memory_address(
    address: &EffectiveAddress,
    wide: bool,
    state: &MachineState,
    config: &SimConfig,
) -> Result<usize, FaultCode> {
    if !config.memory_operands {
        return Err(FaultCode::MemoryOperandsDisabled);
    }
    let addr = usize::from(address::resolve(&state.registers, address));
    validate_access(addr, access_width(wide), state.memory.len())?;
    Ok(addr)
}

/// Reads the value of a source operand.
///
/// Register and memory reads are zero-extended to 16 bits; immediates are
/// truncated to 16 bits.
///
/// # Errors
///
/// Returns [`FaultCode::UnsupportedOperands`] for an empty slot, or any
/// fault raised by [`memory_address`].
pub fn read_operand(
    operand: &Operand,
    wide: bool,
    state: &MachineState,
    config: &SimConfig,
) -> Result<u16, FaultCode> {
    match operand {
        Operand::Register(access) => Ok(state.registers.read(*access)),
        Operand::Immediate(immediate) => Ok(immediate.as_u16()),
        Operand::Memory(address) => {
            let addr = memory_address(address, wide, state, config)?;
            state.memory.read(addr, wide)
        }
        Operand::None => Err(FaultCode::UnsupportedOperands),
    }
}

#[cfg(test)]
mod tests {
    use super::{memory_address, read_operand};
    use crate::api::{MachineState, SimConfig};
    use crate::instruction::{EffectiveAddress, Immediate, Operand};
    use crate::state::{Register, RegisterAccess};
    use crate::FaultCode;

    fn small_machine() -> (MachineState, SimConfig) {
        let config = SimConfig {
            memory_bytes: 16,
            ..SimConfig::default()
        };
        (MachineState::with_config(&config), config)
    }

    #[test]
    fn memory_reads_resolve_through_registers() {
        let (mut state, config) = small_machine();
        state.registers.set(Register::Bx, 4);
        state.memory.write_u16(6, 0xBEEF).expect("in range");

        let operand = Operand::Memory(EffectiveAddress::register(Register::Bx).with_displacement(2));
        assert_eq!(read_operand(&operand, true, &state, &config), Ok(0xBEEF));
        assert_eq!(read_operand(&operand, false, &state, &config), Ok(0x00EF));
    }

    #[test]
    fn disabled_memory_operands_are_refused() {
        let (state, mut config) = small_machine();
        config.memory_operands = false;

        assert_eq!(
            memory_address(&EffectiveAddress::direct(0), true, &state, &config),
            Err(FaultCode::MemoryOperandsDisabled)
        );
    }

    #[test]
    fn word_access_at_last_byte_is_out_of_range() {
        let (state, config) = small_machine();

        assert_eq!(
            memory_address(&EffectiveAddress::direct(15), true, &state, &config),
            Err(FaultCode::AddressOutOfRange)
        );
        assert_eq!(
            memory_address(&EffectiveAddress::direct(15), false, &state, &config),
            Ok(15)
        );
    }

    #[test]
    fn register_and_immediate_operands_read_directly() {
        let (mut state, config) = small_machine();
        state.registers.set(Register::Dx, 0x1234);

        assert_eq!(
            read_operand(
                &Operand::Register(RegisterAccess::high(Register::Dx)),
                false,
                &state,
                &config
            ),
            Ok(0x12)
        );
        assert_eq!(
            read_operand(&Operand::Immediate(Immediate::new(-2)), true, &state, &config),
            Ok(0xFFFE)
        );
        assert_eq!(
            read_operand(&Operand::None, true, &state, &config),
            Err(FaultCode::UnsupportedOperands)
        );
    }
}
