//! Execution loop integration coverage driven by a scripted decoder.

#![allow(clippy::pedantic, clippy::nursery)]

use log as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use sim86_core::{
    run, DecodeError, EffectiveAddress, FaultCode, Immediate, Instruction, InstructionDecoder,
    MachineState, Operand, Operation, Register, RegisterAccess, RunState, SimConfig, TraceEvent,
    TraceSink, EXPECTED_DECODER_VERSION, FLAGS_SIGN, FLAGS_ZERO,
};

/// Decodes the byte at the start of the window as an index into a script.
struct ScriptedDecoder {
    script: Vec<Instruction>,
}

impl ScriptedDecoder {
    fn new(script: Vec<Instruction>) -> Self {
        Self { script }
    }

    fn program(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (index, instr) in self.script.iter().enumerate() {
            bytes.push(u8::try_from(index).expect("script fits in a byte"));
            bytes.resize(bytes.len() + usize::from(instr.size) - 1, 0xEE);
        }
        bytes
    }
}

impl InstructionDecoder for ScriptedDecoder {
    fn version(&self) -> u32 {
        EXPECTED_DECODER_VERSION
    }

    fn decode(&self, window: &[u8]) -> Result<Instruction, DecodeError> {
        let byte = window[0];
        self.script
            .get(usize::from(byte))
            .copied()
            .ok_or(DecodeError::Unrecognized { byte })
    }

    fn describe(&self, instruction: &Instruction) -> String {
        instruction.op.mnemonic().to_string()
    }
}

#[derive(Default)]
struct EventLog {
    executed: Vec<(u16, Operation)>,
    skipped: Vec<(u16, FaultCode)>,
    halts: Vec<RunState>,
}

impl TraceSink for EventLog {
    fn on_event(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Executed {
                ip, instruction, ..
            } => self.executed.push((ip, instruction.op)),
            TraceEvent::Skipped { ip, cause, .. } => self.skipped.push((ip, cause)),
            TraceEvent::Halted { run_state, .. } => self.halts.push(run_state),
        }
    }
}

fn ax() -> Operand {
    Operand::Register(RegisterAccess::word(Register::Ax))
}

fn imm(value: i32) -> Operand {
    Operand::Immediate(Immediate::new(value))
}

fn run_script(script: Vec<Instruction>, config: &SimConfig) -> (MachineState, EventLog) {
    let decoder = ScriptedDecoder::new(script);
    let program = decoder.program();
    let mut state = MachineState::with_config(config);
    let mut log = EventLog::default();
    run(&mut state, &program, &decoder, config, &mut log);
    (state, log)
}

#[rstest]
#[case::add(Operation::Add, 5, 3, 8, 0)]
#[case::cmp_equal(Operation::Cmp, 0, 0, 0, FLAGS_ZERO)]
#[case::sub_to_zero(Operation::Sub, 1, 1, 0, FLAGS_ZERO)]
#[case::sub_negative(Operation::Sub, 1, 2, 0xFFFF, FLAGS_SIGN)]
#[case::cmp_negative(Operation::Cmp, 1, 2, 1, FLAGS_SIGN)]
fn arithmetic_after_mov(
    #[case] op: Operation,
    #[case] initial: i32,
    #[case] operand: i32,
    #[case] expected_ax: u16,
    #[case] expected_flags: u16,
) {
    let (state, log) = run_script(
        vec![
            Instruction::new(Operation::Mov, ax(), imm(initial), 3),
            Instruction::new(op, ax(), imm(operand), 3),
        ],
        &SimConfig::default(),
    );

    assert_eq!(state.registers.get(Register::Ax), expected_ax);
    assert_eq!(state.flags, expected_flags);
    assert_eq!(state.ip, 6);
    assert_eq!(log.executed, vec![(0, Operation::Mov), (3, op)]);
    assert_eq!(log.halts, vec![RunState::HaltedNormal]);
}

#[test]
fn countdown_loop_runs_until_zero() {
    let cx = Operand::Register(RegisterAccess::word(Register::Cx));
    let (state, log) = run_script(
        vec![
            Instruction::new(Operation::Mov, cx, imm(3), 3),
            Instruction::new(Operation::Sub, cx, imm(1), 3),
            Instruction::new(
                Operation::Jne,
                Operand::Immediate(Immediate::relative(-5)),
                Operand::None,
                2,
            ),
        ],
        &SimConfig::default(),
    );

    assert_eq!(state.registers.get(Register::Cx), 0);
    assert!(state.flag_is_set(FLAGS_ZERO));
    assert_eq!(state.ip, 8);
    assert_eq!(log.executed.len(), 1 + 3 * 2);
}

#[test]
fn unrecognized_instruction_leaves_cycles_and_memory_untouched() {
    let decoder = ScriptedDecoder::new(vec![Instruction::new(
        Operation::Mov,
        Operand::Memory(EffectiveAddress::pair(Register::Bx, Register::Si)),
        imm(0x1234),
        4,
    )]);
    let mut program = decoder.program();
    program.push(0x7F);

    let config = SimConfig::default();
    let mut state = MachineState::with_config(&config);
    let mut log = EventLog::default();
    let outcome = run(&mut state, &program, &decoder, &config, &mut log);

    assert_eq!(
        outcome.run_state,
        RunState::HaltedError(FaultCode::UnrecognizedInstruction)
    );
    assert_eq!(outcome.steps, 1);
    assert_eq!(state.cycles, 7);
    assert_eq!(state.ip, 4);
    assert_eq!(state.memory.read_u16(0), Ok(0x1234));
    assert!(state.memory.as_slice()[2..].iter().all(|byte| *byte == 0));
}

#[test]
fn memory_operands_can_be_disabled() {
    let config = SimConfig {
        memory_operands: false,
        ..SimConfig::default()
    };
    let (state, log) = run_script(
        vec![
            Instruction::new(Operation::Mov, Operand::Memory(EffectiveAddress::direct(8)), ax(), 4),
            Instruction::new(Operation::Mov, ax(), imm(2), 3),
        ],
        &config,
    );

    assert_eq!(log.skipped, vec![(0, FaultCode::MemoryOperandsDisabled)]);
    assert_eq!(log.executed, vec![(4, Operation::Mov)]);
    assert_eq!(state.registers.get(Register::Ax), 2);
    assert_eq!(state.cycles, 0);
}

#[test]
fn empty_program_halts_normally() {
    let (state, log) = run_script(Vec::new(), &SimConfig::default());

    assert_eq!(state.run_state, RunState::HaltedNormal);
    assert!(log.executed.is_empty());
    assert_eq!(log.halts, vec![RunState::HaltedNormal]);
}
