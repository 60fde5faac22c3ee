#![no_main]

use libfuzzer_sys::fuzz_target;
use sim86_core::{run, MachineState, NullTrace, SimConfig};
use sim86_decoder::Decoder8086;

fuzz_target!(|data: &[u8]| {
    let config = SimConfig {
        memory_bytes: 0x1_0000,
        step_limit: Some(4096),
        ..SimConfig::default()
    };
    let decoder = Decoder8086::new();
    let mut state = MachineState::with_config(&config);

    let outcome = run(&mut state, data, &decoder, &config, &mut NullTrace);
    assert!(outcome.step_limit_reached || state.run_state.is_halted());
    assert_eq!(outcome.run_state, state.run_state);
});
