//! Integration tests for the sim86 CLI.

#![allow(clippy::pedantic, clippy::nursery)]

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow as _;
use clap as _;
use env_logger as _;
use log as _;
use sim86 as _;
use sim86_core as _;
use sim86_decoder as _;

fn write_program(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write program");
    path
}

fn sim86(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sim86"))
        .args(args)
        .output()
        .expect("run sim86")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn mov_add_program_prints_trace_and_final_registers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let program = write_program(dir.path(), "add.bin", &[0xB8, 0x05, 0x00, 0x05, 0x03, 0x00]);

    let output = sim86(&[program.as_os_str()]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.starts_with("sim86 decoder version: 4 (expected 4)\n"));
    assert!(text.contains("mov ax, 5 ; ax: 0x0 -> 0x5, ip: 0x0 -> 0x3\n"));
    assert!(text.contains("add ax, 3 ; ax: 0x5 -> 0x8, ip: 0x3 -> 0x6\n"));
    assert!(text.contains("Final registers:\n"));
    assert!(text.contains("   flags: SF: 0, ZF: 0\n"));
    assert!(text.contains("      ip: 0x0006 (6)\n"));
}

#[test]
fn missing_program_fails_with_a_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.bin");

    let output = sim86(&[missing.as_os_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read program"));
}

#[test]
fn unrecognized_instruction_fails_after_printing_the_dump() {
    let dir = tempfile::tempdir().expect("temp dir");
    let program = write_program(dir.path(), "bad.bin", &[0xB8, 0x01, 0x00, 0x90]);

    let output = sim86(&[program.as_os_str()]);
    let text = stdout(&output);

    assert!(!output.status.success());
    assert!(text.contains("halted at ip 0x3: unrecognized instruction\n"));
    assert!(text.contains("      ax: 0x0001 (1)\n"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("execution halted"));
}

#[test]
fn step_limit_is_not_a_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    // mov cx, 3 / sub cx, 1 / jne $-3
    let program = write_program(
        dir.path(),
        "loop.bin",
        &[0xB9, 0x03, 0x00, 0x83, 0xE9, 0x01, 0x75, 0xFB],
    );

    let output = sim86(&[
        OsStr::new("--max-steps"),
        OsStr::new("2"),
        program.as_os_str(),
    ]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert_eq!(text.matches(" ; ").count(), 2);
    assert!(text.contains("      cx: 0x0002 (2)\n"));
}

#[test]
fn dump_flag_writes_the_memory_image() {
    let dir = tempfile::tempdir().expect("temp dir");
    // mov word [16], 0x0102
    let program = write_program(dir.path(), "store.bin", &[0xC7, 0x06, 0x10, 0x00, 0x02, 0x01]);
    let dump = dir.path().join("memory.data");

    let output = sim86(&[OsStr::new("--dump"), dump.as_os_str(), program.as_os_str()]);

    assert!(output.status.success());
    let image = fs::read(&dump).expect("dump written");
    assert_eq!(image.len(), 1024 * 1024);
    assert_eq!(&image[0x10..0x12], &[0x02, 0x01]);
}

#[test]
fn program_past_the_addressable_range_is_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let program = write_program(dir.path(), "huge.bin", &[0x89, 0xC0].repeat(0x8000));

    let output = sim86(&[program.as_os_str()]);

    assert!(!output.status.success());
    assert!(!stdout(&output).contains("Final registers:"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at most 65535 bytes"));
}
