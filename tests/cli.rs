use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn listing_file(bytes: &[u8]) -> tempfile::NamedTempFile {
  let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
  tmp.write_all(bytes).unwrap();
  tmp
}

#[test]
fn decodes_file_to_stdout() {
  let tmp = listing_file(&[0x89, 0xD8, 0xB0, 0x05, 0x83, 0xC6, 0x02]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .assert()
    .success()
    .stdout("bits 16\nmov ax, bx\nmov al, 5\nadd si, 2\n");
}

#[test]
fn empty_file_prints_only_directive() {
  let tmp = listing_file(&[]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .assert()
    .success()
    .stdout("bits 16\n");
}

#[test]
fn missing_argument_prints_usage_and_exits_1() {
  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_file_exits_1() {
  let dir = tempfile::tempdir().unwrap();

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(dir.path().join("nope.bin"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("nope.bin"));
}

#[test]
fn truncated_instruction_emits_no_line() {
  let tmp = listing_file(&[0x89, 0xD8, 0x89]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .assert()
    .code(1)
    .stdout("bits 16\nmov ax, bx\n")
    .stderr(predicate::str::contains("truncated stream"));
}

#[test]
fn unknown_opcode_reports_binary() {
  let tmp = listing_file(&[0xB0, 0x05, 0xF4]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .assert()
    .code(1)
    .stdout("bits 16\nmov al, 5\n")
    .stderr(predicate::str::contains("unknown opcode 11110100"));
}

#[test]
fn unknown_subopcode_exits_1() {
  let tmp = listing_file(&[0x83, 0xFE, 0x02]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .assert()
    .code(1)
    .stderr(predicate::str::contains("unknown sub-opcode 111"));
}

#[test]
fn writes_listing_to_output_file() {
  let tmp = listing_file(&[0x80, 0x2E, 0x00, 0x00, 0x09]);
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("out.asm");

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg(tmp.path())
    .arg("--output")
    .arg(&out)
    .assert()
    .success()
    .stdout("");

  let listing = std::fs::read_to_string(&out).unwrap();
  assert_eq!(listing, "bits 16\nsub byte [0], 9\n");
}

#[test]
fn verbose_logs_go_to_stderr() {
  let tmp = listing_file(&[0x89, 0xD8]);

  Command::new(env!("CARGO_BIN_EXE_dis8086"))
    .arg("-v")
    .arg(tmp.path())
    .assert()
    .success()
    .stdout("bits 16\nmov ax, bx\n")
    .stderr(predicate::str::contains("mov ax, bx"));
}
