use std::fmt;
use thiserror::Error;

use crate::cursor::EndOfStream;

/// The part of an instruction that was being read when the stream ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  ModRm,
  Displacement,
  DirectAddress,
  Immediate,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Field::ModRm => "mod r/m byte",
      Field::Displacement => "displacement",
      Field::DirectAddress => "direct address",
      Field::Immediate => "immediate",
    };
    f.write_str(name)
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
  #[error("truncated stream: missing {field} at offset {offset}")]
  TruncatedStream { field: Field, offset: usize },
  #[error("unknown opcode {byte:08b} at offset {offset}")]
  UnknownOpcode { byte: u8, offset: usize },
  #[error("unknown sub-opcode {extension:03b} for opcode {byte:08b} at offset {offset}")]
  UnknownSubopcode {
    byte: u8,
    extension: u8,
    offset: usize,
  },
}

impl EndOfStream {
  pub fn truncated(self, field: Field) -> DecodeError {
    DecodeError::TruncatedStream {
      field,
      offset: self.offset,
    }
  }
}
