//! Decoding of the fields that follow an opcode byte: the "mod reg r/m" byte
//! with its optional displacement, and immediate data.
//!
//! Layout of the mod reg r/m byte:
//!
//! ```text
//!   7 6   5 4 3   2 1 0
//! | mod |  reg  |  r/m  |
//! ```
//!
//! `mod` picks one of four addressing levels, `reg` is either a second register
//! or an opcode extension (depending on the opcode), and `r/m` is a register or
//! one of eight effective-address patterns.

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Field};

/// With mod = 00 this r/m value is a direct 16-bit address instead of `[bp]`.
const DIRECT_ADDRESS: u8 = 0b_110;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
  Byte,
  Word,
}

impl Width {
  pub fn from_bit(w: u8) -> Self {
    if w & 1 == 1 {
      Width::Word
    } else {
      Width::Byte
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
  width: Width,
  index: u8,
}

impl Register {
  pub fn new(width: Width, index: u8) -> Self {
    Register {
      width,
      index: index & 0b_111,
    }
  }

  pub fn accumulator(width: Width) -> Self {
    Register::new(width, 0b_000)
  }

  pub fn width(&self) -> Width {
    self.width
  }

  pub fn index(&self) -> u8 {
    self.index
  }
}

/// Effective-address patterns selected by r/m in the memory modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseExpr {
  BxSi,
  BxDi,
  BpSi,
  BpDi,
  Si,
  Di,
  Bp,
  Bx,
}

impl BaseExpr {
  pub const ALL: [BaseExpr; 8] = [
    BaseExpr::BxSi,
    BaseExpr::BxDi,
    BaseExpr::BpSi,
    BaseExpr::BpDi,
    BaseExpr::Si,
    BaseExpr::Di,
    BaseExpr::Bp,
    BaseExpr::Bx,
  ];

  pub fn from_rm(rm: u8) -> Self {
    BaseExpr::ALL[(rm & 0b_111) as usize]
  }
}

/// The addressing level decides whether a displacement clause exists, not
/// the value: `Byte(0)` still prints `+ 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displacement {
  None,
  Byte(i16),
  Word(i16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
  RegisterDirect(Register),
  /// Printed signed, like every other 16-bit field.
  MemoryDirect(i16),
  MemoryIndexed(BaseExpr, Displacement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
  /// Second register selector or opcode extension, depending on the opcode.
  pub reg: u8,
  pub rm: AddressingMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
  pub value: i16,
  pub len: u8,
}

pub fn decode_modrm(cursor: &mut ByteCursor<'_>, width: Width) -> Result<ModRm, DecodeError> {
  let byte = cursor.fetch_byte().map_err(|e| e.truncated(Field::ModRm))?;
  let r#mod = byte >> 6;
  let reg = (byte >> 3) & 0b_111;
  let rm = byte & 0b_111;

  let rm = match r#mod {
    0b_11 => AddressingMode::RegisterDirect(Register::new(width, rm)),
    0b_00 if rm == DIRECT_ADDRESS => {
      let address = cursor
        .fetch_word()
        .map_err(|e| e.truncated(Field::DirectAddress))?;
      AddressingMode::MemoryDirect(address as i16)
    }
    0b_00 => AddressingMode::MemoryIndexed(BaseExpr::from_rm(rm), Displacement::None),
    0b_01 => {
      let disp = cursor
        .fetch_byte()
        .map_err(|e| e.truncated(Field::Displacement))?;
      // sign-extend, never zero-extend
      let disp = disp as i8 as i16;
      AddressingMode::MemoryIndexed(BaseExpr::from_rm(rm), Displacement::Byte(disp))
    }
    _ => {
      let disp = cursor
        .fetch_word()
        .map_err(|e| e.truncated(Field::Displacement))?;
      AddressingMode::MemoryIndexed(BaseExpr::from_rm(rm), Displacement::Word(disp as i16))
    }
  };

  Ok(ModRm { reg, rm })
}

/// Reads immediate data. `sign_extend` (the `s` bit) only matters for word
/// operations, where it means a single byte is stored and widened.
pub fn decode_immediate(
  cursor: &mut ByteCursor<'_>,
  width: Width,
  sign_extend: bool,
) -> Result<Immediate, DecodeError> {
  let immediate = match (width, sign_extend) {
    (Width::Byte, _) | (Width::Word, true) => {
      let byte = cursor
        .fetch_byte()
        .map_err(|e| e.truncated(Field::Immediate))?;
      Immediate {
        value: byte as i8 as i16,
        len: 1,
      }
    }
    (Width::Word, false) => {
      let word = cursor
        .fetch_word()
        .map_err(|e| e.truncated(Field::Immediate))?;
      Immediate {
        value: word as i16,
        len: 2,
      }
    }
  };
  Ok(immediate)
}
