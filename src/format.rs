use std::fmt;

use crate::decode::{Instruction, Operand};
use crate::fields::{BaseExpr, Displacement, Register, Width};

fn register(reg: u8, w_bit_set: bool) -> &'static str {
  match (reg, w_bit_set) {
    (0b_000, false) => "al",
    (0b_001, false) => "cl",
    (0b_010, false) => "dl",
    (0b_011, false) => "bl",
    (0b_100, false) => "ah",
    (0b_101, false) => "ch",
    (0b_110, false) => "dh",
    (0b_111, false) => "bh",
    (0b_000, true) => "ax",
    (0b_001, true) => "cx",
    (0b_010, true) => "dx",
    (0b_011, true) => "bx",
    (0b_100, true) => "sp",
    (0b_101, true) => "bp",
    (0b_110, true) => "si",
    (0b_111, true) => "di",
    _ => unreachable!(),
  }
}

impl Register {
  pub fn name(&self) -> &'static str {
    register(self.index(), self.width() == Width::Word)
  }
}

impl BaseExpr {
  pub fn as_str(&self) -> &'static str {
    match self {
      BaseExpr::BxSi => "bx + si",
      BaseExpr::BxDi => "bx + di",
      BaseExpr::BpSi => "bp + si",
      BaseExpr::BpDi => "bp + di",
      BaseExpr::Si => "si",
      BaseExpr::Di => "di",
      BaseExpr::Bp => "bp",
      BaseExpr::Bx => "bx",
    }
  }
}

impl Width {
  pub fn keyword(&self) -> &'static str {
    match self {
      Width::Byte => "byte",
      Width::Word => "word",
    }
  }
}

fn size_prefix(f: &mut fmt::Formatter<'_>, size: &Option<Width>) -> fmt::Result {
  match size {
    Some(width) => write!(f, "{} ", width.keyword()),
    None => Ok(()),
  }
}

impl fmt::Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operand::Register(reg) => f.write_str(reg.name()),
      Operand::Immediate(value) => write!(f, "{value}"),
      Operand::Direct { address, size } => {
        size_prefix(f, size)?;
        write!(f, "[{address}]")
      }
      Operand::Indexed { base, disp, size } => {
        size_prefix(f, size)?;
        match disp {
          Displacement::None => write!(f, "[{}]", base.as_str()),
          Displacement::Byte(disp) | Displacement::Word(disp) => {
            write!(f, "[{} + {disp}]", base.as_str())
          }
        }
      }
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}, {}", self.mnemonic, self.dst, self.src)
  }
}
