use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Field};
use crate::fields::{
  decode_immediate, decode_modrm, AddressingMode, BaseExpr, Displacement, Register, Width,
};
use crate::table::{self, Mnemonic, Shape};

pub const BITS_DIRECTIVE: &str = "bits 16";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
  Register(Register),
  Direct {
    address: i16,
    /// Set when nothing else in the instruction gives away the width.
    size: Option<Width>,
  },
  Indexed {
    base: BaseExpr,
    disp: Displacement,
    size: Option<Width>,
  },
  Immediate(i16),
}

impl Operand {
  fn from_rm(rm: AddressingMode, size: Option<Width>) -> Self {
    match rm {
      AddressingMode::RegisterDirect(reg) => Operand::Register(reg),
      AddressingMode::MemoryDirect(address) => Operand::Direct { address, size },
      AddressingMode::MemoryIndexed(base, disp) => Operand::Indexed { base, disp, size },
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
  pub mnemonic: Mnemonic,
  pub dst: Operand,
  pub src: Operand,
  /// Byte offset of the opcode in the input.
  pub offset: usize,
  pub len: usize,
}

/// Decodes instructions until the input runs out at an instruction boundary.
/// After the first error nothing more is yielded.
pub struct Decoder<'a> {
  cursor: ByteCursor<'a>,
  failed: bool,
}

impl<'a> Decoder<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Decoder {
      cursor: ByteCursor::new(bytes),
      failed: false,
    }
  }

  fn decode(&mut self, opcode: u8, offset: usize) -> Result<Instruction, DecodeError> {
    let rule = table::lookup(opcode).ok_or(DecodeError::UnknownOpcode {
      byte: opcode,
      offset,
    })?;
    let d_bit_set = (opcode >> 1) & 1 == 1;
    let width = Width::from_bit(opcode);

    let (mnemonic, dst, src) = match rule.shape {
      Shape::RegMemWithReg(mnemonic) => {
        let modrm = decode_modrm(&mut self.cursor, width)?;
        let reg = Operand::Register(Register::new(width, modrm.reg));
        let rm = Operand::from_rm(modrm.rm, None);
        if d_bit_set {
          (mnemonic, reg, rm)
        } else {
          (mnemonic, rm, reg)
        }
      }
      Shape::ImmToReg(mnemonic) => {
        let width = Width::from_bit(opcode >> 3);
        let reg = Register::new(width, opcode);
        let data = decode_immediate(&mut self.cursor, width, false)?;
        (mnemonic, Operand::Register(reg), Operand::Immediate(data.value))
      }
      Shape::ImmToRegMem(mnemonic) => {
        let modrm = decode_modrm(&mut self.cursor, width)?;
        let data = decode_immediate(&mut self.cursor, width, false)?;
        let dst = Operand::from_rm(modrm.rm, Some(width));
        (mnemonic, dst, Operand::Immediate(data.value))
      }
      Shape::ImmGroup => {
        let modrm = decode_modrm(&mut self.cursor, width)?;
        let mnemonic =
          table::group_operation(modrm.reg).ok_or(DecodeError::UnknownSubopcode {
            byte: opcode,
            extension: modrm.reg,
            offset,
          })?;
        let data = decode_immediate(&mut self.cursor, width, d_bit_set)?;
        let dst = Operand::from_rm(modrm.rm, Some(width));
        (mnemonic, dst, Operand::Immediate(data.value))
      }
      Shape::MemAccumulator(mnemonic) => {
        let address = self
          .cursor
          .fetch_word()
          .map_err(|e| e.truncated(Field::DirectAddress))?;
        let acc = Operand::Register(Register::accumulator(width));
        let mem = Operand::Direct {
          address: address as i16,
          size: None,
        };
        if d_bit_set {
          (mnemonic, mem, acc)
        } else {
          (mnemonic, acc, mem)
        }
      }
      Shape::ImmToAccumulator(mnemonic) => {
        let data = decode_immediate(&mut self.cursor, width, false)?;
        let acc = Register::accumulator(width);
        (mnemonic, Operand::Register(acc), Operand::Immediate(data.value))
      }
    };

    Ok(Instruction {
      mnemonic,
      dst,
      src,
      offset,
      len: self.cursor.position() - offset,
    })
  }
}

impl Iterator for Decoder<'_> {
  type Item = Result<Instruction, DecodeError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }
    let offset = self.cursor.position();
    let opcode = self.cursor.fetch_byte().ok()?;
    let result = self.decode(opcode, offset);
    match &result {
      Ok(instruction) => log::debug!(
        "{offset:04x}: {:02x?} ({} bytes) {instruction}",
        self.cursor.consumed_since(offset),
        instruction.len
      ),
      Err(err) => {
        log::debug!("{offset:04x}: decoding stopped: {err}");
        self.failed = true;
      }
    }
    Some(result)
  }
}

pub fn disassemble(instructions: &[u8]) -> Result<String, DecodeError> {
  let mut lines = vec![BITS_DIRECTIVE.to_string()];
  for instruction in Decoder::new(instructions) {
    lines.push(instruction?.to_string());
  }
  lines.push("".to_string());
  Ok(lines.join("\n"))
}
