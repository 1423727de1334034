//! Opcode recognition. Each rule is `(mask, pattern, shape)`: an opcode byte
//! matches when `byte & mask == pattern`. Rules are tried top to bottom and
//! the first match wins, so the order of `OPCODE_TABLE` is significant.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
  Mov,
  Add,
  Sub,
}

impl Mnemonic {
  pub fn as_str(&self) -> &'static str {
    match self {
      Mnemonic::Mov => "mov",
      Mnemonic::Add => "add",
      Mnemonic::Sub => "sub",
    }
  }
}

impl fmt::Display for Mnemonic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How the bytes after the opcode are laid out, and which opcode bits mean
/// what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  /// `ooooo o d w`, mod reg r/m. `d` set means reg is the destination.
  RegMemWithReg(Mnemonic),
  /// `oooo w reg`, then data sized by `w`.
  ImmToReg(Mnemonic),
  /// `ooooooo w`, mod 000 r/m, then data sized by `w`.
  ImmToRegMem(Mnemonic),
  /// `oooooo s w`, mod ext r/m, then data. The operation comes from `ext`.
  ImmGroup,
  /// `oooooo d w`, then a bare 16-bit address. `d` set means the accumulator
  /// is the source.
  MemAccumulator(Mnemonic),
  /// `ooooooo w`, then data sized by `w`.
  ImmToAccumulator(Mnemonic),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
  pub mask: u8,
  pub pattern: u8,
  pub shape: Shape,
}

impl Rule {
  const fn new(mask: u8, pattern: u8, shape: Shape) -> Self {
    Rule {
      mask,
      pattern,
      shape,
    }
  }

  pub fn matches(&self, opcode: u8) -> bool {
    opcode & self.mask == self.pattern
  }
}

pub const OPCODE_TABLE: [Rule; 9] = [
  Rule::new(0b_111111_00, 0b_100010_00, Shape::RegMemWithReg(Mnemonic::Mov)),
  Rule::new(0b_1111_0000, 0b_1011_0000, Shape::ImmToReg(Mnemonic::Mov)),
  Rule::new(0b_1111111_0, 0b_1100011_0, Shape::ImmToRegMem(Mnemonic::Mov)),
  Rule::new(0b_111111_00, 0b_101000_00, Shape::MemAccumulator(Mnemonic::Mov)),
  Rule::new(0b_111111_00, 0b_000000_00, Shape::RegMemWithReg(Mnemonic::Add)),
  Rule::new(0b_111111_00, 0b_100000_00, Shape::ImmGroup),
  Rule::new(0b_1111111_0, 0b_0000010_0, Shape::ImmToAccumulator(Mnemonic::Add)),
  Rule::new(0b_111111_00, 0b_001010_00, Shape::RegMemWithReg(Mnemonic::Sub)),
  Rule::new(0b_1111111_0, 0b_0010110_0, Shape::ImmToAccumulator(Mnemonic::Sub)),
];

/// Operations of the immediate group, keyed by the mod r/m `reg` field.
const IMMEDIATE_GROUP: [(u8, Mnemonic); 2] = [(0b_000, Mnemonic::Add), (0b_101, Mnemonic::Sub)];

pub fn lookup(opcode: u8) -> Option<&'static Rule> {
  OPCODE_TABLE.iter().find(|rule| rule.matches(opcode))
}

pub fn group_operation(extension: u8) -> Option<Mnemonic> {
  IMMEDIATE_GROUP
    .iter()
    .find(|(ext, _)| *ext == extension)
    .map(|(_, mnemonic)| *mnemonic)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_lookup_shapes() {
    assert_eq!(
      lookup(0x89).map(|r| r.shape),
      Some(Shape::RegMemWithReg(Mnemonic::Mov))
    );
    assert_eq!(
      lookup(0xBF).map(|r| r.shape),
      Some(Shape::ImmToReg(Mnemonic::Mov))
    );
    assert_eq!(
      lookup(0xC7).map(|r| r.shape),
      Some(Shape::ImmToRegMem(Mnemonic::Mov))
    );
    assert_eq!(
      lookup(0xA3).map(|r| r.shape),
      Some(Shape::MemAccumulator(Mnemonic::Mov))
    );
    assert_eq!(
      lookup(0x00).map(|r| r.shape),
      Some(Shape::RegMemWithReg(Mnemonic::Add))
    );
    assert_eq!(lookup(0x83).map(|r| r.shape), Some(Shape::ImmGroup));
    assert_eq!(
      lookup(0x05).map(|r| r.shape),
      Some(Shape::ImmToAccumulator(Mnemonic::Add))
    );
    assert_eq!(
      lookup(0x2B).map(|r| r.shape),
      Some(Shape::RegMemWithReg(Mnemonic::Sub))
    );
    assert_eq!(
      lookup(0x2C).map(|r| r.shape),
      Some(Shape::ImmToAccumulator(Mnemonic::Sub))
    );
  }

  #[test]
  fn test_unlisted_opcodes_do_not_match() {
    for opcode in [0xF4, 0x8C, 0x8E, 0x06, 0x2E, 0x3C, 0xC5, 0xFF] {
      assert_eq!(lookup(opcode), None, "opcode {opcode:08b}");
    }
  }

  #[test]
  fn test_recognized_opcode_count() {
    let recognized = (0..=u8::MAX).filter(|b| lookup(*b).is_some()).count();
    assert_eq!(recognized, 4 + 16 + 2 + 4 + 4 + 4 + 2 + 4 + 2);
  }

  // The table is currently disjoint, so priority never changes a result. A
  // rule added later that overlaps must be placed deliberately.
  #[test]
  fn test_no_rules_overlap() {
    let mut overlaps = vec![];
    for opcode in 0..=u8::MAX {
      let matching: Vec<usize> = OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.matches(opcode))
        .map(|(index, _)| index)
        .collect();
      if matching.len() > 1 {
        overlaps.push((opcode, matching));
      }
    }
    assert_eq!(overlaps, vec![]);
  }

  #[test]
  fn test_group_operation() {
    assert_eq!(group_operation(0b_000), Some(Mnemonic::Add));
    assert_eq!(group_operation(0b_101), Some(Mnemonic::Sub));
    for extension in [0b_001, 0b_010, 0b_011, 0b_100, 0b_110, 0b_111] {
      assert_eq!(group_operation(extension), None);
    }
  }
}
