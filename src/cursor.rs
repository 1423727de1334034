use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unexpected end of stream at offset {offset}")]
pub struct EndOfStream {
  pub offset: usize,
}

/// Forward-only reader over a borrowed byte buffer. There is no way to seek
/// or rewind: a fetched byte is gone.
#[derive(Debug)]
pub struct ByteCursor<'a> {
  bytes: &'a [u8],
  position: usize,
}

impl<'a> ByteCursor<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    ByteCursor { bytes, position: 0 }
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn is_exhausted(&self) -> bool {
    self.position >= self.bytes.len()
  }

  /// Bytes consumed since `start`, which must be an earlier position.
  pub fn consumed_since(&self, start: usize) -> &'a [u8] {
    &self.bytes[start..self.position]
  }

  pub fn fetch_byte(&mut self) -> Result<u8, EndOfStream> {
    let Some(&byte) = self.bytes.get(self.position) else {
      return Err(EndOfStream { offset: self.position });
    };
    self.position += 1;
    log::trace!("fetched byte {byte:08b} at offset {}", self.position - 1);
    Ok(byte)
  }

  /// Little-endian: low byte first.
  pub fn fetch_word(&mut self) -> Result<u16, EndOfStream> {
    let lo = self.fetch_byte()?;
    let hi = self.fetch_byte()?;
    Ok(u16::from_le_bytes([lo, hi]))
  }
}
