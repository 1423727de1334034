use std::collections::TryReserveError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to allocate {size} bytes for {}: {source}", path.display())]
  Allocation {
    path: PathBuf,
    size: u64,
    source: TryReserveError,
  },
}

/// Reads the whole file up front; decoding never touches the file again.
pub fn load(path: &Path) -> Result<Vec<u8>, LoadError> {
  let io_err = |source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  };

  let mut file = File::open(path).map_err(io_err)?;
  let size = file.metadata().map_err(io_err)?.len();

  let mut bytes = Vec::new();
  let len = usize::try_from(size).unwrap_or(usize::MAX);
  bytes
    .try_reserve_exact(len)
    .map_err(|source| LoadError::Allocation {
      path: path.to_path_buf(),
      size,
      source,
    })?;

  file.read_to_end(&mut bytes).map_err(io_err)?;
  log::debug!("loaded {} bytes from {}", bytes.len(), path.display());
  Ok(bytes)
}
