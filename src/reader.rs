//! Access to the backing object file.
//!
//! The loader never talks to storage directly; it goes through the
//! [`ElfReader`] trait, so the same core works whether the object lives in a
//! file system, in flash, or in a memory buffer. An in-memory implementation,
//! [`ElfBinary`], ships with the crate.

use crate::{Result, error::io_error};
use alloc::string::{String, ToString};

/// A read primitive over the backing ELF object.
///
/// Implementations block until the read completes or fails; the loader
/// propagates any error verbatim and aborts the load attempt.
pub trait ElfReader {
    /// Returns the full name or path of the ELF object.
    fn file_name(&self) -> &str;

    /// Reads `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// The loader never issues zero-length reads.
    fn read(&mut self, buf: &mut [u8], offset: usize) -> Result<()>;

    /// Returns the short name of the ELF object (the filename without the path).
    fn shortname(&self) -> &str {
        let name = self.file_name();
        name.rsplit('/').next().unwrap_or(name)
    }
}

/// An ELF object backed by an in-memory byte slice.
///
/// Useful for objects embedded in the host binary or staged in a scratch
/// buffer before loading.
#[derive(Debug)]
pub struct ElfBinary<'bytes> {
    /// The name assigned to this ELF object.
    name: String,
    /// The raw ELF data.
    bytes: &'bytes [u8],
}

impl<'bytes> ElfBinary<'bytes> {
    /// Creates a new memory-based ELF object.
    ///
    /// # Arguments
    /// * `name` - An identifier for the object, typically the original file
    ///   path. Used for error reporting and logging.
    /// * `bytes` - The complete ELF data.
    pub fn new(name: &str, bytes: &'bytes [u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

impl<'bytes> ElfReader for ElfBinary<'bytes> {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8], offset: usize) -> Result<()> {
        let src = offset
            .checked_add(buf.len())
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or_else(|| io_error("read past the end of the object"))?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_range() {
        let mut bin = ElfBinary::new("a.o", &[1, 2, 3, 4]);
        let mut buf = [0u8; 2];
        bin.read(&mut buf, 1).unwrap();
        assert_eq!(buf, [2, 3]);
    }

    #[test]
    fn rejects_read_past_end() {
        let mut bin = ElfBinary::new("a.o", &[1, 2, 3, 4]);
        let mut buf = [0u8; 2];
        assert!(bin.read(&mut buf, 3).is_err());
    }

    #[test]
    fn shortname_strips_path() {
        let bin = ElfBinary::new("modules/net/a.o", &[]);
        assert_eq!(bin.shortname(), "a.o");
    }
}
