use alloc::borrow::Cow;
use core::fmt::{Debug, Display};

/// Error types produced while loading a module image.
///
/// Every failure is fatal to the current load attempt: the loader releases
/// everything it acquired and propagates the error. There is no retry and no
/// local recovery anywhere in this crate.
#[derive(Debug)]
pub enum Error {
    /// An error occurred while reading from the backing object.
    ///
    /// Surfaced verbatim from the [`ElfReader`](crate::reader::ElfReader)
    /// collaborator, whether it fails while loading the header tables or
    /// mid-population.
    Io {
        /// A descriptive message about the I/O error.
        msg: Cow<'static, str>,
    },

    /// The image allocation failed or its layout was not representable.
    ///
    /// Treated as out-of-memory; nothing further is attempted.
    Alloc {
        /// A descriptive message about the allocation error.
        msg: Cow<'static, str>,
    },

    /// An error occurred while parsing the ELF file header.
    ///
    /// Raised for invalid magic bytes, a class mismatch, an unsupported
    /// version, or header-table entry sizes that do not match the format.
    ParseEhdr {
        /// A descriptive message about the header parsing error.
        msg: Cow<'static, str>,
    },

    /// A copy or zero-fill would have exceeded its target region.
    ///
    /// The sizing and population passes compute region extents from the same
    /// header tables, so this indicates headers that changed between passes
    /// or a malformed object whose declared sizes disagree with themselves.
    Overrun {
        /// A descriptive message about the offending entry.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Io { msg } => write!(f, "I/O error: {msg}"),
            Error::Alloc { msg } => write!(f, "Allocation error: {msg}"),
            Error::ParseEhdr { msg } => write!(f, "ELF header parsing error: {msg}"),
            Error::Overrun { msg } => write!(f, "Region overrun: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

#[cold]
#[inline(never)]
pub(crate) fn io_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Io { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn alloc_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Alloc { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn parse_ehdr_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::ParseEhdr { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn overrun_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Overrun { msg: msg.into() }
}
