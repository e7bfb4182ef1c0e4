//! ELF (Executable and Linkable Format) data structures used by the loader.

mod defs;
mod ehdr;

pub(crate) use defs::{EHDR_SIZE, Phdr, Shdr};
pub(crate) use ehdr::ElfHeader;

pub use defs::{ElfPhdr, ElfShdr};
/// ELF ABI constants from the `elf` crate.
pub use elf::abi;
