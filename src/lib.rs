//! # modload
//! The in-memory loader stage of a dynamic module facility for small-footprint
//! systems: given an already-open relocatable ELF object, it computes how much
//! resident memory the object needs (split into an executable "text" region and
//! a writable "data" region), performs one contiguous allocation backing both
//! regions, and copies every loadable piece of the file into place,
//! zero-filling uninitialized tails.
//!
//! Symbol resolution and relocation fix-up are left to later stages; the loaded
//! [`ModuleImage`] hands them the region bases and the resident address of each
//! placed section.
//! ## Example
//! ```no_run
//! use modload::{Loader, reader::ElfBinary};
//!
//! let bytes = std::fs::read("module.o").unwrap();
//! let mut loader = Loader::new();
//! let image = loader.load(ElfBinary::new("module.o", &bytes)).unwrap();
//! ```
#![no_std]
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod elf;
mod error;
mod image;
mod info;
mod layout;
mod loader;
pub mod memory;
pub mod reader;
mod segment;

pub use error::Error;
pub use image::ModuleImage;
pub use info::LoadInfo;
pub use loader::Loader;

pub type Result<T> = core::result::Result<T, Error>;
