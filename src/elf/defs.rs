//! Raw ELF header definitions.
//!
//! The native header structs come from the `elf` crate, selected by the
//! target's pointer width, and are wrapped in transparent newtypes so the
//! rest of the crate never names the width-specific variants.

use core::ops::Deref;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        pub(crate) const E_CLASS: u8 = elf::abi::ELFCLASS64;
        pub(crate) type Ehdr = elf::file::Elf64_Ehdr;
        pub(crate) type Phdr = elf::segment::Elf64_Phdr;
        pub(crate) type Shdr = elf::section::Elf64_Shdr;
        pub(crate) const EHDR_SIZE: usize = core::mem::size_of::<elf::file::Elf64_Ehdr>();
    } else {
        pub(crate) const E_CLASS: u8 = elf::abi::ELFCLASS32;
        pub(crate) type Ehdr = elf::file::Elf32_Ehdr;
        pub(crate) type Phdr = elf::segment::Elf32_Phdr;
        pub(crate) type Shdr = elf::section::Elf32_Shdr;
        pub(crate) const EHDR_SIZE: usize = core::mem::size_of::<elf::file::Elf32_Ehdr>();
    }
}

/// ELF program header.
///
/// Describes one segment of the object file. Only `PT_LOAD` entries are of
/// interest to this loader; everything else is skipped during the scan.
#[derive(Debug)]
#[repr(transparent)]
pub struct ElfPhdr {
    phdr: Phdr,
}

impl Deref for ElfPhdr {
    type Target = Phdr;

    fn deref(&self) -> &Self::Target {
        &self.phdr
    }
}

impl ElfPhdr {
    #[cfg(test)]
    pub(crate) fn new(
        p_type: u32,
        p_flags: u32,
        p_offset: usize,
        p_vaddr: usize,
        p_filesz: usize,
        p_memsz: usize,
        p_align: usize,
    ) -> Self {
        Self {
            phdr: Phdr {
                p_type,
                p_flags,
                p_offset: p_offset as _,
                p_vaddr: p_vaddr as _,
                p_paddr: p_vaddr as _,
                p_filesz: p_filesz as _,
                p_memsz: p_memsz as _,
                p_align: p_align as _,
            },
        }
    }
}

/// ELF section header.
///
/// Describes one section of the object file. The loader cares about the
/// `SHF_ALLOC`/`SHF_WRITE` flags, the `SHT_NOBITS` type, and the size,
/// offset and alignment fields.
#[derive(Debug)]
#[repr(transparent)]
pub struct ElfShdr {
    shdr: Shdr,
}

impl Deref for ElfShdr {
    type Target = Shdr;

    fn deref(&self) -> &Self::Target {
        &self.shdr
    }
}

impl ElfShdr {
    #[cfg(test)]
    pub(crate) fn new(
        sh_type: u32,
        sh_flags: usize,
        sh_offset: usize,
        sh_size: usize,
        sh_addralign: usize,
    ) -> Self {
        Self {
            shdr: Shdr {
                sh_name: 0,
                sh_type,
                sh_flags: sh_flags as _,
                sh_addr: 0,
                sh_offset: sh_offset as _,
                sh_size: sh_size as _,
                sh_link: 0,
                sh_info: 0,
                sh_addralign: sh_addralign as _,
                sh_entsize: 0,
            },
        }
    }
}
