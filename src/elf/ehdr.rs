use crate::{
    Result,
    elf::{
        EHDR_SIZE, Phdr, Shdr,
        defs::{E_CLASS, Ehdr},
    },
    error::parse_ehdr_error,
};
use core::ops::Deref;
use elf::abi::{EI_CLASS, EI_VERSION, ELFMAGIC, EV_CURRENT};

/// A validated ELF file header.
#[repr(transparent)]
pub(crate) struct ElfHeader {
    ehdr: Ehdr,
}

impl Deref for ElfHeader {
    type Target = Ehdr;

    fn deref(&self) -> &Self::Target {
        &self.ehdr
    }
}

impl ElfHeader {
    /// Copies the header out of `data` and validates it.
    ///
    /// Read by value, unaligned: the staging buffer carries no alignment
    /// guarantee.
    pub(crate) fn new(data: &[u8]) -> Result<Self> {
        debug_assert!(data.len() >= EHDR_SIZE);
        let ehdr = Self {
            ehdr: unsafe { data.as_ptr().cast::<Ehdr>().read_unaligned() },
        };
        ehdr.validate()?;
        Ok(ehdr)
    }

    /// Structural validation only. Whether this object *should* be loaded
    /// (machine, object type, signatures) is the host's policy, not ours.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.e_ident[0..4] != ELFMAGIC {
            return Err(parse_ehdr_error("invalid ELF magic"));
        }
        if self.e_ident[EI_CLASS] != E_CLASS {
            return Err(parse_ehdr_error("file class mismatch"));
        }
        if self.e_ident[EI_VERSION] != EV_CURRENT {
            return Err(parse_ehdr_error("invalid ELF version"));
        }
        if self.e_phnum > 0 && self.e_phentsize as usize != size_of::<Phdr>() {
            return Err(parse_ehdr_error("unexpected program header entry size"));
        }
        if self.e_phnum == 0 && self.e_shnum > 0 && self.e_shentsize as usize != size_of::<Shdr>() {
            return Err(parse_ehdr_error("unexpected section header entry size"));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn e_phnum(&self) -> usize {
        self.ehdr.e_phnum as usize
    }

    #[inline]
    pub(crate) fn e_shnum(&self) -> usize {
        self.ehdr.e_shnum as usize
    }

    #[inline]
    pub(crate) fn phdr_range(&self) -> (usize, usize) {
        let phdrs_size = self.e_phentsize as usize * self.e_phnum();
        let phdr_start = self.e_phoff as usize;
        // Saturate on a hostile offset; the reader rejects the range.
        (phdr_start, phdr_start.saturating_add(phdrs_size))
    }

    #[inline]
    pub(crate) fn shdr_range(&self) -> (usize, usize) {
        let shdrs_size = self.e_shentsize as usize * self.e_shnum();
        let shdr_start = self.e_shoff as usize;
        (shdr_start, shdr_start.saturating_add(shdrs_size))
    }

    #[cfg(test)]
    pub(crate) fn for_tests(phnum: u16, shnum: u16) -> Self {
        let mut e_ident = [0u8; 16];
        e_ident[0..4].copy_from_slice(&ELFMAGIC);
        e_ident[EI_CLASS] = E_CLASS;
        e_ident[EI_VERSION] = EV_CURRENT;
        Self {
            ehdr: Ehdr {
                e_ident,
                e_type: elf::abi::ET_REL,
                e_machine: 0,
                e_version: EV_CURRENT as u32,
                e_entry: 0,
                e_phoff: 0,
                e_shoff: 0,
                e_flags: 0,
                e_ehsize: EHDR_SIZE as u16,
                e_phentsize: size_of::<Phdr>() as u16,
                e_phnum: phnum,
                e_shentsize: size_of::<Shdr>() as u16,
                e_shnum: shnum,
                e_shstrndx: 0,
            },
        }
    }
}
