//! Byte-level builders for small relocatable objects, emitted in the layout
//! of the running target so the loader's raw header casts see real input.
#![allow(dead_code)]

#[cfg(target_pointer_width = "64")]
pub mod raw {
    pub const EHDR_SIZE: usize = 64;
    pub const PHDR_SIZE: usize = 56;
    pub const SHDR_SIZE: usize = 64;

    const ELFCLASS: u8 = 2;

    /// File header for a relocatable object with the given table geometry.
    pub fn ehdr(phnum: u16, shnum: u16, phoff: usize, shoff: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(EHDR_SIZE);
        v.extend_from_slice(&[0x7f, b'E', b'L', b'F', ELFCLASS, 1, 1, 0]);
        v.extend_from_slice(&[0u8; 8]);
        v.extend_from_slice(&1u16.to_ne_bytes()); // e_type: relocatable
        v.extend_from_slice(&0u16.to_ne_bytes()); // e_machine
        v.extend_from_slice(&1u32.to_ne_bytes()); // e_version
        v.extend_from_slice(&0u64.to_ne_bytes()); // e_entry
        v.extend_from_slice(&(phoff as u64).to_ne_bytes());
        v.extend_from_slice(&(shoff as u64).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // e_flags
        v.extend_from_slice(&(EHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&(PHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&phnum.to_ne_bytes());
        v.extend_from_slice(&(SHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&shnum.to_ne_bytes());
        v.extend_from_slice(&0u16.to_ne_bytes()); // e_shstrndx
        v
    }

    pub fn phdr(
        p_type: u32,
        p_flags: u32,
        offset: usize,
        vaddr: usize,
        filesz: usize,
        memsz: usize,
        align: usize,
    ) -> Vec<u8> {
        let mut v = Vec::with_capacity(PHDR_SIZE);
        v.extend_from_slice(&p_type.to_ne_bytes());
        v.extend_from_slice(&p_flags.to_ne_bytes());
        v.extend_from_slice(&(offset as u64).to_ne_bytes());
        v.extend_from_slice(&(vaddr as u64).to_ne_bytes());
        v.extend_from_slice(&(vaddr as u64).to_ne_bytes()); // p_paddr
        v.extend_from_slice(&(filesz as u64).to_ne_bytes());
        v.extend_from_slice(&(memsz as u64).to_ne_bytes());
        v.extend_from_slice(&(align as u64).to_ne_bytes());
        v
    }

    pub fn shdr(sh_type: u32, sh_flags: u32, offset: usize, size: usize, addralign: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(SHDR_SIZE);
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_name
        v.extend_from_slice(&sh_type.to_ne_bytes());
        v.extend_from_slice(&(sh_flags as u64).to_ne_bytes());
        v.extend_from_slice(&0u64.to_ne_bytes()); // sh_addr
        v.extend_from_slice(&(offset as u64).to_ne_bytes());
        v.extend_from_slice(&(size as u64).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_link
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_info
        v.extend_from_slice(&(addralign as u64).to_ne_bytes());
        v.extend_from_slice(&0u64.to_ne_bytes()); // sh_entsize
        v
    }
}

#[cfg(target_pointer_width = "32")]
pub mod raw {
    pub const EHDR_SIZE: usize = 52;
    pub const PHDR_SIZE: usize = 32;
    pub const SHDR_SIZE: usize = 40;

    const ELFCLASS: u8 = 1;

    pub fn ehdr(phnum: u16, shnum: u16, phoff: usize, shoff: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(EHDR_SIZE);
        v.extend_from_slice(&[0x7f, b'E', b'L', b'F', ELFCLASS, 1, 1, 0]);
        v.extend_from_slice(&[0u8; 8]);
        v.extend_from_slice(&1u16.to_ne_bytes()); // e_type: relocatable
        v.extend_from_slice(&0u16.to_ne_bytes()); // e_machine
        v.extend_from_slice(&1u32.to_ne_bytes()); // e_version
        v.extend_from_slice(&0u32.to_ne_bytes()); // e_entry
        v.extend_from_slice(&(phoff as u32).to_ne_bytes());
        v.extend_from_slice(&(shoff as u32).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // e_flags
        v.extend_from_slice(&(EHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&(PHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&phnum.to_ne_bytes());
        v.extend_from_slice(&(SHDR_SIZE as u16).to_ne_bytes());
        v.extend_from_slice(&shnum.to_ne_bytes());
        v.extend_from_slice(&0u16.to_ne_bytes()); // e_shstrndx
        v
    }

    pub fn phdr(
        p_type: u32,
        p_flags: u32,
        offset: usize,
        vaddr: usize,
        filesz: usize,
        memsz: usize,
        align: usize,
    ) -> Vec<u8> {
        let mut v = Vec::with_capacity(PHDR_SIZE);
        v.extend_from_slice(&p_type.to_ne_bytes());
        v.extend_from_slice(&(offset as u32).to_ne_bytes());
        v.extend_from_slice(&(vaddr as u32).to_ne_bytes());
        v.extend_from_slice(&(vaddr as u32).to_ne_bytes()); // p_paddr
        v.extend_from_slice(&(filesz as u32).to_ne_bytes());
        v.extend_from_slice(&(memsz as u32).to_ne_bytes());
        v.extend_from_slice(&p_flags.to_ne_bytes());
        v.extend_from_slice(&(align as u32).to_ne_bytes());
        v
    }

    pub fn shdr(sh_type: u32, sh_flags: u32, offset: usize, size: usize, addralign: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(SHDR_SIZE);
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_name
        v.extend_from_slice(&sh_type.to_ne_bytes());
        v.extend_from_slice(&(sh_flags as u32).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_addr
        v.extend_from_slice(&(offset as u32).to_ne_bytes());
        v.extend_from_slice(&(size as u32).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_link
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_info
        v.extend_from_slice(&(addralign as u32).to_ne_bytes());
        v.extend_from_slice(&0u32.to_ne_bytes()); // sh_entsize
        v
    }
}
