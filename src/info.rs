//! The per-load record threaded through every stage of a load.

use crate::elf::{ElfHeader, ElfPhdr, ElfShdr};
use alloc::vec::Vec;
use elf::abi::{PF_X, PT_LOAD, SHF_ALLOC, SHF_WRITE, SHT_NOBITS};

/// The central record of one load attempt.
///
/// Created by the loader once the header tables are in memory, filled in
/// field by field as the stages run: the layout pass writes the sizes,
/// alignments and inter-region pad, the orchestrator writes the region base
/// addresses once allocation succeeds. One instance per object being loaded,
/// owned exclusively by that load; it does not outlive the attempt.
pub struct LoadInfo {
    pub(crate) ehdr: ElfHeader,
    pub(crate) phdrs: Vec<ElfPhdr>,
    pub(crate) shdrs: Vec<ElfShdr>,
    /// Resident bytes of executable content.
    pub(crate) text_size: usize,
    /// Resident bytes of writable content, uninitialized tail included.
    pub(crate) data_size: usize,
    /// Required text alignment; starts unconstrained, only ever raised.
    pub(crate) text_align: usize,
    /// Required data alignment; starts unconstrained, only ever raised.
    pub(crate) data_align: usize,
    /// Byte gap between the end of text and the start of data. Segment
    /// mode: the address gap the object declared. Section mode: the slack
    /// that rounds the data region's offset up to `data_align`.
    pub(crate) seg_pad: usize,
    pub(crate) text_addr: usize,
    pub(crate) data_addr: usize,
}

impl LoadInfo {
    pub(crate) fn new(ehdr: ElfHeader, phdrs: Vec<ElfPhdr>, shdrs: Vec<ElfShdr>) -> Self {
        Self {
            ehdr,
            phdrs,
            shdrs,
            text_size: 0,
            data_size: 0,
            text_align: 1,
            data_align: 1,
            seg_pad: 0,
            text_addr: 0,
            data_addr: 0,
        }
    }

    /// Computed size of the text region in bytes.
    #[inline]
    pub fn text_size(&self) -> usize {
        self.text_size
    }

    /// Computed size of the data region in bytes.
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Required alignment of the text region.
    #[inline]
    pub fn text_align(&self) -> usize {
        self.text_align
    }

    /// Required alignment of the data region.
    #[inline]
    pub fn data_align(&self) -> usize {
        self.data_align
    }

    /// Byte gap preserved between the text and data regions.
    #[inline]
    pub fn seg_pad(&self) -> usize {
        self.seg_pad
    }

    /// Whether the object's loadable content is described by program headers.
    ///
    /// The two table kinds are mutually exclusive here: an object that
    /// declares any program headers is laid out segment by segment, anything
    /// else section by section.
    #[inline]
    pub(crate) fn segment_mode(&self) -> bool {
        self.ehdr.e_phnum() > 0
    }

    /// Converts whichever header table drives this object into the common
    /// loadable-entry shape consumed by the sizing and population passes.
    ///
    /// Entries irrelevant to loading (non-`PT_LOAD` segments, sections
    /// without `SHF_ALLOC`) are skipped here, silently: the format permits
    /// them and they contribute nothing to the image.
    pub(crate) fn loadable_entries(&self) -> Vec<LoadableEntry> {
        if self.segment_mode() {
            self.phdrs
                .iter()
                .filter(|phdr| phdr.p_type == PT_LOAD)
                .map(|phdr| LoadableEntry {
                    kind: if phdr.p_flags & PF_X != 0 {
                        RegionKind::Text
                    } else {
                        RegionKind::Data
                    },
                    offset: phdr.p_offset as usize,
                    file_size: phdr.p_filesz as usize,
                    mem_size: phdr.p_memsz as usize,
                    placement: Placement::Anchored {
                        vaddr: phdr.p_vaddr as usize,
                    },
                })
                .collect()
        } else {
            self.shdrs
                .iter()
                .enumerate()
                .filter(|(_, shdr)| shdr.sh_flags as u64 & SHF_ALLOC as u64 != 0)
                .map(|(index, shdr)| LoadableEntry {
                    kind: if shdr.sh_flags as u64 & SHF_WRITE as u64 != 0 {
                        RegionKind::Data
                    } else {
                        RegionKind::Text
                    },
                    offset: shdr.sh_offset as usize,
                    // NOBITS sections occupy memory but carry no file bytes.
                    file_size: if shdr.sh_type == SHT_NOBITS {
                        0
                    } else {
                        shdr.sh_size as usize
                    },
                    mem_size: shdr.sh_size as usize,
                    placement: Placement::Packed {
                        align: shdr.sh_addralign as usize,
                        index,
                    },
                })
                .collect()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tables(phdrs: Vec<ElfPhdr>, shdrs: Vec<ElfShdr>) -> Self {
        let ehdr = ElfHeader::for_tests(phdrs.len() as u16, shdrs.len() as u16);
        Self::new(ehdr, phdrs, shdrs)
    }
}

/// Which region a loadable entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RegionKind {
    Text,
    Data,
}

/// How a loadable entry is positioned inside its region.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Placement {
    /// Segment mode: the whole segment sits at the region base, at the
    /// virtual address the object declared. The address gap between the
    /// text and data segments becomes the inter-region pad.
    Anchored { vaddr: usize },
    /// Section mode: packed at the next suitably aligned cursor position;
    /// the resolved address is recorded under the section's table index.
    Packed { align: usize, index: usize },
}

/// One unit of loadable content, converted from either header table.
#[derive(Debug)]
pub(crate) struct LoadableEntry {
    pub(crate) kind: RegionKind,
    /// Byte offset of the entry's content within the backing file.
    pub(crate) offset: usize,
    /// Bytes present in the file; never more than `mem_size` in a sane object.
    pub(crate) file_size: usize,
    /// Resident footprint in bytes; the tail beyond `file_size` is zero-filled.
    pub(crate) mem_size: usize,
    pub(crate) placement: Placement,
}
