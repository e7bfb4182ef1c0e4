use crate::{
    Result,
    elf::{EHDR_SIZE, ElfHeader, ElfPhdr, ElfShdr, Phdr, Shdr},
    error::alloc_error,
    image::ModuleImage,
    info::LoadInfo,
    layout,
    memory::{DefaultAlloc, ImageAlloc, ImageMemory},
    reader::ElfReader,
    segment,
};
use alloc::vec::Vec;
use core::marker::PhantomData;

/// Scratch buffer the header tables are staged through.
///
/// Reused across loads so repeated loading does not re-allocate for every
/// object's tables.
pub(crate) struct ElfBuf {
    buf: Vec<u8>,
}

impl ElfBuf {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.resize(EHDR_SIZE, 0);
        ElfBuf { buf }
    }

    pub(crate) fn prepare_ehdr(&mut self, object: &mut impl ElfReader) -> Result<ElfHeader> {
        object.read(&mut self.buf[..EHDR_SIZE], 0)?;
        ElfHeader::new(&self.buf)
    }

    pub(crate) fn prepare_phdrs(
        &mut self,
        ehdr: &ElfHeader,
        object: &mut impl ElfReader,
    ) -> Result<Vec<ElfPhdr>> {
        let (phdr_start, phdr_end) = ehdr.phdr_range();
        let size = phdr_end - phdr_start;
        if size > self.buf.len() {
            self.buf.resize(size, 0);
        }
        object.read(&mut self.buf[..size], phdr_start)?;
        let count = ehdr.e_phnum();
        let mut phdrs = Vec::with_capacity(count);
        for i in 0..count {
            let hdr = unsafe {
                self.buf
                    .as_ptr()
                    .add(i * size_of::<Phdr>())
                    .cast::<ElfPhdr>()
                    .read_unaligned()
            };
            phdrs.push(hdr);
        }
        Ok(phdrs)
    }

    pub(crate) fn prepare_shdrs(
        &mut self,
        ehdr: &ElfHeader,
        object: &mut impl ElfReader,
    ) -> Result<Vec<ElfShdr>> {
        let (shdr_start, shdr_end) = ehdr.shdr_range();
        let size = shdr_end - shdr_start;
        if size > self.buf.len() {
            self.buf.resize(size, 0);
        }
        object.read(&mut self.buf[..size], shdr_start)?;
        let count = ehdr.e_shnum();
        let mut shdrs = Vec::with_capacity(count);
        for i in 0..count {
            let hdr = unsafe {
                self.buf
                    .as_ptr()
                    .add(i * size_of::<Shdr>())
                    .cast::<ElfShdr>()
                    .read_unaligned()
            };
            shdrs.push(hdr);
        }
        Ok(shdrs)
    }
}

/// The module loader.
///
/// `Loader` orchestrates one load attempt end to end: header tables in,
/// layout computed, one contiguous allocation made, regions populated. Any
/// failure along the way releases everything acquired during the attempt
/// before the error reaches the caller.
///
/// # Examples
/// ```no_run
/// use modload::{Loader, reader::ElfBinary};
///
/// let bytes = std::fs::read("module.o").unwrap();
/// let mut loader = Loader::new();
/// let image = loader.load(ElfBinary::new("module.o", &bytes)).unwrap();
/// ```
pub struct Loader<A = DefaultAlloc>
where
    A: ImageAlloc,
{
    buf: ElfBuf,
    _marker: PhantomData<A>,
}

impl Loader<DefaultAlloc> {
    /// Creates a new `Loader` backed by the global allocator.
    pub fn new() -> Self {
        Self {
            buf: ElfBuf::new(),
            _marker: PhantomData,
        }
    }
}

impl Default for Loader<DefaultAlloc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ImageAlloc> Loader<A> {
    /// Returns a loader using a custom image allocator, e.g. one backed by a
    /// dedicated executable heap.
    pub fn with_alloc<NewA: ImageAlloc>(self) -> Loader<NewA> {
        Loader {
            buf: self.buf,
            _marker: PhantomData,
        }
    }

    /// Reads the file header and whichever header table drives the object.
    ///
    /// The table kinds are mutually exclusive: any program headers select
    /// segment mode, otherwise the section headers are loaded.
    pub(crate) fn read_info(&mut self, object: &mut impl ElfReader) -> Result<LoadInfo> {
        let ehdr = self.buf.prepare_ehdr(object)?;
        let (phdrs, shdrs) = if ehdr.e_phnum() > 0 {
            (self.buf.prepare_phdrs(&ehdr, object)?, Vec::new())
        } else if ehdr.e_shnum() > 0 {
            (Vec::new(), self.buf.prepare_shdrs(&ehdr, object)?)
        } else {
            // No tables at all: nothing is loadable.
            (Vec::new(), Vec::new())
        };
        Ok(LoadInfo::new(ehdr, phdrs, shdrs))
    }

    /// Computes the resident layout of `object` without touching memory.
    ///
    /// Reads the header tables and runs the sizing pass only; no allocation,
    /// no copying. Useful for checking a module's footprint against a memory
    /// budget before committing to a load.
    pub fn layout<R: ElfReader>(&mut self, object: &mut R) -> Result<LoadInfo> {
        let mut info = self.read_info(object)?;
        layout::compute_layout(&mut info);
        Ok(info)
    }

    /// Loads a module image from `object`.
    ///
    /// Sequence: header tables, then layout, then a single allocation of
    /// `text_size + seg_pad + data_size` bytes at the stricter of the two
    /// region alignments (skipped entirely when there is no text), then
    /// population. On success the
    /// populated image transfers to the caller; on failure every resource
    /// acquired by this attempt has been released before the error returns.
    pub fn load<R: ElfReader>(&mut self, mut object: R) -> Result<ModuleImage<A>> {
        let mut info = self.layout(&mut object)?;
        #[cfg(feature = "log")]
        log::debug!(
            "[Load] {}: text size {:#x} align {}, data size {:#x} align {}, pad {:#x}",
            object.shortname(),
            info.text_size,
            info.text_align,
            info.data_size,
            info.data_align,
            info.seg_pad,
        );

        let total = info
            .text_size
            .checked_add(info.seg_pad)
            .and_then(|n| n.checked_add(info.data_size))
            .ok_or_else(|| alloc_error("module image size overflows"))?;

        let mut memory = if info.text_size > 0 {
            // The base must satisfy both regions: data sits at an offset the
            // layout pass already rounded to data_align.
            let align = info.text_align.max(info.data_align);
            let memory = ImageMemory::<A>::allocate(total, align)?;
            info.text_addr = memory.base();
            if info.data_size > 0 {
                info.data_addr = info.text_addr + info.text_size + info.seg_pad;
            }
            Some(memory)
        } else {
            // Nothing executable to place; an object with no loadable
            // content at all is not an error.
            None
        };

        let placements = match memory.as_mut() {
            Some(memory) => {
                let (text, rest) = memory.as_mut_slice().split_at_mut(info.text_size);
                let (pad, data) = rest.split_at_mut(info.seg_pad);
                pad.fill(0);
                segment::populate(&info, &mut object, text, data, info.text_addr, info.data_addr)?
            }
            None => segment::populate(&info, &mut object, &mut [], &mut [], 0, 0)?,
        };
        // A failure above drops `memory`, releasing this attempt's image.

        Ok(ModuleImage::new(memory, &info, placements))
    }
}
