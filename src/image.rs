//! The populated module image.

use crate::{
    info::LoadInfo,
    memory::{DefaultAlloc, ImageAlloc, ImageMemory},
};
use core::fmt::Debug;
use core::ptr::NonNull;
use hashbrown::HashMap;

/// A fully loaded module image, ready for relocation and symbol binding.
///
/// Owns the contiguous allocation backing the text and data regions; dropping
/// the image releases it through the allocator it was obtained from. Until
/// the image is dropped the caller must ensure no other thread touches the
/// memory behind the returned addresses.
pub struct ModuleImage<A: ImageAlloc = DefaultAlloc> {
    memory: Option<ImageMemory<A>>,
    text_size: usize,
    data_size: usize,
    text_addr: usize,
    data_addr: usize,
    section_addrs: HashMap<usize, usize>,
}

impl<A: ImageAlloc> ModuleImage<A> {
    pub(crate) fn new(
        memory: Option<ImageMemory<A>>,
        info: &LoadInfo,
        section_addrs: HashMap<usize, usize>,
    ) -> Self {
        Self {
            memory,
            text_size: info.text_size,
            data_size: info.data_size,
            text_addr: info.text_addr,
            data_addr: info.data_addr,
            section_addrs,
        }
    }

    /// Base of the executable region, or `None` for an image with no
    /// resident content.
    #[inline]
    pub fn text_base(&self) -> Option<NonNull<u8>> {
        self.memory.as_ref().map(|_| unsafe {
            // The allocator never returns null.
            NonNull::new_unchecked(self.text_addr as *mut u8)
        })
    }

    /// Size of the executable region in bytes.
    #[inline]
    pub fn text_size(&self) -> usize {
        self.text_size
    }

    /// Base of the writable region. `None` when the object declares no
    /// writable content.
    #[inline]
    pub fn data_base(&self) -> Option<NonNull<u8>> {
        if self.data_size == 0 {
            return None;
        }
        self.memory
            .as_ref()
            .map(|_| unsafe { NonNull::new_unchecked(self.data_addr as *mut u8) })
    }

    /// Size of the writable region in bytes, uninitialized tail included.
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Total length of the backing allocation.
    #[inline]
    pub fn image_len(&self) -> usize {
        self.memory.as_ref().map(ImageMemory::len).unwrap_or(0)
    }

    /// Resident address of the section at `index` in the object's section
    /// header table, if the loader placed it.
    ///
    /// Only meaningful for objects laid out section by section; the
    /// relocation stage reads this instead of the file-relative addresses in
    /// the section table.
    #[inline]
    pub fn section_addr(&self, index: usize) -> Option<usize> {
        self.section_addrs.get(&index).copied()
    }

    /// The executable region's bytes. Empty when nothing was allocated.
    #[inline]
    pub fn text(&self) -> &[u8] {
        match &self.memory {
            Some(_) => unsafe {
                core::slice::from_raw_parts(self.text_addr as *const u8, self.text_size)
            },
            None => &[],
        }
    }

    /// The writable region's bytes. Empty when the object has no data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        match &self.memory {
            Some(_) if self.data_size > 0 => unsafe {
                core::slice::from_raw_parts(self.data_addr as *const u8, self.data_size)
            },
            _ => &[],
        }
    }
}

impl<A: ImageAlloc> Debug for ModuleImage<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModuleImage")
            .field("text_addr", &self.text_addr)
            .field("text_size", &self.text_size)
            .field("data_addr", &self.data_addr)
            .field("data_size", &self.data_size)
            .finish()
    }
}
