//! Image memory allocation.
//!
//! The allocator backing a module image is a collaborator, not part of this
//! core: hosts with a dedicated executable heap implement [`ImageAlloc`] over
//! it, everyone else uses [`DefaultAlloc`], which goes through the global
//! allocator. One allocation backs both the text and data regions so the
//! relative offset between them survives the move into memory.

use crate::{Result, error::alloc_error};
use core::{alloc::Layout, marker::PhantomData, ptr::NonNull};

/// Provider of the memory backing a module image.
///
/// The executable text region lives at the start of the allocation, so
/// implementations serving targets with a separate text heap should allocate
/// from it here.
pub trait ImageAlloc {
    /// Allocates `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// The returned memory may contain residual data; the loader overwrites
    /// or zero-fills every byte of the image before handing it out.
    ///
    /// # Safety
    /// `layout` must have a non-zero size.
    unsafe fn alloc(layout: Layout) -> Result<NonNull<u8>>;

    /// Releases memory previously returned by [`ImageAlloc::alloc`].
    ///
    /// # Safety
    /// `ptr` must come from `alloc` with the same `layout`, and must not be
    /// used afterwards.
    unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout);
}

/// An [`ImageAlloc`] backed by the global allocator.
pub struct DefaultAlloc;

impl ImageAlloc for DefaultAlloc {
    unsafe fn alloc(layout: Layout) -> Result<NonNull<u8>> {
        NonNull::new(unsafe { alloc::alloc::alloc(layout) })
            .ok_or_else(|| alloc_error("failed to allocate module image"))
    }

    unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// The owned allocation backing one module image.
///
/// Dropping it releases the memory through the allocator it came from, which
/// is how the loader unwinds a failed attempt without leaking.
pub(crate) struct ImageMemory<A: ImageAlloc> {
    ptr: NonNull<u8>,
    layout: Layout,
    _marker: PhantomData<A>,
}

impl<A: ImageAlloc> ImageMemory<A> {
    /// Allocates `size` bytes aligned to `align` (0 and 1 mean unconstrained).
    pub(crate) fn allocate(size: usize, align: usize) -> Result<Self> {
        let layout = Layout::from_size_align(size, align.max(1))
            .map_err(|_| alloc_error("module image layout is not representable"))?;
        let ptr = unsafe { A::alloc(layout) }?;
        Ok(Self {
            ptr,
            layout,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn base(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl<A: ImageAlloc> Drop for ImageMemory<A> {
    fn drop(&mut self) {
        unsafe { A::dealloc(self.ptr, self.layout) }
    }
}
