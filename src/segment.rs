//! Population pass: copies loadable content into the allocated regions.

use crate::{
    Result,
    error::overrun_error,
    info::{LoadInfo, Placement, RegionKind},
    reader::ElfReader,
};
use hashbrown::HashMap;

/// Granule the loader packs sections on: every placed size is rounded up to
/// this many bytes before the cursor moves on.
pub(crate) const ALIGN_UNIT: usize = 4;

/// Round `x` up to `align` (a power of two; 0 and 1 mean no constraint).
///
/// Wraps instead of panicking on hostile sizes; callers bound the result
/// against the region or the allocation size check.
#[inline]
pub(crate) fn roundup(x: usize, align: usize) -> usize {
    if align == 0 {
        return x;
    }
    x.wrapping_add(align - 1) & !(align - 1)
}

/// A write cursor over one allocated region.
///
/// All writes are bounds-checked against the region, and every byte the
/// cursor skips (alignment gaps, granule rounding) is zeroed so nothing in
/// the finished image carries allocator residue.
struct RegionCursor<'mem> {
    mem: &'mem mut [u8],
    /// Resident address of `mem[0]`.
    base: usize,
    pos: usize,
}

impl<'mem> RegionCursor<'mem> {
    fn new(mem: &'mem mut [u8], base: usize) -> Self {
        Self { mem, base, pos: 0 }
    }

    #[inline]
    fn resident_addr(&self) -> usize {
        self.base + self.pos
    }

    /// Moves the cursor up to its next `align` boundary, zeroing the gap.
    ///
    /// Alignment is region-relative: the sizing pass accumulated from offset
    /// zero with the same rounding, so the two passes always agree on where
    /// each entry lands.
    fn align_to(&mut self, align: usize) -> Result<()> {
        let next = roundup(self.pos, align);
        if next > self.mem.len() {
            return Err(overrun_error("alignment past the end of the region"));
        }
        self.mem[self.pos..next].fill(0);
        self.pos = next;
        Ok(())
    }

    /// A `len`-byte window at the cursor. Does not advance.
    fn window(&mut self, len: usize) -> Result<&mut [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.mem.len())
            .ok_or_else(|| overrun_error("entry exceeds its region"))?;
        Ok(&mut self.mem[self.pos..end])
    }

    /// Advances past `used` bytes, zeroing up to the granule-rounded step.
    fn advance(&mut self, used: usize) -> Result<()> {
        let end = self
            .pos
            .checked_add(roundup(used, ALIGN_UNIT))
            .filter(|&end| end <= self.mem.len())
            .ok_or_else(|| overrun_error("granule rounding exceeds the region"))?;
        self.mem[self.pos + used..end].fill(0);
        self.pos = end;
        Ok(())
    }
}

/// Copies every loadable entry of the object into the text/data regions.
///
/// Walks the same header tables the sizing pass walked, with an independent
/// cursor per region. A read failure aborts immediately; no later entry is
/// attempted. Returns the side-table mapping each packed section's index to
/// its resident address, for the relocation stage that runs next.
pub(crate) fn populate<R: ElfReader>(
    info: &LoadInfo,
    object: &mut R,
    text: &mut [u8],
    data: &mut [u8],
    text_addr: usize,
    data_addr: usize,
) -> Result<HashMap<usize, usize>> {
    #[cfg(feature = "log")]
    log::trace!(
        "[Populate] {}: text {:#x}+{:#x}, data {:#x}+{:#x}",
        object.shortname(),
        text_addr,
        text.len(),
        data_addr,
        data.len(),
    );
    let mut placements = HashMap::new();
    let mut text_cursor = RegionCursor::new(text, text_addr);
    let mut data_cursor = RegionCursor::new(data, data_addr);

    for entry in info.loadable_entries() {
        let cursor = match entry.kind {
            RegionKind::Text => &mut text_cursor,
            RegionKind::Data => &mut data_cursor,
        };
        if entry.file_size > entry.mem_size {
            return Err(overrun_error("entry declares more file bytes than memory"));
        }
        match entry.placement {
            Placement::Anchored { .. } => {
                // The segment occupies the region from its base; the declared
                // address gap between regions is baked into the allocation.
                let dest = cursor.window(entry.mem_size)?;
                if entry.file_size > 0 {
                    object.read(&mut dest[..entry.file_size], entry.offset)?;
                }
                dest[entry.file_size..].fill(0);
            }
            Placement::Packed { align, index } => {
                cursor.align_to(align)?;
                let addr = cursor.resident_addr();
                let dest = cursor.window(entry.mem_size)?;
                if entry.file_size > 0 {
                    object.read(&mut dest[..entry.file_size], entry.offset)?;
                }
                dest[entry.file_size..].fill(0);
                cursor.advance(entry.mem_size)?;
                #[cfg(feature = "log")]
                log::trace!("[Populate] section {} -> {:#x}", index, addr);
                placements.insert(index, addr);
            }
        }
    }
    Ok(placements)
}
