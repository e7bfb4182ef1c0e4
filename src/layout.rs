//! Sizing pass: computes the resident footprint of a module before any
//! memory is touched.

use crate::{
    info::{LoadInfo, Placement, RegionKind},
    segment::{ALIGN_UNIT, roundup},
};

/// Computes `text_size`, `data_size`, the region alignments and the
/// inter-region pad, writing them into the record.
///
/// Pure computation over the already-loaded header tables: no I/O, no
/// allocation, no failure mode. Entries the format marks as irrelevant to
/// loading contribute nothing. Recomputes from scratch on every call, so
/// running it twice over the same record yields the same results.
pub(crate) fn compute_layout(info: &mut LoadInfo) {
    let mut text_size = 0usize;
    let mut data_size = 0usize;
    let mut text_align = 1usize;
    let mut data_align = 1usize;
    let mut seg_pad = 0usize;
    // Base virtual address of the text segment, used to turn the data
    // segment's declared address into a byte gap past the end of text.
    let mut text_vaddr = 0usize;

    for entry in info.loadable_entries() {
        match entry.placement {
            Placement::Anchored { vaddr } => match entry.kind {
                RegionKind::Text => {
                    text_size = text_size.wrapping_add(entry.mem_size);
                    text_vaddr = vaddr;
                }
                RegionKind::Data => {
                    data_size = data_size.wrapping_add(entry.mem_size);
                    // One-shot: with several writable segments only the last
                    // gap would be honored, so such objects are unsupported.
                    seg_pad = vaddr.wrapping_sub(text_vaddr.wrapping_add(text_size));
                }
            },
            Placement::Packed { align, .. } => {
                let (size, region_align) = match entry.kind {
                    RegionKind::Text => (&mut text_size, &mut text_align),
                    RegionKind::Data => (&mut data_size, &mut data_align),
                };
                *size = roundup(*size, align);
                *size = size.wrapping_add(roundup(entry.mem_size, ALIGN_UNIT));
                if *region_align < align {
                    *region_align = align;
                }
            }
        }
    }

    if !info.segment_mode() {
        // The data region starts at text_addr + text_size + seg_pad. Padding
        // text up to the data alignment keeps every packed data section at
        // an absolutely aligned resident address, since the allocation base
        // is itself aligned to at least data_align.
        seg_pad = roundup(text_size, data_align).wrapping_sub(text_size);
    }

    info.text_size = text_size;
    info.data_size = data_size;
    info.text_align = text_align;
    info.data_align = data_align;
    info.seg_pad = seg_pad;
}
