use nom::multi;
use nom::number::complete::{u16 as nom_u16, u32 as nom_u32};
use nom::number::Endianness;
use nom_derive::{Nom, Parse};

use crate::error::{FixupError, FixupResult};
use crate::fixups::DyldFixup;
use crate::format::DyldPointerFormat;

/// On-disk layout of `dyld_chained_starts_in_segment`, before the
/// page-starts array.
#[derive(Debug, Nom)]
struct DyldStartsInSegmentRaw {
    size: u32,
    page_size: u16,
    pointer_format: u16,
    segment_offset: u64,
    max_valid_pointer: u32,
    page_count: u16,
}

/// Chain heads for one segment. `size` is the byte length of the segment's
/// fixed-up region; every chain stays within
/// `[segment_offset, segment_offset + size)`.
///
/// `page_starts` holds at least `page_count` entries; MULTI overflow runs
/// referenced from the first `page_count` entries extend the vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldStartsInSegment {
    pub size: u32,
    pub page_size: u16,
    pub pointer_format: DyldPointerFormat,
    pub segment_offset: u64,
    pub max_valid_pointer: u32,
    pub page_count: u16,
    pub page_starts: Vec<u16>,
    pub fixups: Vec<DyldFixup>,
}

impl DyldStartsInSegment {
    /// Page has no chain.
    pub const DYLD_CHAINED_PTR_START_NONE: u16 = 0xFFFF;
    /// The low 15 bits index the first entry of an overflow run.
    pub const DYLD_CHAINED_PTR_START_MULTI: u16 = 0x8000;
    /// Marks the final entry of an overflow run.
    pub const DYLD_CHAINED_PTR_START_LAST: u16 = 0x4000;

    pub fn parse(bytes: &[u8], endian: Endianness) -> FixupResult<Self> {
        let (cursor, raw) = match endian {
            Endianness::Big => DyldStartsInSegmentRaw::parse_be(bytes)?,
            _ => DyldStartsInSegmentRaw::parse_le(bytes)?,
        };

        let pointer_format = DyldPointerFormat::from_raw(raw.pointer_format)?;
        if !raw.page_size.is_power_of_two() {
            return Err(FixupError::Parsing(format!(
                "page size {:#x} is not a power of two",
                raw.page_size
            )));
        }

        let (mut cursor, mut page_starts) =
            multi::count(nom_u16(endian), raw.page_count as usize)(cursor)?;

        // MULTI runs may live past the page_count entries; pull entries from
        // the record tail until every referenced run has hit its LAST mark.
        for page in 0..raw.page_count as usize {
            let start = page_starts[page];
            if start == Self::DYLD_CHAINED_PTR_START_NONE
                || start & Self::DYLD_CHAINED_PTR_START_MULTI == 0
            {
                continue;
            }
            let mut index = (start & !Self::DYLD_CHAINED_PTR_START_MULTI) as usize;
            loop {
                while index >= page_starts.len() {
                    let (rest, entry) = nom_u16(endian)(cursor)?;
                    cursor = rest;
                    page_starts.push(entry);
                }
                if page_starts[index] & Self::DYLD_CHAINED_PTR_START_LAST != 0 {
                    break;
                }
                index += 1;
            }
        }

        Ok(DyldStartsInSegment {
            size: raw.size,
            page_size: raw.page_size,
            pointer_format,
            segment_offset: raw.segment_offset,
            max_valid_pointer: raw.max_valid_pointer,
            page_count: raw.page_count,
            page_starts,
            fixups: Vec::new(),
        })
    }
}

/// The per-image starts table: one optional `DyldStartsInSegment` per
/// segment, in declared order. Segments whose info offset is 0 have no
/// chains and stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldStartsInImage {
    pub seg_count: u32,
    pub seg_info_offset: Vec<u32>,
    pub seg_starts: Vec<Option<DyldStartsInSegment>>,
}

impl DyldStartsInImage {
    /// `bytes` is the payload from `starts_offset` onwards; the per-segment
    /// info offsets are relative to it.
    pub fn parse(bytes: &[u8], endian: Endianness) -> FixupResult<Self> {
        let (cursor, seg_count) = nom_u32(endian)(bytes)?;
        if seg_count as usize * 4 > cursor.len() {
            return Err(FixupError::Truncated);
        }
        let (_, seg_info_offset) = multi::count(nom_u32(endian), seg_count as usize)(cursor)?;

        let mut seg_starts = Vec::with_capacity(seg_count as usize);
        for offset in &seg_info_offset {
            if *offset == 0 {
                seg_starts.push(None);
                continue;
            }
            let seg_bytes = bytes
                .get(*offset as usize..)
                .ok_or(FixupError::Truncated)?;
            seg_starts.push(Some(DyldStartsInSegment::parse(seg_bytes, endian)?));
        }

        Ok(DyldStartsInImage {
            seg_count,
            seg_info_offset,
            seg_starts,
        })
    }
}
