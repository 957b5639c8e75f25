use nom::number::Endianness;
use positioned_io::ReadAt;

use crate::error::{FixupError, FixupResult};
use crate::format::DyldPointerFormat;
use crate::header::DyldChainedFixupsHeader;
use crate::imports::DyldChainedImport;
use crate::pointer::DyldPointerFixup;
use crate::starts::{DyldStartsInImage, DyldStartsInSegment};

/// One fixup slot located during a chain walk: the decoded pointer, the raw
/// word it was decoded from (32-bit slots zero-extended), the image offset
/// it lives at, and the pointer format that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldFixup {
    pub offset: u64,
    pub raw: u64,
    pub format: DyldPointerFormat,
    pub fixup: DyldPointerFixup,
}

impl DyldFixup {
    /// Resolve a rebase to its final address given the image's preferred
    /// load address; `None` for binds.
    pub fn resolve(&self, base: u64) -> Option<u64> {
        self.fixup.resolve(self.format, base)
    }

    pub fn is_rebase(&self) -> bool {
        self.fixup.is_rebase()
    }

    pub fn is_bind(&self) -> bool {
        self.fixup.is_bind()
    }

    /// Walk every chain in `start`'s pages and return the fixups in walk
    /// order: pages ascending, chain heads in page-start order, then chain
    /// order.
    pub fn walk<R: ReadAt>(
        image: &R,
        start: &DyldStartsInSegment,
        names: &[String],
        endian: Endianness,
    ) -> FixupResult<Vec<Self>> {
        let mut fixups = Vec::new();
        for page in 0..start.page_count as usize {
            let head = match start.page_starts.get(page) {
                Some(head) => *head,
                None => break,
            };
            if head == DyldStartsInSegment::DYLD_CHAINED_PTR_START_NONE {
                continue;
            }
            if head & DyldStartsInSegment::DYLD_CHAINED_PTR_START_MULTI != 0 {
                let mut index = (head & !DyldStartsInSegment::DYLD_CHAINED_PTR_START_MULTI) as usize;
                loop {
                    let entry = *start.page_starts.get(index).ok_or_else(|| {
                        FixupError::Parsing(format!("page start overflow index {} out of range", index))
                    })?;
                    let last = entry & DyldStartsInSegment::DYLD_CHAINED_PTR_START_LAST != 0;
                    let offset = entry & !DyldStartsInSegment::DYLD_CHAINED_PTR_START_LAST;
                    Self::walk_chain(image, start, page, offset, names, endian, &mut fixups)?;
                    if last {
                        break;
                    }
                    index += 1;
                }
            } else {
                Self::walk_chain(image, start, page, head, names, endian, &mut fixups)?;
            }
        }
        Ok(fixups)
    }

    /// Walk one chain from its head, accumulating a single image offset and
    /// reading each slot at it. Chains may straddle page boundaries but
    /// never segment bounds, and every slot must sit on a stride multiple.
    fn walk_chain<R: ReadAt>(
        image: &R,
        start: &DyldStartsInSegment,
        page: usize,
        offset_in_page: u16,
        names: &[String],
        endian: Endianness,
        fixups: &mut Vec<Self>,
    ) -> FixupResult<()> {
        let format = start.pointer_format;
        let stride = format.stride();
        let width = format.pointer_width();
        let segment_end = start.segment_offset + start.size as u64;
        let mut offset = start.segment_offset
            + page as u64 * start.page_size as u64
            + offset_in_page as u64;

        loop {
            if offset < start.segment_offset || offset >= segment_end {
                return Err(FixupError::ChainEscapesSegment { at: offset });
            }
            if (offset - start.segment_offset) % stride != 0 {
                return Err(FixupError::MisalignedChain { at: offset, stride });
            }

            let raw = read_slot(image, offset, width, endian)?;
            let fixup = DyldPointerFixup::parse(raw, format, names, offset)?;
            let next = fixup.next() as u64;
            fixups.push(DyldFixup {
                offset,
                raw,
                format,
                fixup,
            });
            if next == 0 {
                break;
            }
            offset += next * stride;
        }
        Ok(())
    }
}

fn read_slot<R: ReadAt>(
    image: &R,
    offset: u64,
    width: usize,
    endian: Endianness,
) -> FixupResult<u64> {
    let mut buf = [0u8; 8];
    image.read_exact_at(offset, &mut buf[..width])?;
    let raw = match endian {
        Endianness::Big => u64::from_be_bytes(buf) >> (64 - width * 8),
        _ => u64::from_le_bytes(buf),
    };
    Ok(raw)
}

/// The decoded `LC_DYLD_CHAINED_FIXUPS` payload of one image.
///
/// Constructed from the payload blob (the header is decoded eagerly), then
/// populated by [`parse_starts`](Self::parse_starts) and
/// [`parse`](Self::parse); logically immutable afterwards, so a finished
/// aggregate can be shared across readers. A failed parse leaves the
/// aggregate in its pre-call state.
#[derive(Debug)]
pub struct DyldChainedFixups<R: ReadAt> {
    payload: Vec<u8>,
    image: R,
    endian: Endianness,
    header: DyldChainedFixupsHeader,
    starts: Option<DyldStartsInImage>,
    imports: Vec<DyldChainedImport>,
}

impl<R: ReadAt> DyldChainedFixups<R> {
    /// `payload` is the load command's data blob; `image` is the whole
    /// Mach-O image the chains are embedded in.
    pub fn new(payload: Vec<u8>, image: R, endian: Endianness) -> FixupResult<Self> {
        let header = DyldChainedFixupsHeader::parse(&payload, endian)?;
        Ok(DyldChainedFixups {
            payload,
            image,
            endian,
            header,
            starts: None,
            imports: Vec::new(),
        })
    }

    /// Read the payload out of a positional source first, e.g. from the
    /// `dataoff`/`datasize` range a load-command enumerator reported.
    pub fn from_source<P: ReadAt>(
        payload_source: &P,
        offset: u64,
        size: u64,
        image: R,
        endian: Endianness,
    ) -> FixupResult<Self> {
        let mut payload = vec![0u8; size as usize];
        payload_source.read_exact_at(offset, &mut payload)?;
        Self::new(payload, image, endian)
    }

    pub fn header(&self) -> &DyldChainedFixupsHeader {
        &self.header
    }

    pub fn imports(&self) -> &[DyldChainedImport] {
        &self.imports
    }

    /// Per-segment starts in declared order; `None` for segments without
    /// chains. Empty before [`parse_starts`](Self::parse_starts).
    pub fn starts(&self) -> &[Option<DyldStartsInSegment>] {
        self.starts
            .as_ref()
            .map(|image| image.seg_starts.as_slice())
            .unwrap_or(&[])
    }

    /// The segments that actually carry chains, in declared order.
    pub fn segments(&self) -> impl Iterator<Item = &DyldStartsInSegment> {
        self.starts().iter().flatten()
    }

    /// Every walked fixup, in deterministic order: segments in declared
    /// order, pages ascending, chain order within a page.
    pub fn fixups(&self) -> impl Iterator<Item = &DyldFixup> {
        self.segments().flat_map(|seg| seg.fixups.iter())
    }

    fn decode_starts(&self) -> FixupResult<DyldStartsInImage> {
        let bytes = self
            .payload
            .get(self.header.starts_offset as usize..)
            .ok_or(FixupError::Truncated)?;
        DyldStartsInImage::parse(bytes, self.endian)
    }

    /// Decode the starts table: segment count, per-segment info offsets,
    /// and each referenced segment's page-start records. Idempotent.
    pub fn parse_starts(&mut self) -> FixupResult<()> {
        if self.starts.is_none() {
            self.starts = Some(self.decode_starts()?);
        }
        Ok(())
    }

    /// Decode the imports table and walk every chain in every segment.
    /// Everything, the starts table included, is committed only when the
    /// whole parse succeeds.
    pub fn parse(&mut self) -> FixupResult<()> {
        let mut starts = match self.starts.as_ref() {
            Some(starts) => starts.clone(),
            None => self.decode_starts()?,
        };

        let imports = DyldChainedImport::parse_all(&self.payload, &self.header, self.endian)?;
        let names: Vec<String> = imports.iter().map(|import| import.name.clone()).collect();

        let mut walked = Vec::with_capacity(starts.seg_starts.len());
        for seg in &starts.seg_starts {
            match seg {
                Some(seg) => walked.push(DyldFixup::walk(&self.image, seg, &names, self.endian)?),
                None => walked.push(Vec::new()),
            }
        }

        for (seg, fixups) in starts.seg_starts.iter_mut().zip(walked) {
            if let Some(seg) = seg {
                seg.fixups = fixups;
            }
        }
        self.imports = imports;
        self.starts = Some(starts);
        Ok(())
    }

    /// Interpret `pointer` as an in-place slot and return the import it
    /// binds to, or `None` if no segment's format reads it as a bind.
    ///
    /// This is a best-effort scan: the slot's source address is not part of
    /// the call, so each chain-bearing segment's pointer format is tried in
    /// declared order and the first bind interpretation wins. A word that is
    /// valid under two formats can in principle be misattributed.
    pub fn get_import_for_pointer(&self, pointer: u64) -> FixupResult<Option<&DyldChainedImport>> {
        let names: Vec<String> = self.imports.iter().map(|import| import.name.clone()).collect();
        for seg in self.segments() {
            if seg.fixups.is_empty() {
                continue;
            }
            let fixup = DyldPointerFixup::parse(pointer, seg.pointer_format, &names, 0)?;
            if let Some(ordinal) = fixup.ordinal() {
                return Ok(self.imports.get(ordinal as usize));
            }
        }
        Ok(None)
    }

    /// Interpret `pointer` as an in-place slot and return its rebased
    /// address under `preferred_load_address`, or `pointer` unchanged when
    /// no segment reads it as a rebase. Best-effort in the same way as
    /// [`get_import_for_pointer`](Self::get_import_for_pointer).
    pub fn rebase_pointer(&self, preferred_load_address: u64, pointer: u64) -> FixupResult<u64> {
        let names: Vec<String> = self.imports.iter().map(|import| import.name.clone()).collect();
        for seg in self.segments() {
            if seg.fixups.is_empty() {
                continue;
            }
            let fixup = DyldPointerFixup::parse(pointer, seg.pointer_format, &names, 0)?;
            if let Some(resolved) = fixup.resolve(seg.pointer_format, preferred_load_address) {
                return Ok(resolved);
            }
        }
        Ok(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DyldImportFormat, DyldSymbolsFormat};

    struct PayloadBuilder {
        imports_format: DyldImportFormat,
        imports: Vec<(u32, String)>, // (import word, symbol)
        segments: Vec<Vec<u8>>,
    }

    impl PayloadBuilder {
        fn new() -> Self {
            PayloadBuilder {
                imports_format: DyldImportFormat::Import,
                imports: Vec::new(),
                segments: Vec::new(),
            }
        }

        fn import(mut self, name: &str) -> Self {
            // lib_ordinal 1, strong; name offset patched in build().
            self.imports.push((1, name.to_string()));
            self
        }

        fn segment(
            mut self,
            size: u32,
            page_size: u16,
            format: DyldPointerFormat,
            segment_offset: u64,
            page_starts: &[u16],
        ) -> Self {
            let mut buf = Vec::new();
            buf.extend(size.to_le_bytes());
            buf.extend(page_size.to_le_bytes());
            buf.extend((format as u16).to_le_bytes());
            buf.extend(segment_offset.to_le_bytes());
            buf.extend(0u32.to_le_bytes());
            buf.extend((page_starts.len() as u16).to_le_bytes());
            for start in page_starts {
                buf.extend(start.to_le_bytes());
            }
            self.segments.push(buf);
            self
        }

        /// Like `segment`, but with an explicit page count smaller than the
        /// stored entries (MULTI overflow layouts).
        fn segment_with_page_count(
            mut self,
            size: u32,
            page_size: u16,
            format: DyldPointerFormat,
            segment_offset: u64,
            page_count: u16,
            page_starts: &[u16],
        ) -> Self {
            let mut buf = Vec::new();
            buf.extend(size.to_le_bytes());
            buf.extend(page_size.to_le_bytes());
            buf.extend((format as u16).to_le_bytes());
            buf.extend(segment_offset.to_le_bytes());
            buf.extend(0u32.to_le_bytes());
            buf.extend(page_count.to_le_bytes());
            for start in page_starts {
                buf.extend(start.to_le_bytes());
            }
            self.segments.push(buf);
            self
        }

        fn build(self) -> Vec<u8> {
            let header_size = 28usize;
            let starts_offset = header_size;

            // starts region: seg_count + offsets + records
            let table = 4 + 4 * self.segments.len();
            let mut starts = Vec::new();
            starts.extend((self.segments.len() as u32).to_le_bytes());
            let mut record_offset = table;
            let mut records = Vec::new();
            for seg in &self.segments {
                starts.extend((record_offset as u32).to_le_bytes());
                records.extend_from_slice(seg);
                record_offset += seg.len();
            }
            starts.extend(records);

            let imports_offset = starts_offset + starts.len();
            let mut pool = Vec::new();
            let mut import_words = Vec::new();
            for (word, name) in &self.imports {
                import_words.extend((word | (pool.len() as u32) << 9).to_le_bytes());
                pool.extend(name.as_bytes());
                pool.push(0);
            }
            let symbols_offset = imports_offset + import_words.len();

            let mut payload = Vec::new();
            payload.extend(0u32.to_le_bytes());
            payload.extend((starts_offset as u32).to_le_bytes());
            payload.extend((imports_offset as u32).to_le_bytes());
            payload.extend((symbols_offset as u32).to_le_bytes());
            payload.extend((self.imports.len() as u32).to_le_bytes());
            payload.extend((self.imports_format as u32).to_le_bytes());
            payload.extend((DyldSymbolsFormat::Uncompressed as u32).to_le_bytes());
            payload.extend(starts);
            payload.extend(import_words);
            payload.extend(pool);
            payload
        }
    }

    fn image_with(slots: &[(u64, u64, usize)]) -> Vec<u8> {
        // (offset, raw, width)
        let end = slots
            .iter()
            .map(|(offset, _, width)| *offset as usize + width)
            .max()
            .unwrap_or(0);
        let mut image = vec![0u8; end.max(0x10000)];
        for (offset, raw, width) in slots {
            image[*offset as usize..*offset as usize + width]
                .copy_from_slice(&raw.to_le_bytes()[..*width]);
        }
        image
    }

    fn parsed(payload: Vec<u8>, image: Vec<u8>) -> DyldChainedFixups<Vec<u8>> {
        let mut fixups = DyldChainedFixups::new(payload, image, Endianness::Little).unwrap();
        fixups.parse().unwrap();
        fixups
    }

    #[test]
    fn test_single_ptr64_rebase() {
        // One PTR_64 slot at 0x1000: target=0x2000, next=0, chain ends.
        let payload = PayloadBuilder::new()
            .segment(0x4000, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        let image = image_with(&[(0x1000, 0x2000, 8)]);
        let fixups = parsed(payload, image);

        let walked: Vec<_> = fixups.fixups().collect();
        assert_eq!(walked.len(), 1);
        assert_eq!(walked[0].offset, 0x1000);
        assert_eq!(walked[0].raw, 0x2000);
        match &walked[0].fixup {
            DyldPointerFixup::Ptr64Rebase(r) => assert_eq!(r.unpacked_target(), 0x2000),
            other => panic!("expected Ptr64Rebase, got {:?}", other),
        }
    }

    #[test]
    fn test_ptr32_two_slot_chain() {
        // Chain head at page offset 4; first slot advances one stride.
        let payload = PayloadBuilder::new()
            .segment(0x4000, 0x1000, DyldPointerFormat::Ptr32, 0x1000, &[0x0004])
            .build();
        let slot_a = 0x100u64 | 1 << 26; // target=0x100, next=1
        let slot_b = 0x200u64; // target=0x200, next=0
        let image = image_with(&[(0x1004, slot_a, 4), (0x1008, slot_b, 4)]);
        let fixups = parsed(payload, image);

        let walked: Vec<_> = fixups.fixups().collect();
        assert_eq!(walked.len(), 2);
        assert_eq!(walked[0].offset, 0x1004);
        assert_eq!(walked[1].offset, 0x1008);
        assert_eq!(
            walked[1].offset - walked[0].offset,
            DyldPointerFormat::Ptr32.stride()
        );
        match (&walked[0].fixup, &walked[1].fixup) {
            (DyldPointerFixup::Ptr32Rebase(a), DyldPointerFixup::Ptr32Rebase(b)) => {
                assert_eq!(a.target, 0x100);
                assert_eq!(b.target, 0x200);
            }
            other => panic!("expected two Ptr32Rebase, got {:?}", other),
        }
    }

    #[test]
    fn test_bind_resolves_import_name() {
        let payload = PayloadBuilder::new()
            .import("_malloc")
            .import("_free")
            .segment(0x4000, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        // bind=1, ordinal=1, addend=0, next=0
        let slot = 1u64 | 1u64 << 63;
        let image = image_with(&[(0x1000, slot, 8)]);
        let fixups = parsed(payload, image);

        let walked: Vec<_> = fixups.fixups().collect();
        assert_eq!(walked.len(), 1);
        match &walked[0].fixup {
            DyldPointerFixup::Ptr64Bind(b) => assert_eq!(b.symbol, "_free"),
            other => panic!("expected Ptr64Bind, got {:?}", other),
        }
        assert_eq!(walked[0].fixup.symbol_name(), Some("_free"));
    }

    #[test]
    fn test_multi_page_start_walks_overflow_entries() {
        // page_starts = [0x8002, 0x0010, 0x4020, 0x0030]: page 0 points at
        // overflow index 2, whose entry already carries LAST, so exactly one
        // chain is walked, at in-page offset 0x20.
        let payload = PayloadBuilder::new()
            .segment_with_page_count(
                0x4000,
                0x4000,
                DyldPointerFormat::Ptr64,
                0x1000,
                1,
                &[0x8002, 0x0010, 0x4020, 0x0030],
            )
            .build();
        let image = image_with(&[(0x1020, 0x2000u64, 8), (0x1030, 0x3000u64, 8)]);
        let fixups = parsed(payload, image);

        let walked: Vec<_> = fixups.fixups().collect();
        assert_eq!(walked.len(), 1);
        assert_eq!(walked[0].offset, 0x1020);
    }

    #[test]
    fn test_multi_page_start_walks_run_until_last() {
        // Two chains in the run: entry 1 (no LAST) then entry 2 (LAST).
        let payload = PayloadBuilder::new()
            .segment_with_page_count(
                0x4000,
                0x4000,
                DyldPointerFormat::Ptr64,
                0x1000,
                1,
                &[0x8001, 0x0010, 0x4020],
            )
            .build();
        let image = image_with(&[(0x1010, 0x2000u64, 8), (0x1020, 0x3000u64, 8)]);
        let fixups = parsed(payload, image);

        let offsets: Vec<_> = fixups.fixups().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0x1010, 0x1020]);
    }

    #[test]
    fn test_ordinal_out_of_range_reports_location() {
        let payload = PayloadBuilder::new()
            .import("_a")
            .import("_b")
            .import("_c")
            .segment(0x4000, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        let slot = 5u64 | 1u64 << 63; // ordinal 5 of 3
        let image = image_with(&[(0x1000, slot, 8)]);
        let mut fixups =
            DyldChainedFixups::new(payload, image, Endianness::Little).unwrap();
        assert!(matches!(
            fixups.parse(),
            Err(FixupError::OrdinalOutOfRange {
                ordinal: 5,
                imports: 3,
                at: 0x1000
            })
        ));
        // A failed parse leaves nothing observable, the starts included.
        assert!(fixups.starts().is_empty());
        assert!(fixups.imports().is_empty());
        assert_eq!(fixups.fixups().count(), 0);
    }

    #[test]
    fn test_chain_escaping_segment_is_an_error() {
        // next=2047 strides runs far past the segment.
        let payload = PayloadBuilder::new()
            .segment(0x20, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        let slot = 0x2000u64 | 0x7FFu64 << 51;
        let image = image_with(&[(0x1000, slot, 8)]);
        let mut fixups =
            DyldChainedFixups::new(payload, image, Endianness::Little).unwrap();
        assert!(matches!(
            fixups.parse(),
            Err(FixupError::ChainEscapesSegment { .. })
        ));
    }

    #[test]
    fn test_misaligned_chain_head_is_an_error() {
        let payload = PayloadBuilder::new()
            .segment(0x4000, 0x4000, DyldPointerFormat::Arm64e, 0x1000, &[0x0003])
            .build();
        let image = image_with(&[]);
        let mut fixups =
            DyldChainedFixups::new(payload, image, Endianness::Little).unwrap();
        assert!(matches!(
            fixups.parse(),
            Err(FixupError::MisalignedChain { at: 0x1003, stride: 8 })
        ));
    }

    #[test]
    fn test_truncated_image_read() {
        let payload = PayloadBuilder::new()
            .segment(0x4000, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        let image = vec![0u8; 0x1004]; // slot extends past the image
        let mut fixups =
            DyldChainedFixups::new(payload, image, Endianness::Little).unwrap();
        assert!(matches!(fixups.parse(), Err(FixupError::Truncated)));
    }

    #[test]
    fn test_parse_is_deterministic_across_fresh_aggregates() {
        let build = || {
            PayloadBuilder::new()
                .import("_malloc")
                .segment(0x4000, 0x1000, DyldPointerFormat::Ptr32, 0x1000, &[0x0000, 0x0004])
                .build()
        };
        let slot_a = 0x100u64 | 1 << 26;
        let slot_b = 0x200u64;
        let slot_c = 0x300u64;
        let image = image_with(&[
            (0x1000, slot_a, 4),
            (0x1004, slot_b, 4),
            (0x2004, slot_c, 4),
        ]);

        let first = parsed(build(), image.clone());
        let second = parsed(build(), image);
        let a: Vec<_> = first.fixups().cloned().collect();
        let b: Vec<_> = second.fixups().cloned().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        // Declared order: page 0 chain first, then page 1.
        assert_eq!(a[0].offset, 0x1000);
        assert_eq!(a[1].offset, 0x1004);
        assert_eq!(a[2].offset, 0x2004);
    }

    #[test]
    fn test_every_fixup_in_segment_range_and_aligned() {
        let payload = PayloadBuilder::new()
            .segment(0x4000, 0x1000, DyldPointerFormat::Ptr32, 0x1000, &[0x0000, 0x0008])
            .build();
        let slot_a = 0x100u64 | 2 << 26;
        let slot_b = 0x200u64;
        let slot_c = 0x300u64;
        let image = image_with(&[
            (0x1000, slot_a, 4),
            (0x1008, slot_b, 4),
            (0x2008, slot_c, 4),
        ]);
        let fixups = parsed(payload, image);

        for seg in fixups.segments() {
            let stride = seg.pointer_format.stride();
            for fixup in &seg.fixups {
                assert!(fixup.offset >= seg.segment_offset);
                assert!(fixup.offset < seg.segment_offset + seg.size as u64);
                assert_eq!((fixup.offset - seg.segment_offset) % stride, 0);
                // Termination bound: a chain can never have more slots than
                // the segment has stride positions.
                assert!(seg.fixups.len() as u64 <= seg.size as u64 / stride);
            }
        }
    }

    #[test]
    fn test_get_import_for_pointer_scans_formats() {
        let payload = PayloadBuilder::new()
            .import("_malloc")
            .import("_free")
            .segment(0x4000, 0x4000, DyldPointerFormat::Ptr64, 0x1000, &[0x0000])
            .build();
        let slot = 1u64 | 1u64 << 63;
        let image = image_with(&[(0x1000, slot, 8)]);
        let fixups = parsed(payload, image);

        let import = fixups.get_import_for_pointer(slot).unwrap().unwrap();
        assert_eq!(import.name, "_free");

        // A rebase word binds to nothing.
        assert!(fixups.get_import_for_pointer(0x2000).unwrap().is_none());
    }

    #[test]
    fn test_rebase_pointer_matches_walked_resolution() {
        let payload = PayloadBuilder::new()
            .segment(
                0x4000,
                0x4000,
                DyldPointerFormat::Ptr64Offset,
                0x1000,
                &[0x0000],
            )
            .build();
        let slot = 0x4000u64;
        let image = image_with(&[(0x1000, slot, 8)]);
        let fixups = parsed(payload, image);

        let base = 0x1_0000_0000u64;
        for fixup in fixups.fixups() {
            assert_eq!(
                fixups.rebase_pointer(base, fixup.raw).unwrap(),
                fixup.resolve(base).unwrap()
            );
        }
        assert_eq!(fixups.rebase_pointer(base, slot).unwrap(), 0x1_0000_4000);
    }

    #[test]
    fn test_rebase_pointer_without_segments_returns_pointer() {
        let payload = PayloadBuilder::new().build();
        let mut fixups =
            DyldChainedFixups::new(payload, vec![0u8; 0x100], Endianness::Little).unwrap();
        fixups.parse().unwrap();
        assert_eq!(fixups.rebase_pointer(0x1000, 0xABCD).unwrap(), 0xABCD);
        assert!(fixups.get_import_for_pointer(0xABCD).unwrap().is_none());
    }
}
