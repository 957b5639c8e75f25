use std::collections::BTreeMap;
use std::io;
use std::sync::OnceLock;

use nom::number::Endianness;
use positioned_io::ReadAt;

use crate::error::{FixupError, FixupResult};
use crate::fixups::DyldFixup;

/// One rebase slot in the overlay's index: the raw word the image holds on
/// disk, the slot width, and the address the slot resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RebaseEntry {
    raw: u64,
    width: usize,
    resolved: u64,
}

/// A read-through view of an image whose rebase slots read back as their
/// resolved addresses.
///
/// The overlay wraps a positional byte source and two caller-supplied
/// producers, so it can be constructed before the fixups are parsed or the
/// preferred load address is known. On first read the producers run once and
/// the rebase index is built and published; bind slots are left untouched
/// (they need runtime symbol data). Reads that intersect a rebase slot first
/// verify the underlying bytes still hold the slot's recorded raw word and
/// fail with `InvalidData` on a mismatch.
///
/// The overlay is immutable after initialisation and safe for concurrent
/// reads, provided the wrapped source supports concurrent positional reads.
pub struct FixupOverlay<R, F, B>
where
    R: ReadAt,
    F: Fn() -> FixupResult<Vec<DyldFixup>>,
    B: Fn() -> FixupResult<u64>,
{
    image: R,
    fixups_fetcher: F,
    base_addr_fetcher: B,
    endian: Endianness,
    index: OnceLock<BTreeMap<u64, RebaseEntry>>,
}

impl<R, F, B> FixupOverlay<R, F, B>
where
    R: ReadAt,
    F: Fn() -> FixupResult<Vec<DyldFixup>>,
    B: Fn() -> FixupResult<u64>,
{
    pub fn new(image: R, fixups_fetcher: F, base_addr_fetcher: B, endian: Endianness) -> Self {
        FixupOverlay {
            image,
            fixups_fetcher,
            base_addr_fetcher,
            endian,
            index: OnceLock::new(),
        }
    }

    /// Build-once accessor for the rebase index. Losing the publish race
    /// only discards an identical map; readers always observe one value.
    fn index(&self) -> FixupResult<&BTreeMap<u64, RebaseEntry>> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let fixups = (self.fixups_fetcher)()?;
        let base = (self.base_addr_fetcher)()?;
        let mut index = BTreeMap::new();
        for fixup in fixups {
            if let Some(resolved) = fixup.resolve(base) {
                index.insert(
                    fixup.offset,
                    RebaseEntry {
                        raw: fixup.raw,
                        width: fixup.format.pointer_width(),
                        resolved,
                    },
                );
            }
        }
        Ok(self.index.get_or_init(|| index))
    }

    fn encode(&self, value: u64) -> [u8; 8] {
        match self.endian {
            Endianness::Big => value.to_be_bytes(),
            _ => value.to_le_bytes(),
        }
    }

    /// Byte `i` of `value` as it appears in the image, for slots narrower
    /// than 8 bytes.
    fn encoded_byte(&self, value: u64, width: usize, i: usize) -> u8 {
        match self.endian {
            Endianness::Big => self.encode(value)[8 - width + i],
            _ => self.encode(value)[i],
        }
    }

    fn patch(&self, pos: u64, buf: &mut [u8]) -> FixupResult<()> {
        let index = self.index()?;
        let end = pos + buf.len() as u64;
        let scan_from = pos.saturating_sub(7);
        for (&offset, entry) in index.range(scan_from..end) {
            let entry_end = offset + entry.width as u64;
            if entry_end <= pos || offset >= end {
                continue;
            }
            let lo = offset.max(pos);
            let hi = entry_end.min(end);

            // The bytes currently in the buffer must still encode the raw
            // word recorded at walk time.
            let mut mismatch = false;
            for at in lo..hi {
                let expected = self.encoded_byte(entry.raw, entry.width, (at - offset) as usize);
                if buf[(at - pos) as usize] != expected {
                    mismatch = true;
                }
            }
            if mismatch {
                let mut found_bytes = [0u8; 8];
                for i in 0..entry.width {
                    found_bytes[i] = self.encoded_byte(entry.raw, entry.width, i);
                }
                for at in lo..hi {
                    found_bytes[(at - offset) as usize] = buf[(at - pos) as usize];
                }
                let found = match self.endian {
                    Endianness::Big => {
                        u64::from_be_bytes(found_bytes) >> (64 - entry.width * 8)
                    }
                    _ => u64::from_le_bytes(found_bytes),
                };
                return Err(FixupError::OverlayMismatch {
                    at: offset,
                    expected: entry.raw,
                    found,
                });
            }

            for at in lo..hi {
                buf[(at - pos) as usize] =
                    self.encoded_byte(entry.resolved, entry.width, (at - offset) as usize);
            }
        }
        Ok(())
    }
}

impl<R, F, B> ReadAt for FixupOverlay<R, F, B>
where
    R: ReadAt,
    F: Fn() -> FixupResult<Vec<DyldFixup>>,
    B: Fn() -> FixupResult<u64>,
{
    fn read_at(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.image.read_at(pos, buf)?;
        self.patch(pos, &mut buf[..n]).map_err(|err| match err {
            FixupError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        })?;
        Ok(n)
    }
}
