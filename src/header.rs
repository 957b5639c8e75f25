use nom::number::Endianness;
use nom_derive::{Nom, Parse};

use crate::error::{FixupError, FixupResult};
use crate::format::{DyldImportFormat, DyldSymbolsFormat};

/// On-disk layout of `dyld_chained_fixups_header`, before validation.
#[derive(Debug, Nom)]
struct DyldChainedFixupsHeaderRaw {
    fixups_version: u32,
    starts_offset: u32,
    imports_offset: u32,
    symbols_offset: u32,
    imports_count: u32,
    imports_format: u32,
    symbols_format: u32,
}

/// The fixed-size header at offset 0 of the `LC_DYLD_CHAINED_FIXUPS`
/// payload. All offsets are relative to the start of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedFixupsHeader {
    pub fixups_version: u32,
    pub starts_offset: u32,
    pub imports_offset: u32,
    pub symbols_offset: u32,
    pub imports_count: u32,
    pub imports_format: DyldImportFormat,
    pub symbols_format: DyldSymbolsFormat,
}

impl DyldChainedFixupsHeader {
    pub fn parse(payload: &[u8], endian: Endianness) -> FixupResult<Self> {
        let (_, raw) = match endian {
            Endianness::Big => DyldChainedFixupsHeaderRaw::parse_be(payload)?,
            _ => DyldChainedFixupsHeaderRaw::parse_le(payload)?,
        };

        if raw.fixups_version != 0 {
            return Err(FixupError::UnsupportedVersion(raw.fixups_version));
        }

        Ok(DyldChainedFixupsHeader {
            fixups_version: raw.fixups_version,
            starts_offset: raw.starts_offset,
            imports_offset: raw.imports_offset,
            symbols_offset: raw.symbols_offset,
            imports_count: raw.imports_count,
            imports_format: DyldImportFormat::from_raw(raw.imports_format)?,
            symbols_format: DyldSymbolsFormat::from_raw(raw.symbols_format)?,
        })
    }
}
