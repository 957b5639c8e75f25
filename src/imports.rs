use bitfield::bitfield;
use nom::number::complete::{i32 as nom_i32, i64 as nom_i64, u32 as nom_u32, u64 as nom_u64};
use nom::number::Endianness;

use crate::error::{FixupError, FixupResult};
use crate::format::{DyldImportFormat, DyldSymbolsFormat};
use crate::header::DyldChainedFixupsHeader;
use crate::helpers::string_at;

bitfield! {
    struct DyldChainedImportBF(u32);
    impl Debug;
    u32;
    ordinal, set_ordinal: 7, 0;
    weak, set_weak: 8, 8;
    name_offset, set_name_offset: 31, 9;
}

bitfield! {
    struct DyldChainedImportAddend64BF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 15, 0;
    pub weak, set_weak: 16, 16;
    pub reserved, set_reserved: 31, 17;
    pub name_offset, set_name_offset: 63, 32;
}

/// One resolved entry of the imports table. `lib_ordinal` is sign-extended
/// so the special ordinals (self, main-executable, flat-lookup, weak-lookup)
/// come out negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedImport {
    pub lib_ordinal: i8,
    pub weak_import: bool,
    pub name_offset: u32,
    pub addend: i64,
    pub name: String,
}

impl DyldChainedImport {
    fn parse<'a>(
        bytes: &'a [u8],
        format: DyldImportFormat,
        symbols: &[u8],
        endian: Endianness,
    ) -> FixupResult<(&'a [u8], Self)> {
        match format {
            DyldImportFormat::Import => {
                let (bytes, value) = nom_u32(endian)(bytes)?;
                let bf = DyldChainedImportBF(value);
                let name = string_at(symbols, bf.name_offset() as u64)?;
                Ok((
                    bytes,
                    DyldChainedImport {
                        lib_ordinal: bf.ordinal() as u8 as i8,
                        weak_import: bf.weak() != 0,
                        name_offset: bf.name_offset(),
                        addend: 0,
                        name,
                    },
                ))
            }
            DyldImportFormat::ImportAddend => {
                let (bytes, value) = nom_u32(endian)(bytes)?;
                let (bytes, addend) = nom_i32(endian)(bytes)?;
                let bf = DyldChainedImportBF(value);
                let name = string_at(symbols, bf.name_offset() as u64)?;
                Ok((
                    bytes,
                    DyldChainedImport {
                        lib_ordinal: bf.ordinal() as u8 as i8,
                        weak_import: bf.weak() != 0,
                        name_offset: bf.name_offset(),
                        addend: addend as i64,
                        name,
                    },
                ))
            }
            DyldImportFormat::ImportAddend64 => {
                let (bytes, value) = nom_u64(endian)(bytes)?;
                let (bytes, addend) = nom_i64(endian)(bytes)?;
                let bf = DyldChainedImportAddend64BF(value);
                let name = string_at(symbols, bf.name_offset())?;
                Ok((
                    bytes,
                    DyldChainedImport {
                        lib_ordinal: bf.ordinal() as u16 as i16 as i8,
                        weak_import: bf.weak() != 0,
                        name_offset: bf.name_offset() as u32,
                        addend,
                        name,
                    },
                ))
            }
        }
    }

    /// Decode the whole imports table described by `header`, resolving each
    /// entry's symbol name from the NUL-terminated pool at
    /// `symbols_offset`. A zlib-compressed pool is rejected before any
    /// record is read.
    pub fn parse_all(
        payload: &[u8],
        header: &DyldChainedFixupsHeader,
        endian: Endianness,
    ) -> FixupResult<Vec<Self>> {
        if header.imports_count == 0 {
            return Ok(Vec::new());
        }
        if header.symbols_format == DyldSymbolsFormat::Zlib {
            return Err(FixupError::UnsupportedSymbolsFormat(
                header.symbols_format as u32,
            ));
        }

        let imports_offset = header.imports_offset as usize;
        let table_size = header.imports_count as usize * header.imports_format.record_size();
        let mut cursor = payload
            .get(imports_offset..)
            .filter(|rest| rest.len() >= table_size)
            .ok_or(FixupError::Truncated)?;
        let symbols = payload
            .get(header.symbols_offset as usize..)
            .ok_or(FixupError::Truncated)?;

        let mut imports = Vec::with_capacity(header.imports_count as usize);
        for _ in 0..header.imports_count {
            let (rest, import) =
                DyldChainedImport::parse(cursor, header.imports_format, symbols, endian)?;
            imports.push(import);
            cursor = rest;
        }

        Ok(imports)
    }
}
