use num_derive::FromPrimitive;
use strum_macros::{Display, EnumString};

use crate::error::{FixupError, FixupResult};

/// `DYLD_CHAINED_PTR_*` pointer encodings. Each segment's chains use exactly
/// one of these; the value is stored in the segment's starts record.
#[repr(u16)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DyldPointerFormat {
    Arm64e = 1,
    Ptr64 = 2,
    Ptr32 = 3,
    Ptr32Cache = 4,
    Ptr32Firmware = 5,
    Ptr64Offset = 6,
    Arm64eKernel = 7,
    Ptr64KernelCache = 8,
    Arm64eUserland = 9,
    Arm64eFirmware = 10,
    X86_64KernelCache = 11,
    Arm64eUserland24 = 12,
}

impl DyldPointerFormat {
    pub fn from_raw(value: u16) -> FixupResult<Self> {
        num::FromPrimitive::from_u16(value).ok_or(FixupError::UnknownPointerFormat(value))
    }

    /// Byte-distance multiplier for the `next` field.
    pub fn stride(self) -> u64 {
        match self {
            DyldPointerFormat::Arm64e => 8,
            DyldPointerFormat::Ptr64 => 4,
            DyldPointerFormat::Ptr32 => 4,
            DyldPointerFormat::Ptr32Cache => 4,
            DyldPointerFormat::Ptr32Firmware => 4,
            DyldPointerFormat::Ptr64Offset => 4,
            DyldPointerFormat::Arm64eKernel => 4,
            DyldPointerFormat::Ptr64KernelCache => 4,
            DyldPointerFormat::Arm64eUserland => 8,
            DyldPointerFormat::Arm64eFirmware => 4,
            DyldPointerFormat::X86_64KernelCache => 1,
            DyldPointerFormat::Arm64eUserland24 => 8,
        }
    }

    /// Width in bytes of one in-place slot.
    pub fn pointer_width(self) -> usize {
        match self {
            DyldPointerFormat::Ptr32
            | DyldPointerFormat::Ptr32Cache
            | DyldPointerFormat::Ptr32Firmware => 4,
            _ => 8,
        }
    }

    /// Formats whose slots carry the ARM64E bind/auth discriminator bits.
    pub fn is_arm64e(self) -> bool {
        matches!(
            self,
            DyldPointerFormat::Arm64e
                | DyldPointerFormat::Arm64eKernel
                | DyldPointerFormat::Arm64eUserland
                | DyldPointerFormat::Arm64eFirmware
                | DyldPointerFormat::Arm64eUserland24
        )
    }

    /// Formats whose rebase targets are offsets from the preferred load
    /// address rather than absolute vmaddrs.
    pub fn rebase_targets_are_offsets(self) -> bool {
        matches!(
            self,
            DyldPointerFormat::Ptr64Offset
                | DyldPointerFormat::Arm64eKernel
                | DyldPointerFormat::Arm64eUserland
                | DyldPointerFormat::Arm64eUserland24
        )
    }

    /// Formats whose bind ordinals are 24 bits wide.
    pub fn has_wide_ordinals(self) -> bool {
        matches!(self, DyldPointerFormat::Arm64eUserland24)
    }
}

/// `DYLD_CHAINED_IMPORT*` record shapes.
#[repr(u32)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DyldImportFormat {
    Import = 1,
    ImportAddend = 2,
    ImportAddend64 = 3,
}

impl DyldImportFormat {
    pub fn from_raw(value: u32) -> FixupResult<Self> {
        num::FromPrimitive::from_u32(value).ok_or(FixupError::UnknownImportsFormat(value))
    }

    /// On-disk size of one import record.
    pub fn record_size(self) -> usize {
        match self {
            DyldImportFormat::Import => 4,
            DyldImportFormat::ImportAddend => 8,
            DyldImportFormat::ImportAddend64 => 16,
        }
    }
}

/// Symbol-pool encodings. Zlib pools are recognised but not decoded.
#[repr(u32)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DyldSymbolsFormat {
    Uncompressed = 0,
    Zlib = 1,
}

impl DyldSymbolsFormat {
    pub fn from_raw(value: u32) -> FixupResult<Self> {
        num::FromPrimitive::from_u32(value).ok_or(FixupError::UnsupportedSymbolsFormat(value))
    }
}

/// ARM64E pointer-authentication key selector.
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DyldFixupPACKey {
    IA = 0,
    IB = 1,
    DA = 2,
    DB = 3,
}

impl DyldFixupPACKey {
    /// The key field is 2 bits wide, so every raw value maps to a key.
    pub fn from_bits(value: u8) -> Self {
        match value & 0x3 {
            0 => DyldFixupPACKey::IA,
            1 => DyldFixupPACKey::IB,
            2 => DyldFixupPACKey::DA,
            _ => DyldFixupPACKey::DB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_format_round_trip() {
        for value in 1..=12u16 {
            let format = DyldPointerFormat::from_raw(value).unwrap();
            assert_eq!(format as u16, value);
        }
    }

    #[test]
    fn test_pointer_format_rejects_out_of_range() {
        assert!(matches!(
            DyldPointerFormat::from_raw(0),
            Err(FixupError::UnknownPointerFormat(0))
        ));
        // DYLD_CHAINED_PTR_ARM64E_SHARED_CACHE is outside the supported set.
        assert!(matches!(
            DyldPointerFormat::from_raw(13),
            Err(FixupError::UnknownPointerFormat(13))
        ));
    }

    #[test]
    fn test_strides() {
        assert_eq!(DyldPointerFormat::Arm64e.stride(), 8);
        assert_eq!(DyldPointerFormat::Arm64eUserland.stride(), 8);
        assert_eq!(DyldPointerFormat::Arm64eUserland24.stride(), 8);
        assert_eq!(DyldPointerFormat::Ptr64.stride(), 4);
        assert_eq!(DyldPointerFormat::Arm64eKernel.stride(), 4);
        assert_eq!(DyldPointerFormat::X86_64KernelCache.stride(), 1);
    }

    #[test]
    fn test_slot_widths() {
        assert_eq!(DyldPointerFormat::Ptr32.pointer_width(), 4);
        assert_eq!(DyldPointerFormat::Ptr32Firmware.pointer_width(), 4);
        assert_eq!(DyldPointerFormat::Ptr64.pointer_width(), 8);
        assert_eq!(DyldPointerFormat::X86_64KernelCache.pointer_width(), 8);
    }

    #[test]
    fn test_offset_based_formats() {
        assert!(DyldPointerFormat::Ptr64Offset.rebase_targets_are_offsets());
        assert!(DyldPointerFormat::Arm64eKernel.rebase_targets_are_offsets());
        assert!(DyldPointerFormat::Arm64eUserland.rebase_targets_are_offsets());
        assert!(DyldPointerFormat::Arm64eUserland24.rebase_targets_are_offsets());
        assert!(!DyldPointerFormat::Arm64e.rebase_targets_are_offsets());
        assert!(!DyldPointerFormat::Arm64eFirmware.rebase_targets_are_offsets());
    }

    #[test]
    fn test_import_format_record_sizes() {
        assert_eq!(DyldImportFormat::from_raw(1).unwrap().record_size(), 4);
        assert_eq!(DyldImportFormat::from_raw(2).unwrap().record_size(), 8);
        assert_eq!(DyldImportFormat::from_raw(3).unwrap().record_size(), 16);
        assert!(matches!(
            DyldImportFormat::from_raw(4),
            Err(FixupError::UnknownImportsFormat(4))
        ));
    }
}
