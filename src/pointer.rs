use bitfield::bitfield;

use crate::error::{FixupError, FixupResult};
use crate::format::{DyldFixupPACKey, DyldPointerFormat};

bitfield! {
    pub struct DyldChainedPtrArm64eRebaseBF(u64);
    impl Debug;
    pub target, set_target: 42, 0;
    pub high8, set_high8: 50, 43;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eRebase {
    pub target: u64,
    pub high8: u8,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eRebase {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtrArm64eRebaseBF(raw);
        DyldChainedPtrArm64eRebase {
            target: bf.target(),
            high8: bf.high8() as u8,
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        }
    }

    /// Full target for vmaddr-based formats; offset-based formats use
    /// `target` alone.
    pub fn unpack_target(&self) -> u64 {
        self.target | (self.high8 as u64) << 43
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eBindBF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 15, 0;
    pub zero, set_zero: 31, 16;
    pub addend, set_addend: 50, 32;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eBind {
    pub ordinal: u32,
    pub symbol: String,
    pub addend: i32,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eBind {
    pub fn parse(raw: u64, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtrArm64eBindBF(raw);
        Ok(DyldChainedPtrArm64eBind {
            ordinal: bf.ordinal() as u32,
            symbol: symbol_for(names, bf.ordinal() as u32, at)?,
            addend: sign_extend_19(bf.addend() as u32),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eAuthRebaseBF(u64);
    impl Debug;
    pub target, set_target: 31, 0;
    pub diversity, set_diversity: 47, 32;
    pub addr_div, set_addr_div: 48;
    pub key, set_key: 50, 49;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eAuthRebase {
    pub target: u32,
    pub diversity: u16,
    pub addr_div: bool,
    pub key: DyldFixupPACKey,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eAuthRebase {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtrArm64eAuthRebaseBF(raw);
        DyldChainedPtrArm64eAuthRebase {
            target: bf.target() as u32,
            diversity: bf.diversity() as u16,
            addr_div: bf.addr_div(),
            key: DyldFixupPACKey::from_bits(bf.key() as u8),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        }
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eAuthBindBF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 15, 0;
    pub zero, set_zero: 31, 16;
    pub diversity, set_diversity: 47, 32;
    pub addr_div, set_addr_div: 48;
    pub key, set_key: 50, 49;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eAuthBind {
    pub ordinal: u32,
    pub symbol: String,
    pub diversity: u16,
    pub addr_div: bool,
    pub key: DyldFixupPACKey,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eAuthBind {
    pub fn parse(raw: u64, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtrArm64eAuthBindBF(raw);
        Ok(DyldChainedPtrArm64eAuthBind {
            ordinal: bf.ordinal() as u32,
            symbol: symbol_for(names, bf.ordinal() as u32, at)?,
            diversity: bf.diversity() as u16,
            addr_div: bf.addr_div(),
            key: DyldFixupPACKey::from_bits(bf.key() as u8),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eRebase24BF(u64);
    impl Debug;
    pub target, set_target: 23, 0;
    pub high8, set_high8: 31, 24;
    pub zero, set_zero: 50, 32;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eRebase24 {
    pub target: u32,
    pub high8: u8,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eRebase24 {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtrArm64eRebase24BF(raw);
        DyldChainedPtrArm64eRebase24 {
            target: bf.target() as u32,
            high8: bf.high8() as u8,
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        }
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eAuthRebase24BF(u64);
    impl Debug;
    pub target, set_target: 23, 0;
    pub diversity, set_diversity: 39, 24;
    pub addr_div, set_addr_div: 40, 40;
    pub key, set_key: 42, 41;
    pub zero, set_zero: 50, 43;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eAuthRebase24 {
    pub target: u32,
    pub diversity: u16,
    pub addr_div: bool,
    pub key: DyldFixupPACKey,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eAuthRebase24 {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtrArm64eAuthRebase24BF(raw);
        DyldChainedPtrArm64eAuthRebase24 {
            target: bf.target() as u32,
            diversity: bf.diversity() as u16,
            addr_div: bf.addr_div() != 0,
            key: DyldFixupPACKey::from_bits(bf.key() as u8),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        }
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eBind24BF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 23, 0;
    pub zero, set_zero: 31, 24;
    pub addend, set_addend: 50, 32;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eBind24 {
    pub ordinal: u32,
    pub symbol: String,
    pub addend: i32,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eBind24 {
    pub fn parse(raw: u64, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtrArm64eBind24BF(raw);
        Ok(DyldChainedPtrArm64eBind24 {
            ordinal: bf.ordinal() as u32,
            symbol: symbol_for(names, bf.ordinal() as u32, at)?,
            addend: sign_extend_19(bf.addend() as u32),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtrArm64eAuthBind24BF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 23, 0;
    pub zero, set_zero: 31, 24;
    pub diversity, set_diversity: 47, 32;
    pub addr_div, set_addr_div: 48;
    pub key, set_key: 50, 49;
    pub next, set_next: 61, 51;
    pub bind, set_bind: 62;
    pub auth, set_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtrArm64eAuthBind24 {
    pub ordinal: u32,
    pub symbol: String,
    pub diversity: u16,
    pub addr_div: bool,
    pub key: DyldFixupPACKey,
    pub next: u16,
    pub bind: bool,
    pub auth: bool,
}

impl DyldChainedPtrArm64eAuthBind24 {
    pub fn parse(raw: u64, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtrArm64eAuthBind24BF(raw);
        Ok(DyldChainedPtrArm64eAuthBind24 {
            ordinal: bf.ordinal() as u32,
            symbol: symbol_for(names, bf.ordinal() as u32, at)?,
            diversity: bf.diversity() as u16,
            addr_div: bf.addr_div(),
            key: DyldFixupPACKey::from_bits(bf.key() as u8),
            next: bf.next() as u16,
            bind: bf.bind(),
            auth: bf.auth(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtr64RebaseBF(u64);
    impl Debug;
    pub target, set_target: 35, 0;
    pub high8, set_high8: 43, 36;
    pub reserved, set_reserved: 50, 44;
    pub next, set_next: 62, 51;
    pub bind, set_bind: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr64Rebase {
    pub target: u64,
    pub high8: u8,
    pub next: u16,
    pub bind: bool,
}

impl DyldChainedPtr64Rebase {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtr64RebaseBF(raw);
        DyldChainedPtr64Rebase {
            target: bf.target(),
            high8: bf.high8() as u8,
            next: bf.next() as u16,
            bind: bf.bind(),
        }
    }

    pub fn unpacked_target(&self) -> u64 {
        self.target | (self.high8 as u64) << 56
    }
}

bitfield! {
    pub struct DyldChainedPtr64BindBF(u64);
    impl Debug;
    pub ordinal, set_ordinal: 23, 0;
    pub addend, set_addend: 31, 24;
    pub reserved, set_reserved: 50, 32;
    pub next, set_next: 62, 51;
    pub bind, set_bind: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr64Bind {
    pub ordinal: u32,
    pub symbol: String,
    pub addend: u8,
    pub next: u16,
    pub bind: bool,
}

impl DyldChainedPtr64Bind {
    pub fn parse(raw: u64, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtr64BindBF(raw);
        Ok(DyldChainedPtr64Bind {
            ordinal: bf.ordinal() as u32,
            symbol: symbol_for(names, bf.ordinal() as u32, at)?,
            addend: bf.addend() as u8,
            next: bf.next() as u16,
            bind: bf.bind(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtr64KernelCacheRebaseBF(u64);
    impl Debug;
    pub target, set_target: 29, 0;
    pub cache_level, set_cache_level: 31, 30;
    pub diversity, set_diversity: 47, 32;
    pub addr_div, set_addr_div: 48;
    pub key, set_key: 50, 49;
    pub next, set_next: 62, 51;
    pub is_auth, set_is_auth: 63;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr64KernelCacheRebase {
    pub target: u32,
    pub cache_level: u8,
    pub diversity: u16,
    pub addr_div: bool,
    pub key: DyldFixupPACKey,
    pub next: u16,
    pub is_auth: bool,
}

impl DyldChainedPtr64KernelCacheRebase {
    pub fn parse(raw: u64) -> Self {
        let bf = DyldChainedPtr64KernelCacheRebaseBF(raw);
        DyldChainedPtr64KernelCacheRebase {
            target: bf.target() as u32,
            cache_level: bf.cache_level() as u8,
            diversity: bf.diversity() as u16,
            addr_div: bf.addr_div(),
            key: DyldFixupPACKey::from_bits(bf.key() as u8),
            next: bf.next() as u16,
            is_auth: bf.is_auth(),
        }
    }
}

bitfield! {
    pub struct DyldChainedPtr32RebaseBF(u32);
    impl Debug;
    pub target, set_target: 25, 0;
    pub next, set_next: 30, 26;
    pub bind, set_bind: 31;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr32Rebase {
    pub target: u32,
    pub next: u8,
    pub bind: bool,
}

impl DyldChainedPtr32Rebase {
    pub fn parse(raw: u32) -> Self {
        let bf = DyldChainedPtr32RebaseBF(raw);
        DyldChainedPtr32Rebase {
            target: bf.target(),
            next: bf.next() as u8,
            bind: bf.bind(),
        }
    }
}

bitfield! {
    pub struct DyldChainedPtr32BindBF(u32);
    impl Debug;
    pub ordinal, set_ordinal: 19, 0;
    pub addend, set_addend: 25, 20;
    pub next, set_next: 30, 26;
    pub bind, set_bind: 31;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr32Bind {
    pub ordinal: u32,
    pub symbol: String,
    pub addend: u8,
    pub next: u8,
    pub bind: bool,
}

impl DyldChainedPtr32Bind {
    pub fn parse(raw: u32, names: &[String], at: u64) -> FixupResult<Self> {
        let bf = DyldChainedPtr32BindBF(raw);
        Ok(DyldChainedPtr32Bind {
            ordinal: bf.ordinal(),
            symbol: symbol_for(names, bf.ordinal(), at)?,
            addend: bf.addend() as u8,
            next: bf.next() as u8,
            bind: bf.bind(),
        })
    }
}

bitfield! {
    pub struct DyldChainedPtr32CacheRebaseBF(u32);
    impl Debug;
    pub target, set_target: 29, 0;
    pub next, set_next: 31, 30;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr32CacheRebase {
    pub target: u32,
    pub next: u8,
}

impl DyldChainedPtr32CacheRebase {
    pub fn parse(raw: u32) -> Self {
        let bf = DyldChainedPtr32CacheRebaseBF(raw);
        DyldChainedPtr32CacheRebase {
            target: bf.target(),
            next: bf.next() as u8,
        }
    }
}

bitfield! {
    pub struct DyldChainedPtr32FirmwareRebaseBF(u32);
    impl Debug;
    pub target, set_target: 25, 0;
    pub next, set_next: 31, 26;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldChainedPtr32FirmwareRebase {
    pub target: u32,
    pub next: u8,
}

impl DyldChainedPtr32FirmwareRebase {
    pub fn parse(raw: u32) -> Self {
        let bf = DyldChainedPtr32FirmwareRebaseBF(raw);
        DyldChainedPtr32FirmwareRebase {
            target: bf.target(),
            next: bf.next() as u8,
        }
    }
}

fn symbol_for(names: &[String], ordinal: u32, at: u64) -> FixupResult<String> {
    names
        .get(ordinal as usize)
        .cloned()
        .ok_or(FixupError::OrdinalOutOfRange {
            ordinal,
            imports: names.len(),
            at,
        })
}

fn sign_extend_19(value: u32) -> i32 {
    ((value << 13) as i32) >> 13
}

/// One decoded in-place slot. Which variants a segment can produce is fixed
/// by its pointer format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DyldPointerFixup {
    Ptr32Rebase(DyldChainedPtr32Rebase),
    Ptr32CacheRebase(DyldChainedPtr32CacheRebase),
    Ptr32FirmwareRebase(DyldChainedPtr32FirmwareRebase),
    Ptr32Bind(DyldChainedPtr32Bind),
    Ptr64Rebase(DyldChainedPtr64Rebase),
    Ptr64OffsetRebase(DyldChainedPtr64Rebase),
    Ptr64KernelCacheRebase(DyldChainedPtr64KernelCacheRebase),
    Ptr64Bind(DyldChainedPtr64Bind),
    Arm64eRebase(DyldChainedPtrArm64eRebase),
    Arm64eRebase24(DyldChainedPtrArm64eRebase24),
    Arm64eAuthRebase(DyldChainedPtrArm64eAuthRebase),
    Arm64eAuthRebase24(DyldChainedPtrArm64eAuthRebase24),
    Arm64eBind(DyldChainedPtrArm64eBind),
    Arm64eBind24(DyldChainedPtrArm64eBind24),
    Arm64eAuthBind(DyldChainedPtrArm64eAuthBind),
    Arm64eAuthBind24(DyldChainedPtrArm64eAuthBind24),
}

impl DyldPointerFixup {
    /// Decode one raw slot word under `format`. 32-bit formats use the low
    /// half of `raw`. `at` is the slot's image offset, used for error
    /// reporting; bind ordinals are checked against `names` here.
    pub fn parse(
        raw: u64,
        format: DyldPointerFormat,
        names: &[String],
        at: u64,
    ) -> FixupResult<Self> {
        match format {
            DyldPointerFormat::Arm64e
            | DyldPointerFormat::Arm64eKernel
            | DyldPointerFormat::Arm64eUserland
            | DyldPointerFormat::Arm64eFirmware
            | DyldPointerFormat::Arm64eUserland24 => {
                DyldPointerFixup::parse_arm64e(raw, format, names, at)
            }
            DyldPointerFormat::Ptr64 | DyldPointerFormat::Ptr64Offset => {
                let is_bind = raw >> 63 & 1 == 1;
                if is_bind {
                    Ok(DyldPointerFixup::Ptr64Bind(DyldChainedPtr64Bind::parse(
                        raw, names, at,
                    )?))
                } else if format == DyldPointerFormat::Ptr64 {
                    Ok(DyldPointerFixup::Ptr64Rebase(DyldChainedPtr64Rebase::parse(raw)))
                } else {
                    Ok(DyldPointerFixup::Ptr64OffsetRebase(
                        DyldChainedPtr64Rebase::parse(raw),
                    ))
                }
            }
            DyldPointerFormat::Ptr64KernelCache | DyldPointerFormat::X86_64KernelCache => {
                Ok(DyldPointerFixup::Ptr64KernelCacheRebase(
                    DyldChainedPtr64KernelCacheRebase::parse(raw),
                ))
            }
            DyldPointerFormat::Ptr32 => {
                let raw = raw as u32;
                let is_bind = raw >> 31 & 1 == 1;
                if is_bind {
                    Ok(DyldPointerFixup::Ptr32Bind(DyldChainedPtr32Bind::parse(
                        raw, names, at,
                    )?))
                } else {
                    Ok(DyldPointerFixup::Ptr32Rebase(DyldChainedPtr32Rebase::parse(raw)))
                }
            }
            DyldPointerFormat::Ptr32Cache => Ok(DyldPointerFixup::Ptr32CacheRebase(
                DyldChainedPtr32CacheRebase::parse(raw as u32),
            )),
            DyldPointerFormat::Ptr32Firmware => Ok(DyldPointerFixup::Ptr32FirmwareRebase(
                DyldChainedPtr32FirmwareRebase::parse(raw as u32),
            )),
        }
    }

    /// The ARM64E family shares one discriminator layout; the five formats
    /// differ only in ordinal width and target interpretation, so a single
    /// `(is_bind, is_auth, is_24bit)` table covers all of them.
    fn parse_arm64e(
        raw: u64,
        format: DyldPointerFormat,
        names: &[String],
        at: u64,
    ) -> FixupResult<Self> {
        let is_bind = raw >> 62 & 1 == 1;
        let is_auth = raw >> 63 & 1 == 1;
        let wide = format.has_wide_ordinals();

        Ok(match (is_bind, is_auth, wide) {
            (false, false, false) => {
                DyldPointerFixup::Arm64eRebase(DyldChainedPtrArm64eRebase::parse(raw))
            }
            (false, true, false) => {
                DyldPointerFixup::Arm64eAuthRebase(DyldChainedPtrArm64eAuthRebase::parse(raw))
            }
            (true, false, false) => {
                DyldPointerFixup::Arm64eBind(DyldChainedPtrArm64eBind::parse(raw, names, at)?)
            }
            (true, true, false) => DyldPointerFixup::Arm64eAuthBind(
                DyldChainedPtrArm64eAuthBind::parse(raw, names, at)?,
            ),
            (false, false, true) => {
                DyldPointerFixup::Arm64eRebase24(DyldChainedPtrArm64eRebase24::parse(raw))
            }
            (false, true, true) => DyldPointerFixup::Arm64eAuthRebase24(
                DyldChainedPtrArm64eAuthRebase24::parse(raw),
            ),
            (true, false, true) => {
                DyldPointerFixup::Arm64eBind24(DyldChainedPtrArm64eBind24::parse(raw, names, at)?)
            }
            (true, true, true) => DyldPointerFixup::Arm64eAuthBind24(
                DyldChainedPtrArm64eAuthBind24::parse(raw, names, at)?,
            ),
        })
    }

    /// Distance to the next slot in the chain, in stride units. Zero ends
    /// the chain.
    pub fn next(&self) -> u32 {
        match self {
            DyldPointerFixup::Ptr32Rebase(f) => f.next as u32,
            DyldPointerFixup::Ptr32CacheRebase(f) => f.next as u32,
            DyldPointerFixup::Ptr32FirmwareRebase(f) => f.next as u32,
            DyldPointerFixup::Ptr32Bind(f) => f.next as u32,
            DyldPointerFixup::Ptr64Rebase(f) => f.next as u32,
            DyldPointerFixup::Ptr64OffsetRebase(f) => f.next as u32,
            DyldPointerFixup::Ptr64KernelCacheRebase(f) => f.next as u32,
            DyldPointerFixup::Ptr64Bind(f) => f.next as u32,
            DyldPointerFixup::Arm64eRebase(f) => f.next as u32,
            DyldPointerFixup::Arm64eRebase24(f) => f.next as u32,
            DyldPointerFixup::Arm64eAuthRebase(f) => f.next as u32,
            DyldPointerFixup::Arm64eAuthRebase24(f) => f.next as u32,
            DyldPointerFixup::Arm64eBind(f) => f.next as u32,
            DyldPointerFixup::Arm64eBind24(f) => f.next as u32,
            DyldPointerFixup::Arm64eAuthBind(f) => f.next as u32,
            DyldPointerFixup::Arm64eAuthBind24(f) => f.next as u32,
        }
    }

    pub fn is_bind(&self) -> bool {
        matches!(
            self,
            DyldPointerFixup::Ptr32Bind(_)
                | DyldPointerFixup::Ptr64Bind(_)
                | DyldPointerFixup::Arm64eBind(_)
                | DyldPointerFixup::Arm64eBind24(_)
                | DyldPointerFixup::Arm64eAuthBind(_)
                | DyldPointerFixup::Arm64eAuthBind24(_)
        )
    }

    pub fn is_rebase(&self) -> bool {
        !self.is_bind()
    }

    /// Whether the slot carries pointer-authentication metadata.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            DyldPointerFixup::Arm64eAuthRebase(_)
                | DyldPointerFixup::Arm64eAuthRebase24(_)
                | DyldPointerFixup::Arm64eAuthBind(_)
                | DyldPointerFixup::Arm64eAuthBind24(_)
        ) || matches!(self, DyldPointerFixup::Ptr64KernelCacheRebase(f) if f.is_auth)
    }

    /// Index into the imports table, for bind slots.
    pub fn ordinal(&self) -> Option<u32> {
        match self {
            DyldPointerFixup::Ptr32Bind(f) => Some(f.ordinal),
            DyldPointerFixup::Ptr64Bind(f) => Some(f.ordinal),
            DyldPointerFixup::Arm64eBind(f) => Some(f.ordinal),
            DyldPointerFixup::Arm64eBind24(f) => Some(f.ordinal),
            DyldPointerFixup::Arm64eAuthBind(f) => Some(f.ordinal),
            DyldPointerFixup::Arm64eAuthBind24(f) => Some(f.ordinal),
            _ => None,
        }
    }

    /// The cached import name, for bind slots.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            DyldPointerFixup::Ptr32Bind(f) => Some(&f.symbol),
            DyldPointerFixup::Ptr64Bind(f) => Some(&f.symbol),
            DyldPointerFixup::Arm64eBind(f) => Some(&f.symbol),
            DyldPointerFixup::Arm64eBind24(f) => Some(&f.symbol),
            DyldPointerFixup::Arm64eAuthBind(f) => Some(&f.symbol),
            DyldPointerFixup::Arm64eAuthBind24(f) => Some(&f.symbol),
            _ => None,
        }
    }

    /// Resolve a rebase slot to its final address. Vmaddr-based formats
    /// return the (unpacked) target verbatim; offset-based formats and auth
    /// rebases add the preferred load address. PAC signatures are never
    /// applied. Binds resolve to `None`.
    pub fn resolve(&self, format: DyldPointerFormat, base: u64) -> Option<u64> {
        match self {
            DyldPointerFixup::Ptr32Rebase(f) => Some(f.target as u64),
            DyldPointerFixup::Ptr32CacheRebase(f) => Some(f.target as u64),
            DyldPointerFixup::Ptr32FirmwareRebase(f) => Some(f.target as u64),
            DyldPointerFixup::Ptr64Rebase(f) => Some(f.unpacked_target()),
            DyldPointerFixup::Ptr64OffsetRebase(f) => {
                Some(f.unpacked_target().wrapping_add(base))
            }
            DyldPointerFixup::Ptr64KernelCacheRebase(f) => Some(f.target as u64),
            DyldPointerFixup::Arm64eRebase(f) => {
                if format.rebase_targets_are_offsets() {
                    Some(f.target.wrapping_add(base))
                } else {
                    Some(f.unpack_target())
                }
            }
            DyldPointerFixup::Arm64eRebase24(f) => Some((f.target as u64).wrapping_add(base)),
            DyldPointerFixup::Arm64eAuthRebase(f) => Some((f.target as u64).wrapping_add(base)),
            DyldPointerFixup::Arm64eAuthRebase24(f) => {
                Some((f.target as u64).wrapping_add(base))
            }
            DyldPointerFixup::Ptr32Bind(_)
            | DyldPointerFixup::Ptr64Bind(_)
            | DyldPointerFixup::Arm64eBind(_)
            | DyldPointerFixup::Arm64eBind24(_)
            | DyldPointerFixup::Arm64eAuthBind(_)
            | DyldPointerFixup::Arm64eAuthBind24(_) => None,
        }
    }
}
