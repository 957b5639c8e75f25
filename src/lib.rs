//! Parsing and offline resolution of `LC_DYLD_CHAINED_FIXUPS` payloads:
//! walk the pointer chains embedded in a Mach-O image, enumerate every
//! rebase and bind, and answer pointer-level queries the way dyld would.

pub mod error;
pub mod fixups;
pub mod format;
pub mod header;
pub mod helpers;
pub mod imports;
pub mod overlay;
pub mod pointer;
pub mod starts;

pub use error::{FixupError, FixupResult};
pub use fixups::{DyldChainedFixups, DyldFixup};
pub use format::{DyldFixupPACKey, DyldImportFormat, DyldPointerFormat, DyldSymbolsFormat};
pub use header::DyldChainedFixupsHeader;
pub use imports::DyldChainedImport;
pub use overlay::FixupOverlay;
pub use pointer::DyldPointerFixup;
pub use starts::{DyldStartsInImage, DyldStartsInSegment};

/// Byte order of the payload and image, re-exported for callers.
pub use nom::number::Endianness;
