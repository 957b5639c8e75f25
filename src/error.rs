use std::error;
use std::fmt;
use std::io;

/// Errors surfaced while decoding a chained-fixups payload or walking its
/// pointer chains. Parsing never retries or recovers locally; the first
/// failure aborts the operation that produced it.
#[derive(Debug)]
pub enum FixupError {
    /// A read ran past the end of the payload or the image.
    Truncated,
    /// `pointer_format` is outside the closed set of known formats.
    UnknownPointerFormat(u16),
    /// `imports_format` is not one of IMPORT, IMPORT_ADDEND, IMPORT_ADDEND64.
    UnknownImportsFormat(u32),
    /// `symbols_format` is either unknown or zlib-compressed, which this
    /// crate does not decode.
    UnsupportedSymbolsFormat(u32),
    /// `fixups_version` is not 0.
    UnsupportedVersion(u32),
    /// A symbol-pool string starting at this payload offset has no NUL
    /// terminator before the payload ends.
    UnterminatedSymbol { offset: u64 },
    /// A bind slot references an import that does not exist. `at` is the
    /// slot's image offset, or 0 for pointer-value queries where the slot
    /// address is unknown.
    OrdinalOutOfRange {
        ordinal: u32,
        imports: usize,
        at: u64,
    },
    /// A chain step landed outside the owning segment's byte range.
    ChainEscapesSegment { at: u64 },
    /// A slot's offset is not a multiple of the format's stride.
    MisalignedChain { at: u64, stride: u64 },
    /// The overlay found bytes that no longer match the rebase slot's
    /// recorded raw value.
    OverlayMismatch { at: u64, expected: u64, found: u64 },
    Io(io::Error),
    Parsing(String),
}

pub type FixupResult<T> = Result<T, FixupError>;

impl fmt::Display for FixupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FixupError::Truncated => write!(f, "input truncated"),
            FixupError::UnknownPointerFormat(value) => {
                write!(f, "unknown pointer format {:#x}", value)
            }
            FixupError::UnknownImportsFormat(value) => {
                write!(f, "unknown imports format {}", value)
            }
            FixupError::UnsupportedSymbolsFormat(value) => {
                write!(f, "unsupported symbols format {}", value)
            }
            FixupError::UnsupportedVersion(value) => {
                write!(f, "unsupported fixups version {}", value)
            }
            FixupError::UnterminatedSymbol { offset } => {
                write!(f, "unterminated symbol at payload offset {:#x}", offset)
            }
            FixupError::OrdinalOutOfRange {
                ordinal,
                imports,
                at,
            } => write!(
                f,
                "bind ordinal {} out of range for {} imports at {:#x}",
                ordinal, imports, at
            ),
            FixupError::ChainEscapesSegment { at } => {
                write!(f, "chain escapes its segment at {:#x}", at)
            }
            FixupError::MisalignedChain { at, stride } => {
                write!(f, "slot at {:#x} is not aligned to stride {}", at, stride)
            }
            FixupError::OverlayMismatch {
                at,
                expected,
                found,
            } => write!(
                f,
                "overlay mismatch at {:#x}: expected {:#x}, found {:#x}",
                at, expected, found
            ),
            FixupError::Io(err) => write!(f, "io error: {}", err),
            FixupError::Parsing(detail) => write!(f, "parsing error: {}", detail),
        }
    }
}

impl error::Error for FixupError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            FixupError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FixupError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FixupError::Truncated
        } else {
            FixupError::Io(err)
        }
    }
}

impl<'a> From<nom::Err<nom::error::Error<&'a [u8]>>> for FixupError {
    fn from(err: nom::Err<nom::error::Error<&'a [u8]>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => FixupError::Truncated,
            nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
                nom::error::ErrorKind::Eof | nom::error::ErrorKind::Complete => {
                    FixupError::Truncated
                }
                code => FixupError::Parsing(format!("{:?} with {} bytes left", code, e.input.len())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_eof_maps_to_truncated() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(FixupError::from(err), FixupError::Truncated));
    }

    #[test]
    fn test_pointer_format_displayed_in_hex() {
        let msg = FixupError::UnknownPointerFormat(0xd).to_string();
        assert!(msg.contains("0xd"));
    }

    #[test]
    fn test_nom_eof_maps_to_truncated() {
        let input: &[u8] = &[0x01];
        let err: nom::Err<nom::error::Error<&[u8]>> = nom::number::complete::le_u32::<
            _,
            nom::error::Error<&[u8]>,
        >(input)
        .unwrap_err();
        assert!(matches!(FixupError::from(err), FixupError::Truncated));
    }
}
