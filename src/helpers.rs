use crate::error::{FixupError, FixupResult};

/// Read a NUL-terminated string from `pool` starting at `offset`. The pool
/// is the raw symbols region of the payload; a string that runs off the end
/// of it without a terminator is fatal.
pub fn string_at(pool: &[u8], offset: u64) -> FixupResult<String> {
    let start = usize::try_from(offset).map_err(|_| FixupError::Truncated)?;
    let bytes = pool.get(start..).ok_or(FixupError::Truncated)?;
    match nom::bytes::complete::take_until::<_, _, nom::error::Error<&[u8]>>("\0")(bytes) {
        Ok((_, name)) => Ok(String::from_utf8_lossy(name).into_owned()),
        Err(_) => Err(FixupError::UnterminatedSymbol { offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_at_reads_up_to_nul() {
        let pool = b"_malloc\0_free\0";
        assert_eq!(string_at(pool, 0).unwrap(), "_malloc");
        assert_eq!(string_at(pool, 8).unwrap(), "_free");
    }

    #[test]
    fn test_string_at_missing_terminator() {
        let pool = b"_malloc";
        assert!(matches!(
            string_at(pool, 0),
            Err(FixupError::UnterminatedSymbol { offset: 0 })
        ));
    }

    #[test]
    fn test_string_at_out_of_bounds() {
        let pool = b"_a\0";
        assert!(matches!(string_at(pool, 64), Err(FixupError::Truncated)));
    }
}
