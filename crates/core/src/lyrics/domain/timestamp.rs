use crate::shared::constants::TIMESTAMP_WIDTH;
use crate::shared::error::FormatError;

/// Parses a fixed-width `mm:ss.cc` token into milliseconds from song start.
///
/// The token must be exactly the eight timestamp characters; stripping the
/// surrounding tag is the loader's job.
pub fn parse_timestamp(token: &str) -> Result<u64, FormatError> {
    let malformed = || FormatError::Timestamp {
        token: token.to_string(),
    };

    let bytes = token.as_bytes();
    if bytes.len() != TIMESTAMP_WIDTH || bytes[2] != b':' || bytes[5] != b'.' {
        return Err(malformed());
    }

    let field = |range: std::ops::Range<usize>| -> Result<u64, FormatError> {
        let digits = &bytes[range];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }
        Ok(digits
            .iter()
            .fold(0u64, |acc, d| acc * 10 + u64::from(d - b'0')))
    };

    let minutes = field(0..2)?;
    let seconds = field(3..5)?;
    let centiseconds = field(6..8)?;

    Ok(minutes * 60_000 + seconds * 1_000 + centiseconds * 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero("00:00.00", 0)]
    #[case::minute_and_half_second("01:02.50", 62_500)]
    #[case::centiseconds("00:00.01", 10)]
    #[case::max("99:59.99", 99 * 60_000 + 59_000 + 990)]
    #[case::seconds_not_range_checked("00:75.00", 75_000)]
    fn test_parse_well_formed(#[case] token: &str, #[case] expected: u64) {
        assert_eq!(parse_timestamp(token).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("1:02.50")]
    #[case::too_long("001:02.50")]
    #[case::letters("ab:cd.ef")]
    #[case::wrong_separator("01.02:50")]
    #[case::sign("-1:02.50")]
    #[case::bracketed("[01:02.5")]
    #[case::multibyte("０1:02.50")]
    fn test_parse_malformed(#[case] token: &str) {
        assert_eq!(
            parse_timestamp(token),
            Err(FormatError::Timestamp {
                token: token.to_string()
            })
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_timestamp("03:21.07"), parse_timestamp("03:21.07"));
    }
}
