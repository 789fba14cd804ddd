//! `Range` request header support.
//!
//! Supported forms:
//!
//! - `bytes=start-end`
//! - `bytes=start-`
//! - `bytes=-suffix_len`
//!
//! Multiple ranges are not supported, the header is then ignored and the
//! whole file is served.

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParsedRange {
    StartEnd { start: u64, end_inclusive: Option<u64> },
    Suffix { len: u64 },
}

/// The bytes to serve, `start..end`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    /// Whether it answers a `Range` request with `206`.
    pub partial: bool,
}

impl ByteRange {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `Content-Range` header value, `end` being inclusive.
    #[must_use]
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end.saturating_sub(1))
    }
}

/// The requested range lies outside the file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Unsatisfiable;

#[must_use]
pub fn parse_range_header(value: &str) -> Option<ParsedRange> {
    let rest = value.trim().strip_prefix("bytes=")?;

    if rest.contains(',') {
        return None;
    }

    let (start, end) = rest.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        let len: u64 = end.parse().ok()?;

        if len == 0 {
            return None;
        }

        return Some(ParsedRange::Suffix { len });
    }

    let start: u64 = start.parse().ok()?;

    let end_inclusive = if end.is_empty() { None } else { Some(end.parse::<u64>().ok()?) };

    Some(ParsedRange::StartEnd { start, end_inclusive })
}

/// It resolves the requested range against the file length.
///
/// # Errors
///
/// Will return `Unsatisfiable` when the range starts past the end of the
/// file or is empty.
pub fn resolve(range: Option<ParsedRange>, total: u64) -> Result<ByteRange, Unsatisfiable> {
    match range {
        None => Ok(ByteRange {
            start: 0,
            end: total,
            partial: false,
        }),
        Some(ParsedRange::StartEnd { start, end_inclusive }) => {
            let end = end_inclusive.map_or(total, |end| end.saturating_add(1).min(total));

            if start >= total || end <= start {
                return Err(Unsatisfiable);
            }

            Ok(ByteRange {
                start,
                end,
                partial: true,
            })
        }
        Some(ParsedRange::Suffix { len }) => {
            if total == 0 {
                return Err(Unsatisfiable);
            }

            Ok(ByteRange {
                start: total.saturating_sub(len),
                end: total,
                partial: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_range_header, resolve, ByteRange, ParsedRange, Unsatisfiable};

    #[test]
    fn it_should_parse_a_closed_range() {
        assert_eq!(
            parse_range_header("bytes=0-1023"),
            Some(ParsedRange::StartEnd {
                start: 0,
                end_inclusive: Some(1023)
            })
        );
    }

    #[test]
    fn it_should_parse_an_open_ended_range() {
        assert_eq!(
            parse_range_header("bytes=500-"),
            Some(ParsedRange::StartEnd {
                start: 500,
                end_inclusive: None
            })
        );
    }

    #[test]
    fn it_should_parse_a_suffix_range() {
        assert_eq!(parse_range_header("bytes=-1024"), Some(ParsedRange::Suffix { len: 1024 }));
    }

    #[test]
    fn it_should_ignore_invalid_and_multiple_ranges() {
        assert_eq!(parse_range_header("invalid"), None);
        assert_eq!(parse_range_header("bytes=abc-def"), None);
        assert_eq!(parse_range_header("bytes=-0"), None);
        assert_eq!(parse_range_header("bytes=0-1,5-9"), None);
    }

    #[test]
    fn no_range_should_serve_the_whole_file() {
        assert_eq!(
            resolve(None, 100),
            Ok(ByteRange {
                start: 0,
                end: 100,
                partial: false
            })
        );
    }

    #[test]
    fn the_end_of_a_range_should_be_clamped_to_the_file_length() {
        let range = resolve(
            Some(ParsedRange::StartEnd {
                start: 90,
                end_inclusive: Some(1000),
            }),
            100,
        )
        .expect("it should be satisfiable");

        assert_eq!(range.len(), 10);
        assert_eq!(range.content_range(100), "bytes 90-99/100");
    }

    #[test]
    fn a_suffix_longer_than_the_file_should_serve_the_whole_file() {
        let range = resolve(Some(ParsedRange::Suffix { len: 500 }), 100).expect("it should be satisfiable");

        assert_eq!(range.content_range(100), "bytes 0-99/100");
    }

    #[test]
    fn a_range_past_the_end_should_be_unsatisfiable() {
        assert_eq!(
            resolve(
                Some(ParsedRange::StartEnd {
                    start: 100,
                    end_inclusive: None
                }),
                100
            ),
            Err(Unsatisfiable)
        );
    }
}
