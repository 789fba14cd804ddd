use std::str::FromStr;

use torrenttp_primitives::info_hash::InfoHash;

/// A torrent with two files, published in the test transport.
pub const SAMPLE_INFO_HASH: &str = "9e0217d0fa71c87332cd8bf9dbeabcb2c2cf3c4d";
pub const SAMPLE_NAME: &str = "sample";
pub const SAMPLE_MOVIE: &str = "Season 1/movie.mp4";
pub const SAMPLE_SUBTITLES: &str = "subs.srt";

/// A torrent nobody publishes: its metadata never arrives.
pub const UNKNOWN_INFO_HASH: &str = "0b3aea4adc213ce32295be85d3883a63bca25446";

pub fn info_hash(hex: &str) -> InfoHash {
    InfoHash::from_str(hex).expect("it should be a valid info-hash")
}

/// 1000 bytes, each one its offset modulo 256, so ranges are easy to check.
pub fn movie_bytes() -> Vec<u8> {
    (0..1000u32).map(|i| i.to_le_bytes()[0]).collect()
}

pub fn subtitles_bytes() -> Vec<u8> {
    b"1\n00:00:01,000 --> 00:00:02,000\nHello\n".to_vec()
}

pub fn sample_magnet() -> String {
    format!("magnet:?xt=urn:btih:{SAMPLE_INFO_HASH}&dn={SAMPLE_NAME}")
}

pub fn invalid_info_hashes() -> Vec<String> {
    ["0", "-1", "1.1", "INVALID INFOHASH", "9e0217d0fa71c87332cd8bf9dbeabcb2c2cf3c4"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
