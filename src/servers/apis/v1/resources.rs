//! Resource helpers shared by the API contexts.
//!
//! - Human readable byte sizes, like `83 MB`.
//! - Links to the stream and download endpoints of a file.
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use torrenttp_primitives::info_hash::InfoHash;

/// Characters kept as they are in a file path link. Slashes are kept, so a
/// link mirrors the file tree of the transfer.
const FILE_PATH: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~').remove(b'/');

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with SI units and at most one decimal, for example
/// `110 B`, `1.5 kB` or `83 MB`.
#[must_use]
pub fn readable_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exponent = 0;
    let mut scale: u128 = 1;

    while exponent + 1 < SI_UNITS.len() && scale * 1000 <= u128::from(bytes) {
        scale *= 1000;
        exponent += 1;
    }

    loop {
        // The value in tenths of the unit, rounded half up.
        let tenths = (u128::from(bytes) * 10 + scale / 2) / scale;

        let unit = SI_UNITS[exponent];

        if tenths < 100 {
            return format!("{}.{} {unit}", tenths / 10, tenths % 10);
        }

        let (whole, rest) = (tenths / 10, tenths % 10);
        let rounded = if rest > 5 || (rest == 5 && whole % 2 == 1) { whole + 1 } else { whole };

        // `999.95 kB` is shown as `1.0 MB`, not `1000 kB`
        if rounded >= 1000 && exponent + 1 < SI_UNITS.len() {
            scale *= 1000;
            exponent += 1;
            continue;
        }

        return format!("{rounded} {unit}");
    }
}

/// A transfer rate, like `1.5 kB/s`.
#[must_use]
pub fn readable_rate(bytes_per_second: u64) -> String {
    format!("{}/s", readable_bytes(bytes_per_second))
}

/// Progress of a transfer, like `40 MB/83 MB`.
#[must_use]
pub fn readable_progress(completed: u64, length: u64) -> String {
    format!("{}/{}", readable_bytes(completed), readable_bytes(length))
}

/// The API path that streams the file.
#[must_use]
pub fn stream_link(info_hash: &InfoHash, path: &str) -> String {
    file_link("stream", info_hash, path)
}

/// The API path that downloads the file as an attachment.
#[must_use]
pub fn download_link(info_hash: &InfoHash, path: &str) -> String {
    file_link("file", info_hash, path)
}

fn file_link(endpoint: &str, info_hash: &InfoHash, path: &str) -> String {
    format!("/api/{endpoint}/{info_hash}/{}", utf8_percent_encode(path, FILE_PATH))
}
