//! Content-encoding negotiation.

use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

/// True when an `Accept-Encoding` value lists the exact `gzip` token.
///
/// Tokens are split on commas and trimmed. Parameters such as `;q=` are not
/// interpreted, so `gzip;q=0.5` does not count.
pub fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
    accept_encoding
        .map(|v| v.split(',').any(|token| token.trim() == "gzip"))
        .unwrap_or(false)
}

pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
