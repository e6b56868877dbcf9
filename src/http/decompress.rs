//! Request body decompression.

use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;
use thiserror::Error;

/// A body labeled as compressed could not be decompressed.
#[derive(Debug, Error)]
#[error("failed to decompress {encoding} body: {source}")]
pub struct DecompressError {
    encoding: &'static str,
    #[source]
    source: std::io::Error,
}

/// Decompress a request body according to its `content-encoding` value.
///
/// `gzip` and `deflate` are recognized case-insensitively; `deflate` means
/// the zlib-wrapped format of the HTTP content-coding. Any other value, or
/// no value, passes the bytes through untouched. Corrupt or truncated
/// streams yield an error, never a panic.
pub fn decompress(body: &[u8], encoding: Option<&str>) -> Result<Vec<u8>, DecompressError> {
    match encoding.map(str::trim) {
        Some(e) if e.eq_ignore_ascii_case("gzip") => read_all(GzDecoder::new(body), "gzip"),
        Some(e) if e.eq_ignore_ascii_case("deflate") => read_all(ZlibDecoder::new(body), "deflate"),
        _ => Ok(body.to_vec()),
    }
}

fn read_all<R: Read>(mut decoder: R, encoding: &'static str) -> Result<Vec<u8>, DecompressError> {
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|source| DecompressError { encoding, source })?;
    Ok(out)
}
