//! HTTP Basic authentication gate.
//!
//! # Responsibilities
//! - Check the `Authorization` header against the configured credential pair
//! - Collapse every failure shape (missing header, wrong scheme, undecodable
//!   payload, mismatched credential) into a single unauthorized outcome
//! - Compare credentials in constant time
//!
//! When no credential pair is configured the gate does not exist and every
//! request passes.

use axum::http::{header, HeaderMap};

/// A configured username/password pair for HTTP Basic authentication.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    user: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Check a request's headers against this credential pair.
    ///
    /// Expects `Authorization: Basic base64(user:pass)`. The scheme is
    /// matched case-insensitively; the credential comparison runs over both
    /// halves without short-circuiting.
    pub fn check(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };

        let encoded = match value.get(..6) {
            Some(scheme) if scheme.eq_ignore_ascii_case("basic ") => value[6..].trim(),
            _ => return false,
        };

        let Some(decoded) = decode_base64(encoded) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((user, password)) = decoded.split_once(':') else {
            return false;
        };

        let user_ok = constant_time_eq(user.as_bytes(), self.user.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        user_ok & password_ok
    }
}

/// Decode standard base64 (`+`/`/` alphabet, optional `=` padding).
///
/// Returns `None` on any character outside the alphabet or an impossible
/// encoding length.
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    fn sextet(c: u8) -> Option<u32> {
        match c {
            b'A'..=b'Z' => Some((c - b'A') as u32),
            b'a'..=b'z' => Some((c - b'a') as u32 + 26),
            b'0'..=b'9' => Some((c - b'0') as u32 + 52),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    let trimmed = input.trim_end_matches('=');
    let mut out = Vec::with_capacity(trimmed.len() * 3 / 4 + 2);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &c in trimmed.as_bytes() {
        acc = (acc << 6) | sextet(c)?;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }

    // a single leftover sextet cannot come from a valid encoding
    if bits == 6 {
        return None;
    }
    Some(out)
}

/// Byte equality without data-dependent early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn encode_base64(input: &[u8]) -> String {
        const ALPHABET: &[u8; 64] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
        let mut out = String::new();
        for chunk in input.chunks(3) {
            let mut acc = 0u32;
            for (i, &b) in chunk.iter().enumerate() {
                acc |= (b as u32) << (16 - 8 * i);
            }
            for i in 0..4 {
                if i <= chunk.len() {
                    out.push(ALPHABET[((acc >> (18 - 6 * i)) & 0x3f) as usize] as char);
                } else {
                    out.push('=');
                }
            }
        }
        out
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    fn basic_header(user: &str, password: &str) -> String {
        format!(
            "Basic {}",
            encode_base64(format!("{user}:{password}").as_bytes())
        )
    }

    #[test]
    fn test_correct_credentials_pass() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let headers = headers_with_auth(&basic_header("ingest", "secret"));
        assert!(credentials.check(&headers));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let encoded = encode_base64(b"ingest:secret");
        let headers = headers_with_auth(&format!("basic {encoded}"));
        assert!(credentials.check(&headers));
    }

    #[test]
    fn test_missing_header_fails() {
        let credentials = BasicCredentials::new("ingest", "secret");
        assert!(!credentials.check(&HeaderMap::new()));
    }

    #[test]
    fn test_wrong_password_fails() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let headers = headers_with_auth(&basic_header("ingest", "wrong"));
        assert!(!credentials.check(&headers));
    }

    #[test]
    fn test_wrong_scheme_fails() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let headers = headers_with_auth("Bearer sometoken");
        assert!(!credentials.check(&headers));
    }

    #[test]
    fn test_undecodable_payload_fails() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let headers = headers_with_auth("Basic !!!not-base64!!!");
        assert!(!credentials.check(&headers));
    }

    #[test]
    fn test_payload_without_colon_fails() {
        let credentials = BasicCredentials::new("ingest", "secret");
        let headers = headers_with_auth(&format!("Basic {}", encode_base64(b"nocolon")));
        assert!(!credentials.check(&headers));
    }

    #[test]
    fn test_password_containing_colon() {
        let credentials = BasicCredentials::new("ingest", "se:cret");
        let headers = headers_with_auth(&basic_header("ingest", "se:cret"));
        assert!(credentials.check(&headers));
    }

    #[test]
    fn test_base64_roundtrip() {
        for sample in [&b"a"[..], b"ab", b"abc", b"ingest:secret", b""] {
            let encoded = encode_base64(sample);
            assert_eq!(decode_base64(&encoded).as_deref(), Some(sample));
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"same", b"same"));
        assert!(!constant_time_eq(b"same", b"diff"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }
}
