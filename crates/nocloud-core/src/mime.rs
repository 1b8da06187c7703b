//! Content-type detection for string bodies
//!
//! Strings are either data URLs (`data:<type>[;...],<payload>`), bare base64
//! whose first characters match a known file signature, or plain text.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::Regex;

use crate::constants::OCTET_STREAM;

/// Base64 prefixes of well-known file signatures, longest first.
///
/// `AAAA` (mp4) is a loose match: any payload starting with three zero bytes
/// hits it. It stays last so every more specific prefix wins first.
pub static BASE64_SIGNATURES: &[(&str, &str)] = &[
    ("iVBORw0KGgo", "image/png"),
    ("JVBERi0", "application/pdf"),
    ("PD94bWw", "application/xml"),
    ("R0lGOD", "image/gif"),
    ("PHN2Zw", "image/svg+xml"),
    ("UklGR", "image/webp"),
    ("UEsDB", "application/zip"),
    ("/9j/", "image/jpeg"),
    ("AAAA", "video/mp4"),
];

const BASE64_MARKER: &str = ";base64,";

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([^;,]+)(?:;[^,]*)?,").expect("data URL pattern is valid")
});

/// Accepts padded and unpadded input; the size formula holds for both.
const DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Media type declared by a data URL, verbatim.
pub fn data_url_media_type(value: &str) -> Option<&str> {
    DATA_URL
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Detect the MIME type of a string body.
///
/// A data URL's declared type always wins over signature sniffing. Returns
/// `None` when the string should be treated as plain text.
pub fn detect_mime_type(value: &str) -> Option<String> {
    if let Some(media_type) = data_url_media_type(value) {
        return Some(media_type.to_string());
    }

    BASE64_SIGNATURES
        .iter()
        .find(|(prefix, _)| value.starts_with(prefix))
        .map(|(_, mime)| mime.to_string())
}

/// Raw base64 payload: everything after the first `;base64,` marker, or the
/// whole string when there is none.
pub fn extract_base64_payload(value: &str) -> &str {
    match value.find(BASE64_MARKER) {
        Some(idx) => &value[idx + BASE64_MARKER.len()..],
        None => value,
    }
}

/// Decoded byte length of a base64 payload, computed without decoding.
pub fn decoded_size(payload: &str) -> u64 {
    let len = payload.len() as u64;
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count() as u64;
    (len * 3 / 4).saturating_sub(padding)
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    DECODER.decode(payload)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Reduce a declared content type to a bare, lower-case MIME type.
///
/// `text/plain; charset=utf-8` becomes `text/plain`; an empty type becomes
/// `application/octet-stream`.
pub fn normalize_content_type(raw: &str) -> String {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        OCTET_STREAM.to_string()
    } else {
        essence.to_ascii_lowercase()
    }
}
