//! Upload body normalization
//!
//! Every supported input is reduced to a `BodyInfo`: a bare content type, the
//! exact byte size and the bytes that will be PUT to the object store.

use bytes::Bytes;
use percent_encoding::percent_decode_str;

use crate::constants::{OCTET_STREAM, TEXT_PLAIN};
use crate::error::{NoCloudError, NoCloudResult};
use crate::mime::{
    data_url_media_type, decode_base64, decoded_size, detect_mime_type, extract_base64_payload,
    normalize_content_type,
};

/// Binary content with a declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
    content_type: String,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// Declared content type, as given.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// An upload input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    /// Binary content carrying its own content type
    Blob(Blob),
    /// Untyped bytes, uploaded as `application/octet-stream`
    Bytes(Bytes),
    /// Base64, a data URL, or plain text
    Text(String),
}

impl FileBody {
    pub fn kind(&self) -> &'static str {
        match self {
            FileBody::Blob(_) => "blob",
            FileBody::Bytes(_) => "bytes",
            FileBody::Text(_) => "text",
        }
    }
}

/// Conversion into a `FileBody`, failing with `UnsupportedBodyType` for inputs
/// that have no byte representation.
pub trait IntoFileBody {
    fn into_file_body(self) -> NoCloudResult<FileBody>;
}

impl IntoFileBody for FileBody {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(self)
    }
}

impl IntoFileBody for Blob {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Blob(self))
    }
}

impl IntoFileBody for Bytes {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Bytes(self))
    }
}

impl IntoFileBody for Vec<u8> {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Bytes(Bytes::from(self)))
    }
}

impl IntoFileBody for &[u8] {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Bytes(Bytes::copy_from_slice(self)))
    }
}

impl IntoFileBody for String {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Text(self))
    }
}

impl IntoFileBody for &str {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        Ok(FileBody::Text(self.to_string()))
    }
}

/// Dynamic input: strings become text bodies and arrays of byte values become
/// byte buffers. Anything else is rejected.
impl IntoFileBody for serde_json::Value {
    fn into_file_body(self) -> NoCloudResult<FileBody> {
        use serde_json::Value;

        match self {
            Value::String(text) => Ok(FileBody::Text(text)),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(|bytes| FileBody::Bytes(Bytes::from(bytes)))
                .ok_or_else(|| {
                    NoCloudError::UnsupportedBodyType(
                        "array elements must be byte values (0-255)".to_string(),
                    )
                }),
            Value::Null => Err(NoCloudError::UnsupportedBodyType("null".to_string())),
            Value::Bool(_) => Err(NoCloudError::UnsupportedBodyType("boolean".to_string())),
            Value::Number(_) => Err(NoCloudError::UnsupportedBodyType("number".to_string())),
            Value::Object(_) => Err(NoCloudError::UnsupportedBodyType("object".to_string())),
        }
    }
}

/// Inspected body, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyInfo {
    /// Bare MIME type, no parameters
    pub content_type: String,
    /// Always `payload.len()`
    pub size: u64,
    pub payload: Bytes,
}

impl BodyInfo {
    fn from_bytes(content_type: String, payload: Bytes) -> Self {
        Self {
            content_type,
            size: payload.len() as u64,
            payload,
        }
    }
}

/// Determine content type, size and upload bytes for a body. Pure, no I/O.
pub fn inspect(body: FileBody) -> BodyInfo {
    let kind = body.kind();
    let info = match body {
        FileBody::Blob(blob) => {
            let content_type = normalize_content_type(blob.content_type());
            BodyInfo::from_bytes(content_type, blob.data)
        }
        FileBody::Bytes(bytes) => BodyInfo::from_bytes(OCTET_STREAM.to_string(), bytes),
        FileBody::Text(text) => inspect_text(text),
    };

    tracing::debug!(
        kind = kind,
        content_type = %info.content_type,
        size_bytes = info.size,
        "Inspected upload body"
    );

    info
}

fn inspect_text(text: String) -> BodyInfo {
    if let Some(content_type) = detect_mime_type(&text) {
        match decode_detected(&text) {
            Some(payload) => return BodyInfo::from_bytes(content_type, payload),
            None => tracing::debug!(
                detected = %content_type,
                "String matched a base64 signature but did not decode, treating as text"
            ),
        }
    }

    BodyInfo::from_bytes(TEXT_PLAIN.to_string(), Bytes::from(text.into_bytes()))
}

/// Decode a string already classified as a data URL or base64.
///
/// Returns `None` when the payload is not valid base64, or when its decoded
/// length disagrees with `decoded_size`. The `;base64,` marker is only
/// meaningful inside a data URL; bare base64 is decoded whole.
fn decode_detected(text: &str) -> Option<Bytes> {
    let payload = if data_url_media_type(text).is_some() {
        let payload = extract_base64_payload(text);
        if payload.len() == text.len() {
            // Data URL without a base64 marker: percent-encoded text after the comma
            let (_, rest) = text.split_once(',')?;
            let bytes: Vec<u8> = percent_decode_str(rest).collect();
            return Some(Bytes::from(bytes));
        }
        payload
    } else {
        text
    };

    let decoded = decode_base64(payload).ok()?;
    if decoded.len() as u64 != decoded_size(payload) {
        return None;
    }
    Some(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::encode_base64;

    #[test]
    fn blob_uses_declared_type_without_parameters() {
        let blob = Blob::new(&b"Hello, NoCloud!"[..], "text/plain;charset=utf-8");
        let info = inspect(FileBody::Blob(blob));

        assert_eq!(info.content_type, "text/plain");
        assert_eq!(info.size, 15);
        assert_eq!(&info.payload[..], b"Hello, NoCloud!");
    }

    #[test]
    fn blob_payload_is_not_copied() {
        let data = Bytes::from_static(b"shared");
        let info = inspect(FileBody::Blob(Blob::new(data.clone(), "image/png")));
        assert_eq!(info.payload.as_ptr(), data.as_ptr());
    }

    #[test]
    fn bytes_are_octet_stream_without_sniffing() {
        // PNG magic bytes are not sniffed for raw buffers
        let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let info = inspect(png.into_file_body().unwrap());

        assert_eq!(info.content_type, "application/octet-stream");
        assert_eq!(info.size, 8);
    }

    #[test]
    fn plain_text_size_is_utf8_length() {
        let info = inspect(FileBody::Text("héllo".to_string()));

        assert_eq!(info.content_type, "text/plain");
        assert_eq!(info.size, 6);
        assert_eq!(&info.payload[..], "héllo".as_bytes());
    }

    #[test]
    fn base64_with_signature_is_decoded() {
        let pdf = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3";
        let encoded = encode_base64(pdf);
        assert!(encoded.starts_with("JVBERi0"));

        let info = inspect(FileBody::Text(encoded));
        assert_eq!(info.content_type, "application/pdf");
        assert_eq!(info.size, pdf.len() as u64);
        assert_eq!(&info.payload[..], pdf);
    }

    #[test]
    fn data_url_is_decoded_with_declared_type() {
        let png_header = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
        let data_url = format!("data:image/png;base64,{}", encode_base64(png_header));

        let info = inspect(FileBody::Text(data_url));
        assert_eq!(info.content_type, "image/png");
        assert_eq!(info.size, png_header.len() as u64);
        assert_eq!(&info.payload[..], png_header);
    }

    #[test]
    fn data_url_declared_type_wins() {
        let data_url = format!("data:application/pdf;base64,{}", encode_base64(b"%PDF-1.7"));
        let info = inspect(FileBody::Text(data_url));
        assert_eq!(info.content_type, "application/pdf");
        assert_eq!(&info.payload[..], b"%PDF-1.7");
    }

    #[test]
    fn size_matches_payload_for_every_padding() {
        // 3, 4 and 5 bytes give 0, 2 and 1 padding characters
        for raw in [&b"\x00\x00\x00"[..], &b"\x00\x00\x00\x01"[..], &b"\x00\x00\x00\x01\x02"[..]] {
            let encoded = encode_base64(raw);
            assert!(encoded.starts_with("AAAA"));

            let info = inspect(FileBody::Text(encoded.clone()));
            assert_eq!(info.content_type, "video/mp4");
            assert_eq!(info.size, info.payload.len() as u64, "{encoded}");
            assert_eq!(info.size, raw.len() as u64, "{encoded}");
        }
    }

    #[test]
    fn non_base64_data_url_is_percent_decoded() {
        let info = inspect(FileBody::Text("data:text/csv,a%2Cb%0A1,2".to_string()));
        assert_eq!(info.content_type, "text/csv");
        assert_eq!(&info.payload[..], b"a,b\n1,2");
        assert_eq!(info.size, 7);
    }

    #[test]
    fn undecodable_signature_match_falls_back_to_text() {
        let text = "AAAA is a battery size!";
        let info = inspect(FileBody::Text(text.to_string()));
        assert_eq!(info.content_type, "text/plain");
        assert_eq!(info.size, text.len() as u64);
    }

    #[test]
    fn base64_marker_outside_data_url_is_not_stripped() {
        let text = "iVBORw0KGgo;base64,AAAA";
        let info = inspect(FileBody::Text(text.to_string()));
        assert_eq!(info.content_type, "text/plain");
        assert_eq!(&info.payload[..], text.as_bytes());
        assert_eq!(info.size, text.len() as u64);
    }

    #[test]
    fn body_kind_names_the_variant() {
        assert_eq!(FileBody::Blob(Blob::new(Bytes::new(), "")).kind(), "blob");
        assert_eq!(FileBody::Bytes(Bytes::new()).kind(), "bytes");
        assert_eq!(FileBody::Text(String::new()).kind(), "text");
    }

    #[test]
    fn json_values_convert_or_reject() {
        assert!(matches!(
            serde_json::json!(42).into_file_body(),
            Err(NoCloudError::UnsupportedBodyType(_))
        ));
        assert!(matches!(
            serde_json::json!({ "a": 1 }).into_file_body(),
            Err(NoCloudError::UnsupportedBodyType(_))
        ));
        assert!(matches!(
            serde_json::json!([1, 300]).into_file_body(),
            Err(NoCloudError::UnsupportedBodyType(_))
        ));
        assert_eq!(
            serde_json::json!("hi").into_file_body().unwrap(),
            FileBody::Text("hi".to_string())
        );
        assert_eq!(
            serde_json::json!([104, 105]).into_file_body().unwrap(),
            FileBody::Bytes(Bytes::from_static(b"hi"))
        );
    }
}
