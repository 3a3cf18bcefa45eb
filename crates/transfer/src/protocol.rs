//! Transfer wire format.
//!
//! One `POST /` per file. Body is the raw file bytes; metadata rides in
//! headers: `X-Filename` (percent-encoded), `X-Filesize` (decimal byte count),
//! `X-Device` (free-form sender description) and `Content-Length`.

use axum::http::{HeaderMap, StatusCode};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
pub use session::TransferMetadata;
use thiserror::Error;

pub const HEADER_FILENAME: &str = "x-filename";
pub const HEADER_FILESIZE: &str = "x-filesize";
pub const HEADER_DEVICE: &str = "x-device";

/// Filename sent when the payload comes from standard input.
pub const STDIN_FILENAME: &str = "download";

/// Granularity of disk writes and progress ticks.
pub const CHUNK_SIZE: usize = 1024;

pub const DEFAULT_PORT: u16 = 8000;

/// File written.
pub const STATUS_SAVED: StatusCode = StatusCode::OK;
/// `X-Filename` or `X-Filesize` missing or unusable.
pub const STATUS_BAD_REQUEST: StatusCode = StatusCode::BAD_REQUEST;
/// Operator declined the transfer.
pub const STATUS_REJECTED: StatusCode = StatusCode::FORBIDDEN;
/// Operator declined to overwrite an existing file.
pub const STATUS_NOT_SAVED: StatusCode = StatusCode::CONFLICT;

// Everything outside printable ASCII is escaped by the encoder already
const FILENAME_ESCAPES: &AsciiSet = &CONTROLS.add(b'%').add(b'"');

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("missing X-Filename header")]
    MissingFilename,

    #[error("missing X-Filesize header")]
    MissingFilesize,

    #[error("X-Filesize is not a byte count: {0:?}")]
    InvalidFilesize(String),

    #[error("X-Filename has no usable base name: {0:?}")]
    InvalidFilename(String),
}

/// Pull [`TransferMetadata`] out of request headers, reducing the filename to
/// its base name.
pub fn metadata_from_headers(headers: &HeaderMap) -> Result<TransferMetadata, MetadataError> {
    let raw_name = header_text(headers, HEADER_FILENAME).ok_or(MetadataError::MissingFilename)?;
    let raw_size = header_text(headers, HEADER_FILESIZE).ok_or(MetadataError::MissingFilesize)?;

    let decoded = decode_filename(&raw_name);
    let filename = base_name(&decoded)
        .ok_or_else(|| MetadataError::InvalidFilename(decoded.clone()))?
        .to_string();

    let file_size = raw_size
        .trim()
        .parse::<u64>()
        .map_err(|_| MetadataError::InvalidFilesize(raw_size.clone()))?;

    let sender = header_text(headers, HEADER_DEVICE).filter(|s| !s.trim().is_empty());

    Ok(TransferMetadata {
        filename,
        file_size,
        sender,
    })
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Last path component, with both `/` and `\` treated as separators.
/// `None` for names that would resolve outside a plain file (`""`, `.`, `..`).
pub fn base_name(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    match base {
        "" | "." | ".." => None,
        base => Some(base),
    }
}

pub fn encode_filename(name: &str) -> String {
    utf8_percent_encode(name, FILENAME_ESCAPES).to_string()
}

pub fn decode_filename(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// `X-Device` value: registered name plus best-guess LAN address.
pub fn sender_descriptor(display_name: &str) -> String {
    format!("{} ({})", display_name, discovery::local_ip())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn strips_directories() {
        assert_eq!(base_name("a/b/report.txt"), Some("report.txt"));
        assert_eq!(base_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(base_name(r"C:\Users\me\photo.png"), Some("photo.png"));
        assert_eq!(base_name("/abs/path/x"), Some("x"));
        assert_eq!(base_name("plain"), Some("plain"));
    }

    #[test]
    fn rejects_empty_base_names() {
        for name in ["", "dir/", "..", "a/..", ".", "/"] {
            assert_eq!(base_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn metadata_roundtrips_through_headers() {
        let encoded = encode_filename("a/b/résumé 2024.pdf");
        let map = headers(&[
            ("x-filename", encoded.as_str()),
            ("x-filesize", "2048"),
            ("x-device", "den (10.0.0.2)"),
        ]);

        let metadata = metadata_from_headers(&map).unwrap();
        assert_eq!(metadata.filename, "résumé 2024.pdf");
        assert_eq!(metadata.file_size, 2048);
        assert_eq!(metadata.sender.as_deref(), Some("den (10.0.0.2)"));
    }

    #[test]
    fn plain_ascii_names_need_no_encoding() {
        let map = headers(&[("x-filename", "notes.txt"), ("x-filesize", "5")]);
        assert_eq!(metadata_from_headers(&map).unwrap().filename, "notes.txt");
    }

    #[test]
    fn missing_fields_are_reported() {
        let only_size = headers(&[("x-filesize", "10")]);
        assert_eq!(
            metadata_from_headers(&only_size),
            Err(MetadataError::MissingFilename)
        );

        let only_name = headers(&[("x-filename", "a.txt")]);
        assert_eq!(
            metadata_from_headers(&only_name),
            Err(MetadataError::MissingFilesize)
        );
    }

    #[test]
    fn size_must_be_decimal() {
        let map = headers(&[("x-filename", "a.txt"), ("x-filesize", "-3")]);
        assert_eq!(
            metadata_from_headers(&map),
            Err(MetadataError::InvalidFilesize("-3".into()))
        );
    }

    #[test]
    fn blank_sender_is_absent() {
        let map = headers(&[("x-filename", "a"), ("x-filesize", "1"), ("x-device", " ")]);
        assert_eq!(metadata_from_headers(&map).unwrap().sender, None);
    }

    #[test]
    fn statuses_are_distinct() {
        let codes = [STATUS_SAVED, STATUS_BAD_REQUEST, STATUS_REJECTED, STATUS_NOT_SAVED];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
