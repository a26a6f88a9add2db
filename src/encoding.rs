//! Charset sniffing for raw page bytes.
//!
//! A byte order mark wins; otherwise the first `<meta>` charset declaration
//! within the first 1024 bytes; otherwise UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::META_CHARSET;

/// How far into the document a `<meta>` declaration is looked for.
const SNIFF_LIMIT: usize = 1024;

/// Detect the encoding of `bytes`, with the length of any byte order mark.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len);
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LIMIT)]);
    let declared = META_CHARSET
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()));

    match declared {
        // A page that made it into UTF-16 without a BOM is mislabelled
        Some(encoding) if encoding.output_encoding() == UTF_8 && encoding != UTF_8 => (UTF_8, 0),
        Some(encoding) => (encoding, 0),
        None => (UTF_8, 0),
    }
}

/// Decode page bytes to a string. Malformed sequences become U+FFFD.
#[must_use]
pub fn decode_html(bytes: &[u8]) -> String {
    let (encoding, bom_len) = sniff_encoding(bytes);
    let body = &bytes[bom_len..];
    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        log::debug!(target: "talkpage.encoding", "malformed {} input replaced", encoding.name());
    }
    decoded.into_owned()
}
