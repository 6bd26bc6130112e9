//! Charset handling for fetched HTML
//!
//! The persister always writes the raw bytes; only the extractors need a
//! decoded string. Decoding follows: BOM, then the charset declared in the
//! Content-Type header, then UTF-8.

use encoding_rs::Encoding;

/// Decodes raw page bytes for HTML parsing.
///
/// Undecodable sequences are replaced rather than treated as an error; a
/// partially garbled page still yields whatever rows and links survive.
pub fn decode_html(bytes: &[u8], content_type: &str) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    let encoding = charset(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Extracts the charset parameter from a Content-Type header value.
fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|value| value.trim_matches(['"', '\'', ' '].as_ref()))
    })
}
