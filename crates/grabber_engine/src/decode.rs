use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_warn;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> meta charset -> chardetng fallback.
///
/// Malformed sequences become U+FFFD; the page is still returned.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    if let Some(enc) = sniff_meta_charset(bytes) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    Encoding::for_label(label.as_bytes())
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedHtml {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        engine_warn!("malformed {} bytes replaced while decoding page", enc.name());
    }
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: enc.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_html;

    #[test]
    fn header_charset_beats_detection() {
        let bytes = b"<p>caf\xe9</p>";
        let decoded = decode_html(bytes, Some("text/html; charset=ISO-8859-1"));
        assert_eq!(decoded.html, "<p>caf\u{e9}</p>");
        assert_eq!(decoded.encoding_label, "windows-1252");
    }

    #[test]
    fn meta_charset_is_used_without_header() {
        let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>\xe9</body></html>";
        let decoded = decode_html(bytes, Some("text/html"));
        assert!(decoded.html.contains('\u{e9}'));
    }

    #[test]
    fn malformed_bytes_are_replaced_not_rejected() {
        let decoded = decode_html(b"<p>ok\xffok</p>", Some("text/html; charset=utf-8"));
        assert_eq!(decoded.html, "<p>ok\u{fffd}ok</p>");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn utf8_bom_wins() {
        let decoded = decode_html(b"\xef\xbb\xbfhello", Some("text/html; charset=latin1"));
        assert_eq!(decoded.html, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }
}
