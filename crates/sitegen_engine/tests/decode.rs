use pretty_assertions::assert_eq;
use sitegen_engine::decode_text;

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_text(bytes, Some("text/html; charset=ISO-8859-1"));
    assert_eq!(decoded.text, "café");
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_handles_utf8_bom_and_drops_it() {
    let bytes = b"\xEF\xBB\xBF<p>hello</p>";
    let decoded = decode_text(bytes, Some("text/html"));
    assert_eq!(decoded.text, "<p>hello</p>");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn plain_utf8_without_header_is_detected() {
    let decoded = decode_text("<p>naïve ünïcode</p>".as_bytes(), None);
    assert_eq!(decoded.text, "<p>naïve ünïcode</p>");
}

#[test]
fn malformed_utf8_is_replaced_not_rejected() {
    let decoded = decode_text(b"ok \xff bad", Some("text/html; charset=utf-8"));
    assert!(decoded.had_errors);
    assert_eq!(decoded.text, "ok \u{FFFD} bad");
    assert_eq!(decoded.encoding_label, "UTF-8");
}
