use crate::sanitizer::{encode, normalize_email, sanitize, EncodingContext, SanitizationLevel};

#[test]
fn test_basic_level_trims_only() {
    assert_eq!(
        sanitize("  <b>hello</b>  ", SanitizationLevel::Basic),
        "<b>hello</b>"
    );
}

#[test]
fn test_script_tag_removed() {
    let out = sanitize("<script>alert(1)</script>", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("<script"));
    assert!(!out.to_lowercase().contains("alert("));
}

#[test]
fn test_entity_encoded_script_removed() {
    let out = sanitize("&#60;script&#62;", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("<script"));

    let out = sanitize("&#x3C;script&#x3E;alert(1)", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("<script"));
    assert!(!out.to_lowercase().contains("alert("));
}

#[test]
fn test_double_encoded_script_removed() {
    // &amp;lt;... decodes to &lt;... and then to <script> across passes
    let out = sanitize("&amp;lt;script&amp;gt;", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("<script"));
}

#[test]
fn test_event_handler_removed() {
    let out = sanitize("<img onerror=alert(1) src=x>", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("onerror="));
    assert!(!out.to_lowercase().contains("alert("));
}

#[test]
fn test_uri_schemes_removed() {
    let out = sanitize("click javascript:alert(1)", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("javascript:"));

    let out = sanitize("DATA:text/html;base64,xyz", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("data:"));
}

#[test]
fn test_fragment_reassembly_does_not_survive() {
    // Removing the inner "<script" would reassemble a second one; the
    // fixpoint pass has to catch it too.
    let out = sanitize("<sc<scriptript>alert(1)", SanitizationLevel::Standard);
    assert!(!out.to_lowercase().contains("<script"));
    assert!(!out.to_lowercase().contains("alert("));
}

#[test]
fn test_null_bytes_and_controls_stripped() {
    let out = sanitize("he\0llo\u{1}world", SanitizationLevel::Standard);
    assert_eq!(out, "helloworld");
}

#[test]
fn test_whitespace_collapsed() {
    let out = sanitize("hello\t\t there \n\n friend", SanitizationLevel::Standard);
    assert_eq!(out, "hello there friend");
}

#[test]
fn test_strict_removes_forbidden_characters() {
    let out = sanitize("a<b>{c}[d]|e\\f^g`h\"i'j", SanitizationLevel::Strict);
    for c in ['<', '>', '{', '}', '[', ']', '|', '\\', '^', '`', '"', '\''] {
        assert!(!out.contains(c), "forbidden char {:?} survived: {}", c, out);
    }
    assert_eq!(out, "abcdefghij");
}

#[test]
fn test_strict_catches_quote_split_scheme() {
    // Deleting the quote joins "java" and "script:" back together
    let out = sanitize("java\"script:alert(1)", SanitizationLevel::Strict);
    assert!(!out.to_lowercase().contains("javascript:"));
    assert!(!out.to_lowercase().contains("alert("));
}

#[test]
fn test_idempotence_across_levels() {
    let inputs = [
        "",
        "plain text with nothing special",
        "<script>alert(1)</script>",
        "&#60;script&#62;&amp;lt;b&amp;gt;",
        "<sc<scriptript>ipt>",
        "hello\t \nworld &nbsp; again",
        "java\"script:eval(document.cookie)",
        "onclick= onload= <svg><math>",
        "&amp;&amp;&amp;#38;",
    ];
    let levels = [
        SanitizationLevel::Basic,
        SanitizationLevel::Standard,
        SanitizationLevel::Strict,
    ];
    for input in inputs {
        for level in levels {
            let once = sanitize(input, level);
            let twice = sanitize(&once, level);
            assert_eq!(once, twice, "not idempotent for {:?} at {:?}", input, level);
        }
    }
}

#[test]
fn test_empty_input_yields_empty_output() {
    assert_eq!(sanitize("", SanitizationLevel::Standard), "");
    assert_eq!(sanitize("   ", SanitizationLevel::Strict), "");
}

#[test]
fn test_html_encode_neutralizes_markup() {
    let out = encode("<img onerror=alert(1)>", EncodingContext::Html);
    assert!(!out.contains('<'));
    assert!(!out.contains('>'));
    assert!(out.contains("&lt;"));
    assert!(out.contains("&gt;"));
}

#[test]
fn test_html_encode_ampersand_first() {
    // A pre-encoded entity gets its ampersand re-encoded, never skipped
    assert_eq!(encode("&lt;", EncodingContext::Html), "&amp;lt;");
}

#[test]
fn test_attribute_encode_covers_whitespace() {
    let out = encode("a b\nc", EncodingContext::HtmlAttribute);
    assert_eq!(out, "a&#x20;b&#x0A;c");
}

#[test]
fn test_js_string_encode_escapes_breakouts() {
    let out = encode("'; alert(1) </script>", EncodingContext::JavaScriptString);
    assert!(!out.contains('<'));
    assert!(!out.contains('>'));
    assert!(out.starts_with("\\'"));
}

#[test]
fn test_url_query_encode() {
    assert_eq!(
        encode("a b&c=d", EncodingContext::UrlQuery),
        "a%20b%26c%3Dd"
    );
    assert_eq!(encode("safe-chars_0.~", EncodingContext::UrlQuery), "safe-chars_0.~");
}

#[test]
fn test_encoding_never_removes_characters() {
    let input = "<>&\"' /\n\tplain";
    for context in [
        EncodingContext::Html,
        EncodingContext::HtmlAttribute,
        EncodingContext::JavaScriptString,
        EncodingContext::UrlQuery,
    ] {
        let out = encode(input, context);
        assert!(
            out.chars().count() >= input.chars().count(),
            "{:?} shrank the input",
            context
        );
    }
}

#[test]
fn test_normalize_email() {
    assert_eq!(normalize_email("  Alice@Example.COM  "), "alice@example.com");
}
