//! Text sanitization and output encoding

use serde::{Deserialize, Serialize};

/// How aggressively input text is transformed before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizationLevel {
    /// Trim surrounding whitespace only
    Basic,
    /// Full attack-pattern removal pipeline
    Standard,
    /// Standard plus forbidden-character deletion
    Strict,
}

/// Rendering context for output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingContext {
    Html,
    HtmlAttribute,
    JavaScriptString,
    UrlQuery,
}

/// Dangerous tag fragments, opening and closing forms. Matching is
/// case-insensitive substring removal, not HTML parsing.
const TAG_FRAGMENTS: &[&str] = &[
    // Script/execution vectors
    "<script", "</script", "<iframe", "</iframe", "<object", "</object", "<embed", "</embed",
    "<applet", "</applet", "<noscript", "</noscript", "<template", "</template",
    // SVG/MathML vectors
    "<svg", "</svg", "<math", "</math", "<foreignobject", "</foreignobject", "<use", "</use",
    // Media tags
    "<audio", "</audio", "<video", "</video", "<source", "<track", "<img", "<image", "<picture",
    "</picture",
    // Form/input tags
    "<form", "</form", "<input", "<textarea", "</textarea", "<select", "</select", "<option",
    "</option", "<button", "</button", "<keygen", "<isindex",
    // Head/structural tags
    "<link", "<meta", "<base", "<style", "</style", "<html", "</html", "<head", "</head",
    "<body", "</body", "<frameset", "</frameset", "<frame", "</frame", "<marquee", "</marquee",
    "<xmp", "</xmp", "<plaintext", "<listing", "</listing",
];

/// Inline event-handler attribute names.
const EVENT_HANDLERS: &[&str] = &[
    "onabort=", "onauxclick=", "onbeforeinput=", "onblur=", "oncanplay=", "oncanplaythrough=",
    "onchange=", "onclick=", "onclose=", "oncontextmenu=", "oncopy=", "oncut=", "ondblclick=",
    "ondrag=", "ondragend=", "ondragenter=", "ondragleave=", "ondragover=", "ondragstart=",
    "ondrop=", "ondurationchange=", "onended=", "onerror=", "onfocus=", "onfocusin=",
    "onfocusout=", "onhashchange=", "oninput=", "oninvalid=", "onkeydown=", "onkeypress=",
    "onkeyup=", "onload=", "onloadeddata=", "onloadedmetadata=", "onloadstart=", "onmessage=",
    "onmousedown=", "onmouseenter=", "onmouseleave=", "onmousemove=", "onmouseout=",
    "onmouseover=", "onmouseup=", "onmousewheel=", "onpaste=", "onpause=", "onplay=",
    "onplaying=", "onpointerdown=", "onpointerup=", "onprogress=", "onreset=", "onresize=",
    "onscroll=", "onseeked=", "onseeking=", "onselect=", "onsubmit=", "ontimeupdate=",
    "ontoggle=", "ontouchend=", "ontouchmove=", "ontouchstart=", "ontransitionend=",
    "onunload=", "onvolumechange=", "onwheel=",
];

/// Executable URI schemes.
const URI_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Residual attack substrings left behind after tag removal.
const RESIDUAL_PATTERNS: &[&str] = &[
    "eval(", "alert(", "prompt(", "confirm(", "settimeout(", "setinterval(", "function(",
    "expression(", "fromcharcode", "document.", "window.", "innerhtml", "outerhtml",
    "&#", "\\x", "\\u", "<!--", "-->", "<![cdata[", "]]>", "base64,",
];

/// Characters deleted outright at Strict level.
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', '{', '}', '[', ']', '|', '\\', '^', '`', '"', '\'',
];

/// Named HTML entities decoded before pattern removal. Matching is
/// case-insensitive to catch `&AMP;`-style variants.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&sol;", "/"),
    ("&colon;", ":"),
    ("&equals;", "="),
    ("&grave;", "`"),
    ("&lpar;", "("),
    ("&rpar;", ")"),
    ("&semi;", ";"),
    ("&comma;", ","),
    ("&period;", "."),
];

/// Sanitize free-form text at the given level. Pure and infallible: malformed
/// or empty input yields empty or passthrough output, never an error.
pub fn sanitize(text: &str, level: SanitizationLevel) -> String {
    match level {
        SanitizationLevel::Basic => text.trim().to_string(),
        SanitizationLevel::Standard => {
            let s = preprocess(text);
            collapse_whitespace(&strip_to_fixpoint(s))
        }
        SanitizationLevel::Strict => {
            let mut s = strip_to_fixpoint(preprocess(text));
            // Character deletion can join fragments back into a removable
            // pattern (`<scr|ipt`), so alternate with the pattern pass until
            // both are stable.
            loop {
                let removed: String = s.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
                if removed == s {
                    break;
                }
                s = strip_to_fixpoint(removed);
            }
            collapse_whitespace(&s)
        }
    }
}

/// Encode text for safe embedding in the given rendering context. Encoders
/// only transform characters, they never remove them; they are independent of
/// `sanitize` and applied at render time.
pub fn encode(text: &str, context: EncodingContext) -> String {
    match context {
        EncodingContext::Html => html_encode(text),
        EncodingContext::HtmlAttribute => attribute_encode(text),
        EncodingContext::JavaScriptString => js_string_encode(text),
        EncodingContext::UrlQuery => url_query_encode(text),
    }
}

/// Lowercase-trim normalizer for email fields.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Steps 1-3: trim, strip control characters, collapse whitespace runs.
fn preprocess(text: &str) -> String {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || !c.is_control())
        .collect();
    collapse_whitespace(&stripped)
}

/// Steps 4-8 iterated until stable. Entity decoding reveals encoded attacks
/// for the removal layers; removal can in turn expose a new entity or
/// reassemble a fragment, so the pair loops until neither changes the text.
/// Every productive iteration strictly shrinks the string, so this
/// terminates.
fn strip_to_fixpoint(mut s: String) -> String {
    loop {
        let mut next = decode_html_entities(&s);
        for needle in TAG_FRAGMENTS {
            next = remove_case_insensitive(&next, needle);
        }
        for needle in EVENT_HANDLERS {
            next = remove_case_insensitive(&next, needle);
        }
        for needle in URI_SCHEMES {
            next = remove_case_insensitive(&next, needle);
        }
        for needle in RESIDUAL_PATTERNS {
            next = remove_case_insensitive(&next, needle);
        }
        if next == s {
            return s;
        }
        s = next;
    }
}

/// Collapse any whitespace run to a single space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Remove every occurrence of `needle` (ASCII case-insensitive). The ASCII
/// lowercase keeps byte offsets aligned with the original; the needles are
/// all ASCII.
fn remove_case_insensitive(haystack: &str, needle: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    if !lower.contains(&needle) {
        return haystack.to_string();
    }
    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(found) = lower[pos..].find(&needle) {
        let start = pos + found;
        out.push_str(&haystack[pos..start]);
        pos = start + needle.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

/// Decode named and numeric (decimal and hex) entities in a single pass.
/// Decoded control characters are dropped rather than reintroduced, since the
/// control-strip layer has already run.
fn decode_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_entity(rest) {
            Some((decoded, consumed)) => {
                if let Some(c) = decoded {
                    out.push(c);
                }
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Try to decode one entity at the start of `s`. Returns the replacement
/// character (None for dropped control codepoints) and the byte length
/// consumed.
fn decode_entity(s: &str) -> Option<(Option<char>, usize)> {
    if let Some(num) = s.strip_prefix("&#") {
        let (digits, radix) = match num.strip_prefix(['x', 'X'].as_slice()) {
            Some(hex) => (hex, 16),
            None => (num, 10),
        };
        let len = digits
            .chars()
            .take_while(|c| c.is_digit(radix))
            .count();
        if len == 0 || len > 8 || !digits[len..].starts_with(';') {
            return None;
        }
        let value = u32::from_str_radix(&digits[..len], radix).ok()?;
        let consumed = s.len() - digits.len() + len + 1;
        return Some((decoded_char(value), consumed));
    }
    for (name, replacement) in NAMED_ENTITIES {
        // Byte-level compare: a multibyte char after the `&` must not split
        // a str slice.
        if s.len() >= name.len() && s.as_bytes()[..name.len()].eq_ignore_ascii_case(name.as_bytes())
        {
            return Some((replacement.chars().next(), name.len()));
        }
    }
    None
}

fn decoded_char(value: u32) -> Option<char> {
    match value {
        9 | 10 | 13 => Some(' '),
        0..=31 | 127 => None,
        _ => char::from_u32(value),
    }
}

fn html_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

fn attribute_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            ' ' => out.push_str("&#x20;"),
            '\n' => out.push_str("&#x0A;"),
            '\r' => out.push_str("&#x0D;"),
            '\t' => out.push_str("&#x09;"),
            _ => out.push(c),
        }
    }
    out
}

fn js_string_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\x3C"),
            '>' => out.push_str("\\x3E"),
            '&' => out.push_str("\\x26"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02X}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

fn url_query_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
