use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Built once, shared by every part rewritten during a merge
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// LeftmostLongest so that "&amp;lt;" decodes to "&lt;" and not "<"
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape a value for use inside a double-quoted XML attribute.
///
/// Identifiers such as style IDs and relationship IDs almost never contain
/// markup characters, so the common case returns the input borrowed.
///
/// # Examples
///
/// ```
/// use docx_merge::common::xml::escape_xml;
/// assert_eq!(escape_xml("Heading1_0"), "Heading1_0");
/// assert_eq!(escape_xml("Q&A"), "Q&amp;A");
/// assert_eq!(escape_xml("<\"x\">"), "&lt;&quot;x&quot;&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]))
}

/// Decode the five predefined XML entities in an attribute value.
///
/// Numeric character references and unknown entities are left unchanged.
///
/// # Examples
///
/// ```
/// use docx_merge::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("media/a&amp;b.png"), "media/a&b.png");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("rId7"), "rId7");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]))
}
