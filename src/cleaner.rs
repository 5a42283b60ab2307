use regex::bytes::Regex;
use std::sync::LazyLock;

// Unicode is switched off so `.` matches any single byte except `\n`;
// filings are not guaranteed to be valid UTF-8.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)<.*?>").expect("tag pattern compiles"));

static TAG_WITH_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)<.*?\n.*?>").expect("multi-line tag pattern compiles"));

static NBSP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)&nbsp;").expect("nbsp pattern compiles"));

/// Replace every markup tag with a single space.
///
/// Single-line tags go first; a second pass catches tags whose span
/// crosses one line break. Nested or malformed markup is not handled.
pub fn detag(text: &[u8]) -> Vec<u8> {
    let text = TAG.replace_all(text, &b" "[..]);
    TAG_WITH_NEWLINE.replace_all(&text, &b" "[..]).into_owned()
}

/// Replace literal `&nbsp;` escapes with a space.
pub fn remove_bad_chars(text: &[u8]) -> Vec<u8> {
    NBSP.replace_all(text, &b" "[..]).into_owned()
}

/// Full cleaning pass applied to a downloaded filing.
pub fn clean_filing(raw: &[u8]) -> Vec<u8> {
    remove_bad_chars(&detag(raw))
}
