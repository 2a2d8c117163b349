// Named attribute extractors over a single located <iframe ...> tag.
//
// These are pattern matches over the tag text, not a markup parser: no
// knowledge of nesting, comments or malformed input beyond what the patterns
// happen to tolerate.

use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

fn iframe_tag_regex() -> &'static Regex {
    static IFRAME_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    IFRAME_TAG_REGEX.get_or_init(|| Regex::new(r"(?i)<iframe[^>]*>").unwrap())
}

fn src_regex() -> &'static Regex {
    static SRC_REGEX: OnceLock<Regex> = OnceLock::new();
    SRC_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)src=\{`([^`]*)`\}|src="([^"]*)"|src='([^']*)'"#).unwrap()
    })
}

fn sandbox_regex() -> &'static Regex {
    static SANDBOX_REGEX: OnceLock<Regex> = OnceLock::new();
    SANDBOX_REGEX.get_or_init(|| Regex::new(r#"(?i)sandbox=["']([^"']*?)["']"#).unwrap())
}

fn allow_regex() -> &'static Regex {
    static ALLOW_REGEX: OnceLock<Regex> = OnceLock::new();
    // Anchored on whitespace so `data-allow=` doesn't count.
    ALLOW_REGEX.get_or_init(|| Regex::new(r#"(?i)(?:^|\s)allow=["']([^"']*?)["']"#).unwrap())
}

/// The first opening `<iframe ...>` tag in `text`, up to its first `>`.
pub fn locate_iframe_tag(text: &str) -> Option<&str> {
    iframe_tag_regex().find(text).map(|m| m.as_str())
}

/// The `src` value, preferring the JSX template-literal form
/// (``src={`...`}``) over a quoted literal.
pub fn extract_src(tag: &str) -> Option<String> {
    let caps = src_regex().captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

/// Value of `name` written either as a quoted literal (`"`, `'` or a
/// backtick) or as a JSX expression in braces.
///
/// Brace values have their braces and quote characters stripped, so
/// `width={450}` and `width={"450"}` both read as `450`. Empty values count
/// as absent.
pub fn extract_attribute(tag: &str, name: &str) -> Result<Option<String>> {
    // Built per call so a bad attribute name surfaces as an extraction error
    let name = regex::escape(name);
    let pattern = format!(r#"(?i){name}=["'`]([^"'`]*?)["'`]|{name}=\{{[^}}]*\}}"#);
    let re = Regex::new(&pattern)?;

    let Some(caps) = re.captures(tag) else {
        return Ok(None);
    };

    let value = match caps.get(1) {
        Some(quoted) if !quoted.as_str().is_empty() => quoted.as_str().to_string(),
        _ => {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let after_eq = whole.split_once('=').map(|(_, v)| v).unwrap_or_default();
            after_eq
                .chars()
                .filter(|c| !matches!(c, '{' | '}' | '\'' | '"'))
                .collect()
        }
    };

    Ok(if value.is_empty() { None } else { Some(value) })
}

/// Whether the bare `allowfullscreen` token appears anywhere in the tag.
pub fn has_allowfullscreen(tag: &str) -> bool {
    tag.contains("allowfullscreen")
}

/// Space-separated tokens of a quoted `sandbox` attribute, if present.
pub fn extract_sandbox_tokens(tag: &str) -> Option<Vec<String>> {
    let caps = sandbox_regex().captures(tag)?;
    Some(
        caps[1]
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Semicolon-separated features of a quoted `allow` attribute, if present.
pub fn extract_allow_tokens(tag: &str) -> Option<Vec<String>> {
    let caps = allow_regex().captures(tag)?;
    Some(
        caps[1]
            .split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Read the leading integer of `value` the way JavaScript's `parseInt` does:
/// optional whitespace and sign, then digits, ignoring whatever follows.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as i64)
    });
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_tag() {
        let text = r#"<div class="wrap"><iframe src="a.html" width="10"></iframe><iframe src="b.html"></iframe></div>"#;
        assert_eq!(
            locate_iframe_tag(text),
            Some(r#"<iframe src="a.html" width="10">"#)
        );
    }

    #[test]
    fn test_locate_is_case_insensitive() {
        assert!(locate_iframe_tag("<IFRAME SRC='x'>").is_some());
        assert!(locate_iframe_tag("<div>no frames here</div>").is_none());
    }

    #[test]
    fn test_extract_src_template_literal() {
        let tag = "<iframe src={`https://example.com/?key=${apiKey}`} width=\"450\" />";
        assert_eq!(
            extract_src(tag).as_deref(),
            Some("https://example.com/?key=${apiKey}")
        );
    }

    #[test]
    fn test_extract_src_quoted() {
        assert_eq!(
            extract_src(r#"<iframe src="https://a.example" >"#).as_deref(),
            Some("https://a.example")
        );
        assert_eq!(
            extract_src("<iframe src='https://b.example' >").as_deref(),
            Some("https://b.example")
        );
        assert_eq!(extract_src("<iframe width=\"1\">"), None);
    }

    #[test]
    fn test_extract_src_keeps_other_quote_kind() {
        assert_eq!(
            extract_src(r#"<iframe src="https://example.com/?q=it's" width="1">"#).as_deref(),
            Some("https://example.com/?q=it's")
        );
        assert_eq!(
            extract_src(r#"<iframe src='https://example.com/?q="x"'>"#).as_deref(),
            Some(r#"https://example.com/?q="x""#)
        );
    }

    #[test]
    fn test_extract_attribute_forms() {
        let tag = r#"<iframe width="450" height={790} scrolling={"no"} loading='lazy' frameborder=`1`>"#;
        assert_eq!(extract_attribute(tag, "width").unwrap().as_deref(), Some("450"));
        assert_eq!(extract_attribute(tag, "height").unwrap().as_deref(), Some("790"));
        assert_eq!(extract_attribute(tag, "scrolling").unwrap().as_deref(), Some("no"));
        assert_eq!(extract_attribute(tag, "loading").unwrap().as_deref(), Some("lazy"));
        assert_eq!(extract_attribute(tag, "frameborder").unwrap().as_deref(), Some("1"));
        assert_eq!(extract_attribute(tag, "referrerpolicy").unwrap(), None);
    }

    #[test]
    fn test_extract_attribute_empty_is_absent() {
        assert_eq!(extract_attribute(r#"<iframe width="">"#, "width").unwrap(), None);
        assert_eq!(extract_attribute("<iframe width={}>", "width").unwrap(), None);
    }

    #[test]
    fn test_allowfullscreen_presence() {
        assert!(has_allowfullscreen("<iframe src='x' allowfullscreen>"));
        assert!(!has_allowfullscreen("<iframe src='x'>"));
    }

    #[test]
    fn test_sandbox_tokens() {
        let tag = r#"<iframe sandbox="allow-scripts  allow-modals allow-forms">"#;
        assert_eq!(
            extract_sandbox_tokens(tag),
            Some(vec![
                "allow-scripts".to_string(),
                "allow-modals".to_string(),
                "allow-forms".to_string()
            ])
        );
        assert_eq!(extract_sandbox_tokens("<iframe>"), None);
        assert_eq!(extract_sandbox_tokens(r#"<iframe sandbox="">"#), Some(vec![]));
    }

    #[test]
    fn test_allow_tokens_ignore_allowfullscreen_and_sandbox() {
        let tag = r#"<iframe allowfullscreen sandbox="allow-scripts" allow="camera; payment">"#;
        assert_eq!(
            extract_allow_tokens(tag),
            Some(vec!["camera".to_string(), "payment".to_string()])
        );
        assert_eq!(
            extract_allow_tokens(r#"<iframe allowfullscreen sandbox="allow-scripts">"#),
            None
        );
        assert_eq!(extract_allow_tokens(r#"<iframe data-allow="camera">"#), None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("450"), Some(450));
        assert_eq!(parse_leading_int("450px"), Some(450));
        assert_eq!(parse_leading_int("  -20"), Some(-20));
        assert_eq!(parse_leading_int("100%"), Some(100));
        assert_eq!(parse_leading_int("auto"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }
}
