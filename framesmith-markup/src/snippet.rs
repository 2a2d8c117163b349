use crate::config::{
    Configuration, DEFAULT_HEIGHT, DEFAULT_WIDTH, FrameBorder, Loading, Permission,
    PermissionFlags, ReferrerPolicy, SandboxFlag, SandboxFlags, Scrolling,
};
use crate::error::{MarkupError, Result};
use crate::extract::{
    extract_allow_tokens, extract_attribute, extract_sandbox_tokens, extract_src,
    has_allowfullscreen, locate_iframe_tag, parse_leading_int,
};
use crate::vars::VariableMap;
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Outcome of a successful snippet parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSnippet {
    /// The base configuration with everything found in the tag applied.
    pub configuration: Configuration,
    pub variables: VariableMap,
    /// The pasted text, verbatim.
    pub source: String,
    /// The text wraps the frame in a `<div`, so it should be previewed as a
    /// whole component rather than as a bare iframe.
    pub has_wrapper: bool,
}

/// Parse pasted HTML or JSX containing an iframe into a configuration.
///
/// Fields the tag doesn't mention keep their values from `base`. Width and
/// height are the exception: they fall back to 800×600 when missing or not
/// numeric.
pub fn parse_snippet(text: &str, base: &Configuration) -> Result<ParsedSnippet> {
    if text.trim().is_empty() {
        return Err(MarkupError::EmptySnippet);
    }

    let tag = locate_iframe_tag(text).ok_or(MarkupError::NoIframeFound)?;
    debug!("Located iframe tag: {}", tag);

    let (configuration, mut variables) =
        apply_tag(tag, base).inspect_err(|e| warn!("Snippet extraction failed: {:?}", e))?;

    // Placeholders outside the src only matter for component rendering, but
    // they need a slot in the map all the same.
    variables.discover_from(text);

    let has_wrapper = text.contains("<div");
    info!(
        "Parsed snippet: {}x{}, {} variable(s), wrapper: {}",
        configuration.width(),
        configuration.height(),
        variables.len(),
        has_wrapper
    );

    Ok(ParsedSnippet {
        configuration,
        variables,
        source: text.to_string(),
        has_wrapper,
    })
}

fn apply_tag(tag: &str, base: &Configuration) -> Result<(Configuration, VariableMap)> {
    let mut config = base.clone();

    let src = extract_src(tag).unwrap_or_default();
    let variables = VariableMap::discover(&src);
    config.set_url(src);

    let width = dimension(extract_attribute(tag, "width")?, DEFAULT_WIDTH);
    let height = dimension(extract_attribute(tag, "height")?, DEFAULT_HEIGHT);
    config.set_size(width, height);

    if let Some(border) = recognized::<FrameBorder>(extract_attribute(tag, "frameborder")?) {
        config.set_border(border);
    }
    if let Some(scrolling) = recognized::<Scrolling>(extract_attribute(tag, "scrolling")?) {
        config.set_scrolling(scrolling);
    }
    if let Some(loading) = recognized::<Loading>(extract_attribute(tag, "loading")?) {
        config.set_loading(loading);
    }
    if let Some(policy) = recognized::<ReferrerPolicy>(extract_attribute(tag, "referrerpolicy")?)
    {
        config.set_referrer_policy(policy);
    }

    if has_allowfullscreen(tag) {
        config.set_fullscreen(true);
    }

    if let Some(tokens) = extract_sandbox_tokens(tag) {
        let mut flags = SandboxFlags::default();
        for token in &tokens {
            match SandboxFlag::from_token(token) {
                Some(flag) => flags.set(flag, true),
                None => debug!("Ignoring unrecognized sandbox token: {}", token),
            }
        }
        config.set_sandbox_flags(flags);
    }

    if let Some(tokens) = extract_allow_tokens(tag) {
        let mut flags = PermissionFlags::default();
        for token in &tokens {
            match Permission::from_token(token) {
                Some(permission) => flags.set(permission, true),
                None => debug!("Ignoring unrecognized allow feature: {}", token),
            }
        }
        config.set_permission_flags(flags);
    }

    Ok((config, variables))
}

/// A dimension read like `parseInt(value) || fallback`.
fn dimension(value: Option<String>, fallback: u32) -> i64 {
    value
        .as_deref()
        .and_then(parse_leading_int)
        .filter(|n| *n != 0)
        .unwrap_or(fallback as i64)
}

fn recognized<T: FromStr>(value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!("Ignoring unrecognized attribute value: {}", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_iframe;

    #[test]
    fn test_jsx_template_literal_snippet() {
        let text = "<iframe src={`https://example.com/?key=${apiKey}`} width=\"450\" height=\"790\" />";
        let parsed = parse_snippet(text, &Configuration::default()).unwrap();

        assert!(parsed.configuration.url().contains("${apiKey}"));
        assert_eq!(parsed.configuration.width(), 450);
        assert_eq!(parsed.configuration.height(), 790);
        assert_eq!(parsed.variables.len(), 1);
        assert_eq!(parsed.variables.get("apiKey"), Some(""));
        assert!(!parsed.has_wrapper);
        assert_eq!(parsed.source, text);
    }

    #[test]
    fn test_empty_snippet() {
        assert_eq!(
            parse_snippet("   \n", &Configuration::default()),
            Err(MarkupError::EmptySnippet)
        );
    }

    #[test]
    fn test_no_iframe() {
        assert_eq!(
            parse_snippet("<div><img src=\"a.png\"></div>", &Configuration::default()),
            Err(MarkupError::NoIframeFound)
        );
    }

    #[test]
    fn test_dimension_fallbacks() {
        let parsed = parse_snippet(
            r#"<iframe src="https://example.com" width="auto" height="0">"#,
            &Configuration::default(),
        )
        .unwrap();
        assert_eq!(parsed.configuration.width(), 800);
        assert_eq!(parsed.configuration.height(), 600);

        let parsed = parse_snippet(
            r#"<iframe src="https://example.com" width="100%" height="9000">"#,
            &Configuration::default(),
        )
        .unwrap();
        assert_eq!(parsed.configuration.width(), 100);
        assert_eq!(parsed.configuration.height(), 2000);
    }

    #[test]
    fn test_unmentioned_fields_keep_base_values() {
        let mut base = Configuration::default();
        base.set_scrolling(Scrolling::No);
        base.set_fullscreen(true);
        base.set_sandbox(SandboxFlag::Popups, true);

        let parsed =
            parse_snippet(r#"<iframe src="https://example.com" loading="lazy">"#, &base).unwrap();
        let config = parsed.configuration;
        assert_eq!(config.scrolling(), Scrolling::No);
        assert!(config.fullscreen_allowed());
        assert!(config.sandbox().popups);
        assert_eq!(config.loading(), Loading::Lazy);
    }

    #[test]
    fn test_sandbox_resets_before_applying_tokens() {
        let mut base = Configuration::default();
        base.set_sandbox(SandboxFlag::Popups, true);

        let parsed = parse_snippet(
            r#"<iframe src="https://example.com" sandbox="allow-forms allow-downloads">"#,
            &base,
        )
        .unwrap();
        let sandbox = parsed.configuration.sandbox();
        assert!(!sandbox.popups);
        assert!(sandbox.forms);
        assert_eq!(sandbox.tokens(), vec!["allow-forms"]);
    }

    #[test]
    fn test_unrecognized_values_are_ignored() {
        let parsed = parse_snippet(
            r#"<iframe src="https://example.com" scrolling="sometimes" frameborder="3">"#,
            &Configuration::default(),
        )
        .unwrap();
        assert_eq!(parsed.configuration.scrolling(), Scrolling::Auto);
        assert_eq!(parsed.configuration.border(), FrameBorder::Hidden);
    }

    #[test]
    fn test_wrapper_detection_and_component_variables() {
        let text = r#"<div className="card" data-user="${userId}">
  <iframe src={`https://example.com/embed?key=${apiKey}`} width={640} height={480} allowfullscreen></iframe>
</div>"#;
        let parsed = parse_snippet(text, &Configuration::default()).unwrap();
        assert!(parsed.has_wrapper);
        assert_eq!(parsed.configuration.width(), 640);
        assert_eq!(parsed.configuration.height(), 480);
        assert!(parsed.configuration.fullscreen_allowed());
        let names: Vec<&str> = parsed.variables.names().collect();
        assert_eq!(names, vec!["apiKey", "userId"]);
    }

    #[test]
    fn test_missing_src_clears_url() {
        let base = Configuration::new("https://old.example.com");
        let parsed = parse_snippet(r#"<iframe width="300">"#, &base).unwrap();
        assert_eq!(parsed.configuration.url(), "");
    }

    #[test]
    fn test_round_trip() {
        let mut config = Configuration::new("https://example.com/widget?id=7");
        config.set_size(1280, 720);
        config.set_border(FrameBorder::Visible);
        config.set_scrolling(Scrolling::Yes);
        config.set_fullscreen(true);
        config.set_loading(Loading::Lazy);
        config.set_referrer_policy(ReferrerPolicy::Origin);
        config.set_sandbox(SandboxFlag::SameOrigin, true);
        config.set_sandbox(SandboxFlag::Scripts, true);
        config.set_permission(Permission::Geolocation, true);

        let markup = generate_iframe(&config);
        let parsed = parse_snippet(&markup, &Configuration::default()).unwrap();
        assert_eq!(parsed.configuration, config);
    }

    #[test]
    fn test_round_trip_url_with_apostrophe() {
        let config = Configuration::new("https://example.com/?q=it's");
        let markup = generate_iframe(&config);
        let parsed = parse_snippet(&markup, &Configuration::default()).unwrap();
        assert_eq!(parsed.configuration.url(), "https://example.com/?q=it's");
        assert_eq!(parsed.configuration, config);
    }
}
