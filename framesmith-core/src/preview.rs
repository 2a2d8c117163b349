// Preview rendering for the two preview modes

use framesmith_markup::{Configuration, VariableMap, substitute};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const SIMPLE_PLACEHOLDER: &str = "Enter a valid URL to preview the iframe";
pub const COMPONENT_PLACEHOLDER: &str =
    "Enter a valid URL or parse HTML/JSX code to preview the component";
pub const NO_SNIPPET_PLACEHOLDER: &str = "Parse HTML/JSX code to see complete component preview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// A live iframe built from the configuration.
    #[default]
    Simple,
    /// The whole pasted snippet, variables filled in.
    Component,
}

impl PreviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewMode::Simple => "simple",
            PreviewMode::Component => "component",
        }
    }
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "iframe" => Ok(PreviewMode::Simple),
            "component" => Ok(PreviewMode::Component),
            other => Err(format!(
                "Unknown preview mode '{}'. Expected simple or component",
                other
            )),
        }
    }
}

/// Which form of the markup the output panel shows and `copy` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Iframe,
    Component,
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "iframe" => Ok(OutputKind::Iframe),
            "component" => Ok(OutputKind::Component),
            other => Err(format!(
                "Unknown output '{}'. Expected iframe or component",
                other
            )),
        }
    }
}

/// What the preview pane should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Placeholder(&'static str),
    Frame(String),
    Component(String),
}

fn jsx_template_regex() -> &'static Regex {
    static JSX_TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();
    JSX_TEMPLATE_REGEX.get_or_init(|| Regex::new(r"\{`([^`]*)`\}").unwrap())
}

/// The live frame element for simple mode.
///
/// Unlike the copyable markup this carries every attribute, defaults
/// included, the way a rendered element would.
pub fn render_frame(config: &Configuration, variables: &VariableMap) -> String {
    let mut attributes = vec![
        format!("src=\"{}\"", substitute(config.url(), variables)),
        format!("width=\"{}\"", config.width()),
        format!("height=\"{}\"", config.height()),
        format!("frameborder=\"{}\"", config.border()),
        format!("scrolling=\"{}\"", config.scrolling()),
    ];
    if config.fullscreen_allowed() {
        attributes.push("allowfullscreen".to_string());
    }
    attributes.push(format!("loading=\"{}\"", config.loading()));
    attributes.push(format!("referrerpolicy=\"{}\"", config.referrer_policy()));

    if config.sandbox().any() {
        attributes.push(format!("sandbox=\"{}\"", config.sandbox().tokens().join(" ")));
    }
    if config.permissions().any() {
        attributes.push(format!("allow=\"{}\"", config.permissions().tokens().join("; ")));
    }

    format!("<iframe {}></iframe>", attributes.join(" "))
}

/// The pasted snippet as markup: variables filled in, `className=` turned
/// into `class=` and JSX template expressions turned into quoted strings.
///
/// Nothing is sanitized. Whatever the user pasted is rendered as-is.
pub fn render_component(snippet: &str, variables: &VariableMap) -> String {
    let substituted = substitute(snippet, variables).replace("className=", "class=");
    jsx_template_regex()
        .replace_all(&substituted, |caps: &regex::Captures| {
            format!("\"{}\"", substitute(&caps[1], variables))
        })
        .into_owned()
}
