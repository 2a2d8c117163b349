use framesmith_core::Session;
use framesmith_core::output::{
    GenerateReport, OutputFormat, ParseReport, generate_json_report, generate_text_config_report,
    generate_text_parse_report,
};
use framesmith_markup::{
    Configuration, FrameBorder, Loading, Permission, ReferrerPolicy, SandboxFlag, Scrolling,
    VariableMap, substitute,
};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Settings for `generate`, as strings straight from the command line.
#[derive(Debug, Clone)]
pub struct FrameOptions {
    pub url: String,
    pub width: i64,
    pub height: i64,
    pub border: String,
    pub scrolling: String,
    pub fullscreen: bool,
    pub loading: String,
    pub referrer_policy: String,
    pub sandbox: Vec<String>,
    pub allow: Vec<String>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        let defaults = Configuration::default();
        Self {
            url: String::new(),
            width: defaults.width() as i64,
            height: defaults.height() as i64,
            border: defaults.border().to_string(),
            scrolling: defaults.scrolling().to_string(),
            fullscreen: false,
            loading: defaults.loading().to_string(),
            referrer_policy: defaults.referrer_policy().to_string(),
            sandbox: Vec::new(),
            allow: Vec::new(),
        }
    }
}

/// Build a configuration from command-line settings. Sizes are clamped the
/// same way the interactive form clamps them.
pub fn configuration_from_options(options: &FrameOptions) -> Result<Configuration, String> {
    let mut config = Configuration::new(options.url.as_str());
    config.set_size(options.width, options.height);
    config.set_border(parse_value::<FrameBorder>(&options.border)?);
    config.set_scrolling(parse_value::<Scrolling>(&options.scrolling)?);
    config.set_fullscreen(options.fullscreen);
    config.set_loading(parse_value::<Loading>(&options.loading)?);
    config.set_referrer_policy(parse_value::<ReferrerPolicy>(&options.referrer_policy)?);

    for flag in &options.sandbox {
        config.set_sandbox(parse_value::<SandboxFlag>(flag)?, true);
    }
    for permission in &options.allow {
        config.set_permission(parse_value::<Permission>(permission)?, true);
    }

    Ok(config)
}

fn parse_value<T>(value: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| e.to_string())
}

/// Split a `name=value` assignment. The name may be written bare or as
/// `${name}`; the value may be empty.
pub fn parse_variable_assignment(assignment: &str) -> Result<(String, String), String> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("Invalid variable '{}': expected name=value", assignment))?;

    let name = name.trim();
    let name = name
        .strip_prefix("${")
        .and_then(|n| n.strip_suffix('}'))
        .unwrap_or(name)
        .trim();

    if name.is_empty() {
        return Err(format!("Invalid variable '{}': name is empty", assignment));
    }

    Ok((name.to_string(), value.to_string()))
}

pub fn parse_variable_assignments<'a>(
    assignments: impl IntoIterator<Item = &'a String>,
) -> Result<Vec<(String, String)>, String> {
    assignments
        .into_iter()
        .map(|a| parse_variable_assignment(a))
        .collect()
}

/// Read command input from a file, the inline argument or the given reader,
/// in that order of preference.
pub fn read_input(
    inline: Option<&String>,
    file: Option<&String>,
    stdin: &mut dyn Read,
) -> Result<String, String> {
    if let Some(file) = file {
        let expanded = shellexpand::tilde(file);
        let path = Path::new(expanded.as_ref());
        return fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e));
    }

    if let Some(inline) = inline {
        return Ok(inline.clone());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;
    Ok(buffer)
}

/// Parse a snippet into a fresh session and fill in the given variables.
pub fn parse_into_session(
    snippet: &str,
    variables: &[(String, String)],
) -> Result<Session, String> {
    let mut session = Session::new();
    session.parse_snippet(snippet).map_err(|e| e.to_string())?;
    for (name, value) in variables {
        session.set_variable(name.as_str(), value.as_str());
    }
    Ok(session)
}

pub fn substitute_text(text: &str, variables: &[(String, String)]) -> String {
    let mut map = VariableMap::discover(text);
    for (name, value) in variables {
        map.set(name.as_str(), value.as_str());
    }
    substitute(text, &map)
}

pub fn render_parse_report(session: &Session, format: OutputFormat) -> Result<String, String> {
    let report = ParseReport::from_session(session);
    match format {
        OutputFormat::Text => Ok(generate_text_parse_report(&report)),
        OutputFormat::Json => generate_json_report(&report).map_err(|e| e.to_string()),
    }
}

pub fn render_generate_report(
    config: Configuration,
    format: OutputFormat,
) -> Result<String, String> {
    let report = GenerateReport::new(config);
    match format {
        OutputFormat::Text => Ok(generate_text_config_report(&report)),
        OutputFormat::Json => generate_json_report(&report).map_err(|e| e.to_string()),
    }
}

/// Print `report`, or save it when an output path was given. Returns the
/// path written to.
pub fn write_report(report: &str, output: Option<&String>) -> Result<Option<String>, String> {
    let Some(output) = output else {
        print!("{}", report);
        if !report.ends_with('\n') {
            println!();
        }
        return Ok(None);
    };

    let expanded = shellexpand::tilde(output).to_string();
    fs::write(&expanded, report).map_err(|e| format!("Failed to write {}: {}", expanded, e))?;
    Ok(Some(expanded))
}
