// Reports for the command-line front end

use crate::error::Result;
use crate::frame::FrameReport;
use crate::preview::{OutputKind, PreviewMode};
use crate::session::Session;
use framesmith_markup::{Configuration, VariableMap, generate_iframe};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub configuration: Configuration,
    pub markup: String,
}

impl GenerateReport {
    pub fn new(configuration: Configuration) -> Self {
        let markup = generate_iframe(&configuration);
        Self {
            configuration,
            markup,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub configuration: Configuration,
    pub variables: VariableMap,
    pub unfilled: Vec<String>,
    pub preview_mode: PreviewMode,
    pub output_kind: OutputKind,
    pub iframe: String,
    pub output: String,
}

impl ParseReport {
    pub fn from_session(session: &Session) -> Self {
        Self {
            configuration: session.config().clone(),
            variables: session.variables().clone(),
            unfilled: session
                .variables()
                .unfilled()
                .into_iter()
                .map(String::from)
                .collect(),
            preview_mode: session.mode(),
            output_kind: session.output_kind(),
            iframe: session.generated_code(),
            output: session.output_code(),
        }
    }
}

pub fn generate_json_report<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn push_configuration(report: &mut String, config: &Configuration) {
    let sandbox = config.sandbox().tokens();
    let allow = config.permissions().tokens();

    report.push_str(&format!("URL:             {}\n", config.url()));
    report.push_str(&format!(
        "Dimensions:      {} × {}px\n",
        config.width(),
        config.height()
    ));
    report.push_str(&format!("Frame border:    {}\n", config.border()));
    report.push_str(&format!("Scrolling:       {}\n", config.scrolling()));
    report.push_str(&format!(
        "Fullscreen:      {}\n",
        if config.fullscreen_allowed() { "allowed" } else { "no" }
    ));
    report.push_str(&format!("Loading:         {}\n", config.loading()));
    report.push_str(&format!("Referrer policy: {}\n", config.referrer_policy()));
    report.push_str(&format!(
        "Sandbox:         {}\n",
        if sandbox.is_empty() { "none".to_string() } else { sandbox.join(" ") }
    ));
    report.push_str(&format!(
        "Permissions:     {}\n",
        if allow.is_empty() { "none".to_string() } else { allow.join("; ") }
    ));
}

pub fn generate_text_parse_report(data: &ParseReport) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("PARSED CONFIGURATION\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    push_configuration(&mut report, &data.configuration);
    report.push_str(&format!("Preview mode:    {}\n\n", data.preview_mode));

    if !data.variables.is_empty() {
        report.push_str("Variables:\n");
        for (name, value) in data.variables.iter() {
            if value.is_empty() {
                report.push_str(&format!("  ${{{}}} = (unset)\n", name));
            } else {
                report.push_str(&format!("  ${{{}}} = {}\n", name, value));
            }
        }
        report.push('\n');
    }

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("GENERATED CODE\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str(&data.output);
    report.push('\n');

    if data.output_kind == OutputKind::Component && !data.iframe.is_empty() {
        report.push_str("\nIframe only:\n");
        report.push_str(&data.iframe);
        report.push('\n');
    }

    report
}

pub fn generate_text_config_report(data: &GenerateReport) -> String {
    let mut report = String::new();
    push_configuration(&mut report, &data.configuration);
    report.push('\n');
    report.push_str(&data.markup);
    report.push('\n');
    report
}

pub fn generate_text_frame_report(data: &FrameReport) -> String {
    let mut report = String::new();
    report.push_str(&format!("URL:             {}\n", data.url));
    report.push_str(&format!("Status:          {}\n", data.status_code));
    report.push_str(&format!(
        "Response time:   {} ms\n",
        data.response_time.as_millis()
    ));
    if let Some(ref content_type) = data.content_type {
        report.push_str(&format!("Content-Type:    {}\n", content_type));
    }
    match data.embedding_blocked() {
        Some(reason) => report.push_str(&format!("Embeddable:      no ({})\n", reason)),
        None => report.push_str("Embeddable:      yes\n"),
    }
    report
}
