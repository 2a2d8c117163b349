// State of a single embed-editing session

use crate::clipboard::ClipboardSink;
use crate::error::{Result, SessionError};
use crate::frame::FrameEvent;
use crate::preview::{
    COMPONENT_PLACEHOLDER, NO_SNIPPET_PLACEHOLDER, OutputKind, Preview, PreviewMode,
    SIMPLE_PLACEHOLDER, render_component, render_frame,
};
use framesmith_markup::{Configuration, VariableMap, generate_iframe, parse_snippet, substitute};
use tracing::{debug, info};
use url::Url;

/// Check a URL the way the load action does, with the user-facing messages.
pub fn validate_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(SessionError::EmptyUrl);
    }
    Url::parse(url).map_err(|_| SessionError::InvalidUrl)
}

pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Configuration,
    variables: VariableMap,
    snippet: Option<String>,
    mode: PreviewMode,
    loading: bool,
    error: Option<SessionError>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Edit the configuration through its named update operations.
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.set(name, value);
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PreviewMode) {
        debug!("Preview mode -> {}", mode);
        self.mode = mode;
    }

    /// Pick what the output panel shows. Component output is only available
    /// once a snippet has been parsed; otherwise this falls back to iframe.
    pub fn select_output(&mut self, kind: OutputKind) {
        let mode = match kind {
            OutputKind::Component if self.snippet.is_some() => PreviewMode::Component,
            _ => PreviewMode::Simple,
        };
        self.set_mode(mode);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Start the load action. On success the loading flag is raised and the
    /// URL to load (variables substituted) is returned; the caller schedules
    /// the delay and the frame load.
    pub fn begin_load(&mut self) -> Result<Url> {
        self.error = None;

        let loadable = validate_url(self.config.url())
            .and_then(|_| validate_url(&substitute(self.config.url(), &self.variables)));

        match loadable {
            Ok(url) => {
                info!("Loading {}", url);
                self.loading = true;
                Ok(url)
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Apply an event from the loading delay or the frame itself. Each one
    /// clears the loading flag on its own; failures also set the error.
    pub fn handle_frame_event(&mut self, event: &FrameEvent) {
        self.loading = false;
        if let FrameEvent::Failed(reason) = event {
            debug!("Frame reported failure: {}", reason);
            self.error = Some(SessionError::FrameLoadFailed);
        }
    }

    /// Parse a pasted snippet. On success the configuration and variables are
    /// replaced wholesale and the snippet is kept for component previews. On
    /// failure nothing but the error changes.
    pub fn parse_snippet(&mut self, text: &str) -> Result<()> {
        self.error = None;

        match parse_snippet(text, &self.config) {
            Ok(parsed) => {
                self.config = parsed.configuration;
                self.variables = parsed.variables;
                self.snippet = Some(parsed.source);
                if parsed.has_wrapper {
                    self.set_mode(PreviewMode::Component);
                }
                Ok(())
            }
            Err(e) => {
                let e = SessionError::from(e);
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn output_kind(&self) -> OutputKind {
        if self.mode == PreviewMode::Component && self.snippet.is_some() {
            OutputKind::Component
        } else {
            OutputKind::Iframe
        }
    }

    /// The copyable iframe markup.
    pub fn generated_code(&self) -> String {
        generate_iframe(&self.config)
    }

    /// What the output panel shows: the substituted snippet in component
    /// mode, the iframe markup otherwise.
    pub fn output_code(&self) -> String {
        match (self.output_kind(), self.snippet.as_deref()) {
            (OutputKind::Component, Some(snippet)) => substitute(snippet, &self.variables),
            _ => self.generated_code(),
        }
    }

    pub fn preview(&self) -> Preview {
        if !is_valid_url(self.config.url()) {
            return Preview::Placeholder(match self.mode {
                PreviewMode::Simple => SIMPLE_PLACEHOLDER,
                PreviewMode::Component => COMPONENT_PLACEHOLDER,
            });
        }

        match (self.mode, self.snippet.as_deref()) {
            (PreviewMode::Simple, _) => Preview::Frame(render_frame(&self.config, &self.variables)),
            (PreviewMode::Component, Some(snippet)) => {
                Preview::Component(render_component(snippet, &self.variables))
            }
            (PreviewMode::Component, None) => Preview::Placeholder(NO_SNIPPET_PLACEHOLDER),
        }
    }

    /// Copy the current output. Returns what was copied.
    pub fn copy_output(&self, clipboard: &mut dyn ClipboardSink) -> Result<String> {
        Self::copy(self.output_code(), clipboard)
    }

    /// Copy the iframe-only markup even when component output is selected.
    pub fn copy_iframe(&self, clipboard: &mut dyn ClipboardSink) -> Result<String> {
        Self::copy(self.generated_code(), clipboard)
    }

    fn copy(text: String, clipboard: &mut dyn ClipboardSink) -> Result<String> {
        if text.is_empty() {
            return Err(SessionError::NothingToCopy);
        }
        clipboard.set_text(&text)?;
        info!("Copied {} bytes to clipboard", text.len());
        Ok(text)
    }
}
