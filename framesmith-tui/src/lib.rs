pub mod preview_pane;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use framesmith_core::clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
use framesmith_core::frame::{FrameEvent, FrameLoader, spawn_frame_load, spawn_loading_delay};
use framesmith_core::{OutputKind, PreviewMode, Session};
use framesmith_markup::{
    FrameBorder, Loading, Permission, ReferrerPolicy, SandboxFlag, Scrolling,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const MAX_OUTPUT_LINES: usize = 1000;
const MAX_HISTORY: usize = 100;
const PASTE_TERMINATOR: &str = ".end";

/// Parse an on/off style switch.
fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Split `input` into the command word and the untouched remainder.
fn split_command(input: &str) -> (&str, &str) {
    let trimmed = input.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    }
}

pub struct App {
    session: Session,
    input: String,
    history: Vec<String>,
    output: Vec<String>,
    cursor_position: usize,
    should_quit: bool,
    scroll_offset: usize,
    history_index: Option<usize>,
    temp_input: String,
    paste_buffer: Option<Vec<String>>,
    clipboard: Box<dyn ClipboardSink>,
    loader: Option<FrameLoader>,
    events_tx: Option<UnboundedSender<FrameEvent>>,
    events_rx: Option<UnboundedReceiver<FrameEvent>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// An app with an in-memory clipboard and no background loading.
    pub fn new() -> Self {
        let output = vec![
            String::new(),
            "  Framesmith: configure, preview and copy iframe embeds.".to_string(),
            "  Type 'help' for available commands, 'exit' or 'quit' to exit.".to_string(),
            String::new(),
        ];

        Self {
            session: Session::new(),
            input: String::new(),
            history: Vec::new(),
            output,
            cursor_position: 0,
            should_quit: false,
            scroll_offset: 0,
            history_index: None,
            temp_input: String::new(),
            paste_buffer: None,
            clipboard: Box::new(MemoryClipboard::new()),
            loader: None,
            events_tx: None,
            events_rx: None,
        }
    }

    /// Wire up the system clipboard and the background frame loader.
    /// Must be called from inside a tokio runtime.
    pub fn with_runtime(mut self) -> Self {
        match SystemClipboard::new() {
            Ok(clipboard) => self.clipboard = Box::new(clipboard),
            Err(e) => {
                self.add_output(format!("Note: {}. Copies are kept in-session only.", e));
            }
        }

        match FrameLoader::new() {
            Ok(loader) => self.loader = Some(loader),
            Err(e) => self.add_output(format!("Note: frame loading unavailable: {}", e)),
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.events_tx = Some(tx);
        self.events_rx = Some(rx);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn is_pasting(&self) -> bool {
        self.paste_buffer.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn add_output(&mut self, message: impl Into<String>) {
        self.output.push(message.into());
        if self.output.len() > MAX_OUTPUT_LINES {
            self.output.drain(0..self.output.len() - MAX_OUTPUT_LINES);
        }
        // New output snaps the view back to the bottom
        self.scroll_offset = 0;
    }

    fn add_block(&mut self, text: &str) {
        for line in text.lines() {
            self.add_output(format!("  {}", line));
        }
    }

    pub fn navigate_history_backward(&mut self) {
        if self.history.is_empty() {
            return;
        }

        if self.history_index.is_none() {
            self.temp_input = self.input.clone();
        }

        let idx = match self.history_index {
            None => self.history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.history_index = Some(idx);
        self.input = self.history[idx].clone();
        self.cursor_position = self.input.chars().count();
    }

    pub fn navigate_history_forward(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };

        if idx + 1 >= self.history.len() {
            self.input = std::mem::take(&mut self.temp_input);
            self.history_index = None;
        } else {
            self.history_index = Some(idx + 1);
            self.input = self.history[idx + 1].clone();
        }
        self.cursor_position = self.input.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Drain finished loads and delay timers without blocking.
    pub fn process_events(&mut self) {
        let mut events = Vec::new();
        if let Some(rx) = self.events_rx.as_mut() {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            self.apply_frame_event(event);
        }
    }

    fn apply_frame_event(&mut self, event: FrameEvent) {
        self.session.handle_frame_event(&event);
        match event {
            FrameEvent::LoadingElapsed => {}
            FrameEvent::Loaded(report) => {
                self.add_output(format!(
                    "✓ Frame loaded: HTTP {} ({} ms)",
                    report.status_code,
                    report.response_time.as_millis()
                ));
                if let Some(reason) = report.embedding_blocked() {
                    self.add_output(format!("⚠ The page may refuse to be framed: {}", reason));
                }
            }
            FrameEvent::Failed(reason) => {
                self.add_output(format!("✗ Failed to load the URL ({})", reason));
            }
        }
    }

    pub fn handle_input(&mut self, input: String) {
        if self.paste_buffer.is_some() {
            if input.trim() == PASTE_TERMINATOR {
                let snippet = self.paste_buffer.take().unwrap_or_default().join("\n");
                self.parse(&snippet);
            } else {
                self.add_output(format!("┆ {}", input));
                if let Some(buffer) = self.paste_buffer.as_mut() {
                    buffer.push(input);
                }
            }
            return;
        }

        if input.trim().is_empty() {
            return;
        }

        self.history.push(input.clone());
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.history_index = None;
        self.temp_input.clear();

        self.add_output(format!("> {}", input));

        let (command, rest) = split_command(&input);
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command {
            "exit" | "quit" | ":q" => {
                self.should_quit = true;
            }
            "help" => self.show_help(),
            "clear" => {
                self.output.clear();
            }
            "reset" => {
                self.session = Session::new();
                self.add_output("Configuration reset to defaults.");
            }
            "show" => self.show_configuration(),
            "url" => {
                self.session.config_mut().set_url(rest);
                if rest.is_empty() {
                    self.add_output("URL cleared.");
                } else {
                    self.add_output(format!("URL set to {}", rest));
                }
            }
            "size" => match (
                args.first().and_then(|w| w.parse::<i64>().ok()),
                args.get(1).and_then(|h| h.parse::<i64>().ok()),
            ) {
                (Some(width), Some(height)) => {
                    self.session.config_mut().set_size(width, height);
                    self.report_dimensions();
                }
                _ => self.add_output("Error: size requires <width> <height>"),
            },
            "width" | "height" => match args.first().and_then(|v| v.parse::<i64>().ok()) {
                Some(value) => {
                    if command == "width" {
                        self.session.config_mut().set_width(value);
                    } else {
                        self.session.config_mut().set_height(value);
                    }
                    self.report_dimensions();
                }
                None => self.add_output(format!("Error: {} requires a number", command)),
            },
            "border" => self.set_enumerated::<FrameBorder>(rest, "Frame border", |c, v| c.set_border(v)),
            "scrolling" => self.set_enumerated::<Scrolling>(rest, "Scrolling", |c, v| c.set_scrolling(v)),
            "loading" => self.set_enumerated::<Loading>(rest, "Loading", |c, v| c.set_loading(v)),
            "referrer" => self.set_enumerated::<ReferrerPolicy>(rest, "Referrer policy", |c, v| {
                c.set_referrer_policy(v)
            }),
            "fullscreen" => match parse_switch(rest) {
                Some(on) => {
                    self.session.config_mut().set_fullscreen(on);
                    self.add_output(format!("Fullscreen {}", if on { "allowed" } else { "disallowed" }));
                }
                None => self.add_output("Error: fullscreen requires on|off"),
            },
            "sandbox" => self.toggle_flag::<SandboxFlag>(&args, "sandbox", |c, flag, on| {
                c.set_sandbox(flag, on)
            }),
            "allow" => self.toggle_flag::<Permission>(&args, "allow", |c, permission, on| {
                c.set_permission(permission, on)
            }),
            "parse" => self.parse(rest),
            "paste" => {
                self.paste_buffer = Some(Vec::new());
                self.add_output(format!(
                    "Paste your HTML/JSX code, then enter '{}' on its own line.",
                    PASTE_TERMINATOR
                ));
            }
            "var" => match args.first() {
                Some(name) => {
                    let name = name.trim_start_matches("${").trim_end_matches('}');
                    let value = rest
                        .split_once(char::is_whitespace)
                        .map(|(_, v)| v.trim())
                        .unwrap_or_default();
                    self.session.set_variable(name, value);
                    if value.is_empty() {
                        self.add_output(format!("${{{}}} cleared", name));
                    } else {
                        self.add_output(format!("${{{}}} = {}", name, value));
                    }
                }
                None => self.add_output("Error: var requires <name> [value]"),
            },
            "vars" => self.show_variables(),
            "mode" => match PreviewMode::from_str(rest) {
                Ok(mode) => {
                    self.session.set_mode(mode);
                    self.add_output(format!("Preview mode: {}", mode));
                }
                Err(e) => self.add_output(format!("Error: {}", e)),
            },
            "output" => match OutputKind::from_str(rest) {
                Ok(kind) => {
                    self.session.select_output(kind);
                    if kind == OutputKind::Component && self.session.snippet().is_none() {
                        self.add_output("No parsed snippet yet; showing iframe output.");
                    } else {
                        self.add_output(format!("Preview mode: {}", self.session.mode()));
                    }
                }
                Err(e) => self.add_output(format!("Error: {}", e)),
            },
            "load" => self.load(),
            "copy" => {
                let result = if args.first() == Some(&"iframe") {
                    self.session.copy_iframe(self.clipboard.as_mut())
                } else {
                    self.session.copy_output(self.clipboard.as_mut())
                };
                match result {
                    Ok(text) => self.add_output(format!("Copied {} characters to clipboard.", text.chars().count())),
                    Err(e) => self.add_output(format!("Error: {}", e)),
                }
            }
            _ => {
                self.add_output(format!("Unknown command: {}", command));
                self.add_output("Type 'help' for available commands");
            }
        }
    }

    fn show_help(&mut self) {
        self.add_output("Available commands:");
        self.add_output("  url <url>                      - Set the widget URL");
        self.add_output("  size <w> <h> | width | height  - Set dimensions (100-2000 px)");
        self.add_output("  border 0|1                     - Frame border");
        self.add_output("  scrolling auto|yes|no          - Scrolling behaviour");
        self.add_output("  loading eager|lazy             - Loading mode");
        self.add_output("  referrer <policy>              - Referrer policy");
        self.add_output("  fullscreen on|off              - Allow fullscreen");
        self.add_output("  sandbox <flag> on|off          - scripts, forms, popups, same-origin, top-navigation");
        self.add_output("  allow <feature> on|off         - camera, microphone, geolocation, payment");
        self.add_output("  parse <snippet>                - Parse a one-line HTML/JSX snippet");
        self.add_output(format!("  paste                          - Parse a multi-line snippet (end with {})", PASTE_TERMINATOR));
        self.add_output("  var <name> [value]             - Fill in a template variable");
        self.add_output("  vars                           - List template variables");
        self.add_output("  mode simple|component          - Preview mode");
        self.add_output("  output iframe|component        - Output shown and copied");
        self.add_output("  load                           - Load the URL into the preview frame");
        self.add_output("  copy [iframe]                  - Copy the output (or iframe only)");
        self.add_output("  show                           - Print the configuration and code");
        self.add_output("  reset                          - Restore defaults");
        self.add_output("  clear                          - Clear the output");
        self.add_output("  help                           - Show this help message");
        self.add_output("  exit, quit                     - Exit");
    }

    fn show_configuration(&mut self) {
        let config = self.session.config().clone();
        let sandbox = config.sandbox().tokens();
        let allow = config.permissions().tokens();
        self.add_output(format!("  URL:             {}", config.url()));
        self.add_output(format!("  Dimensions:      {} × {}px", config.width(), config.height()));
        self.add_output(format!("  Frame border:    {}", config.border()));
        self.add_output(format!("  Scrolling:       {}", config.scrolling()));
        self.add_output(format!("  Fullscreen:      {}", config.fullscreen_allowed()));
        self.add_output(format!("  Loading:         {}", config.loading()));
        self.add_output(format!("  Referrer policy: {}", config.referrer_policy()));
        self.add_output(format!("  Sandbox:         {}", sandbox.join(" ")));
        self.add_output(format!("  Permissions:     {}", allow.join("; ")));
        self.add_output(format!("  Preview mode:    {}", self.session.mode()));
        let code = self.session.output_code();
        if !code.is_empty() {
            self.add_output("");
            self.add_block(&code);
        }
    }

    fn show_variables(&mut self) {
        let vars: Vec<(String, String)> = self
            .session
            .variables()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if vars.is_empty() {
            self.add_output("No template variables. Parse a snippet containing ${name} placeholders.");
            return;
        }
        for (name, value) in vars {
            if value.is_empty() {
                self.add_output(format!("  ${{{}}} = (unset)", name));
            } else {
                self.add_output(format!("  ${{{}}} = {}", name, value));
            }
        }
    }

    fn report_dimensions(&mut self) {
        let config = self.session.config();
        let message = format!("Dimensions: {} × {}px", config.width(), config.height());
        self.add_output(message);
    }

    fn set_enumerated<T>(
        &mut self,
        value: &str,
        label: &str,
        apply: impl FnOnce(&mut framesmith_markup::Configuration, T),
    ) where
        T: FromStr<Err = framesmith_markup::MarkupError> + std::fmt::Display + Copy,
    {
        match value.parse::<T>() {
            Ok(parsed) => {
                apply(self.session.config_mut(), parsed);
                self.add_output(format!("{}: {}", label, parsed));
            }
            Err(e) => self.add_output(format!("Error: {}", e)),
        }
    }

    fn toggle_flag<T>(
        &mut self,
        args: &[&str],
        command: &str,
        apply: impl FnOnce(&mut framesmith_markup::Configuration, T, bool),
    ) where
        T: FromStr<Err = framesmith_markup::MarkupError> + std::fmt::Display + Copy,
    {
        let (Some(name), Some(switch)) = (args.first(), args.get(1)) else {
            self.add_output(format!("Error: {} requires <name> on|off", command));
            return;
        };
        let Some(on) = parse_switch(switch) else {
            self.add_output(format!("Error: expected on|off, got '{}'", switch));
            return;
        };
        match name.parse::<T>() {
            Ok(flag) => {
                apply(self.session.config_mut(), flag, on);
                self.add_output(format!("{} {} {}", command, flag, if on { "on" } else { "off" }));
            }
            Err(e) => self.add_output(format!("Error: {}", e)),
        }
    }

    fn parse(&mut self, snippet: &str) {
        match self.session.parse_snippet(snippet) {
            Ok(()) => {
                self.add_output("Code parsed successfully! Check the configuration and preview.");
                let unfilled: Vec<String> = self
                    .session
                    .variables()
                    .unfilled()
                    .into_iter()
                    .map(String::from)
                    .collect();
                if !unfilled.is_empty() {
                    self.add_output(format!(
                        "Template variables found: {}. Use 'var <name> <value>' to fill them in.",
                        unfilled.join(", ")
                    ));
                }
                if self.session.mode() == PreviewMode::Component {
                    self.add_output("Wrapper element detected; previewing the complete component.");
                }
            }
            Err(e) => self.add_output(format!("Error: {}", e)),
        }
    }

    fn load(&mut self) {
        if self.session.is_loading() {
            self.add_output("Already loading...");
            return;
        }

        let url = match self.session.begin_load() {
            Ok(url) => url,
            Err(e) => {
                self.add_output(format!("Error: {}", e));
                return;
            }
        };
        self.add_output(format!("Loading {} ...", url));

        if let Some(tx) = self.events_tx.clone() {
            spawn_loading_delay(tx.clone());
            if let Some(loader) = self.loader.clone() {
                spawn_frame_load(loader, url, tx);
            }
        }
    }
}

pub fn run() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new().with_runtime();

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_events();
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            break;
        }

        // Poll so frame events keep flowing while the user is idle
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }
            KeyCode::Char(c) => {
                let at = app.byte_index();
                app.input.insert(at, c);
                app.cursor_position += 1;
                app.history_index = None;
                app.temp_input.clear();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                    let at = app.byte_index();
                    app.input.remove(at);
                    app.history_index = None;
                    app.temp_input.clear();
                }
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut app.input);
                app.cursor_position = 0;
                app.handle_input(input);
            }
            KeyCode::Up => app.navigate_history_backward(),
            KeyCode::Down => app.navigate_history_forward(),
            KeyCode::Left => {
                app.cursor_position = app.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.chars().count() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => app.cursor_position = 0,
            KeyCode::End => app.cursor_position = app.input.chars().count(),
            KeyCode::Esc => {
                if app.paste_buffer.take().is_some() {
                    app.add_output("Paste cancelled.");
                } else {
                    app.should_quit = true;
                }
            }
            KeyCode::PageUp => {
                app.scroll_offset = app.scroll_offset.saturating_sub(10);
            }
            KeyCode::PageDown => {
                app.scroll_offset = (app.scroll_offset + 10).min(app.output.len().saturating_sub(1));
            }
            _ => {}
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(f.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Output area
            Constraint::Length(1), // Horizontal rule
            Constraint::Length(1), // Input area
            Constraint::Length(1), // Horizontal rule
            Constraint::Length(1), // Status bar
        ])
        .split(columns[0]);

    // Output area - scrollable
    let output_height = left[0].height as usize;
    let total_lines = app.output.len();
    let scroll_offset = if app.scroll_offset == 0 && total_lines > output_height {
        total_lines.saturating_sub(output_height)
    } else {
        app.scroll_offset.min(total_lines.saturating_sub(output_height))
    };

    let visible_output: Vec<Line> = app
        .output
        .iter()
        .skip(scroll_offset)
        .take(output_height)
        .map(|line| {
            let style = if line.starts_with("Error") || line.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if line.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if line.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            Line::styled(line.clone(), style)
        })
        .collect();
    f.render_widget(Paragraph::new(visible_output), left[0]);

    let rule = || Paragraph::new("─".repeat(left[1].width as usize)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(rule(), left[1]);

    let prompt = if app.is_pasting() { "paste┆ " } else { "frame> " };
    let input = Paragraph::new(format!("{}{}", prompt, app.input)).style(Style::default().fg(Color::Yellow));
    f.render_widget(input, left[2]);
    f.set_cursor_position((
        left[2].x + prompt.chars().count() as u16 + app.cursor_position as u16,
        left[2].y,
    ));

    f.render_widget(rule(), left[3]);

    let status = Paragraph::new(Line::from(vec![
        Span::raw("Press "),
        Span::styled("ESC", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" or type "),
        Span::styled("exit", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to quit | "),
        Span::styled("help", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" for commands | "),
        Span::styled("↑↓", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" history | "),
        Span::styled("PgUp/PgDn", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" scroll"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, left[4]);

    preview_pane::render(f, columns[1], &app.session);
}

#[cfg(test)]
mod tests {
    use super::*;
    use framesmith_core::{Preview, SessionError};

    fn run_commands(app: &mut App, commands: &[&str]) {
        for command in commands {
            app.handle_input(command.to_string());
        }
    }

    #[test]
    fn test_split_command_keeps_rest_intact() {
        assert_eq!(
            split_command("parse <iframe src=\"a b\">"),
            ("parse", "<iframe src=\"a b\">")
        );
        assert_eq!(split_command("  load  "), ("load", ""));
    }

    #[test]
    fn test_form_commands_update_configuration() {
        let mut app = App::new();
        run_commands(
            &mut app,
            &[
                "url https://example.com",
                "size 450 790",
                "sandbox scripts on",
                "sandbox allow-forms on",
                "allow camera on",
                "allow camera off",
                "scrolling no",
                "fullscreen on",
            ],
        );

        let config = app.session().config();
        assert_eq!(config.url(), "https://example.com");
        assert_eq!(config.width(), 450);
        assert_eq!(config.height(), 790);
        assert!(config.sandbox().scripts);
        assert!(config.sandbox().forms);
        assert!(!config.permissions().camera);
        assert_eq!(config.scrolling(), Scrolling::No);
        assert!(config.fullscreen_allowed());
    }

    #[test]
    fn test_invalid_values_report_errors() {
        let mut app = App::new();
        run_commands(&mut app, &["scrolling sideways", "sandbox modals on", "size abc"]);

        let errors = app.output().iter().filter(|l| l.starts_with("Error")).count();
        assert_eq!(errors, 3);
        assert_eq!(app.session().config().scrolling(), Scrolling::Auto);
    }

    #[test]
    fn test_paste_mode_parses_multiline_snippet() {
        let mut app = App::new();
        run_commands(
            &mut app,
            &[
                "paste",
                "<div className=\"card\">",
                "  <iframe src={`https://example.com/?key=${apiKey}`} width=\"450\" height=\"790\" />",
                "</div>",
            ],
        );
        assert!(app.is_pasting());

        app.handle_input(".end".to_string());
        assert!(!app.is_pasting());
        assert_eq!(app.session().mode(), PreviewMode::Component);
        assert_eq!(app.session().variables().get("apiKey"), Some(""));

        app.handle_input("var apiKey k-42".to_string());
        match app.session().preview() {
            Preview::Component(html) => assert!(html.contains("key=k-42")),
            other => panic!("expected component preview, got {:?}", other),
        }
    }

    #[test]
    fn test_large_paste_keeps_output_bounded() {
        let mut app = App::new();
        app.handle_input("paste".to_string());
        app.handle_input(r#"<iframe src="https://example.com" width="450"></iframe>"#.to_string());
        for i in 0..MAX_OUTPUT_LINES + 50 {
            app.handle_input(format!("<!-- line {} -->", i));
        }
        assert_eq!(app.output().len(), MAX_OUTPUT_LINES);

        app.handle_input(".end".to_string());
        assert!(!app.is_pasting());
        assert_eq!(app.session().config().width(), 450);
        assert!(app.output().len() <= MAX_OUTPUT_LINES);
    }

    #[test]
    fn test_load_validation_messages() {
        let mut app = App::new();
        app.handle_input("load".to_string());
        assert_eq!(app.session().error(), Some(&SessionError::EmptyUrl));
        assert!(app.output().iter().any(|l| l == "Error: Please enter a URL"));

        run_commands(&mut app, &["url not a url", "load"]);
        assert_eq!(app.session().error(), Some(&SessionError::InvalidUrl));

        run_commands(&mut app, &["url https://example.com", "load"]);
        assert!(app.session().is_loading());
        assert!(app.session().error().is_none());
    }

    #[test]
    fn test_copy_uses_selected_output() {
        let mut app = App::new();
        app.handle_input("copy".to_string());
        assert!(app.output().iter().any(|l| l.starts_with("Error: Nothing to copy")));

        run_commands(&mut app, &["url https://example.com", "copy", "copy iframe"]);
        let copies = app.output().iter().filter(|l| l.starts_with("Copied")).count();
        assert_eq!(copies, 2);
    }

    #[test]
    fn test_history_navigation() {
        let mut app = App::new();
        run_commands(&mut app, &["url https://a.example", "size 300 300"]);
        app.input = "draft".to_string();

        app.navigate_history_backward();
        assert_eq!(app.input, "size 300 300");
        app.navigate_history_backward();
        assert_eq!(app.input, "url https://a.example");
        app.navigate_history_backward();
        assert_eq!(app.input, "url https://a.example");

        app.navigate_history_forward();
        assert_eq!(app.input, "size 300 300");
        app.navigate_history_forward();
        assert_eq!(app.input, "draft");
    }

    #[test]
    fn test_exit() {
        let mut app = App::new();
        app.handle_input("quit".to_string());
        assert!(app.should_quit());
    }
}
