// Right-hand panes: preview, generated code and template variables

use framesmith_core::{OutputKind, Preview, Session};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn render(f: &mut Frame, area: Rect, session: &Session) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    render_preview(f, rows[0], session);
    render_code(f, rows[1], session);
    render_variables(f, rows[2], session);
}

/// Header lines describing the preview state.
pub fn preview_lines(session: &Session) -> Vec<Line<'static>> {
    let config = session.config();
    let mut text = vec![Line::from(vec![
        Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            session.mode().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} × {}px", config.width(), config.height()),
            Style::default().fg(Color::Yellow),
        ),
    ])];

    if session.is_loading() {
        text.push(Line::styled("⠋ Loading...", Style::default().fg(Color::Yellow)));
    }
    if let Some(error) = session.error() {
        text.push(Line::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red),
        ));
    }
    text.push(Line::from(""));

    match session.preview() {
        Preview::Placeholder(message) => {
            text.push(Line::styled(message, Style::default().fg(Color::DarkGray)));
        }
        Preview::Frame(markup) | Preview::Component(markup) => {
            text.extend(markup.lines().map(|l| Line::from(l.to_string())));
        }
    }

    text
}

fn render_preview(f: &mut Frame, area: Rect, session: &Session) {
    let border_color = match (session.is_loading(), session.error().is_some()) {
        (true, _) => Color::Yellow,
        (false, true) => Color::Red,
        (false, false) => Color::Cyan,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Preview ")
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let paragraph = Paragraph::new(preview_lines(session)).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}

fn render_code(f: &mut Frame, area: Rect, session: &Session) {
    let title = match session.output_kind() {
        OutputKind::Iframe => " Generated Code ",
        OutputKind::Component => " Complete Component Code ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let code = session.output_code();
    if code.is_empty() {
        let empty_msg = Paragraph::new("Enter a URL to generate code")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty_msg, inner);
        return;
    }

    let paragraph = Paragraph::new(code)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}

fn render_variables(f: &mut Frame, area: Rect, session: &Session) {
    let variables = session.variables();
    let title = format!(" Variables ({}) ", variables.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if variables.is_empty() {
        let empty_msg = Paragraph::new("No template variables")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty_msg, inner);
        return;
    }

    let items: Vec<ListItem> = variables
        .iter()
        .take(inner.height as usize)
        .map(|(name, value)| {
            let (shown, style) = if value.is_empty() {
                ("(unset)".to_string(), Style::default().fg(Color::DarkGray))
            } else {
                (value.to_string(), Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("${{{}}} ", name), Style::default().fg(Color::Cyan)),
                Span::styled(shown, style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items), inner);
}
