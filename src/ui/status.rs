use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Pane, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let source = model.file_path.as_ref().map_or_else(
        || "[scratch]".to_string(),
        |p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |s| s.to_string_lossy().to_string())
        },
    );

    let count = model.feature_count();
    let features = if count == 1 {
        "1 feature".to_string()
    } else {
        format!("{count} features")
    };
    let zoom = model.map().camera().zoom;
    let delimiter = if model.url_safe { "[+]" } else { "[ ]" };
    let watch_indicator = if model.watch_enabled { " [watching]" } else { "" };
    let read_only = if model.sync.options().editable {
        ""
    } else {
        " [read-only]"
    };
    let focus = match model.focus {
        Pane::Editor => "edit",
        Pane::Map => "map",
    };

    let status = format!(
        " {source}  {features}  z{zoom:.0}  {delimiter}{watch_indicator}{read_only}  <{focus}>  F1:help "
    );
    let mut spans = vec![Span::raw(status)];
    if let Some(err) = model.parse_error() {
        spans.push(Span::styled(
            format!(" invalid WKT: {err} "),
            Style::default().bg(Color::Red).fg(Color::White),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
