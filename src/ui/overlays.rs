use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Editor", section_style));
    all_lines.push(Line::raw("  Type / paste        Edit WKT (map follows live)"));
    all_lines.push(Line::raw("  Enter / Ctrl-r      Sync now and report errors"));
    all_lines.push(Line::raw("  Alt-Enter           New line"));
    all_lines.push(Line::raw("  Arrows, Home/End    Navigate"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Buffer start / end"));
    all_lines.push(Line::raw("  Esc                 Focus map"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Map", section_style));
    all_lines.push(Line::raw("  Drag vertex         Edit shape (text updates)"));
    all_lines.push(Line::raw("  Drag empty map      Pan"));
    all_lines.push(Line::raw("  Wheel / + -         Zoom"));
    all_lines.push(Line::raw("  h/j/k/l, arrows     Pan"));
    all_lines.push(Line::raw("  f / Ctrl-f          Fit to features"));
    all_lines.push(Line::raw("  e / Enter / Esc     Focus editor"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Text", section_style));
    all_lines.push(Line::raw("  Ctrl-u (u in map)   Toggle URL-safe delimiter"));
    all_lines.push(Line::raw("  Ctrl-y (y in map)   Copy WKT to clipboard"));
    all_lines.push(Line::raw("  Ctrl-k              Clear text"));
    all_lines.push(Line::raw("  Ctrl-l (c in map)   Clear map"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Tab                 Switch focus"));
    all_lines.push(Line::raw("  w (in map)          Toggle watch"));
    all_lines.push(Line::raw("  F5 (r in map)       Reload file"));
    all_lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit (q in map)"));
    all_lines.push(Line::raw("  F1 (? in map)       Toggle help"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);

    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} any other key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
