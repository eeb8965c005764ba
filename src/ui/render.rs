use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

use crate::app::{Model, Pane};

use super::{EDITOR_WIDTH_PERCENT, MAP_WIDTH_PERCENT, editor_pane, map_pane, overlays, status};

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(MAP_WIDTH_PERCENT),
        ])
        .split(area)
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

/// Render the complete UI.
///
/// Drawing also records the pane areas on the model: the map learns its
/// size here, which fires its `Loaded` event on the first frame.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let _scope = crate::perf::scope("ui.render");
    let area = frame.area();

    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);
    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(1 + u16::from(toast_active)),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let chunks = split_main_columns(main_area);

    let editor_title = if model.url_safe { " WKT [+] " } else { " WKT " };
    let editor_block = pane_block(editor_title.to_string(), model.focus == Pane::Editor);
    let editor_inner = editor_block.inner(chunks[0]);
    frame.render_widget(editor_block, chunks[0]);
    editor_pane::render_editor(model, frame, editor_inner);

    let map_title = format!(" Map ({}) ", model.feature_count());
    let map_block = pane_block(map_title, model.focus == Pane::Map);
    let map_inner = map_block.inner(chunks[1]);
    frame.render_widget(map_block, chunks[1]);
    map_pane::render_map(model, frame, map_inner);

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}
