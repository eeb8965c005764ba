use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::{Cursor, EditorBuffer};

/// One screen row of a soft-wrapped buffer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualRow {
    pub line: usize,
    /// Char column of the row's first character within its line.
    pub start_col: usize,
    pub text: String,
}

impl VisualRow {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Wrap every buffer line to `width` display columns.
pub fn wrap_rows(buf: &EditorBuffer, width: u16) -> Vec<VisualRow> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in 0..buf.line_count() {
        let text = buf.line_at(line).unwrap_or_default();
        let mut current = String::new();
        let mut current_width = 0;
        let mut start_col = 0;
        for (col, ch) in text.chars().enumerate() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                rows.push(VisualRow {
                    line,
                    start_col,
                    text: std::mem::take(&mut current),
                });
                current_width = 0;
                start_col = col;
            }
            current.push(ch);
            current_width += w;
        }
        rows.push(VisualRow {
            line,
            start_col,
            text: current,
        });
    }
    rows
}

/// Index of the visual row holding the cursor.
fn cursor_row(rows: &[VisualRow], cursor: Cursor) -> usize {
    rows.iter()
        .rposition(|r| r.line == cursor.line && r.start_col <= cursor.col)
        .unwrap_or(0)
}

pub fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect) {
    model.editor_area = Some(area);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let rows = wrap_rows(model.editor(), area.width);
    let cursor = model.editor().cursor();
    let at = cursor_row(&rows, cursor);
    let height = usize::from(area.height);

    // Follow the cursor only when it moved, so wheel scrolling sticks.
    if model.editor_last_cursor != Some(cursor) {
        if at < model.editor_scroll_offset {
            model.editor_scroll_offset = at;
        } else if at >= model.editor_scroll_offset + height {
            model.editor_scroll_offset = at + 1 - height;
        }
        model.editor_last_cursor = Some(cursor);
    }
    model.editor_scroll_offset = model
        .editor_scroll_offset
        .min(rows.len().saturating_sub(height));

    let show_cursor = model.focus == crate::app::Pane::Editor;
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    let content: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(model.editor_scroll_offset)
        .take(height)
        .map(|(idx, row)| {
            if !(show_cursor && idx == at) {
                return Line::raw(row.text.clone());
            }
            let rel = cursor.col - row.start_col;
            let before: String = row.text.chars().take(rel).collect();
            let cursor_char = row
                .text
                .chars()
                .nth(rel)
                .map_or_else(|| " ".to_string(), |c| c.to_string());
            let after: String = row.text.chars().skip(rel + 1).collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled(cursor_char, cursor_style),
                Span::raw(after),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(content), area);
}

/// Buffer position under a terminal cell of the editor pane.
pub fn editor_position_at(model: &Model, col: u16, row: u16) -> Option<(usize, usize)> {
    let area = model.editor_area?;
    if col < area.x || row < area.y || col >= area.x + area.width || row >= area.y + area.height {
        return None;
    }
    let rows = wrap_rows(model.editor(), area.width);
    let idx = model.editor_scroll_offset + usize::from(row - area.y);
    let Some(visual) = rows.get(idx).or_else(|| rows.last()) else {
        return Some((0, 0));
    };
    if idx >= rows.len() {
        return Some((visual.line, visual.start_col + visual.char_len()));
    }

    let target = usize::from(col - area.x);
    let mut width = 0;
    let mut offset = 0;
    for ch in visual.text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > target {
            break;
        }
        width += w;
        offset += 1;
    }
    Some((visual.line, visual.start_col + offset))
}
