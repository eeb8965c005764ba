use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::Pane;
use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

/// Cells moved per arrow key press in the map pane.
const MAP_PAN_STEP: i32 = 4;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if !model.help_visible => Some(Message::EditorPaste(text.clone())),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match mouse.kind {
                MouseEventKind::ScrollDown => Some(Message::HelpScrollDown),
                MouseEventKind::ScrollUp => Some(Message::HelpScrollUp),
                MouseEventKind::Up(MouseButton::Left) => Some(Message::HideHelp),
                _ => None,
            };
        }

        let (col, row) = (mouse.column, mouse.row);
        let map = model.map();
        let in_map = map.contains_cell(col, row);

        // A drag started on the map keeps going even when the pointer leaves it.
        if map.drag().is_some() {
            match mouse.kind {
                MouseEventKind::Drag(MouseButton::Left) => {
                    return Some(Message::MapPointerDrag(col, row));
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    return Some(Message::MapPointerUp(col, row));
                }
                _ => {}
            }
        }

        if in_map {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(Message::MapPointerDown(col, row)),
                MouseEventKind::Up(MouseButton::Left) => Some(Message::MapPointerUp(col, row)),
                MouseEventKind::ScrollUp => Some(Message::MapZoomIn),
                MouseEventKind::ScrollDown => Some(Message::MapZoomOut),
                _ => None,
            };
        }

        let editor_area = model.editor_area?;
        if !point_in_rect(col, row, editor_area) {
            return None;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                crate::ui::editor_position_at(model, col, row)
                    .map(|(line, col)| Message::EditorMoveTo(line, col))
                    .or(Some(Message::FocusPane(Pane::Editor)))
            }
            MouseEventKind::ScrollDown => Some(Message::EditorScrollDown(3)),
            MouseEventKind::ScrollUp => Some(Message::EditorScrollUp(3)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::HideHelp),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Global bindings
        if ctrl {
            match key.code {
                KeyCode::Char('c' | 'q') => return Some(Message::Quit),
                KeyCode::Char('r') => return Some(Message::Sync),
                KeyCode::Char('l') => return Some(Message::ClearMap),
                KeyCode::Char('k') => return Some(Message::ClearText),
                KeyCode::Char('u') => return Some(Message::ToggleUrlSafe),
                KeyCode::Char('y') => return Some(Message::CopyText),
                KeyCode::Char('f') => return Some(Message::MapFit),
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(5) => return Some(Message::ForceReload),
            _ => {}
        }

        match model.focus {
            Pane::Editor => Self::handle_editor_key(key, ctrl, alt),
            Pane::Map => Self::handle_map_key(key),
        }
    }

    fn handle_editor_key(key: KeyEvent, ctrl: bool, alt: bool) -> Option<Message> {
        match key.code {
            KeyCode::Enter if alt => Some(Message::EditorSplitLine),
            KeyCode::Enter => Some(Message::Sync),
            KeyCode::Esc => Some(Message::FocusPane(Pane::Map)),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Left if ctrl => Some(Message::EditorMoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::EditorMoveWordRight),
            KeyCode::Home if ctrl => Some(Message::EditorMoveToStart),
            KeyCode::End if ctrl => Some(Message::EditorMoveToEnd),
            KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
            KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
            KeyCode::Home => Some(Message::EditorMoveHome),
            KeyCode::End => Some(Message::EditorMoveEnd),
            KeyCode::PageUp => Some(Message::EditorScrollUp(10)),
            KeyCode::PageDown => Some(Message::EditorScrollDown(10)),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::EditorInsertChar(c)),
            _ => None,
        }
    }

    fn handle_map_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => Some(Message::MapPan(-MAP_PAN_STEP, 0)),
            KeyCode::Char('l') | KeyCode::Right => Some(Message::MapPan(MAP_PAN_STEP, 0)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MapPan(0, -MAP_PAN_STEP / 2)),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MapPan(0, MAP_PAN_STEP / 2)),
            KeyCode::Char('+' | '=') => Some(Message::MapZoomIn),
            KeyCode::Char('-' | '_') => Some(Message::MapZoomOut),
            KeyCode::Char('f') => Some(Message::MapFit),
            KeyCode::Char('c') => Some(Message::ClearMap),
            KeyCode::Char('u') => Some(Message::ToggleUrlSafe),
            KeyCode::Char('y') => Some(Message::CopyText),
            KeyCode::Char('w') => Some(Message::ToggleWatch),
            KeyCode::Char('r') => Some(Message::ForceReload),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            KeyCode::Char('e' | 'i') | KeyCode::Enter | KeyCode::Esc => {
                Some(Message::FocusPane(Pane::Editor))
            }
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
