use tracing::{info, warn};

use crate::app::Model;
use crate::app::model::{Pane, ToastLevel};
use crate::editor::Direction;
use crate::sync::SyncOutcome;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorPaste(String),
    /// Break the line at the cursor
    EditorSplitLine,
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    EditorMoveHome,
    /// Move cursor to end of line (End)
    EditorMoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    EditorMoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    EditorMoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    EditorMoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    EditorMoveToEnd,
    /// Move cursor to absolute position (line, col), e.g. from a mouse click
    EditorMoveTo(usize, usize),
    /// Scroll editor viewport up by n rows
    EditorScrollUp(usize),
    /// Scroll editor viewport down by n rows
    EditorScrollDown(usize),

    // Synchronization
    /// Push the text to the map and report the result
    Sync,
    /// Remove every feature from the map
    ClearMap,
    /// Empty the editor
    ClearText,
    /// Rewrite the text with the other coordinate delimiter
    ToggleUrlSafe,
    /// Copy the editor text to the clipboard
    CopyText,

    // Map
    /// Pointer pressed at a terminal cell
    MapPointerDown(u16, u16),
    /// Pointer dragged to a terminal cell
    MapPointerDrag(u16, u16),
    /// Pointer released at a terminal cell
    MapPointerUp(u16, u16),
    /// Zoom in one level
    MapZoomIn,
    /// Zoom out one level
    MapZoomOut,
    /// Pan by whole cells
    MapPan(i32, i32),
    /// Fit the camera to all rendered features
    MapFit,

    // Focus
    /// Switch keyboard focus between editor and map
    SwitchFocus,
    /// Give keyboard focus to a pane
    FocusPane(Pane),

    // File watching
    /// Toggle file watching
    ToggleWatch,
    /// File changed externally, reload
    FileChanged,
    /// Force reload file
    ForceReload,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Scroll help overlay up
    HelpScrollUp,
    /// Scroll help overlay down
    HelpScrollDown,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether this message changes the editor text.
    pub const fn edits_text(&self) -> bool {
        matches!(
            self,
            Self::EditorInsertChar(_)
                | Self::EditorPaste(_)
                | Self::EditorSplitLine
                | Self::EditorDeleteBack
                | Self::EditorDeleteForward
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Terminal and file I/O happen in the side-effect handler instead.
pub fn update(mut model: Model, msg: Message) -> Model {
    let edits_text = msg.edits_text();

    match msg {
        // Editor
        Message::EditorInsertChar(c) => model.editor_mut().insert_char(c),
        Message::EditorPaste(text) => model.editor_mut().insert_str(&text),
        Message::EditorSplitLine => model.editor_mut().split_line(),
        Message::EditorDeleteBack => {
            model.editor_mut().delete_back();
        }
        Message::EditorDeleteForward => {
            model.editor_mut().delete_forward();
        }
        Message::EditorMoveCursor(direction) => model.editor_mut().move_cursor(direction),
        Message::EditorMoveHome => model.editor_mut().move_home(),
        Message::EditorMoveEnd => model.editor_mut().move_end(),
        Message::EditorMoveWordLeft => model.editor_mut().move_word_left(),
        Message::EditorMoveWordRight => model.editor_mut().move_word_right(),
        Message::EditorMoveToStart => model.editor_mut().move_to_start(),
        Message::EditorMoveToEnd => model.editor_mut().move_to_end(),
        Message::EditorMoveTo(line, col) => {
            model.editor_mut().move_to(line, col);
            model.focus = Pane::Editor;
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_add(n);
        }

        // Synchronization
        Message::Sync => match model.sync_text() {
            SyncOutcome::Rendered(_) => {
                let count = model.feature_count();
                model.show_toast(ToastLevel::Info, format!("Rendered {count} feature(s)"));
            }
            SyncOutcome::Rejected(err) => {
                warn!(error = %err, "sync rejected");
                model.show_toast(ToastLevel::Error, format!("Invalid WKT: {err}"));
            }
            SyncOutcome::Unchanged => {
                if let Some(err) = model.parse_error() {
                    warn!(error = %err, "sync rejected");
                    let message = format!("Invalid WKT: {err}");
                    model.show_toast(ToastLevel::Error, message);
                } else {
                    model.show_toast(ToastLevel::Info, "Map is up to date");
                }
            }
        },
        Message::ClearMap => {
            model.sync.clear();
            model.show_toast(ToastLevel::Info, "Map cleared");
        }
        Message::ClearText => {
            model.sync.clear_text();
            model.editor_scroll_offset = 0;
        }
        Message::ToggleUrlSafe => {
            let url_safe = !model.url_safe;
            match model.sync.format_for_transport(url_safe) {
                Ok(_) => {
                    model.url_safe = url_safe;
                    info!(url_safe, "reformatted WKT");
                    let label = if url_safe { "URL-safe (+)" } else { "space" };
                    model.show_toast(ToastLevel::Info, format!("Delimiter: {label}"));
                }
                Err(err) => {
                    model.show_toast(ToastLevel::Error, format!("Cannot reformat: {err}"));
                }
            }
        }
        Message::CopyText => {}

        // Map
        Message::MapPointerDown(col, row) => {
            if model.map_mut().pointer_down(col, row) {
                model.focus = Pane::Map;
            }
        }
        Message::MapPointerDrag(col, row) => model.map_mut().pointer_drag(col, row),
        Message::MapPointerUp(col, row) => {
            model.map_mut().pointer_up(col, row);
            model.dispatch_map_events();
        }
        Message::MapZoomIn => model.map_mut().zoom_by(1.0),
        Message::MapZoomOut => model.map_mut().zoom_by(-1.0),
        Message::MapPan(cols, rows) => model.map_mut().pan_cells(cols, rows),
        Message::MapFit => {
            if !model.fit_all_features() {
                model.show_toast(ToastLevel::Info, "Nothing to fit");
            }
        }

        // Focus
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Pane::Editor => Pane::Map,
                Pane::Map => Pane::Editor,
            };
        }
        Message::FocusPane(pane) => model.focus = pane,

        // File watching
        Message::ToggleWatch => {
            if model.file_path.is_some() {
                model.watch_enabled = !model.watch_enabled;
            } else {
                model.show_toast(ToastLevel::Warning, "No file to watch");
            }
        }
        // Reloads happen in the side-effect handler.
        Message::FileChanged | Message::ForceReload => {}

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => model.help_visible = false,
        Message::HelpScrollUp => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(1);
        }
        Message::HelpScrollDown => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_add(1);
        }

        // Window
        Message::Resize(width, height) => model.terminal_size = (width, height),
        Message::Redraw => {}

        // Application
        Message::Quit => model.should_quit = true,
    }

    if edits_text {
        // Live sync while typing; errors wait for an explicit sync.
        model.sync_text();
    }

    model
}
