use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use super::*;
use crate::geometry::{Coord, VertexRef, parse_strict};
use crate::map::MapView;
use crate::sync::{SAMPLE_WKT, SyncOptions};

use super::event_loop::ResizeDebouncer;

fn model_with(text: &str) -> Model {
    Model::new(text, (80, 24))
}

fn apply(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    msgs.into_iter().fold(model, update)
}

fn type_text(model: Model, text: &str) -> Model {
    apply(model, text.chars().map(Message::EditorInsertChar))
}

fn text_of(model: &Model) -> String {
    model.editor().text()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// A model whose map has been laid out, as after the first frame.
fn loaded_model(text: &str) -> Model {
    let mut model = model_with(text);
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    model.dispatch_map_events();
    model
}

// ==================== Live sync ====================

#[test]
fn test_typing_renders_once_text_is_valid() {
    let model = type_text(model_with(""), "POINT (1 2");
    assert_eq!(model.feature_count(), 0);
    assert!(model.parse_error().is_some());
    assert!(model.active_toast().is_none(), "typing never toasts errors");

    let model = type_text(model, ")");
    assert_eq!(model.feature_count(), 1);
    assert!(model.parse_error().is_none());
}

#[test]
fn test_backspace_resyncs() {
    let model = type_text(model_with(""), "POINT (1 2)");
    let model = update(model, Message::EditorDeleteBack);
    assert_eq!(text_of(&model), "POINT (1 2");
    assert_eq!(model.feature_count(), 1, "invalid text keeps previous features");
    assert!(model.parse_error().is_some());
}

#[test]
fn test_paste_replaces_features() {
    let model = type_text(model_with(""), "POINT (1 2)");
    let model = apply(
        model,
        [
            Message::ClearText,
            Message::EditorPaste("MULTIPOINT ((10 40), (40 30), (20 20))".into()),
        ],
    );
    assert_eq!(model.feature_count(), 3);
}

#[test]
fn test_pasted_text_with_line_breaks_renders() {
    let model = update(
        model_with(""),
        Message::EditorPaste("LINESTRING (30 10,\n\t10 30,\n\t40 40)".into()),
    );
    assert_eq!(model.feature_count(), 1);
    assert!(model.parse_error().is_none());
}

#[test]
fn test_cursor_moves_do_not_resync() {
    let mut model = type_text(model_with(""), "POINT (1 2)");
    model.sync.clear();
    let model = apply(
        model,
        [
            Message::EditorMoveHome,
            Message::EditorMoveWordRight,
            Message::EditorMoveCursor(crate::editor::Direction::Right),
        ],
    );
    assert_eq!(model.feature_count(), 0);
}

// ==================== Explicit sync ====================

#[test]
fn test_sync_reports_success() {
    let model = update(model_with(SAMPLE_WKT), Message::Sync);
    assert_eq!(model.feature_count(), 2);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("2 feature"));
}

#[test]
fn test_sync_reports_error_even_after_live_sync_saw_it() {
    let model = type_text(model_with(""), "POLYGON ((0 0, 1 1");
    assert!(model.active_toast().is_none());

    let model = update(model, Message::Sync);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Invalid WKT"));
}

#[test]
fn test_sync_without_changes_says_up_to_date() {
    let model = apply(model_with("POINT (1 2)"), [Message::Sync, Message::Sync]);
    assert_eq!(model.active_toast().unwrap().0, "Map is up to date");
}

#[test]
fn test_clear_map_then_sync_repopulates() {
    let model = apply(model_with("POINT (3 4)"), [Message::Sync, Message::ClearMap]);
    assert_eq!(model.feature_count(), 0);
    assert_eq!(text_of(&model), "POINT (3 4)");

    let model = update(model, Message::Sync);
    assert_eq!(model.feature_count(), 1);
}

#[test]
fn test_clear_text_keeps_features() {
    let model = apply(model_with("POINT (3 4)"), [Message::Sync, Message::ClearText]);
    assert_eq!(text_of(&model), "");
    assert_eq!(model.feature_count(), 1);
}

// ==================== Delimiters ====================

#[test]
fn test_toggle_url_safe_rewrites_text() {
    let model = update(model_with("LINESTRING (30 10, 10 30)"), Message::ToggleUrlSafe);
    assert!(model.url_safe);
    assert_eq!(text_of(&model), "LINESTRING(30+10,10+30)");

    let model = update(model, Message::ToggleUrlSafe);
    assert!(!model.url_safe);
    assert_eq!(text_of(&model), "LINESTRING(30 10,10 30)");
}

#[test]
fn test_toggle_url_safe_on_bad_text_keeps_mode() {
    let model = update(model_with("LINESTRING (30 10,"), Message::ToggleUrlSafe);
    assert!(!model.url_safe);
    assert_eq!(text_of(&model), "LINESTRING (30 10,");
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Error);
}

// ==================== Map interaction ====================

#[test]
fn test_dragging_vertex_writes_text_back() {
    let model = loaded_model("POLYGON ((0 0, 20 0, 10 20, 0 0))");
    assert_eq!(model.feature_count(), 1);
    let (col, row) = model.map().world_to_cell(Coord::new(10.0, 20.0)).unwrap();

    let model = apply(
        model,
        [
            Message::MapPointerDown(col, row),
            Message::MapPointerDrag(col + 3, row),
            Message::MapPointerUp(col + 3, row),
        ],
    );

    assert_eq!(model.focus, Pane::Map);
    let text = text_of(&model);
    assert!(text.starts_with("POLYGON(("), "compact form written: {text}");
    let moved = parse_strict(&text)
        .unwrap()
        .vertex(VertexRef::new(0, 2))
        .unwrap();
    assert!(moved.x > 10.0);
    assert_eq!(model.sync.last_text(), text);
}

#[test]
fn test_map_to_text_then_typing_syncs_again() {
    let model = loaded_model("POINT (1 1)");
    let model = apply(model, [Message::MapPointerDown(40, 5), Message::MapPointerUp(40, 5)]);
    assert_eq!(text_of(&model), "POINT(1 1)");

    let model = apply(
        model,
        [Message::EditorMoveToEnd, Message::EditorDeleteBack, Message::EditorPaste(")".into())],
    );
    assert_eq!(model.feature_count(), 1);
    assert!(model.parse_error().is_none());
}

#[test]
fn test_read_only_features_pan_instead_of_editing() {
    let model = model_with("POLYGON ((0 0, 20 0, 10 20, 0 0))").with_sync_options(SyncOptions {
        editable: false,
        focus: false,
    });
    let mut model = update(model, Message::Sync);
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    model.dispatch_map_events();
    let id = model.sync.features()[0];
    let (col, row) = model.map().world_to_cell(Coord::new(10.0, 20.0)).unwrap();
    let before = model.map().camera().center;

    let model = apply(
        model,
        [
            Message::MapPointerDown(col, row),
            Message::MapPointerDrag(col + 3, row),
        ],
    );
    assert_ne!(model.map().camera().center, before);
    let vertex = model
        .map()
        .feature_geometry(id)
        .and_then(|g| g.vertex(VertexRef::new(0, 2)))
        .unwrap();
    assert_eq!(vertex, Coord::new(10.0, 20.0));
}

#[test]
fn test_zoom_messages_clamp() {
    let model = apply(model_with(""), std::iter::repeat_n(Message::MapZoomIn, 30));
    assert!((model.map().camera().zoom - 18.0).abs() < f64::EPSILON);
    let model = apply(model, std::iter::repeat_n(Message::MapZoomOut, 30));
    assert!(model.map().camera().zoom.abs() < f64::EPSILON);
}

#[test]
fn test_map_fit_centers_on_features() {
    let model = loaded_model("LINESTRING (100 40, 120 60)");
    let model = update(model, Message::MapFit);
    assert_eq!(model.map().camera().center, Coord::new(110.0, 50.0));
}

#[test]
fn test_map_fit_without_features_toasts() {
    let model = update(model_with(""), Message::MapFit);
    assert_eq!(model.active_toast().unwrap().0, "Nothing to fit");
}

// ==================== Map events ====================

#[test]
fn test_loaded_fills_sample_into_empty_editor() {
    let model = loaded_model("");
    assert_eq!(text_of(&model), SAMPLE_WKT);
    assert_eq!(model.feature_count(), 2);
}

#[test]
fn test_loaded_without_sample_leaves_editor_empty() {
    let mut model = model_with("");
    model.sample_on_load = false;
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    assert!(model.dispatch_map_events());
    assert_eq!(text_of(&model), "");
    assert_eq!(model.feature_count(), 0);
}

#[test]
fn test_loaded_with_focus_pans_to_point() {
    let mut model = model_with("POINT (10 20)").with_sync_options(SyncOptions {
        editable: true,
        focus: true,
    });
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    model.dispatch_map_events();
    assert_eq!(model.map().camera().center, Coord::new(10.0, 20.0));
}

#[test]
fn test_url_safe_start_formats_the_loaded_sample() {
    let mut model = model_with("");
    model.url_safe_on_load = true;
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    model.dispatch_map_events();

    assert!(model.url_safe);
    assert!(!model.url_safe_on_load);
    let text = text_of(&model);
    assert!(text.starts_with("MULTIPOLYGON(((40+40,"), "url-safe sample: {text}");
    assert_eq!(parse_strict(&text).unwrap(), parse_strict(SAMPLE_WKT).unwrap());
    assert_eq!(model.feature_count(), 2);
}

#[test]
fn test_url_safe_start_with_bad_text_stays_spaced() {
    let mut model = model_with("POINT (1");
    model.url_safe_on_load = true;
    model.map_mut().set_area(Rect::new(30, 1, 50, 22));
    model.dispatch_map_events();

    assert!(!model.url_safe);
    assert_eq!(text_of(&model), "POINT (1");
}

#[test]
fn test_edit_with_several_features_warns_about_write_back() {
    let model = loaded_model("");
    assert_eq!(model.feature_count(), 2);
    let model = apply(model, [Message::MapPointerDown(40, 5), Message::MapPointerUp(40, 5)]);

    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);
    assert_eq!(message, "Only the first of 2 features was written to text");
    assert!(text_of(&model).starts_with("POLYGON(("));
}

#[test]
fn test_edit_with_one_feature_does_not_warn() {
    let model = loaded_model("POINT (1 1)");
    let model = apply(model, [Message::MapPointerDown(40, 5), Message::MapPointerUp(40, 5)]);
    assert!(model.active_toast().is_none());
}

#[test]
fn test_dispatch_without_events_reports_nothing() {
    let mut model = loaded_model("POINT (1 1)");
    assert!(!model.dispatch_map_events());
}

// ==================== Focus, help, quit ====================

#[test]
fn test_switch_focus_toggles_panes() {
    let model = update(model_with(""), Message::SwitchFocus);
    assert_eq!(model.focus, Pane::Map);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Pane::Editor);
}

#[test]
fn test_editor_click_focuses_editor() {
    let mut model = model_with("POINT (1 2)\nPOINT (3 4)");
    model.focus = Pane::Map;
    let model = update(model, Message::EditorMoveTo(1, 3));
    assert_eq!(model.focus, Pane::Editor);
    assert_eq!(model.editor().cursor().line, 1);
    assert_eq!(model.editor().cursor().col, 3);
}

#[test]
fn test_help_toggle_resets_scroll() {
    let model = apply(
        model_with(""),
        [Message::ToggleHelp, Message::HelpScrollDown, Message::HelpScrollDown],
    );
    assert!(model.help_visible);
    assert_eq!(model.help_scroll_offset, 2);
    let model = apply(model, [Message::HideHelp, Message::ToggleHelp]);
    assert_eq!(model.help_scroll_offset, 0);
}

#[test]
fn test_quit_sets_flag() {
    let model = update(model_with(""), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_toggle_watch_without_file_warns() {
    let model = update(model_with(""), Message::ToggleWatch);
    assert!(!model.watch_enabled);
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Warning);
}

// ==================== Key and mouse mapping ====================

#[test]
fn test_editor_keys() {
    let model = model_with("");
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::Sync));
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), &model),
        Some(Message::EditorSplitLine)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::EditorInsertChar('q'))
    );
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL), &model),
        Some(Message::EditorMoveWordLeft)
    );
}

#[test]
fn test_global_ctrl_keys() {
    let model = model_with("");
    assert_eq!(App::handle_key(ctrl('r'), &model), Some(Message::Sync));
    assert_eq!(App::handle_key(ctrl('u'), &model), Some(Message::ToggleUrlSafe));
    assert_eq!(App::handle_key(ctrl('y'), &model), Some(Message::CopyText));
    assert_eq!(App::handle_key(ctrl('l'), &model), Some(Message::ClearMap));
    assert_eq!(App::handle_key(ctrl('k'), &model), Some(Message::ClearText));
    assert_eq!(App::handle_key(ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(key(KeyCode::Tab), &model), Some(Message::SwitchFocus));
}

#[test]
fn test_map_keys() {
    let mut model = model_with("");
    model.focus = Pane::Map;
    assert_eq!(App::handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(key(KeyCode::Char('+')), &model), Some(Message::MapZoomIn));
    assert_eq!(App::handle_key(key(KeyCode::Char('f')), &model), Some(Message::MapFit));
    assert_eq!(
        App::handle_key(key(KeyCode::Left), &model),
        Some(Message::MapPan(-4, 0))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::FocusPane(Pane::Editor))
    );
}

#[test]
fn test_any_key_closes_help() {
    let mut model = model_with("");
    model.help_visible = true;
    assert_eq!(App::handle_key(key(KeyCode::Char('x')), &model), Some(Message::HideHelp));
    assert_eq!(App::handle_key(key(KeyCode::Down), &model), Some(Message::HelpScrollDown));
}

#[test]
fn test_paste_event_becomes_editor_paste() {
    let model = model_with("");
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(&Event::Paste("POINT (1 2)".into()), &model, 0, &mut debouncer);
    assert_eq!(msg, Some(Message::EditorPaste("POINT (1 2)".into())));
}

#[test]
fn test_resize_event_is_debounced() {
    let model = model_with("");
    let mut debouncer = ResizeDebouncer::new(100);
    assert_eq!(App::handle_event(&Event::Resize(100, 40), &model, 0, &mut debouncer), None);
    assert_eq!(debouncer.take_ready(50), None);
    assert_eq!(debouncer.take_ready(150), Some((100, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_mouse_over_map_zooms() {
    use crossterm::event::{MouseEvent, MouseEventKind};
    let model = loaded_model("");
    let scroll = |kind| MouseEvent {
        kind,
        column: 40,
        row: 5,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(scroll(MouseEventKind::ScrollUp), &model),
        Some(Message::MapZoomIn)
    );
    assert_eq!(
        App::handle_mouse(scroll(MouseEventKind::ScrollDown), &model),
        Some(Message::MapZoomOut)
    );
}

// ==================== Side effects ====================

#[test]
fn test_force_reload_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shape.wkt");
    std::fs::write(&path, "POINT (5 6)\n").unwrap();

    let mut model = model_with("").with_file_path(Some(path.clone()));
    App::handle_message_side_effects(&mut model, &mut None, &Message::ForceReload);
    assert_eq!(text_of(&model), "POINT (5 6)");
    assert_eq!(model.feature_count(), 1);
    assert_eq!(model.active_toast().unwrap().0, "Reloaded");

    std::fs::write(&path, "LINESTRING (0 0, 1 1)").unwrap();
    App::handle_message_side_effects(&mut model, &mut None, &Message::FileChanged);
    assert_eq!(text_of(&model), "LINESTRING (0 0, 1 1)");
}

#[test]
fn test_reload_of_missing_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = model_with("POINT (1 1)").with_file_path(Some(dir.path().join("gone.wkt")));
    App::handle_message_side_effects(&mut model, &mut None, &Message::ForceReload);
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Error);
    assert_eq!(text_of(&model), "POINT (1 1)");
}

#[test]
fn test_copy_of_empty_text_is_skipped() {
    let mut model = model_with("");
    App::handle_message_side_effects(&mut model, &mut None, &Message::CopyText);
    assert_eq!(model.active_toast().unwrap().0, "Nothing to copy");
}

#[test]
fn test_read_wkt_file_trims_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.wkt");
    std::fs::write(&path, "POINT (1 2)\r\n").unwrap();
    assert_eq!(read_wkt_file(&path).unwrap(), "POINT (1 2)");
}
