use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tracing::debug;

use crate::editor::{Cursor, EditorBuffer};
use crate::geometry::{Bounds, WktError};
use crate::map::{MapEvent, MapListener, MapView, TerminalMap};
use crate::sync::{SyncOptions, SyncOutcome, Synchronizer, TextSurface};

/// The synchronizer as the app uses it.
pub type AppSync = Synchronizer<TerminalMap, EditorBuffer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Editor,
    Map,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Editor text, rendered features and the link between them
    pub sync: AppSync,
    /// File the text was loaded from, if any
    pub file_path: Option<PathBuf>,
    /// Pane receiving keystrokes
    pub focus: Pane,
    /// Whether coordinates are written with `+` instead of a space
    pub url_safe: bool,
    /// Fill an empty editor with sample WKT when the map first loads
    pub sample_on_load: bool,
    /// Switch to `+` delimiters once the map has loaded its first text
    pub url_safe_on_load: bool,
    /// First visual row shown in the editor pane
    pub editor_scroll_offset: usize,
    /// Editor text area from the last render, for mouse hit testing
    pub editor_area: Option<Rect>,
    /// Cursor at the last render; scrolling follows it only after it moves
    pub editor_last_cursor: Option<Cursor>,
    /// Whether file watching is enabled
    pub watch_enabled: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    pub help_scroll_offset: usize,
    /// Last known terminal size
    pub terminal_size: (u16, u16),
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("focus", &self.focus)
            .field("url_safe", &self.url_safe)
            .field("features", &self.sync.features().len())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model whose editor holds `text`.
    pub fn new(text: &str, terminal_size: (u16, u16)) -> Self {
        let sync = Synchronizer::new(TerminalMap::new(), EditorBuffer::from_text(text));
        Self {
            sync,
            file_path: None,
            focus: Pane::Editor,
            url_safe: false,
            sample_on_load: true,
            url_safe_on_load: false,
            editor_scroll_offset: 0,
            editor_area: None,
            editor_last_cursor: None,
            watch_enabled: false,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            help_scroll_offset: 0,
            terminal_size,
            should_quit: false,
            toast: None,
        }
    }

    #[must_use]
    pub fn with_sync_options(mut self, options: SyncOptions) -> Self {
        self.sync = self.sync.with_options(options);
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    pub const fn editor(&self) -> &EditorBuffer {
        self.sync.text_surface()
    }

    pub const fn editor_mut(&mut self) -> &mut EditorBuffer {
        self.sync.text_surface_mut()
    }

    pub const fn map(&self) -> &TerminalMap {
        self.sync.view()
    }

    pub const fn map_mut(&mut self) -> &mut TerminalMap {
        self.sync.view_mut()
    }

    pub fn feature_count(&self) -> usize {
        self.sync.features().len()
    }

    /// Push the editor text to the map with the configured options.
    pub(super) fn sync_text(&mut self) -> SyncOutcome {
        self.sync.text_to_map(self.sync.options())
    }

    /// Why the editor text was last rejected, if it was.
    pub fn parse_error(&self) -> Option<&WktError> {
        self.sync.last_error()
    }

    /// Deliver queued map events to the synchronizer.
    ///
    /// Returns true when any event was handled.
    pub fn dispatch_map_events(&mut self) -> bool {
        let events = self.map_mut().drain_events();
        if events.is_empty() {
            return false;
        }
        for event in events {
            debug!(?event, "map event");
            match event {
                MapEvent::Loaded if !self.sample_on_load => {
                    self.sync_text();
                }
                MapEvent::Loaded => self.sync.on_map_event(event),
                MapEvent::EditFinished => {
                    self.sync.on_map_event(event);
                    let features = self.feature_count();
                    if features > 1 {
                        self.show_toast(
                            ToastLevel::Warning,
                            format!("Only the first of {features} features was written to text"),
                        );
                    }
                }
            }
            if event == MapEvent::Loaded && self.url_safe_on_load {
                self.url_safe_on_load = false;
                self.url_safe = self.sync.format_for_transport(true).is_ok();
                self.sync_text();
            }
        }
        true
    }

    /// Move the camera so every rendered feature is visible.
    pub(super) fn fit_all_features(&mut self) -> bool {
        let bounds = self
            .map()
            .features()
            .filter_map(|(_, geometry, _)| geometry.bounds())
            .reduce(Bounds::union);
        let Some(bounds) = bounds else {
            return false;
        };
        if bounds.is_point() {
            self.map_mut().pan_to(bounds.min);
        } else {
            self.map_mut().fit_bounds(bounds);
        }
        true
    }

    pub(super) fn reload_from_disk(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        let text = read_wkt_file(&path)?;
        if text == self.editor().text() {
            return Ok(());
        }
        self.editor_mut().set_text(&text);
        self.sync_text();
        Ok(())
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

/// Read WKT from a file, trimming the trailing newline editors add.
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8.
pub fn read_wkt_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}
