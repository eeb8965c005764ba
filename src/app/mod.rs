//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{AppSync, Model, Pane, ToastLevel, read_wkt_file};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::sync::SyncOptions;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug)]
pub struct App {
    initial_text: String,
    file_path: Option<PathBuf>,
    watch_enabled: bool,
    sync_options: SyncOptions,
    url_safe: bool,
    sample_on_load: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application whose editor starts with `initial_text`.
    pub fn new(initial_text: impl Into<String>) -> Self {
        Self {
            initial_text: initial_text.into(),
            file_path: None,
            watch_enabled: false,
            sync_options: SyncOptions {
                editable: true,
                focus: true,
            },
            url_safe: false,
            sample_on_load: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Remember the file the text came from, for reloads and watching.
    #[must_use]
    pub fn with_file_path(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Enable or disable file watching.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Options applied whenever the text is pushed to the map.
    #[must_use]
    pub const fn with_sync_options(mut self, options: SyncOptions) -> Self {
        self.sync_options = options;
        self
    }

    /// Start with `+` coordinate delimiters.
    #[must_use]
    pub const fn with_url_safe(mut self, url_safe: bool) -> Self {
        self.url_safe = url_safe;
        self
    }

    /// Fill an empty editor with sample WKT on startup.
    #[must_use]
    pub const fn with_sample(mut self, enabled: bool) -> Self {
        self.sample_on_load = enabled;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
