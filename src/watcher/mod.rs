//! Notice when another program saves the open WKT file, so the editor and
//! map can reload it.
//!
//! The parent directory is watched rather than the file itself: editors
//! often save by writing a new file and renaming it over the old one.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches one WKT file and reports debounced changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    file: PathBuf,
    file_name: Option<OsString>,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl FileWatcher {
    /// Create a watcher for `path`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the path cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Backends report canonical absolute paths.
        let file = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let file_name = file.file_name().map(std::ffi::OsStr::to_os_string);
        let dir = parent_dir(&file);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(file = %file.display(), "watching");

        Ok(Self {
            _watcher: watcher,
            rx,
            dir,
            file,
            file_name,
            debounce,
            pending_since: None,
        })
    }

    /// The watched WKT file, canonicalized when it existed.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// True once the WKT file was saved and then left alone for the
    /// debounce period. Call once per frame.
    pub fn take_change_ready(&mut self) -> bool {
        if self.drain_saves() > 0 {
            self.pending_since = Some(Instant::now());
        }
        let settled = self
            .pending_since
            .is_some_and(|since| since.elapsed() >= self.debounce);
        if settled {
            self.pending_since = None;
        }
        settled
    }

    /// Empty the notify channel and count events that touch the WKT file.
    fn drain_saves(&self) -> usize {
        let mut saves = 0;
        let mut other = 0;
        for event in self.rx.try_iter() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => saves += 1,
                Ok(ev) => {
                    other += 1;
                    crate::perf::log_event("watcher.ignored", format!("{:?}", ev.paths));
                }
                Err(err) => {
                    tracing::warn!(error = %err, file = %self.file.display(), "watching WKT file failed");
                    crate::perf::log_event("watcher.error", format!("{err}"));
                }
            }
        }
        if saves + other > 0 {
            crate::perf::log_event(
                "watcher.poll",
                format!("saves={saves} other={other} file={}", self.file.display()),
            );
        }
        saves
    }

    /// Rename-over saves only report the directory, so that counts too.
    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.dir
                || path == &self.file
                || self
                    .file_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use tempfile::tempdir;

    fn event_for(paths: Vec<PathBuf>) -> Event {
        Event {
            kind: EventKind::Any,
            paths,
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_rename_over_wkt_file_counts_as_save() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("shape.wkt");
        std::fs::write(&path, "POINT (1 2)").expect("write");
        let watcher = FileWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(watcher.is_relevant(&event_for(vec![canonical_dir])));
        assert_eq!(watcher.path(), path.as_path());
    }

    #[test]
    fn test_other_wkt_file_in_same_dir_is_ignored() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("shape.wkt");
        std::fs::write(&path, "POINT (1 2)").expect("write");
        let watcher = FileWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(!watcher.is_relevant(&event_for(vec![canonical_dir.join("other.wkt")])));
    }

    #[test]
    fn test_bare_wkt_file_name_watches_current_dir() {
        assert_eq!(parent_dir(Path::new("shape.wkt")), PathBuf::from("."));
    }

    #[test]
    fn test_rewritten_shape_reloads_after_debounce() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().canonicalize().expect("canonicalize").join("shape.wkt");
        std::fs::write(&path, "POINT (1 2)").expect("write");

        // Same debounce as the app.
        let mut watcher = FileWatcher::new(&path, Duration::from_millis(200)).expect("watcher");
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "LINESTRING (0 0, 5 5)").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            if watcher.take_change_ready() {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        assert!(detected, "rewritten shape should be reported within 5 seconds");
    }
}
