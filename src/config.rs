//! Saved default flags.
//!
//! A config file holds command-line flags, one or more per line, with `#`
//! comments. The global file and a local `.wktmaprc` are merged with the
//! flags given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const LOCAL_FILE: &str = ".wktmaprc";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub readonly: bool,
    pub no_focus: bool,
    pub url_safe: bool,
    pub no_sample: bool,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets. Switches are on when either side sets them;
    /// paths from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            readonly: self.readonly || other.readonly,
            no_focus: self.no_focus || other.no_focus,
            url_safe: self.url_safe || other.url_safe,
            no_sample: self.no_sample || other.no_sample,
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("wktmap").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("wktmap")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("wktmap").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("wktmap")
                .join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flags from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error when the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let switches = [
        (flags.watch, "--watch"),
        (flags.readonly, "--readonly"),
        (flags.no_focus, "--no-focus"),
        (flags.url_safe, "--url-safe"),
        (flags.no_sample, "--no-sample"),
        (flags.perf, "--perf"),
    ];
    let mut lines = vec!["# wktmap defaults (saved with --save)".to_string()];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove the config file at `path` if there is one.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of a token list, ignoring the rest.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--watch" => flags.watch = true,
            "--readonly" => flags.readonly = true,
            "--no-focus" => flags.no_focus = true,
            "--url-safe" => flags.url_safe = true,
            "--no-sample" => flags.no_sample = true,
            "--perf" => flags.perf = true,
            "--render-debug-log" | "--log-file" => {
                if let Some(next) = tokens.get(i + 1) {
                    let value = Some(PathBuf::from(next));
                    if token == "--log-file" {
                        flags.log_file = value;
                    } else {
                        flags.render_debug_log = value;
                    }
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--render-debug-log=") {
                    flags.render_debug_log = Some(PathBuf::from(value));
                } else if let Some(value) = token.strip_prefix("--log-file=") {
                    flags.log_file = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "wktmap",
            "--watch",
            "--readonly",
            "--url-safe",
            "--log-file",
            "wktmap.log",
            "--render-debug-log=render.log",
            "--wkt",
            "shape.wkt",
        ]));
        assert!(flags.watch);
        assert!(flags.readonly);
        assert!(flags.url_safe);
        assert!(!flags.no_focus);
        assert_eq!(flags.log_file, Some(PathBuf::from("wktmap.log")));
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
    }

    #[test]
    fn test_trailing_path_flag_without_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--no-sample", "--log-file"]));
        assert!(flags.no_sample);
        assert_eq!(flags.log_file, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_paths() {
        let file = ConfigFlags {
            watch: true,
            log_file: Some(PathBuf::from("file.log")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_focus: true,
            log_file: Some(PathBuf::from("cli.log")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.no_focus);
        assert_eq!(merged.log_file, Some(PathBuf::from("cli.log")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".wktmaprc");
        let flags = ConfigFlags {
            watch: true,
            readonly: true,
            no_focus: true,
            url_safe: true,
            no_sample: true,
            perf: true,
            render_debug_log: Some(PathBuf::from("render.log")),
            log_file: Some(PathBuf::from("wktmap.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "# --readonly\n\n  --watch --perf\n").unwrap();
        let flags = load_config_flags(&path).unwrap();
        assert!(flags.watch);
        assert!(flags.perf);
        assert!(!flags.readonly);
    }
}
