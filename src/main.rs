//! wktmap - edit Well-Known Text next to a live map in the terminal.
//!
//! # Usage
//!
//! ```bash
//! wktmap shape.wkt
//! wktmap --watch shape.wkt
//! wktmap --wkt 'POINT (10 20)'
//! echo 'POINT (1 2)' | wktmap --print --url-safe
//! ```

use std::fs::File;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wktmap::app::{App, read_wkt_file};
use wktmap::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use wktmap::perf;
use wktmap::sync::{SyncOptions, normalize_wkt};

/// Edit Well-Known Text next to a live, editable map
#[derive(Parser, Debug)]
#[command(name = "wktmap", version, about, long_about = None)]
struct Cli {
    /// WKT file to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// WKT to start with instead of a file
    #[arg(long, value_name = "TEXT", conflicts_with = "file")]
    wkt: Option<String>,

    /// Watch FILE for changes and reload
    #[arg(short, long)]
    watch: bool,

    /// Render features without vertex editing
    #[arg(long)]
    readonly: bool,

    /// Keep the view still when the text changes
    #[arg(long)]
    no_focus: bool,

    /// Use `+` between coordinates
    #[arg(long)]
    url_safe: bool,

    /// Start with an empty editor instead of sample WKT
    #[arg(long)]
    no_sample: bool,

    /// Print the normalized WKT and exit
    #[arg(long)]
    print: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log frame and sync timings
    #[arg(long)]
    perf: bool,

    /// Write detailed render events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Log to `log_file`, or to stderr when the terminal is not taken by the UI.
fn init_logging(log_file: Option<&PathBuf>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    } else if !interactive {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

/// The text to start with: `--wkt`, then FILE, then piped stdin.
fn initial_text(cli: &Cli) -> Result<Option<String>> {
    if let Some(text) = &cli.wkt {
        return Ok(Some(text.clone()));
    }
    if let Some(path) = &cli.file {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        return read_wkt_file(path).map(Some);
    }
    let stdin = std::io::stdin();
    if cli.print && !stdin.is_terminal() {
        let mut text = String::new();
        stdin
            .lock()
            .read_to_string(&mut text)
            .context("Failed to read WKT from stdin")?;
        return Ok(Some(text.trim_end().to_string()));
    }
    Ok(None)
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref(), !cli.print)?;

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("WKTMAP_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            error = %err,
            "failed to initialize render debug log"
        );
    }

    let text = initial_text(&cli)?;

    if cli.print {
        let text = text.context("Nothing to print: pass --wkt, a FILE or pipe WKT on stdin")?;
        let normalized = normalize_wkt(&text, effective.url_safe).context("Invalid WKT")?;
        println!("{normalized}");
        return Ok(());
    }

    let options = SyncOptions {
        editable: !effective.readonly,
        focus: !effective.no_focus,
    };
    let file_path = if cli.wkt.is_none() { cli.file } else { None };

    App::new(text.unwrap_or_default())
        .with_file_path(file_path)
        .with_watch(effective.watch)
        .with_sync_options(options)
        .with_url_safe(effective.url_safe)
        .with_sample(!effective.no_sample)
        .with_config_paths(Some(global_path), local_path.exists().then_some(local_path))
        .run()
        .context("Application error")
}
