//! Markpane - A terminal markdown editor with live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! markpane
//! markpane notes.md
//! markpane --view preview --theme light notes.md
//! markpane --print notes.md > notes.html
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use markpane::app::{App, SAMPLE_DOCUMENT};
use markpane::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markpane::convert::{ComrakRenderer, DEFAULT_DEBOUNCE_MS, Pipeline};
use markpane::view::{Theme, ViewMode, ViewState};

/// A terminal markdown editor with live HTML preview
#[derive(Parser, Debug)]
#[command(name = "markpane", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open (the sample document is used when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial layout
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Quiet period after the last edit before converting, in milliseconds
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Hide tab bar, status bar and pane borders
    #[arg(long)]
    fullscreen: bool,

    /// Pass raw HTML in the markdown through to the output
    #[arg(long)]
    unsafe_html: bool,

    /// Write log events to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Convert FILE (or stdin) once, print the HTML and exit
    #[arg(long)]
    print: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("markpane=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_html(file: Option<&Path>, unsafe_html: bool) -> Result<()> {
    let markdown = read_input(file)?;
    let pipeline = Pipeline::new(ComrakRenderer::new().with_unsafe_html(unsafe_html));
    let conversion = pipeline.convert(0, &markdown);
    let mut out = std::io::stdout().lock();
    out.write_all(conversion.html.as_bytes())
        .and_then(|()| out.flush())
        .context("Failed to write HTML")?;
    if let Some(err) = conversion.error {
        anyhow::bail!("Conversion failed: {err}");
    }
    Ok(())
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

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    if cli.print {
        return print_html(cli.file.as_deref(), effective.unsafe_html);
    }

    let (text, source_name) = match cli.file.as_deref() {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string());
            (read_input(Some(path))?, name)
        }
        None => (SAMPLE_DOCUMENT.to_string(), None),
    };

    let view = ViewState {
        mode: effective.view.unwrap_or_default(),
        theme: effective.theme.unwrap_or_default(),
        fullscreen: effective.fullscreen,
        html_source: false,
    };

    // Run the application
    let mut app = App::new(text)
        .with_source_name(source_name)
        .with_view(view)
        .with_debounce_ms(effective.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
        .with_unsafe_html(effective.unsafe_html)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
