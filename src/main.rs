//! markport - Main Entry Point
//!
//! Command-line front end: preview Markdown as HTML, export it to a
//! standalone HTML page or a Word document, or copy the rendered HTML.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use markport::config::{get_config_file_path, load_config, save_config, Settings};
use markport::docx::read_outline;
use markport::editor::{EditorState, DEFAULT_CONTENT};
use markport::error::{Error, Result};
use markport::export::StyleTable;
use markport::preview::PreviewRenderer;

/// Application name constant.
const APP_NAME: &str = "markport";

#[derive(Parser)]
#[command(name = "markport")]
#[command(version, about = "Markdown preview with HTML and Word export", long_about = None)]
#[command(after_help = "EXAMPLES:
    markport preview notes.md        Print the rendered HTML
    markport html notes.md -o out    Write out/markdown-preview.html
    markport docx - < notes.md       Write document.docx from stdin
    markport docx                    Export the built-in sample")]
struct Cli {
    /// Open the exported file with the system viewer
    #[arg(long, global = true)]
    open: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the HTML preview
    Preview {
        /// Markdown file, `-` for stdin; the sample document if omitted
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Export a standalone HTML page (markdown-preview.html)
    Html {
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Export a Word document (document.docx)
    Docx {
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Copy the rendered HTML to the clipboard
    Copy {
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Print the sample document
    Sample,
    /// List the headings of a .docx file
    Outline {
        #[arg(value_name = "DOCX")]
        file: PathBuf,
    },
    /// Show the configuration file, or create it with defaults
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_config();
    let renderer = PreviewRenderer::from_settings(&settings);
    let open_after = cli.open || settings.open_after_export;

    match cli.command {
        Command::Preview { input } => {
            let state = load_state(input.as_deref(), &settings)?;
            print!("{}", state.preview(&renderer));
        }
        Command::Html { input, output } => {
            let mut state = load_state(input.as_deref(), &settings)?;
            let dir = output.unwrap_or_else(|| settings.export_dir());
            let path = state.save_html(&renderer, &settings.html_title, &dir)?;
            finish_export(&path, open_after);
        }
        Command::Docx { input, output } => {
            let state = load_state(input.as_deref(), &settings)?;
            let dir = output.unwrap_or_else(|| settings.export_dir());
            let path = state.export_docx(&renderer, &StyleTable::default(), &dir)?;
            finish_export(&path, open_after);
        }
        Command::Copy { input } => {
            let state = load_state(input.as_deref(), &settings)?;
            state.copy_html(&renderer)?;
            println!("Copied HTML to the clipboard");
        }
        Command::Sample => print!("{}", DEFAULT_CONTENT),
        Command::Outline { file } => {
            let bytes = fs::read(&file).map_err(|source| Error::FileRead {
                path: file.clone(),
                source,
            })?;
            for entry in read_outline(&bytes)? {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                println!("{}{}", indent, entry.text);
            }
        }
        Command::Config { init } => {
            let path = get_config_file_path()?;
            if init && !path.exists() {
                save_config(&settings)?;
                info!("Created {}", path.display());
            }
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

/// Editor state for the given input: a file, `-` for stdin, or the sample.
fn load_state(input: Option<&Path>, settings: &Settings) -> Result<EditorState> {
    let source = match input {
        None => DEFAULT_CONTENT.to_string(),
        Some(path) if path == Path::new("-") => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
        Some(path) => fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?,
    };
    info!("{}: loaded {} bytes of Markdown", APP_NAME, source.len());
    Ok(EditorState::from_settings(source, settings))
}

fn finish_export(path: &Path, open_after: bool) {
    println!("{}", path.display());
    if open_after {
        if let Err(e) = open::that(path) {
            warn!("Failed to open {}: {}", path.display(), e);
        }
    }
}
