/// Extract Google Chrome bookmarks as a URL list.
///
/// Output can be fed directly to: raged ingest --urls-file <file> --url-check
///
/// With --ingest the list is written to a file and handed to
/// `raged ingest --urls-file`, whose exit status is propagated.
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

mod bookmarks;
mod error;

const DEFAULT_INGEST_FILE: &str = "raged-bookmarks.txt";
const INGEST_PROGRAM: &str = "raged";

#[derive(Parser, Debug)]
#[command(name = "extract-chrome-bookmarks")]
#[command(
    about = "Extract Google Chrome bookmarks as a URL list",
    after_help = "Output can be fed to: raged ingest --urls-file <file> --url-check"
)]
struct Cli {
    /// Write URLs to file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only from this folder (case-insensitive substring)
    #[arg(short, long, default_value = "")]
    folder: String,

    /// Output "URL<TAB>Name" format
    #[arg(long)]
    with_names: bool,

    /// Chrome profile directory
    #[arg(long, default_value = "Default")]
    profile: String,

    /// Read this Bookmarks file instead of the profile's
    #[arg(long)]
    file: Option<PathBuf>,

    /// Run raged ingest --urls-file after extraction
    #[arg(long)]
    ingest: bool,

    /// Collection for --ingest
    #[arg(long, default_value = "bookmarks")]
    collection: String,

    /// API URL for --ingest
    #[arg(long)]
    api: Option<String>,

    /// With --ingest, pass --overwrite (re-import/update existing)
    #[arg(long)]
    update: bool,
}

impl Cli {
    fn validate(&self) -> Result<(), &'static str> {
        if self.update && !self.ingest {
            return Err("--update requires --ingest (it maps to raged ingest --overwrite)");
        }
        if self.ingest && self.with_names {
            return Err("--with-names is incompatible with --ingest (ingest expects URL-only lines)");
        }
        Ok(())
    }

    fn output_path(&self) -> Option<PathBuf> {
        match &self.output {
            Some(p) => Some(p.clone()),
            None if self.ingest => Some(std::env::temp_dir().join(DEFAULT_INGEST_FILE)),
            None => None,
        }
    }

    fn ingest_args(&self, urls_file: &std::path::Path) -> Vec<String> {
        let mut args = vec![
            "ingest".to_string(),
            "--urls-file".to_string(),
            urls_file.to_string_lossy().to_string(),
            "--collection".to_string(),
            self.collection.clone(),
        ];
        if let Some(api) = self.api.as_deref().filter(|a| !a.is_empty()) {
            args.push("--api".to_string());
            args.push(api.to_string());
        }
        if self.update {
            args.push("--overwrite".to_string());
        }
        args
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let bookmarks_file = match &cli.file {
        Some(path) => path.clone(),
        None => bookmarks::chrome_bookmarks_path(&cli.profile)?,
    };
    debug!("Reading bookmarks from {}", bookmarks_file.display());

    let out = bookmarks::extract_from_path(&bookmarks_file, &cli.folder, cli.with_names)?;
    let text = bookmarks::render(&out.lines);

    match cli.output_path() {
        Some(urls_file) => {
            std::fs::write(&urls_file, &text)
                .with_context(|| format!("Failed to write {}", urls_file.display()))?;
            eprintln!("Wrote {} URLs to {}", out.total, urls_file.display());

            if cli.ingest {
                return run_ingest(INGEST_PROGRAM, &cli.ingest_args(&urls_file));
            }
        }
        None => {
            print!("{}", text);
            eprintln!("# Total: {} unique bookmarks", out.total);
        }
    }

    Ok(0)
}

/// Run the ingest command with inherited stdio; returns its exit code.
fn run_ingest(program: &str, args: &[String]) -> Result<i32> {
    info!("Running {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run {}", program))?;

    Ok(if status.success() { 0 } else { status.code().unwrap_or(1) })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(msg) = cli.validate() {
        eprintln!("{}", msg);
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}
