//! Argenta CLI - normalize Argenta bank statement exports
//!
//! ```bash
//! argenta parse < export.csv                    # Convert stdin
//! argenta parse --files jan.csv feb.csv         # Merge and convert files
//! argenta parse --files exports/ --no-header    # Every *.csv in a folder, no header
//! argenta parse --header-map map.json -f a.csv  # Override column names
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use argenta::logs::{log_debug, log_error, log_info, set_verbosity, Verbosity};
use argenta::{convert_files, convert_reader, ConvertResult, HeaderMap, HeaderOverrides, Settings, Transformer};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "argenta")]
#[command(about = "Convert Argenta CSV exports to normalized CSV", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print per-file details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Argenta CSV input from stdin, or merge and parse --files
    Parse {
        /// Leave out the header block of the first file
        #[arg(long)]
        no_header: bool,

        /// Argenta CSV files or folders (every *.csv inside) to merge
        #[arg(short, long, num_args = 1..)]
        files: Vec<PathBuf>,

        /// JSON object of column name overrides: {"Source": "canonical"}
        #[arg(long)]
        header_map: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Debug
    } else {
        settings.verbosity.unwrap_or(Verbosity::Normal)
    };
    set_verbosity(verbosity);

    let result = match cli.command {
        Commands::Parse {
            no_header,
            files,
            header_map,
        } => cmd_parse(!no_header, &files, header_map, &settings),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_parse(
    include_header: bool,
    files: &[PathBuf],
    header_map: Option<PathBuf>,
    settings: &Settings,
) -> ConvertResult<()> {
    let header_map = match header_map {
        Some(path) => HeaderMap::with_overrides(HeaderOverrides::load(&path)?.0)?,
        None => settings.build_header_map()?,
    };
    log_debug(format!("Header map: {} columns", header_map.len()));
    let transformer = Transformer::new(header_map);

    let output = if files.is_empty() {
        log_info("Reading Argenta CSV from stdin");
        convert_reader(io::stdin().lock(), &transformer)?
    } else {
        log_info(format!("Merging {} input path(s)", files.len()));
        convert_files(files, include_header, &transformer)?
    };

    // Nothing reaches stdout unless the whole conversion succeeded.
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
