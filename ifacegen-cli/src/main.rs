//! ifacegen CLI - interface generator for object-oriented type libraries.
//!
//! Features:
//! - Loads JSON type libraries from files or directories
//! - ifacegen.toml selection (whitelist/blacklist per assembly)
//! - Rayon-powered parallel generation
//! - Unchanged output is left untouched

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use ifacegen_core::{
    gather_library_files, init_structured_logging, load_config, load_config_file, log_error,
    log_info, log_warn, print_json, print_plain, FsTextStore, Ifacegen, IfacegenConfig,
    JsonTypeLibrary,
};

/// Output directory used when neither the config nor `--out` names one.
const DEFAULT_OUTPUT_DIR: &str = "generated";

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate role interfaces from type library metadata")]
pub struct Cli {
    /// Type library JSON files, or directories to scan for them
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Configuration file (defaults to ./ifacegen.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Emit fully qualified names instead of using directives
    #[arg(long)]
    no_simplify: bool,

    /// Generate obsolete types and members
    #[arg(long)]
    include_obsolete: bool,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Generate only these types (metadata full names)
    #[arg(long = "type", value_name = "FULL_NAME")]
    types: Vec<String>,
}

fn load_settings(cli: &Cli) -> Result<IfacegenConfig> {
    match &cli.config {
        Some(path) => load_config_file(path),
        None => Ok(load_config(Path::new("."))?.unwrap_or_default()),
    }
}

fn load_libraries(paths: &[PathBuf]) -> Result<JsonTypeLibrary> {
    let mut library = JsonTypeLibrary::new();
    for path in paths {
        let files = if path.is_dir() {
            gather_library_files(path)
                .with_context(|| format!("Failed to scan {}", path.display()))?
        } else {
            vec![path.clone()]
        };
        for file in files {
            library
                .add_path(&file)
                .with_context(|| format!("Failed to load type library {}", file.display()))?;
        }
    }
    Ok(library)
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] ifacegen internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    // JSON to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let config = load_settings(&cli)?;

    let library = load_libraries(&cli.paths)?;
    if library.is_empty() {
        log_warn(&format!("no types found in {:?}", cli.paths));
    } else {
        log_info(&format!(
            "loaded {} types from {}",
            library.len(),
            library.assemblies().join(", ")
        ));
    }

    let out_dir = cli
        .out
        .clone()
        .or_else(|| config.generation.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let store = FsTextStore::new(out_dir);

    let mut builder = Ifacegen::from_config(&config).context("Invalid selection in config")?;
    if cli.no_simplify {
        builder = builder.simplify_namespaces(false);
    }
    if cli.include_obsolete {
        builder = builder.include_obsolete(true);
    }
    let builder = builder.dry_run(cli.dry_run).types(cli.types.iter().cloned());

    let report = builder.run(&library, &store);

    if cli.json {
        print_json(&report);
    } else {
        print_plain(&report);
    }

    if report.has_failures() {
        log_error(&format!("{} type(s) failed", report.failures.len()));
        std::process::exit(1);
    }
    Ok(())
}
