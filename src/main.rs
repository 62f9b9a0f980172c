use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tpu_tools::consolidate::{
    self, ConsolidateOptions, DEFAULT_EXTENSION, DEFAULT_OUTPUT, DEFAULT_SOURCE_PREFIX,
};
use tpu_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging() {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Consolidate(args) => execute_consolidate(args),
    }
}

fn execute_consolidate(args: ConsolidateArgs) -> Result<()> {
    let directory = match args.directory {
        Some(directory) => directory,
        None => prompt_directory(&args.extension)?,
    };
    let directory = consolidate::expand_home(&directory, consolidate::home_dir().as_deref());
    let output = match args.output {
        Some(output) => output,
        None => default_output()?,
    };
    let options = ConsolidateOptions {
        extension: args.extension,
        source_prefix: args.source_prefix,
    };

    let consolidation = consolidate::run(&directory, &output, &options)?;

    println!("Processed {} files:", consolidation.files_processed());
    for sheet in &consolidation.sheets {
        println!("  {:50} -> {} records", sheet.file_name, sheet.records);
    }
    println!("Wrote {}", output.display());
    println!("Total records: {}", consolidation.total_records());
    Ok(())
}

fn prompt_directory(extension: &str) -> Result<PathBuf> {
    print!("Enter the folder containing the .{extension} files: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim().trim_matches('"').trim();
    Ok(PathBuf::from(trimmed))
}

fn default_output() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let base = exe.parent().map(PathBuf::from).unwrap_or_default();
    Ok(base.join(DEFAULT_OUTPUT))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate CNJ class sheets (.xls HTML tables) into one JSON file."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge every sheet of a directory into one JSON collection.
    Consolidate(ConsolidateArgs),
}

#[derive(clap::Args)]
struct ConsolidateArgs {
    /// Folder holding the sheets. Prompted for when omitted.
    directory: Option<PathBuf>,

    /// Output JSON path. Defaults to `doctxt/classesProcessuaisTbr.json` next
    /// to the executable.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Spreadsheet extension, without the dot.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Prefix stripped from file names to build each record's source.
    #[arg(long, default_value = DEFAULT_SOURCE_PREFIX)]
    source_prefix: String,
}
