// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use powerscan_core::config::Settings;
use powerscan_core::files::enumerate_files;
use powerscan_core::reporting;
use powerscan_core::rules::FileRegistry;
use powerscan_core::session::{NeverCancelled, Session};
use powerscan_core::sink::MemorySink;

#[derive(Parser)]
#[command(name = "powerscan")]
#[command(about = "Runs the PowerScript analyzer over a source tree and collects its reports")]
struct Cli {
    /// Root directory to scan for PowerScript sources
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Absolute path to the analyzer's runnable artifact
    #[arg(long)]
    analyzer: Option<String>,

    /// Runtime launcher for the analyzer artifact
    #[arg(long)]
    launcher: Option<String>,

    /// JSON file with the active rules and their parameters
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Number of files analyzed in parallel
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Emit collected records as JSON instead of the console summary
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = Settings::load(&cli.path);
    if let Some(analyzer) = cli.analyzer {
        settings.analyzer_path = analyzer;
    }
    if let Some(launcher) = cli.launcher {
        settings.launcher = launcher;
    }
    if let Some(jobs) = cli.jobs {
        settings.jobs = jobs.max(1);
    }

    let registry = match &cli.rules {
        Some(path) => FileRegistry::from_json_file(path)
            .with_context(|| format!("loading active rules from {}", path.display()))?,
        None => FileRegistry::empty(),
    };

    let files = enumerate_files(&cli.path)
        .with_context(|| format!("enumerating sources under {}", cli.path.display()))?;

    let sink = MemorySink::new();
    let cancel = NeverCancelled;
    let session = Session::new(&settings, &sink, &cancel);
    let summary = session.run(&files, &registry);

    let records = sink.snapshot();
    if cli.json {
        println!("{}", reporting::to_json(&records)?);
    } else {
        reporting::print_summary(&records, summary);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
