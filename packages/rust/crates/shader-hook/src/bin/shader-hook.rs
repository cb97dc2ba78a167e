//! shader-hook CLI: inject effect hooks into a tree of vanilla shaders.
//!
//! Logging: set `RUST_LOG=shader_hook=debug` to see per-step outcomes on stderr.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shader_hook::{BatchConfig, InjectionProfile, TransformationPipeline, render};

#[derive(Parser, Debug)]
#[command(
    name = "shader-hook",
    about = "Inject effect hooks into vanilla .vsh/.fsh files"
)]
struct Cli {
    /// Directory containing shaders (recursively scanned).
    dir: PathBuf,

    /// Show what would change without writing files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Disable .bak backups.
    #[arg(long, default_value_t = false)]
    no_backup: bool,

    /// Print a diff under each changed file.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// YAML injection profile overriding the built-in names.
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Parallel workers (0 = one per core).
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Files larger than this are reported as errors.
    #[arg(long, value_name = "BYTES", default_value_t = 1_048_576)]
    max_file_size: u64,

    /// Directory names to skip (repeatable).
    #[arg(long = "skip-dir", value_name = "NAME", default_values_t = vec![".git".to_string()])]
    skip_dirs: Vec<String>,

    /// Debug logging.
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "shader_hook=debug"
        } else {
            "shader_hook=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let root = std::fs::canonicalize(&cli.dir).unwrap_or_else(|_| cli.dir.clone());
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let profile = match &cli.profile {
        Some(path) => InjectionProfile::load(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => InjectionProfile::default(),
    };
    let pipeline = TransformationPipeline::new(profile).context("invalid injection profile")?;

    let config = BatchConfig {
        dry_run: cli.dry_run,
        backup: !cli.no_backup,
        max_file_size: cli.max_file_size,
        workers: cli.workers,
        skip_dirs: cli.skip_dirs,
        show_diff: cli.diff,
    };

    let stats = pipeline.batch_inject(&root, &config);
    println!("{}", render(&stats, &config));

    if stats.files_failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
