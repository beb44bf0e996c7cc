use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use datcsv::{batch, convert_directory, convert_path, BatchOptions, FileTypeRegistry};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Converts Avida .dat files to csv files")]
struct Args {
    /// YAML file of known file types (name → description, columns)
    #[arg(long, global = true)]
    types: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single file
    File {
        /// Input .dat file
        input: PathBuf,
        /// Output .csv file
        output: PathBuf,
    },
    /// Convert every matching file under a directory
    Dir {
        /// Root directory to search
        root: PathBuf,
        /// Delete each source file once converted
        #[arg(long)]
        delete: bool,
        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,
        #[arg(long, default_value = batch::SOURCE_SUFFIX)]
        source_suffix: String,
        #[arg(long, default_value = batch::TARGET_SUFFIX)]
        target_suffix: String,
    },
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) args + optional known types ──────────────────────────────
    let args = Args::parse();
    let registry = args
        .types
        .as_deref()
        .map(load_registry)
        .transpose()?;

    // ─── 3) run ──────────────────────────────────────────────────────
    match args.command {
        Command::File { input, output } => {
            convert_path(&input, &output, registry.as_ref()).with_context(|| {
                format!("converting {} → {}", input.display(), output.display())
            })?;
        }
        Command::Dir {
            root,
            delete,
            fail_fast,
            source_suffix,
            target_suffix,
        } => {
            let options = BatchOptions {
                source_suffix,
                target_suffix,
                delete_after_conversion: delete,
                fail_fast,
                registry,
            };
            let report = convert_directory(&root, &options)
                .with_context(|| format!("scanning {}", root.display()))?;

            for failure in &report.failures {
                error!(
                    kind = ?failure.error.kind(),
                    "{}: {}",
                    failure.source.display(),
                    failure.error
                );
            }
            if !report.is_success() {
                bail!(
                    "{} of {} files failed ({} not attempted)",
                    report.failures.len(),
                    report.converted.len() + report.failures.len() + report.not_attempted,
                    report.not_attempted
                );
            }
            info!("{} files converted", report.converted.len());
        }
    }

    Ok(())
}

fn load_registry(path: &Path) -> Result<FileTypeRegistry> {
    let registry = FileTypeRegistry::load(path)
        .with_context(|| format!("loading file types from {}", path.display()))?;
    info!("{} known file types", registry.len());
    Ok(registry)
}
