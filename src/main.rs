//! rollstock-sql: CLI entry point.
//!
//! Converts car and locomotive datasheet workbooks into SQL insert scripts.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use rollstock_sql::logging;
use rollstock_sql::runner::{BatchRunner, ConvertedUnit, UnitKind};

#[derive(Parser)]
#[command(name = "rollstock-sql")]
#[command(about = "Convert rolling-stock datasheet workbooks into SQL inserts")]
#[command(version)]
struct Cli {
    /// Show debug logs (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert car workbooks into one multi-row insert.
    Cars {
        /// Directory searched for workbooks.
        #[arg(short, long, default_value = "cars")]
        input: PathBuf,

        /// SQL file to write.
        #[arg(short, long, default_value = "cars/cars.sql")]
        output: PathBuf,
    },
    /// Convert locomotive workbooks into one insert per unit.
    Locos {
        /// Directory searched for workbooks.
        #[arg(short, long, default_value = "loco")]
        input: PathBuf,

        /// SQL file to write.
        #[arg(short, long, default_value = "loco/loco.sql")]
        output: PathBuf,
    },
    /// Convert both cars and locomotives from their default locations.
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Cars { input, output } => convert(UnitKind::Cars, input, &output),
        Command::Locos { input, output } => convert(UnitKind::Locomotives, input, &output),
        Command::All => {
            for kind in [UnitKind::Cars, UnitKind::Locomotives] {
                convert(
                    kind,
                    PathBuf::from(kind.default_input()),
                    Path::new(kind.default_output()),
                )?;
            }
            Ok(())
        }
    }
}

fn convert(kind: UnitKind, input: PathBuf, output: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    let runner = BatchRunner::new(kind, input)
        .with_context(|| format!("failed to scan {} directory", kind.label()))?;

    println!("{}", format!("rollstock-sql: {}", kind.label()).bold());
    println!("  Input: {}", runner.input_dir().display());
    println!("  Output: {}", output.display());
    println!("  Workbooks: {}", runner.workbooks().len());
    println!();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);

    let converted = runner
        .run(&mut out, print_unit)
        .with_context(|| format!("{} conversion aborted", runner.kind().label()))?;

    println!();
    println!(
        "  {} {} {} written to {} in {:.2}s",
        "✓".green(),
        converted.to_string().green(),
        kind.label(),
        output.display(),
        start.elapsed().as_secs_f64()
    );
    println!();

    Ok(())
}

fn print_unit(unit: &ConvertedUnit) {
    let file = unit
        .path
        .file_name()
        .map_or_else(|| unit.path.display().to_string(), |n| n.to_string_lossy().into_owned());
    println!("  {} {} ({})", "✓".green(), unit.name, file.dimmed());
}
