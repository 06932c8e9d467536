use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

use tsbundle_bundler::{Config, run_bundle};

#[derive(Debug, Parser)]
#[command(name = "bundle")]
#[command(about = "Bundle a TypeScript module and its imports into a single file", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Print the bundle result as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli);

    let start = Instant::now();
    let entry_arg = cli.config.entry.display().to_string();
    let output_arg = cli.config.output.display().to_string();

    match run_bundle(cli.config) {
        Ok(result) => {
            let elapsed_ms = start.elapsed().as_millis();
            info!("Bundled {} modules in {}ms", result.modules.len(), elapsed_ms);

            if cli.json {
                serde_json::to_writer_pretty(&mut stdout, &result)?;
                writeln!(stdout)?;
            } else {
                writeln!(
                    stdout,
                    "{} Bundled {} → {} ({} modules, {}ms)",
                    "✓".green().bold(),
                    entry_arg.cyan(),
                    output_arg.cyan(),
                    result.modules.len(),
                    elapsed_ms
                )?;
            }
            stdout.flush()?;
            Ok(())
        }
        Err(err) => {
            debug!("Bundle failed: {:?}", err);
            stdout.flush()?;
            eprintln!("{} Bundle failed [{}]: {}", "✗".red().bold(), err.kind().red(), err);
            std::process::exit(1);
        }
    }
}
