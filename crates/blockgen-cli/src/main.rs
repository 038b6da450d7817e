// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Blockgen command-line interface.
//!
//! This is the main entry point for the `blockgen` command: load a saved
//! block program, run one generation, and write the C# text out.

use std::fs;

use blockgen_cli::program_file;
use blockgen_core::codegen::generate;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Blockgen: generate C# source from saved block programs
#[derive(Debug, Parser)]
#[command(name = "blockgen")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate C# from a block program file
    Generate {
        /// The saved program (JSON) to generate from
        path: Utf8PathBuf,

        /// Write the generated source here instead of stdout
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { path, output } => generate_command(&path, output.as_ref()),
    }
}

fn generate_command(path: &Utf8PathBuf, output: Option<&Utf8PathBuf>) -> Result<()> {
    info!(%path, "Loading block program");
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{path}'"))?;

    let program = program_file::parse_str(&source)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to decode '{path}'"))?;
    debug!(
        variables = program.variables.len(),
        roots = program.roots.len(),
        "Program loaded"
    );

    let code = generate(&program)
        .into_diagnostic()
        .wrap_err("Code generation failed")?;
    info!(bytes = code.len(), "Generation finished");

    match output {
        Some(out) => {
            fs::write(out, &code)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write '{out}'"))?;
            info!(%out, "Wrote generated source");
        }
        None => print!("{code}"),
    }
    Ok(())
}
