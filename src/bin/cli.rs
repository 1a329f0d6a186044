// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! bottess CLI

use anyhow::{Context, Result};
use bottess::bottess::{Bottess, CollectingWriter, RegionWriter, TextFacetWriter};
use bottess::cli::{load_mesh, CheckReport, EvalReport, Reporter, Scene};
use bottess::EngineConfig;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bottess")]
#[command(about = "BoT solidity checks and triangle-soup CSG evaluation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./bottess.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a JSON mesh bounds a closed, oriented solid
    Check {
        /// Mesh file
        mesh: PathBuf,

        /// List every defect instead of stopping at the first
        #[arg(short, long)]
        report: bool,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: Format,
    },

    /// Evaluate every region of a JSON scene
    Eval {
        /// Scene file
        scene: PathBuf,

        /// Write the resulting facets to this file
        #[arg(long)]
        facets: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: Format,
    },

    /// Print the effective configuration
    Config {
        /// Also write it to this file
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = EngineConfig::load_with(cli.config.as_deref())?;

    let outcome = match &cli.command {
        Commands::Check {
            mesh,
            report,
            format,
        } => check_command(mesh, *report, *format),
        Commands::Eval {
            scene,
            facets,
            format,
        } => eval_command(config, scene, facets.as_deref(), *format, cli.verbose),
        Commands::Config { write } => config_command(&config, write.as_deref()),
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            Reporter::report_error(&format!("{:#}", err));
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bottess=debug" } else { "bottess=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check_command(path: &Path, itemize: bool, format: Format) -> Result<bool> {
    let mesh = load_mesh(path)?;

    let start = Instant::now();
    let report = CheckReport::run(&path.display().to_string(), &mesh, itemize);
    let duration = start.elapsed();

    match format {
        Format::Terminal => Reporter::report_check(&report, duration),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(report.solid)
}

fn eval_command(
    config: EngineConfig,
    path: &Path,
    facets: Option<&Path>,
    format: Format,
    verbose: bool,
) -> Result<bool> {
    let scene = Scene::from_file(path)?;
    if scene.regions.is_empty() {
        Reporter::report_warning(&format!("No regions in {}", path.display()));
        return Ok(true);
    }

    let mut sink: Box<dyn RegionWriter> = match facets {
        Some(out) => {
            let file = File::create(out)
                .with_context(|| format!("Failed to create facet file: {:?}", out))?;
            Box::new(TextFacetWriter::new(BufWriter::new(file)))
        }
        None => Box::new(CollectingWriter::new()),
    };

    let progress = if verbose {
        let pb = ProgressBar::new(scene.regions.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let driver = Bottess::new(config);
    let start = Instant::now();
    let summary = driver.walk_with(&scene.regions, sink.as_mut(), |region| {
        if let Some(pb) = &progress {
            pb.set_message(region.path.clone());
            pb.inc(1);
        }
    });
    let duration = start.elapsed();

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let failed = summary.failed();
    let report = EvalReport::new(&path.display().to_string(), summary);
    match format {
        Format::Terminal => {
            Reporter::report_walk(&report, duration);
            if let Some(out) = facets {
                Reporter::success(&format!("Facets written to {}", out.display()));
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(failed == 0)
}

fn config_command(config: &EngineConfig, write: Option<&Path>) -> Result<bool> {
    print!("{}", config.to_toml()?);
    if let Some(path) = write {
        config.save(path)?;
        Reporter::report_info(&format!("Configuration written to {}", path.display()));
    }
    Ok(true)
}
