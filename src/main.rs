mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};

use cli::{Cli, Command};
use config::Config;
use vocalscope::batch::{self, BatchOptions, InputFormat};
use vocalscope::progress;
use vocalscope::score::ScoreBreakdown;
use vocalscope::{AnalysisResult, DEFAULT_SAMPLE_RATE};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    let cfg = match config::resolve_config_path(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Command::Analyze {
            inputs,
            mut format,
            mut sample_rate,
            output,
            mut threads,
            compact,
        } => {
            // Config values apply only where the CLI is still at its default
            if format == InputFormat::Auto { format = cfg.audio.format; }
            if sample_rate == DEFAULT_SAMPLE_RATE { sample_rate = cfg.audio.sample_rate; }
            if threads == 0 { threads = cfg.batch.threads; }

            let options = BatchOptions {
                format,
                sample_rate,
                threads,
            };
            run_analyze(&inputs, &options, output.as_deref(), !compact && cfg.output.pretty, cli.quiet)
        }
        Command::Compare {
            before,
            after,
            compact,
        } => {
            let before = read_result(&before)?;
            let after = read_result(&after)?;
            let comparison = progress::compare(&before, &after);
            write_json(&comparison, None, !compact && cfg.output.pretty)
        }
        Command::Trend { results, compact } => {
            let history = results
                .iter()
                .map(|path| read_result(path).map(|r| ScoreBreakdown::from_result(&r)))
                .collect::<Result<Vec<_>>>()?;
            let report = progress::trend(&history).context("No results to summarize")?;
            write_json(&report, None, !compact && cfg.output.pretty)
        }
    }
}

fn run_analyze(
    inputs: &[PathBuf],
    options: &BatchOptions,
    output: Option<&Path>,
    pretty: bool,
    quiet: bool,
) -> Result<()> {
    for input in inputs {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }

    log::info!(
        "Format: {:?}, sample rate: {}Hz (raw input only)",
        options.format,
        options.sample_rate
    );

    if let [input] = inputs {
        let result = batch::analyze_file(input, options.format, options.sample_rate)
            .with_context(|| format!("Failed to analyze {}", input.display()))?;
        return write_json(&result, output, pretty);
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(inputs.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let results = batch::analyze_files(inputs, options, |_| pb.inc(1))?;
    pb.finish_with_message("Analysis complete");

    let total = results.len();
    let mut succeeded: Vec<AnalysisResult> = Vec::with_capacity(total);
    let mut failed = 0usize;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(r) => succeeded.push(r),
            Err(e) => {
                log::error!("{}: {}", input.display(), e);
                failed += 1;
            }
        }
    }

    write_json(&succeeded, output, pretty)?;

    if failed > 0 {
        anyhow::bail!("{} of {} inputs failed to analyze", failed, total);
    }
    Ok(())
}

fn read_result(path: &Path) -> Result<AnalysisResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis result: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse analysis result: {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            log::info!("Done! Output: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
