//! Analyze many inputs on a worker pool, one whole analysis per worker.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audio::analysis::{analyze, analyze_base64, analyze_samples};
use crate::audio::decode::decode_file;
use crate::audio::features::AnalysisResult;
use crate::error::{AnalysisError, Result};

/// How the bytes of an input file are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Probe and decode a real container (WAV, MP3, FLAC, OGG, AAC)
    #[default]
    Auto,
    /// Raw little-endian 16-bit mono PCM
    Pcm,
    /// Base64 text wrapping raw PCM
    Base64,
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub format: InputFormat,
    /// Used for `pcm` and `base64`; decoded containers carry their own rate.
    pub sample_rate: u32,
    /// 0 means one worker per core.
    pub threads: usize,
}

pub fn analyze_file(path: &Path, format: InputFormat, sample_rate: u32) -> Result<AnalysisResult> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    match format {
        InputFormat::Pcm => {
            let bytes = std::fs::read(path)?;
            analyze(&bytes, sample_rate, Some(&name))
        }
        InputFormat::Base64 => {
            let text = std::fs::read_to_string(path)?;
            analyze_base64(&text, sample_rate, Some(&name))
        }
        InputFormat::Auto => {
            let audio = decode_file(path)?;
            Ok(analyze_samples(&audio, Some(&name)))
        }
    }
}

/// Results come back in input order. `on_done` runs once per finished input,
/// from whichever worker finished it.
pub fn analyze_files<F>(paths: &[PathBuf], options: &BatchOptions, on_done: F) -> Result<Vec<Result<AnalysisResult>>>
where
    F: Fn(&Path) + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .map_err(|e| AnalysisError::WorkerPool(e.to_string()))?;

    log::info!(
        "Analyzing {} input(s) on {} worker(s)",
        paths.len(),
        pool.current_num_threads()
    );

    let results: Vec<Result<AnalysisResult>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = analyze_file(path, options.format, options.sample_rate);
                if let Err(ref e) = result {
                    log::warn!("Analysis of {} failed: {}", path.display(), e);
                }
                on_done(path);
                result
            })
            .collect()
    });

    Ok(results)
}
