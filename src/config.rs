use serde::Deserialize;
use std::path::{Path, PathBuf};

use vocalscope::batch::InputFormat;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub format: InputFormat,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub threads: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            format: InputFormat::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_sample_rate() -> u32 { vocalscope::DEFAULT_SAMPLE_RATE }
fn default_pretty() -> bool { true }

/// Explicit path, else `./vocalscope.toml`, else the per-user config locations.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("vocalscope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("vocalscope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("vocalscope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Invalid config: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.audio.sample_rate, 44100);
        assert_eq!(cfg.audio.format, InputFormat::Auto);
        assert!(cfg.output.pretty);
        assert_eq!(cfg.batch.threads, 0);
    }

    #[test]
    fn test_partial_config() {
        let cfg = parse_config(
            r#"
            [audio]
            sample_rate = 22050
            format = "pcm"

            [batch]
            threads = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.audio.sample_rate, 22050);
        assert_eq!(cfg.audio.format, InputFormat::Pcm);
        assert!(cfg.output.pretty);
        assert_eq!(cfg.batch.threads, 4);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(parse_config("[audio]\nsample_rate = \"fast\"").is_none());
    }
}
