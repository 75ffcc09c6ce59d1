use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::LevelFilter;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub log_level: LevelFilter,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: "> ".to_string(),
            log_level: LevelFilter::Off,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut src = String::new();
        File::open(path)?.read_to_string(&mut src)?;
        Self::load_from_str(&src)
    }

    /// `key = value` lines; `#` starts a comment.
    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();
        for (lineno, line) in src.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: no '=' found: {}",
                    lineno + 1,
                    line
                )));
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "prompt" => config.prompt = value.to_string(),
                "log_level" => {
                    config.log_level = value.parse().map_err(|_| {
                        ConfigError::Parse(format!(
                            "line {}: unknown log level: {}",
                            lineno + 1,
                            value
                        ))
                    })?;
                }
                _ => {
                    return Err(ConfigError::Parse(format!(
                        "line {}: unknown key: {}",
                        lineno + 1,
                        key
                    )));
                }
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] io::Error),
    #[error("parse config: {0}")]
    Parse(String),
}
