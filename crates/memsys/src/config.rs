//! Configuration for the memsys CLI.
//!
//! Resolved from command-line flags, which clap backs with environment
//! variables:
//! 1. `--api-url` / `MEMSYS_API_URL` (default `http://127.0.0.1:8787`)
//! 2. `--data-dir` / `MEMSYS_DATA_DIR` (default: platform data directory)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of memsys-server, without trailing slash
    pub api_url: String,
    /// Root of the CLI's persisted state
    pub data_dir: PathBuf,
}

impl Config {
    pub fn resolve(api_url: &str, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir,
        })
    }

    /// Directory of the session slots (`user.json`, `token`)
    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "memory-system", "memsys")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("Could not determine a data directory; pass --data-dir")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config::resolve(DEFAULT_API_URL, Some(PathBuf::from("/tmp/memsys"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/memsys"));
        assert_eq!(config.session_dir(), PathBuf::from("/tmp/memsys/session"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::resolve("http://example.org:8787/", Some(PathBuf::from("."))).unwrap();
        assert_eq!(config.api_url, "http://example.org:8787");
    }
}
