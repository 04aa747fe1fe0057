//! Server configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory
    pub data_dir: PathBuf,
    /// Path to configuration file
    pub config_path: PathBuf,
    /// Database path
    pub database_path: PathBuf,
    /// Address the HTTP server listens on
    pub bind_addr: String,
    /// Lifetime of a login session in seconds
    pub session_ttl_secs: u64,
    /// Admin account seeded when the user table is empty
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapAdmin {
    #[serde(default = "default_admin_name")]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Optional `config.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    bind_addr: Option<String>,
    session_ttl_secs: Option<u64>,
    database_path: Option<PathBuf>,
    bootstrap_admin: Option<BootstrapAdmin>,
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_data_dir(home.join(".memory-system"))
    }
}

impl Config {
    fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            config_path: data_dir.join("config.toml"),
            database_path: data_dir.join("memsys.db"),
            data_dir,
            bind_addr: DEFAULT_BIND.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            bootstrap_admin: None,
        }
    }

    /// Load configuration.
    ///
    /// Precedence, highest first:
    /// 1. Environment variables (`MEMSYS_BIND`, `MEMSYS_SESSION_TTL_SECS`,
    ///    `MEMSYS_ADMIN_EMAIL` + `MEMSYS_ADMIN_PASSWORD`)
    /// 2. `<data dir>/config.toml`
    /// 3. Defaults
    ///
    /// The data directory is `MEMSYS_DIR` or `~/.memory-system`:
    /// ```text
    /// ~/.memory-system/
    /// ├── config.toml   # optional
    /// └── memsys.db     # SQLite database
    /// ```
    pub fn load() -> anyhow::Result<Self> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_dir = std::env::var("MEMSYS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".memory-system"));

        let mut config = Self::load_from(&data_dir)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load defaults plus `config.toml` from `data_dir`, creating the directory
    pub fn load_from(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let mut config = Self::with_data_dir(data_dir.to_path_buf());

        if config.config_path.exists() {
            let raw = std::fs::read_to_string(&config.config_path)?;
            let file: FileConfig = toml::from_str(&raw)?;
            if let Some(bind) = file.bind_addr {
                config.bind_addr = bind;
            }
            if let Some(ttl) = file.session_ttl_secs {
                config.session_ttl_secs = ttl;
            }
            if let Some(path) = file.database_path {
                config.database_path = if path.is_absolute() {
                    path
                } else {
                    data_dir.join(path)
                };
            }
            config.bootstrap_admin = file.bootstrap_admin;
        }

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("MEMSYS_BIND") {
            self.bind_addr = bind;
        }
        if let Some(ttl) = lookup("MEMSYS_SESSION_TTL_SECS") {
            self.session_ttl_secs = ttl
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("MEMSYS_SESSION_TTL_SECS: {}", e))?;
        }
        if let (Some(email), Some(password)) =
            (lookup("MEMSYS_ADMIN_EMAIL"), lookup("MEMSYS_ADMIN_PASSWORD"))
        {
            self.bootstrap_admin = Some(BootstrapAdmin {
                name: lookup("MEMSYS_ADMIN_NAME").unwrap_or_else(default_admin_name),
                email,
                password,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.config_path.ends_with("config.toml"));
        assert!(config.database_path.ends_with("memsys.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:8787");
        assert_eq!(config.session_ttl_secs, 43_200);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_load_from_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("nested/data");

        let config = Config::load_from(&data_dir).unwrap();

        assert!(data_dir.exists());
        assert!(config.database_path.starts_with(&data_dir));
    }

    #[test]
    fn test_load_from_reads_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            r#"
bind_addr = "0.0.0.0:9000"
session_ttl_secs = 60
database_path = "other.db"

[bootstrap_admin]
email = "root@example.org"
password = "changeme"
"#,
        )
        .unwrap();

        let config = Config::load_from(temp_dir.path()).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.database_path, temp_dir.path().join("other.db"));
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.name, "Administrator");
        assert_eq!(admin.email, "root@example.org");
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "session_ttl_secs = \"soon\"").unwrap();
        assert!(Config::load_from(temp_dir.path()).is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(temp_dir.path()).unwrap();

        let vars: HashMap<&str, &str> = HashMap::from([
            ("MEMSYS_BIND", "127.0.0.1:1234"),
            ("MEMSYS_SESSION_TTL_SECS", "30"),
            ("MEMSYS_ADMIN_EMAIL", "admin@example.org"),
            ("MEMSYS_ADMIN_PASSWORD", "pw"),
        ]);
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:1234");
        assert_eq!(config.session_ttl_secs, 30);
        assert_eq!(
            config.bootstrap_admin,
            Some(BootstrapAdmin {
                name: "Administrator".into(),
                email: "admin@example.org".into(),
                password: "pw".into(),
            })
        );
    }

    #[test]
    fn test_admin_override_needs_both_email_and_password() {
        let mut config = Config::default();
        config
            .apply_overrides(|k| (k == "MEMSYS_ADMIN_EMAIL").then(|| "a@b.c".to_string()))
            .unwrap();
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_bad_ttl_override_is_an_error() {
        let mut config = Config::default();
        let result =
            config.apply_overrides(|k| (k == "MEMSYS_SESSION_TTL_SECS").then(|| "x".to_string()));
        assert!(result.is_err());
    }
}
