use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub inventory: InventoryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InventoryConfig {
    /// Catalog snapshot read at startup
    pub path: String,
    /// Drop expired groceries before reporting
    #[serde(default)]
    pub sweep_expired: bool,
    /// Write the snapshot back when the sweep removed anything
    #[serde(default = "default_true")]
    pub save_after_sweep: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogConfig {
    pub level: String,
}

fn default_true() -> bool { true }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &run_mode)
    }

    /// Layer `default`, `{run_mode}` and `local` files from `dir` (all optional)
    /// over the built-in defaults, then `STOCKROOM__*` environment variables.
    pub fn load_from(dir: &Path, run_mode: &str) -> Result<Self, config::ConfigError> {
        let file = |name: &str| {
            let path = dir.join(name);
            config::File::with_name(&path.to_string_lossy()).required(false)
        };

        let s = config::Config::builder()
            .set_default("inventory.path", "inventory.json")?
            .set_default("inventory.sweep_expired", false)?
            .set_default("inventory.save_after_sweep", true)?
            .set_default("log.level", "info")?
            .add_source(file("default"))
            .add_source(file(run_mode))
            // Not checked in
            .add_source(file("local"))
            // Eg.. `STOCKROOM__INVENTORY__PATH=shop.json`
            .add_source(
                config::Environment::with_prefix("STOCKROOM")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path(), "test").unwrap();

        assert_eq!(config.inventory.path, "inventory.json");
        assert!(!config.inventory.sweep_expired);
        assert!(config.inventory.save_after_sweep);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_run_mode_file_overrides_default_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[inventory]\npath = \"shop.json\"\n\n[log]\nlevel = \"warn\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("nightly.toml"),
            "[inventory]\nsweep_expired = true\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path(), "nightly").unwrap();

        assert_eq!(config.inventory.path, "shop.json");
        assert!(config.inventory.sweep_expired);
        assert_eq!(config.log.level, "warn");
    }
}
