use crate::launcher::LaunchOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "gdload.toml";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for gdload data (bundles, config file)
    pub data_dir: PathBuf,

    /// Directory downloaded bundles are written to
    pub bundle_dir: PathBuf,

    /// Path to the optional `gdload.toml` settings file
    pub config_file: PathBuf,

    /// Engine executable started after a successful download
    pub engine_executable: PathBuf,

    /// Extra settings for the engine command line
    pub launch_options: LaunchOptions,

    /// Limit for establishing the connection. The transfer itself is never timed out.
    pub connect_timeout: Option<Duration>,
}

/// `gdload.toml` file specification.
#[derive(Deserialize, Debug, Default)]
pub struct ConfigToml {
    pub engine: Option<EngineToml>,
    pub download: Option<DownloadToml>,
}

/// `[engine]` toml section.
#[derive(Deserialize, Debug, Default)]
pub struct EngineToml {
    pub executable: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub expansion_key: Option<String>,
    pub main_pack: Option<bool>,
}

/// `[download]` toml section.
#[derive(Deserialize, Debug, Default)]
pub struct DownloadToml {
    pub bundle_dir: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new_for_path(&Self::default_data_dir())
    }
}

impl Config {
    pub fn new_for_path(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            bundle_dir: data_dir.join("bundles"),
            config_file: data_dir.join(CONFIG_FILE_NAME),
            engine_executable: PathBuf::from("godot"),
            launch_options: LaunchOptions::default(),
            connect_timeout: None,
        }
    }

    /// Sets up a new Config for the given data directory, applying `gdload.toml` if present.
    /// See also [Self::default_data_dir].
    pub fn setup(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = data_dir
            .map(|d| d.to_path_buf())
            .unwrap_or_else(Self::default_data_dir);
        let data_dir = std::path::absolute(&data_dir)
            .context(format!("Invalid data directory: {}", data_dir.display()))?;
        let mut config = Self::new_for_path(&data_dir);

        if config.config_file.exists() {
            let content = std::fs::read_to_string(&config.config_file)?;
            let file = toml::from_str::<ConfigToml>(&content).context(format!(
                "Failed to parse {}",
                config.config_file.display()
            ))?;
            config.apply_file(file);
        }

        Ok(config)
    }

    /// Creates the bundle directory. Call once all overrides are applied.
    pub fn ensure_bundle_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.bundle_dir).context(format!(
            "Failed to create bundle directory {}",
            self.bundle_dir.display()
        ))
    }

    fn apply_file(&mut self, file: ConfigToml) {
        if let Some(engine) = file.engine {
            if let Some(executable) = engine.executable {
                self.engine_executable = executable;
            }
            if let Some(args) = engine.args {
                self.launch_options.extra_args = args;
            }
            if engine.expansion_key.is_some() {
                self.launch_options.expansion_key = engine.expansion_key;
            }
            if let Some(main_pack) = engine.main_pack {
                self.launch_options.main_pack = main_pack;
            }
        }

        if let Some(download) = file.download {
            if let Some(bundle_dir) = download.bundle_dir {
                // Relative paths are relative to the data directory
                self.bundle_dir = self.data_dir.join(bundle_dir);
            }
            self.connect_timeout = download.connect_timeout_secs.map(Duration::from_secs);
        }
    }

    /// Points downloads at another directory.
    pub fn with_bundle_dir(self, bundle_dir: &Path) -> Result<Self> {
        let bundle_dir = std::path::absolute(bundle_dir)
            .context(format!("Invalid bundle directory: {}", bundle_dir.display()))?;
        Ok(Self { bundle_dir, ..self })
    }

    pub fn with_engine_executable(self, engine_executable: &Path) -> Self {
        Self {
            engine_executable: engine_executable.to_path_buf(),
            ..self
        }
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"))
            .join("gdload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_setup_defaults() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        assert_eq!(config.bundle_dir, tmp_dir.path().join("bundles"));
        assert!(!config.bundle_dir.exists());
        config.ensure_bundle_dir()?;
        assert!(config.bundle_dir.is_dir());
        assert_eq!(config.engine_executable, PathBuf::from("godot"));
        assert!(config.launch_options.main_pack);
        assert!(config.connect_timeout.is_none());
        Ok(())
    }

    #[test]
    fn test_setup_reads_config_file() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        fs::write(
            tmp_dir.path().join(CONFIG_FILE_NAME),
            r#"
[engine]
executable = "/opt/godot/godot"
args = ["--xr_mode_regular", "--use_immersive"]
expansion_key = "KEY"
main_pack = false

[download]
bundle_dir = "obb"
connect_timeout_secs = 15
"#,
        )?;

        let config = Config::setup(Some(tmp_dir.path()))?;
        assert_eq!(config.engine_executable, PathBuf::from("/opt/godot/godot"));
        assert_eq!(
            config.launch_options.extra_args,
            vec!["--xr_mode_regular", "--use_immersive"]
        );
        assert_eq!(config.launch_options.expansion_key.as_deref(), Some("KEY"));
        assert!(!config.launch_options.main_pack);
        assert_eq!(config.bundle_dir, tmp_dir.path().join("obb"));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(15)));
        Ok(())
    }

    #[test]
    fn test_setup_rejects_malformed_config_file() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        fs::write(tmp_dir.path().join(CONFIG_FILE_NAME), "[engine\nargs = 1")?;
        assert!(Config::setup(Some(tmp_dir.path())).is_err());
        Ok(())
    }

    #[test]
    fn test_with_bundle_dir_leaves_default_dir_alone() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let target = tmp_dir.path().join("elsewhere/bundles");
        let config = Config::setup(Some(tmp_dir.path()))?.with_bundle_dir(&target)?;
        config.ensure_bundle_dir()?;
        assert_eq!(config.bundle_dir, target);
        assert!(target.is_dir());
        assert!(!tmp_dir.path().join("bundles").exists());
        Ok(())
    }
}
