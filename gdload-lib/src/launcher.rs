use crate::error::LoadError;
use std::path::PathBuf;
use std::process::Command;

/// What the engine needs to start from a downloaded bundle.
///
/// Built once per successful download and moved into [`EngineLauncher::launch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParameters {
    /// Local path of the downloaded bundle
    pub uri: String,
    /// Checksum exactly as the user entered it
    pub md5: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Public key forwarded as `--apk_expansion_key`
    pub expansion_key: Option<String>,
    /// Arguments appended after the bundle arguments
    pub extra_args: Vec<String>,
    /// Also pass the bundle as `--main-pack`, which desktop builds need to load it
    pub main_pack: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            expansion_key: None,
            extra_args: vec![],
            main_pack: true,
        }
    }
}

impl LaunchParameters {
    pub fn command_line(&self, options: &LaunchOptions) -> Vec<String> {
        let mut args = vec![
            "--use_apk_expansion".to_string(),
            "--apk_expansion_md5".to_string(),
            self.md5.clone(),
            "--apk_expansion_path".to_string(),
            self.uri.clone(),
        ];

        if let Some(key) = &options.expansion_key {
            args.push("--apk_expansion_key".to_string());
            args.push(key.clone());
        }

        if options.main_pack {
            args.push("--main-pack".to_string());
            args.push(self.uri.clone());
        }

        args.extend(options.extra_args.iter().cloned());
        args
    }
}

pub trait EngineLauncher: Send + Sync {
    /// Starts the engine with `params`. Returns once the engine has been started,
    /// not when it exits.
    fn launch(&self, params: LaunchParameters) -> Result<(), LoadError>;
}

/// Starts a Godot executable as a detached child process.
pub struct GodotLauncher {
    executable: PathBuf,
    options: LaunchOptions,
}

impl GodotLauncher {
    pub fn new(executable: PathBuf, options: LaunchOptions) -> Self {
        Self {
            executable,
            options,
        }
    }
}

impl EngineLauncher for GodotLauncher {
    fn launch(&self, params: LaunchParameters) -> Result<(), LoadError> {
        let args = params.command_line(&self.options);
        tracing::debug!("Starting {} {}", self.executable.display(), args.join(" "));

        let child = Command::new(&self.executable)
            .args(&args)
            .spawn()
            .map_err(|source| LoadError::Launch {
                executable: self.executable.clone(),
                source,
            })?;

        tracing::debug!("Engine started with pid {}", child.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LaunchParameters {
        LaunchParameters {
            uri: "/data/app/app.obb".to_string(),
            md5: "abc123".to_string(),
        }
    }

    #[test]
    fn test_command_line_defaults() {
        assert_eq!(
            params().command_line(&LaunchOptions::default()),
            vec![
                "--use_apk_expansion",
                "--apk_expansion_md5",
                "abc123",
                "--apk_expansion_path",
                "/data/app/app.obb",
                "--main-pack",
                "/data/app/app.obb",
            ]
        );
    }

    #[test]
    fn test_command_line_with_key_and_extra_args() {
        let options = LaunchOptions {
            expansion_key: Some("KEY".to_string()),
            extra_args: vec!["--xr_mode_regular".to_string(), "--use_depth_32".to_string()],
            main_pack: false,
        };
        assert_eq!(
            params().command_line(&options),
            vec![
                "--use_apk_expansion",
                "--apk_expansion_md5",
                "abc123",
                "--apk_expansion_path",
                "/data/app/app.obb",
                "--apk_expansion_key",
                "KEY",
                "--xr_mode_regular",
                "--use_depth_32",
            ]
        );
    }

    #[test]
    fn test_command_line_passes_empty_checksum() {
        let params = LaunchParameters {
            uri: "/b.obb".to_string(),
            md5: String::new(),
        };
        let args = params.command_line(&LaunchOptions::default());
        assert_eq!(args[1], "--apk_expansion_md5");
        assert_eq!(args[2], "");
    }

    #[test]
    fn test_launch_missing_executable_fails() {
        let launcher = GodotLauncher::new(
            PathBuf::from("/definitely/not/a/godot/binary"),
            LaunchOptions::default(),
        );
        let err = launcher.launch(params()).unwrap_err();
        assert!(matches!(err, LoadError::Launch { .. }));
    }
}
