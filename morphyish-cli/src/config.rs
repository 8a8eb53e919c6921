use anyhow::{Context, Result};
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, Map};
use morphyish_core::BuildPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "./morphyish.toml";

/// Build settings merged from CLI args, env vars, the config file and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the gallery SVG files
    pub assets: String,
    /// Files copied verbatim to the output
    pub static_dir: String,
    /// Theme directory
    pub theme: String,
    /// Output directory for generated site
    pub output: String,
    /// Configuration file path
    pub config: String,
    /// Host for the preview server
    pub host: String,
    /// Port for the preview server
    pub port: u16,
    /// Open browser automatically
    pub open: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            assets: "./src/svg".to_string(),
            static_dir: "./static".to_string(),
            theme: "./theme".to_string(),
            output: "./build".to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            open: false,
        }
    }
}

impl BuildConfig {
    pub fn paths(&self) -> BuildPaths {
        BuildPaths {
            asset_dir: PathBuf::from(&self.assets),
            static_dir: PathBuf::from(&self.static_dir),
            theme_dir: PathBuf::from(&self.theme),
            output_dir: PathBuf::from(&self.output),
        }
    }
}

impl CliConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (MORPHYISH_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        Self::load_with_env(args, None)
    }

    /// `env` replaces the process environment when given
    fn load_with_env(args: &ArgMatches, env: Option<Map<String, String>>) -> Result<Self> {
        let config_file = arg(args, "config").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder()
            .add_source(ConfigBuilder::try_from(&Self::default())?);

        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        builder = builder.add_source(
            Environment::with_prefix("MORPHYISH")
                .prefix_separator("_")
                .separator("__") // Use double underscore for nested keys
                .try_parsing(true)
                .source(env),
        );

        for (arg_id, key) in [
            ("assets", "build.assets"),
            ("static", "build.static_dir"),
            ("theme", "build.theme"),
            ("output", "build.output"),
            ("config", "build.config"),
            ("host", "build.host"),
        ] {
            if let Some(value) = arg(args, arg_id) {
                builder = builder.set_override(key, value)?;
            }
        }
        // Only defined for `serve`
        if let Some(port) = args.try_get_one::<u16>("port").ok().flatten() {
            builder = builder.set_override("build.port", u64::from(*port))?;
        }
        if args.try_get_one::<bool>("open").ok().flatten() == Some(&true) {
            builder = builder.set_override("build.open", true)?;
        }

        let config = builder.build().context("Failed to load configuration")?;
        Ok(config.try_deserialize()?)
    }

    /// Site settings live in the same file but are parsed by morphyish-core
    pub fn site_config(&self) -> Result<morphyish_core::config::Config> {
        let path = Path::new(&self.build.config);
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(morphyish_core::config::Config::default());
        }

        morphyish_core::config::Config::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn arg(args: &ArgMatches, id: &str) -> Option<String> {
    args.try_get_one::<String>(id).ok().flatten().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};
    use tempfile::tempdir;

    fn command() -> Command {
        Command::new("test")
            .arg(Arg::new("output").long("output"))
            .arg(Arg::new("theme").long("theme"))
            .arg(Arg::new("config").long("config"))
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(Arg::new("open").long("open").action(ArgAction::SetTrue))
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.build.assets, "./src/svg");
        assert_eq!(config.build.output, "./build");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.build.port, 3000);
        assert!(!config.build.open);
    }

    #[test]
    fn test_cli_args_override() {
        let temp = tempdir().unwrap();
        let config_file = temp.path().join("absent.toml");
        let matches = command()
            .try_get_matches_from(vec![
                "test",
                "--output",
                "/custom/output",
                "--port",
                "8080",
                "--open",
                "--config",
                config_file.to_str().unwrap(),
            ])
            .unwrap();

        let config = CliConfig::load(&matches).unwrap();
        assert_eq!(config.build.output, "/custom/output");
        assert_eq!(config.build.port, 8080);
        assert!(config.build.open);
        // Should still have defaults for non-overridden values
        assert_eq!(config.build.theme, "./theme");
    }

    #[test]
    fn test_config_file_layer() {
        let temp = tempdir().unwrap();
        let config_file = temp.path().join("morphyish.toml");
        std::fs::write(
            &config_file,
            r#"
[build]
output = "./dist"
port = 4000

[site]
title = "Elsewhere"
"#,
        )
        .unwrap();

        let matches = command()
            .try_get_matches_from(vec![
                "test",
                "--config",
                config_file.to_str().unwrap(),
                "--theme",
                "./mine",
            ])
            .unwrap();

        let config = CliConfig::load(&matches).unwrap();
        assert_eq!(config.build.output, "./dist");
        assert_eq!(config.build.port, 4000);
        assert_eq!(config.build.theme, "./mine");
        assert_eq!(config.site_config().unwrap().site.title, "Elsewhere");
    }

    #[test]
    fn test_env_layer_between_file_and_cli() {
        let temp = tempdir().unwrap();
        let config_file = temp.path().join("morphyish.toml");
        std::fs::write(&config_file, "[build]\noutput = \"./from-file\"\nport = 4000\n").unwrap();
        let config_arg = config_file.to_str().unwrap();
        let env = || {
            Some(Map::from([
                ("MORPHYISH_BUILD__OUTPUT".to_string(), "./from-env".to_string()),
                ("MORPHYISH_BUILD__PORT".to_string(), "5000".to_string()),
            ]))
        };

        let matches = command()
            .try_get_matches_from(vec!["test", "--config", config_arg])
            .unwrap();
        let config = CliConfig::load_with_env(&matches, env()).unwrap();
        assert_eq!(config.build.output, "./from-env");
        assert_eq!(config.build.port, 5000);

        let matches = command()
            .try_get_matches_from(vec![
                "test",
                "--config",
                config_arg,
                "--output",
                "./from-cli",
                "--port",
                "6000",
            ])
            .unwrap();
        let config = CliConfig::load_with_env(&matches, env()).unwrap();
        assert_eq!(config.build.output, "./from-cli");
        assert_eq!(config.build.port, 6000);
    }

    #[test]
    fn test_missing_config_file_uses_site_defaults() {
        let temp = tempdir().unwrap();
        let config = CliConfig {
            build: BuildConfig {
                config: temp.path().join("nope.toml").to_string_lossy().into_owned(),
                ..BuildConfig::default()
            },
        };
        assert_eq!(config.site_config().unwrap().site.title, "Morphyish");
    }
}
