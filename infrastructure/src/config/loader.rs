//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["campus-chat.toml", ".campus-chat.toml"];
const ENV_PREFIX: &str = "CAMPUS_CHAT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CAMPUS_CHAT_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./campus-chat.toml` or `./.campus-chat.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/campus-chat/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged provider chain, before extraction.
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Self::files(
            Self::global_config_path().filter(|p| p.exists()).as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        );

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment
    }

    /// File layers only, lowest priority first.
    fn files(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/campus-chat/config.toml if set,
    /// otherwise falls back to ~/.config/campus-chat/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("campus-chat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./campus-chat.toml or ./.campus-chat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.generation.max_tokens, 512);
        assert!(config.status.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("campus-chat"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");

        fs::write(
            &global,
            "[server]\nbase_url = \"http://global:8000\"\n[generation]\nmax_tokens = 100\n",
        )
        .unwrap();
        fs::write(&project, "[generation]\nmax_tokens = 200\ntop_p = 0.5\n").unwrap();
        fs::write(&explicit, "[generation]\ntop_p = 0.25\n").unwrap();

        let config: FileConfig =
            ConfigLoader::files(Some(&global), Some(&project), Some(&explicit))
                .extract()
                .unwrap();

        assert_eq!(config.server.base_url, "http://global:8000");
        assert_eq!(config.generation.max_tokens, 200);
        assert_eq!(config.generation.top_p, 0.25);
        // Untouched keys keep their defaults
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.server.stream_path, "/api/chat/stream");
    }

    #[test]
    fn test_env_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            jail.create_file(
                "campus-chat.toml",
                "[server]\nbase_url = \"http://project:8000\"\n[generation]\ntop_p = 0.5\nmax_tokens = 64\n",
            )?;
            jail.set_env("CAMPUS_CHAT_SERVER__BASE_URL", "http://env-host:9000");
            jail.set_env("CAMPUS_CHAT_GENERATION__TOP_P", "0.3");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;

            assert_eq!(config.server.base_url, "http://env-host:9000");
            assert_eq!(config.generation.top_p, 0.3);
            // Keys the environment leaves alone still come from the file
            assert_eq!(config.generation.max_tokens, 64);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let config: FileConfig = ConfigLoader::files(None, None, Some(&missing))
            .extract()
            .unwrap();

        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[generation]\nmax_tokens = \"many\"\n").unwrap();

        let result: Result<FileConfig, _> = ConfigLoader::files(None, None, Some(&bad)).extract();

        assert!(result.is_err());
    }
}
