//! roastbook configuration.
//!
//! Loaded from `~/.roastbook/config.toml`. The file is optional.
//!
//! The recipes directory is resolved through a chain:
//!
//! 1. `--recipes-dir <dir>` — explicit per-command override
//! 2. `ROASTBOOK_RECIPES_DIR` env var
//! 3. `recipes-dir` in `~/.roastbook/config.toml`
//! 4. `<documents>/Openroast/Recipes/My Recipes/`

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::storage::RecipeStore;

/// Environment variable overriding the recipes directory.
pub const RECIPES_DIR_ENV: &str = "ROASTBOOK_RECIPES_DIR";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not determine the recipes directory; pass --recipes-dir or set ROASTBOOK_RECIPES_DIR")]
    NoRecipesDir,
}

/// roastbook configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Where new recipes are saved and `list` looks.
    pub recipes_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.roastbook/config.toml`.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file path: `~/.roastbook/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roastbook").join("config.toml"))
    }

    /// Resolve the recipes directory from the chain described in the module docs.
    pub fn recipes_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let from_env = env::var_os(RECIPES_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        resolve_recipes_dir(explicit, from_env, self.recipes_dir.as_deref())
    }
}

fn resolve_recipes_dir(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    configured: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(RecipeStore::default_root)
        .ok_or(ConfigError::NoRecipesDir)
}
