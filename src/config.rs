//! Configuration for a theme build
//!
//! A theme root may carry an optional `theme.toml`:
//!
//! ```toml
//! [paths]
//! sections = "sections"
//! snippets = "snippets"
//! dest = "src"
//!
//! [watch]
//! debounce_ms = 100
//! ```
//!
//! Every key is optional; defaults reproduce the conventional layout.
//! Unknown keys are reported as warnings, not errors, so a typo never
//! silently changes where output lands.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};
use crate::models::ComponentKind;

/// File name of the optional per-theme config
pub const CONFIG_FILE: &str = "theme.toml";

/// Source/destination directory names, relative to the theme root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_sections")]
    pub sections: String,

    #[serde(default = "default_snippets")]
    pub snippets: String,

    /// Destination tree receiving `sections/`, `snippets/` and `assets/`
    #[serde(default = "default_dest")]
    pub dest: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            snippets: default_snippets(),
            dest: default_dest(),
        }
    }
}

fn default_sections() -> String {
    "sections".to_string()
}

fn default_snippets() -> String {
    "snippets".to_string()
}

fn default_dest() -> String {
    "src".to_string()
}

/// Watch-mode tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period after the last change before a component rebuilds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

/// Parsed `theme.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

/// An unrecognized key found while parsing `theme.toml`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

impl Config {
    /// Load config from an explicit path
    pub fn load(path: &Path) -> ThemeResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load config, collecting warnings for unknown keys
    pub fn load_with_warnings(path: &Path) -> ThemeResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |ignored| {
            unknown_paths.push(ignored.to_string());
        })
        .map_err(|e| ThemeError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|key| ConfigWarning {
                key,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load `<root>/theme.toml` when present, defaults otherwise
    ///
    /// A malformed config is an error; a missing one is not.
    pub fn load_or_default(root: &Path) -> ThemeResult<(Self, Vec<ConfigWarning>)> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load_with_warnings(&path)
        } else {
            Ok((Self::default(), Vec::new()))
        }
    }
}

/// Resolved source and destination directories for one theme
#[derive(Debug, Clone)]
pub struct ThemePaths {
    /// Theme root directory
    pub root: PathBuf,
    /// Source root holding section component directories
    pub sections_src: PathBuf,
    /// Source root holding snippet component directories
    pub snippets_src: PathBuf,
    /// Destination for augmented section templates
    pub dest_sections: PathBuf,
    /// Destination for augmented snippet templates
    pub dest_snippets: PathBuf,
    /// Flat destination for compiled `.css` / wrapped `.js` assets
    pub dest_assets: PathBuf,
}

impl ThemePaths {
    /// Resolve the directory layout for `root` under `config`
    pub fn resolve(root: &Path, config: &Config) -> Self {
        let dest = root.join(&config.paths.dest);
        Self {
            root: root.to_path_buf(),
            sections_src: root.join(&config.paths.sections),
            snippets_src: root.join(&config.paths.snippets),
            dest_sections: dest.join("sections"),
            dest_snippets: dest.join("snippets"),
            dest_assets: dest.join("assets"),
        }
    }

    /// Source root for a component kind
    pub fn src_for(&self, kind: ComponentKind) -> &Path {
        match kind {
            ComponentKind::Section => &self.sections_src,
            ComponentKind::Snippet => &self.snippets_src,
        }
    }

    /// Template destination directory for a component kind
    pub fn template_dest_for(&self, kind: ComponentKind) -> &Path {
        match kind {
            ComponentKind::Section => &self.dest_sections,
            ComponentKind::Snippet => &self.dest_snippets,
        }
    }
}
