//! Core data models for Themesmith
//!
//! Defines the fundamental data structures used throughout the build
//! pipeline:
//! - `ComponentKind`: section or snippet
//! - `Component`: one source directory with optional template,
//!   stylesheet and script files
//!
//! Components are recomputed from disk on every build pass and never
//! persisted; no component references another.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of theme component
///
/// Ordering matters only for stable logs: sections sort (and build)
/// before snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Top-level page building block, rendered once per placement by the
    /// host with a stable `section.id`
    Section,
    /// Reusable fragment invoked with `{% render %}`, possibly many
    /// times per page
    Snippet,
}

impl ComponentKind {
    /// Subdirectory name under both the source and destination roots
    pub fn subdir(&self) -> &'static str {
        match self {
            ComponentKind::Section => "sections",
            ComponentKind::Snippet => "snippets",
        }
    }

    /// Suffix of the canonical wrapper name (`HeroSection`, `ButtonSnippet`)
    pub fn wrapper_suffix(&self) -> &'static str {
        match self {
            ComponentKind::Section => "Section",
            ComponentKind::Snippet => "Snippet",
        }
    }

    /// Liquid variable holding the per-render instance id
    pub fn id_var(&self) -> &'static str {
        match self {
            ComponentKind::Section => "section_id",
            ComponentKind::Snippet => "snippet_id",
        }
    }

    /// Noun used in generated code and log lines
    pub fn noun(&self) -> &'static str {
        match self {
            ComponentKind::Section => "section",
            ComponentKind::Snippet => "snippet",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// A component source directory: `sections/<name>/` or `snippets/<name>/`
///
/// Source files inside are named after the directory
/// (`<name>.liquid`, `<name>.scss`, `<name>.js`); each is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    /// Kebab-case component name (the directory name)
    pub name: String,
    /// Section or snippet
    pub kind: ComponentKind,
    /// Absolute path of the source directory
    pub dir: PathBuf,
}

impl Component {
    /// Create a component rooted at `dir`
    pub fn new(name: impl Into<String>, kind: ComponentKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            dir: dir.into(),
        }
    }

    /// Path of the (possibly absent) Liquid template source
    pub fn template_path(&self) -> PathBuf {
        self.dir.join(format!("{}.liquid", self.name))
    }

    /// Path of the (possibly absent) SCSS stylesheet source
    pub fn style_path(&self) -> PathBuf {
        self.dir.join(format!("{}.scss", self.name))
    }

    /// Path of the (possibly absent) script source
    pub fn script_path(&self) -> PathBuf {
        self.dir.join(format!("{}.js", self.name))
    }

    /// PascalCase identifier derived from the kebab-case name
    /// (`product-card` → `ProductCard`)
    pub fn pascal_name(&self) -> String {
        pascal_case(&self.name)
    }

    /// Canonical wrapper name registered in the browser global scope
    /// (`hero` section → `HeroSection`)
    ///
    /// Names that differ only in separator characters collide here;
    /// `build_all` detects and reports such collisions.
    pub fn wrapper_name(&self) -> String {
        format!("{}{}", self.pascal_name(), self.kind.wrapper_suffix())
    }

    /// Output file name of the compiled stylesheet
    pub fn css_asset(&self) -> String {
        format!("{}.css", self.name)
    }

    /// Output file name of the wrapped script
    pub fn js_asset(&self) -> String {
        format!("{}.js", self.name)
    }

    /// Output file name of the augmented template
    pub fn template_asset(&self) -> String {
        format!("{}.liquid", self.name)
    }
}

/// Convert a kebab-case (or snake_case) name to PascalCase
pub fn pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
