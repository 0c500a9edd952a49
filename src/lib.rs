//! Themesmith - component theme build pipeline
//!
//! Themesmith packages a component-oriented theme source tree —
//! independent section and snippet folders, each holding an optional
//! Liquid template, SCSS stylesheet and script — into the flat bundle a
//! Liquid storefront consumes. Templates gain per-instance ids and
//! asset references, stylesheets are scoped and compiled, scripts are
//! wrapped into instance-constructible objects, and a watch mode
//! rebuilds exactly the component that changed.

pub mod augment;
pub mod config;
pub mod error;
pub mod fs;
pub mod locator;
pub mod models;
pub mod pipeline;
pub mod script;
pub mod style;
pub mod watcher;

// Re-exports for convenience
pub use augment::{augment_template, AugmentStage};
pub use config::{Config, ConfigWarning, ThemePaths};
pub use error::{ThemeError, ThemeResult};
pub use locator::find_components;
pub use models::{pascal_case, Component, ComponentKind};
pub use pipeline::{build_all, clean, process_component, BuildEvent, BuildReport};
pub use script::wrap_script;
pub use style::scope_and_compile;
pub use watcher::{owning_component, watch, RebuildQueue, WatchEvent, WatchOptions};
