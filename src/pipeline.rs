//! Build orchestration
//!
//! Sequences discovery → per-component transform → write for a full
//! build, and exposes the single-component path the watcher reuses.
//! Sections build before snippets; the order is fixed for stable logs,
//! not a dependency (no component depends on another's output).
//!
//! Per-component failures are isolated: a stylesheet that does not
//! compile, or a source file that cannot be read, is reported and the
//! rest of the build continues.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::augment::augment_template;
use crate::config::ThemePaths;
use crate::error::{ThemeError, ThemeResult};
use crate::fs::{atomic_write, ensure_dir};
use crate::locator::find_components;
use crate::models::{Component, ComponentKind};
use crate::script::wrap_script;
use crate::style::scope_and_compile;

/// Progress event emitted while building
///
/// Rendered as emoji status lines in human mode and NDJSON in `--json`
/// mode.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// A component's processing began
    ComponentStarted { name: String, kind: ComponentKind },
    /// One artifact was written
    ArtifactWritten { path: String },
    /// A stylesheet failed to compile; its `.css` artifact is skipped
    StyleError { component: String, message: String },
    /// Two components derive the same global wrapper name
    WrapperCollision {
        wrapper: String,
        first: String,
        second: String,
    },
    /// A component aborted mid-processing (IO failure)
    ComponentFailed { component: String, message: String },
}

impl BuildEvent {
    pub fn to_json(&self) -> String {
        match self {
            BuildEvent::ComponentStarted { name, kind } => {
                json!({"event": "component", "name": name, "kind": kind.noun()}).to_string()
            }
            BuildEvent::ArtifactWritten { path } => {
                json!({"event": "written", "path": path}).to_string()
            }
            BuildEvent::StyleError { component, message } => {
                json!({"event": "style_error", "component": component, "message": message})
                    .to_string()
            }
            BuildEvent::WrapperCollision { wrapper, first, second } => {
                json!({"event": "wrapper_collision", "wrapper": wrapper, "components": [first, second]})
                    .to_string()
            }
            BuildEvent::ComponentFailed { component, message } => {
                json!({"event": "component_failed", "component": component, "message": message})
                    .to_string()
            }
        }
    }
}

/// Outcome of a build pass
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Destination paths written
    pub written: Vec<String>,
    /// Artifact slots skipped because the source file is absent
    pub skipped: Vec<String>,
    /// Per-component failures (compile errors, IO errors, collisions)
    pub errors: Vec<String>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: BuildReport) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }
}

/// Build every section and snippet component under `paths`
pub fn build_all(paths: &ThemePaths, on_event: &impl Fn(BuildEvent)) -> ThemeResult<BuildReport> {
    ensure_dir(&paths.dest_sections)?;
    ensure_dir(&paths.dest_snippets)?;
    ensure_dir(&paths.dest_assets)?;

    let sections = find_components(&paths.sections_src, ComponentKind::Section)?;
    let snippets = find_components(&paths.snippets_src, ComponentKind::Snippet)?;

    let mut report = BuildReport::default();
    detect_wrapper_collisions(sections.iter().chain(snippets.iter()), &mut report, on_event);

    for component in sections.iter().chain(snippets.iter()) {
        match process_component(component, paths, on_event) {
            Ok(component_report) => report.merge(component_report),
            Err(e) => {
                let message = e.to_string();
                on_event(BuildEvent::ComponentFailed {
                    component: component.name.clone(),
                    message: message.clone(),
                });
                report.errors.push(format!("{}: {}", component.name, message));
            }
        }
    }

    Ok(report)
}

/// Process one component: augment its template, scope + compile its
/// stylesheet, wrap its script — whichever of the three sources exist
///
/// An absent source file is a skip, not an error. A stylesheet compile
/// failure is recorded and the remaining artifacts still build. An IO
/// error aborts this component only; the caller records it.
pub fn process_component(
    component: &Component,
    paths: &ThemePaths,
    on_event: &impl Fn(BuildEvent),
) -> ThemeResult<BuildReport> {
    let mut report = BuildReport::default();
    on_event(BuildEvent::ComponentStarted {
        name: component.name.clone(),
        kind: component.kind,
    });

    let template = component.template_path();
    if template.is_file() {
        let raw = fs::read_to_string(&template)?;
        let augmented = augment_template(&raw, component);
        let dest = paths
            .template_dest_for(component.kind)
            .join(component.template_asset());
        write_artifact(&dest, &augmented, &mut report, on_event)?;
    } else {
        report
            .skipped
            .push(format!("{} (no template)", component.name));
    }

    let style = component.style_path();
    if style.is_file() {
        let raw = fs::read_to_string(&style)?;
        match scope_and_compile(&raw, component) {
            Ok(css) => {
                let dest = paths.dest_assets.join(component.css_asset());
                write_artifact(&dest, &css, &mut report, on_event)?;
            }
            Err(e) => {
                let message = match &e {
                    ThemeError::StyleCompile { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                on_event(BuildEvent::StyleError {
                    component: component.name.clone(),
                    message,
                });
                report.errors.push(e.to_string());
            }
        }
    } else {
        report
            .skipped
            .push(format!("{} (no stylesheet)", component.name));
    }

    let script = component.script_path();
    if script.is_file() {
        let raw = fs::read_to_string(&script)?;
        let wrapped = wrap_script(&raw, component);
        let dest = paths.dest_assets.join(component.js_asset());
        write_artifact(&dest, &wrapped, &mut report, on_event)?;
    } else {
        report
            .skipped
            .push(format!("{} (no script)", component.name));
    }

    Ok(report)
}

fn write_artifact(
    dest: &Path,
    content: &str,
    report: &mut BuildReport,
    on_event: &impl Fn(BuildEvent),
) -> ThemeResult<()> {
    atomic_write(dest, content)?;
    let shown = dest.display().to_string();
    on_event(BuildEvent::ArtifactWritten {
        path: shown.clone(),
    });
    report.written.push(shown);
    Ok(())
}

/// Report components whose PascalCase wrapper names collide
///
/// The global browser registry is keyed by wrapper name; names that
/// differ only in separators (`product-card` / `product_card`) would
/// silently overwrite each other at runtime, so the collision is
/// surfaced at build time instead.
fn detect_wrapper_collisions<'a>(
    components: impl Iterator<Item = &'a Component>,
    report: &mut BuildReport,
    on_event: &impl Fn(BuildEvent),
) {
    let mut seen: HashMap<String, &Component> = HashMap::new();
    for component in components {
        let wrapper = component.wrapper_name();
        match seen.get(&wrapper) {
            Some(first) => {
                on_event(BuildEvent::WrapperCollision {
                    wrapper: wrapper.clone(),
                    first: first.name.clone(),
                    second: component.name.clone(),
                });
                report.errors.push(format!(
                    "wrapper name collision: '{}' is generated by both '{}' and '{}'",
                    wrapper, first.name, component.name
                ));
            }
            None => {
                seen.insert(wrapper, component);
            }
        }
    }
}

/// Remove every generated artifact from the destination tree
///
/// Returns the removed paths. Nothing to remove is not an error.
pub fn clean(paths: &ThemePaths) -> ThemeResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    remove_with_extension(&paths.dest_sections, "liquid", &mut removed)?;
    remove_with_extension(&paths.dest_snippets, "liquid", &mut removed)?;
    remove_with_extension(&paths.dest_assets, "css", &mut removed)?;
    remove_with_extension(&paths.dest_assets, "js", &mut removed)?;
    Ok(removed)
}

fn remove_with_extension(
    dir: &Path,
    extension: &str,
    removed: &mut Vec<PathBuf>,
) -> ThemeResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    Ok(())
}
