//! File watcher for continuous rebuilds
//!
//! Implements the `watch` command with:
//! - an initial full build
//! - per-component incremental rebuilds (a change never triggers a
//!   full rebuild)
//! - debouncing keyed by component, so a burst of saves compiles once
//! - graceful Ctrl+C shutdown
//! - NDJSON output for CI
//!
//! Rebuilds run inline on the watch thread, so writes to one
//! destination path are serialized in event-arrival order.
//! [`RebuildQueue`] still tracks in-flight and dirty keys explicitly:
//! at most one rebuild per component may be in flight, and a change
//! observed mid-rebuild re-queues the component instead of starting a
//! second run.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::json;

use crate::config::ThemePaths;
use crate::error::{ThemeError, ThemeResult};
use crate::models::{Component, ComponentKind};
use crate::pipeline::{build_all, process_component, BuildEvent};

/// Default debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Channel poll interval while idle
const POLL_MS: u64 = 50;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Resolved theme directories
    pub paths: ThemePaths,
    /// Quiet period after the last change before a component rebuilds
    pub debounce: Duration,
}

/// Watch event types for console and NDJSON output
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Started { sections: String, snippets: String },
    InitialBuild { written: usize, errors: usize },
    FileChanged { path: String },
    RebuildStarted { component: String, kind: ComponentKind },
    RebuildComplete { component: String, written: usize, errors: usize },
    Error { message: String },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        match self {
            WatchEvent::Started { sections, snippets } => {
                json!({"event": "started", "sections": sections, "snippets": snippets}).to_string()
            }
            WatchEvent::InitialBuild { written, errors } => {
                json!({"event": "initial_build", "written": written, "errors": errors}).to_string()
            }
            WatchEvent::FileChanged { path } => {
                json!({"event": "file_changed", "path": path}).to_string()
            }
            WatchEvent::RebuildStarted { component, kind } => {
                json!({"event": "rebuild_started", "component": component, "kind": kind.noun()})
                    .to_string()
            }
            WatchEvent::RebuildComplete { component, written, errors } => {
                json!({"event": "rebuild_complete", "component": component, "written": written, "errors": errors})
                    .to_string()
            }
            WatchEvent::Error { message } => {
                json!({"event": "error", "message": message}).to_string()
            }
            WatchEvent::Shutdown => json!({"event": "shutdown"}).to_string(),
        }
    }
}

/// Identity of a component across rebuild passes
pub type ComponentKey = (ComponentKind, String);

/// Work queue keyed by component identity
///
/// A change for an idle component starts its debounce clock; a change
/// for an in-flight component marks it dirty, and `finish` re-queues it
/// once the current rebuild completes.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    pending: HashMap<ComponentKey, Instant>,
    in_flight: HashSet<ComponentKey>,
    dirty: HashSet<ComponentKey>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a filesystem change for a component
    pub fn mark_changed(&mut self, key: ComponentKey) {
        if self.in_flight.contains(&key) {
            self.dirty.insert(key);
        } else {
            self.pending.insert(key, Instant::now());
        }
    }

    /// Components whose quiet period has elapsed, now marked in flight
    ///
    /// Sorted for stable rebuild order within one pass.
    pub fn take_ready(&mut self, debounce: Duration) -> Vec<ComponentKey> {
        let mut ready: Vec<ComponentKey> = self
            .pending
            .iter()
            .filter(|(_, since)| since.elapsed() >= debounce)
            .map(|(key, _)| key.clone())
            .collect();
        ready.sort();
        for key in &ready {
            self.pending.remove(key);
            self.in_flight.insert(key.clone());
        }
        ready
    }

    /// A rebuild completed; returns true if the component went dirty
    /// meanwhile and was re-queued
    pub fn finish(&mut self, key: &ComponentKey) -> bool {
        self.in_flight.remove(key);
        if self.dirty.remove(key) {
            self.pending.insert(key.clone(), Instant::now());
            true
        } else {
            false
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty() && self.dirty.is_empty()
    }
}

/// Map a changed path to the component that owns it
///
/// Only component directories and theme source files (`.liquid`,
/// `.scss`, `.js`) inside them are interesting; everything else —
/// editor swap files, the destination tree, stray files at the roots —
/// is ignored.
pub fn owning_component(path: &Path, paths: &ThemePaths) -> Option<Component> {
    for kind in [ComponentKind::Section, ComponentKind::Snippet] {
        let root = paths.src_for(kind);
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let mut parts = rel.components();
        let name = parts.next()?.as_os_str().to_str()?.to_string();
        if name.starts_with('.') {
            return None;
        }
        if parts.next().is_none() {
            // Entry directly under the root: only a component directory
            // (e.g. a newly added component) counts.
            if path.is_dir() {
                return Some(Component::new(&name, kind, root.join(&name)));
            }
            return None;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if matches!(ext, "liquid" | "scss" | "js") {
            return Some(Component::new(&name, kind, root.join(&name)));
        }
        return None;
    }
    None
}

/// Build once, then watch both component roots until `running` clears
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    on_event: impl Fn(WatchEvent),
) -> ThemeResult<()> {
    let paths = &options.paths;
    on_event(WatchEvent::Started {
        sections: paths.sections_src.display().to_string(),
        snippets: paths.snippets_src.display().to_string(),
    });

    let forward = |build_event: BuildEvent| {
        if let BuildEvent::StyleError { component, message } = build_event {
            on_event(WatchEvent::Error {
                message: format!("stylesheet compile error in '{component}': {message}"),
            });
        }
    };

    let report = build_all(paths, &forward)?;
    on_event(WatchEvent::InitialBuild {
        written: report.written.len(),
        errors: report.errors.len(),
    });

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| ThemeError::Watch(e.to_string()))?;

    for root in [&paths.sections_src, &paths.snippets_src] {
        if root.is_dir() {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| ThemeError::Watch(e.to_string()))?;
        }
    }

    let mut queue = RebuildQueue::new();

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(POLL_MS)) {
            let mut note = |p: std::path::PathBuf| {
                if let Some(component) = owning_component(&p, paths) {
                    on_event(WatchEvent::FileChanged {
                        path: p.display().to_string(),
                    });
                    queue.mark_changed((component.kind, component.name));
                }
            };
            note(path);
            // Drain the burst before checking debounce clocks.
            while let Ok(path) = rx.try_recv() {
                note(path);
            }
        }

        for key in queue.take_ready(options.debounce) {
            let (kind, name) = &key;
            let component = Component::new(name, *kind, paths.src_for(*kind).join(name));
            on_event(WatchEvent::RebuildStarted {
                component: name.clone(),
                kind: *kind,
            });
            match process_component(&component, paths, &forward) {
                Ok(report) => on_event(WatchEvent::RebuildComplete {
                    component: name.clone(),
                    written: report.written.len(),
                    errors: report.errors.len(),
                }),
                Err(e) => on_event(WatchEvent::Error {
                    message: format!("{name}: {e}"),
                }),
            }
            queue.finish(&key);
        }
    }

    on_event(WatchEvent::Shutdown);
    Ok(())
}
