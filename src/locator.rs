//! Component discovery
//!
//! A components root (`sections/` or `snippets/`) contains one
//! subdirectory per component. Discovery only lists directories; source
//! files inside are probed later, when the component is processed.

use std::fs;
use std::path::Path;

use crate::error::ThemeResult;
use crate::models::{Component, ComponentKind};

/// Enumerate the components under `root`, one per immediate child
/// directory.
///
/// Results are sorted by name so repeated runs log in a stable order.
/// A missing root yields an empty list (a theme without snippets is
/// valid), never an error.
pub fn find_components(root: &Path, kind: ComponentKind) -> ThemeResult<Vec<Component>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut components = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        // Editor droppings and hidden directories are not components.
        if name.starts_with('.') {
            continue;
        }
        components.push(Component::new(name, kind, entry.path()));
    }

    components.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(components)
}
