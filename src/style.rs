//! Stylesheet scoping and compilation
//!
//! A component stylesheet is scoped to its instances before compiling:
//! the raw source is nested once under an id-prefix selector
//! (`[id^="<name>-"]`) and once under a class selector
//! (`.<name>-section`), so the same declarations apply whether a
//! consumer scopes by id or by class. Two compiled copies of the
//! ruleset are the accepted cost of zero-configuration scoping.
//!
//! A source that already targets `.<name>-section` or `#<name>` is
//! treated as self-scoping and compiled unmodified.

use crate::error::{ThemeError, ThemeResult};
use crate::models::Component;

/// Scope `raw` to its component and compile it to minified CSS
///
/// Fails with [`ThemeError::StyleCompile`] on malformed SCSS; the
/// caller logs it and skips the `.css` artifact without aborting the
/// build.
pub fn scope_and_compile(raw: &str, component: &Component) -> ThemeResult<String> {
    let scoped = scope(raw, component);

    let options = grass::Options::default()
        .style(grass::OutputStyle::Compressed)
        .quiet(true);

    grass::from_string(scoped, &options).map_err(|e| ThemeError::StyleCompile {
        component: component.name.clone(),
        message: e.to_string(),
    })
}

/// Nest `raw` under the component's scoping selectors unless it already
/// scopes itself
fn scope(raw: &str, component: &Component) -> String {
    if is_self_scoping(raw, component) {
        return raw.to_string();
    }

    let name = &component.name;
    format!(
        "[id^=\"{name}-\"] {{\n{raw}\n}}\n\n.{name}-section {{\n{raw}\n}}\n"
    )
}

/// Does the source already carry a component-scoped rule?
fn is_self_scoping(raw: &str, component: &Component) -> bool {
    let name = &component.name;
    raw.contains(&format!(".{name}-section")) || raw.contains(&format!("#{name}"))
}
