//! Script wrapping
//!
//! Raw component scripts are embedded into a generated wrapper class so
//! that arbitrarily many components, and arbitrarily many instances of
//! one component, share the page's global namespace without colliding.
//! The wrapper is constructed from an instance id, resolves its root
//! DOM node once, and exposes helpers that only touch that subtree.
//!
//! Authors opt out by declaring the canonical wrapper name themselves;
//! such sources pass through untouched.

use crate::models::{Component, ComponentKind};

/// Wrap `raw` into the component's instance-scoped wrapper class
pub fn wrap_script(raw: &str, component: &Component) -> String {
    let wrapper = component.wrapper_name();

    if is_already_wrapped(raw, &wrapper) {
        return raw.to_string();
    }

    let name = &component.name;
    let noun = component.kind.noun();
    let body = indent(raw, 4);

    let snippet_helpers = match component.kind {
        ComponentKind::Section => String::new(),
        ComponentKind::Snippet => format!(
            r#"
  // Emit a namespaced custom event carrying this instance's id
  emit(eventName, data = {{}}) {{
    const event = new CustomEvent(`snippet:${{eventName}}`, {{
      detail: {{ ...data, snippetId: this.snippetId }}
    }});
    this.snippet.dispatchEvent(event);
  }}

  // Subscribe to a namespaced custom event on this instance
  on(eventName, handler) {{
    this.snippet.addEventListener(`snippet:${{eventName}}`, handler);
  }}
"#
        ),
    };

    format!(
        r#"/**
 * Auto-generated wrapper for the {name} {noun}.
 * Each rendered instance gets its own object, scoped to its root node.
 */
class {wrapper} {{
  constructor({noun}Id) {{
    this.{noun}Id = {noun}Id;
    this.{noun} = document.getElementById({noun}Id);

    if (!this.{noun}) {{
      console.warn('{title_noun} not found:', {noun}Id);
      return;
    }}

    this.init();
  }}

  init() {{
    // Original {noun} code, runs once per instance at construction
{body}
  }}

  // Find an element within this {noun} instance
  querySelector(selector) {{
    return this.{noun}.querySelector(selector);
  }}

  querySelectorAll(selector) {{
    return this.{noun}.querySelectorAll(selector);
  }}

  // Attach a listener to a selector or node, scoped to this instance
  addEventListener(element, event, handler) {{
    if (typeof element === 'string') {{
      element = this.querySelector(element);
    }}
    if (element) {{
      element.addEventListener(event, handler);
    }}
  }}
{snippet_helpers}}}

// Make the class available globally
window.{wrapper} = {wrapper};

// Auto-initialize instances already present in the DOM
document.addEventListener('DOMContentLoaded', function() {{
  const nodes = document.querySelectorAll('[id^="{name}-"]');
  nodes.forEach(node => {{
    if (!node.dataset.initialized) {{
      new {wrapper}(node.id);
      node.dataset.initialized = 'true';
    }}
  }});
}});
"#,
        title_noun = title_case(noun),
    )
}

/// Has the author already declared the canonical wrapper?
fn is_already_wrapped(raw: &str, wrapper: &str) -> bool {
    raw.contains(&format!("class {wrapper}")) || raw.contains(&format!("function {wrapper}"))
}

/// Indent every non-empty line by `spaces`
fn indent(code: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    code.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
