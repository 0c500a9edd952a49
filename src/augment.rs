//! Template augmentation
//!
//! Transforms a raw Liquid component template into its deployable form:
//! - injects derivation of a per-render unique instance id
//! - references the component's compiled `.css` and wrapped `.js` assets
//!   exactly once per instance (load-once guarded for snippets)
//! - rewrites identifiers and class tokens that hardcode the component
//!   name into instance-scoped tokens
//!
//! Every step is gated on an [`AugmentStage`] predicate over the raw
//! source, so augmentation is a pure function of the input: feeding a
//! template its own augmented output back returns it unchanged.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Component, ComponentKind};

lazy_static! {
    static ref CLASS_ATTR_RE: Regex = Regex::new(r#"class="([^"]*)""#).unwrap();
}

/// One independently gated augmentation step
///
/// Modeled as an explicit enum rather than ad-hoc substring checks so
/// the "has this already been injected" decision lives in one place per
/// stage. Detection is still textual (augmentation must stay a pure
/// function of the raw source) but stricter than a bare marker search:
/// the id stage looks for an `assign section_id` / `assign snippet_id`
/// statement, not any occurrence of the variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentStage {
    /// Instance-id derivation logic at the top of the template
    InstanceId,
    /// Stylesheet reference adjacent to the id logic
    StyleRef,
    /// Script reference plus DOM-ready instantiation hook at the end
    ScriptRef,
}

impl AugmentStage {
    /// Has this stage already been applied to (or hand-written in) `raw`?
    pub fn is_applied(&self, raw: &str, component: &Component) -> bool {
        match self {
            AugmentStage::InstanceId => {
                raw.contains(&format!("assign {}", component.kind.id_var()))
            }
            AugmentStage::StyleRef => raw.contains(&component.css_asset()),
            AugmentStage::ScriptRef => raw.contains(&component.js_asset()),
        }
    }
}

/// Augment a raw template, applying every stage not already present
///
/// Malformed input never fails: a pattern that does not match is simply
/// left alone.
pub fn augment_template(raw: &str, component: &Component) -> String {
    let mut out = raw.to_string();

    if !AugmentStage::InstanceId.is_applied(&out, component) {
        out = format!(
            "{{%- comment -%}} Auto-generated unique {} ID {{%- endcomment -%}}\n{}\n\n{}",
            component.kind.noun(),
            instance_id_logic(component),
            out
        );
    }

    if !AugmentStage::StyleRef.is_applied(&out, component) {
        let style_block = style_ref_block(component);
        let anchor = instance_id_logic(component);
        // Insert after our own id logic when present; a template with
        // hand-written id logic gets the reference prepended instead of
        // silently losing it.
        out = match out.find(&anchor) {
            Some(_) => out.replacen(&anchor, &format!("{anchor}\n{style_block}"), 1),
            None => format!("{style_block}\n{out}"),
        };
    }

    if !AugmentStage::ScriptRef.is_applied(&out, component) {
        out = format!("{}\n\n{}", out, script_ref_block(component));
    }

    out = rewrite_hardcoded_ids(&out, component);
    out = rewrite_class_tokens(&out, component);

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// The Liquid statement(s) deriving the instance id
///
/// Sections get `'<name>-' | append: section.id`, carrying the `<name>-`
/// prefix the scoped stylesheet and the wrapper auto-discovery select
/// on. Snippets prefer an explicit `unique_id` (then `id`) parameter and
/// fall back to `forloop.index` inside loops or a `-default` suffix
/// elsewhere; the fallback is deterministic but not collision-free, so
/// repeated invocations outside a loop must pass `unique_id`.
fn instance_id_logic(component: &Component) -> String {
    let name = &component.name;
    match component.kind {
        ComponentKind::Section => format!(
            "{{%- assign section_id = '{name}-' | append: section.id -%}}"
        ),
        ComponentKind::Snippet => format!(
            "{{%- liquid\n  if unique_id\n    assign snippet_id = unique_id\n  elsif id\n    assign snippet_id = id\n  elsif forloop\n    assign snippet_id = '{name}-' | append: forloop.index\n  else\n    assign snippet_id = '{name}-default'\n  endif\n-%}}"
        ),
    }
}

/// Stylesheet reference, load-once guarded for snippets
fn style_ref_block(component: &Component) -> String {
    let name = &component.name;
    match component.kind {
        ComponentKind::Section => format!(
            "{{%- comment -%}} Auto-generated CSS reference {{%- endcomment -%}}\n{{{{ '{name}.css' | asset_url | stylesheet_tag }}}}"
        ),
        ComponentKind::Snippet => format!(
            "{{%- comment -%}} Auto-generated CSS reference (loaded once) {{%- endcomment -%}}\n{{%- unless snippet_styles_loaded contains '{name}' -%}}\n  {{%- assign snippet_styles_loaded = snippet_styles_loaded | append: '{name},' -%}}\n  {{{{ '{name}.css' | asset_url | stylesheet_tag }}}}\n{{%- endunless -%}}"
        ),
    }
}

/// Script reference plus DOM-ready hook instantiating the wrapper by id
fn script_ref_block(component: &Component) -> String {
    let name = &component.name;
    let wrapper = component.wrapper_name();
    let id_var = component.kind.id_var();
    let hook = format!(
        "<script>\n  document.addEventListener('DOMContentLoaded', function() {{\n    if (typeof {wrapper} === 'function') {{\n      new {wrapper}('{{{{ {id_var} }}}}');\n    }}\n  }});\n</script>"
    );
    match component.kind {
        ComponentKind::Section => format!(
            "{{%- comment -%}} Auto-generated JS reference with section ID {{%- endcomment -%}}\n{hook}\n{{{{ '{name}.js' | asset_url | script_tag }}}}"
        ),
        ComponentKind::Snippet => format!(
            "{{%- comment -%}} Auto-generated JS reference with snippet ID {{%- endcomment -%}}\n{{%- unless snippet_scripts_loaded contains '{name}' -%}}\n  {{%- assign snippet_scripts_loaded = snippet_scripts_loaded | append: '{name},' -%}}\n  {{{{ '{name}.js' | asset_url | script_tag }}}}\n{{%- endunless -%}}\n{hook}"
        ),
    }
}

/// Rewrite `id="<name>"` / `id="<name><sep>..."` attributes to the
/// instance-id variable
///
/// The name must be followed by the closing quote or a non-alphanumeric
/// separator: for a component named `hero`, `id="hero-inner"` rewrites
/// but `id="heroic"` does not.
fn rewrite_hardcoded_ids(content: &str, component: &Component) -> String {
    let id_var = component.kind.id_var();
    let pattern = format!(
        r#"id="{}([^a-zA-Z0-9][^"]*)?""#,
        regex::escape(&component.name)
    );
    let re = Regex::new(&pattern).unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let rest = caps.get(1).map_or("", |m| m.as_str());
        format!(r#"id="{{{{ {id_var} }}}}{rest}""#)
    })
    .into_owned()
}

/// Rewrite class tokens equal to the component name into
/// instance-qualified tokens
///
/// Token equality inside each `class="..."` attribute, so names embedded
/// in longer tokens (`hero-banner`, `superhero`) are untouched and a
/// second pass finds nothing left to rewrite.
fn rewrite_class_tokens(content: &str, component: &Component) -> String {
    let name = &component.name;
    let id_var = component.kind.id_var();
    CLASS_ATTR_RE
        .replace_all(content, |caps: &regex::Captures| {
            let value = &caps[1];
            if !value.split_whitespace().any(|token| token == name) {
                return caps[0].to_string();
            }
            let rewritten: Vec<String> = value
                .split_whitespace()
                .map(|token| {
                    if token == name {
                        format!("{name}-{{{{ {id_var} }}}}")
                    } else {
                        token.to_string()
                    }
                })
                .collect();
            format!(r#"class="{}""#, rewritten.join(" "))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str) -> Component {
        Component::new(name, ComponentKind::Section, format!("/t/sections/{name}"))
    }

    fn snippet(name: &str) -> Component {
        Component::new(name, ComponentKind::Snippet, format!("/t/snippets/{name}"))
    }

    #[test]
    fn test_section_gets_instance_id_and_asset_refs() {
        let out = augment_template("<div id=\"hero\">hi</div>", &section("hero"));
        assert!(out.contains("{%- assign section_id = 'hero-' | append: section.id -%}"));
        assert!(out.contains("{{ 'hero.css' | asset_url | stylesheet_tag }}"));
        assert!(out.contains("{{ 'hero.js' | asset_url | script_tag }}"));
        assert!(out.contains("new HeroSection('{{ section_id }}')"));
    }

    #[test]
    fn test_snippet_asset_refs_are_load_once_guarded() {
        let out = augment_template("<span>x</span>", &snippet("button"));
        assert!(out.contains("unless snippet_styles_loaded contains 'button'"));
        assert!(out.contains("unless snippet_scripts_loaded contains 'button'"));
        assert!(out.contains("new ButtonSnippet('{{ snippet_id }}')"));
    }

    #[test]
    fn test_snippet_id_fallback_chain() {
        let out = augment_template("<span>x</span>", &snippet("button"));
        assert!(out.contains("if unique_id"));
        assert!(out.contains("elsif forloop"));
        assert!(out.contains("assign snippet_id = 'button-' | append: forloop.index"));
        assert!(out.contains("assign snippet_id = 'button-default'"));
    }

    #[test]
    fn test_existing_id_logic_is_not_duplicated() {
        let raw = "{%- assign section_id = my_own_id -%}\n<div></div>";
        let out = augment_template(raw, &section("hero"));
        assert_eq!(out.matches("assign section_id").count(), 1);
        // The stylesheet reference still lands (prepended, since the
        // generated anchor is absent).
        assert!(out.contains("hero.css"));
    }

    #[test]
    fn test_existing_asset_refs_are_not_duplicated() {
        let raw = "{{ 'hero.css' | asset_url | stylesheet_tag }}\n{{ 'hero.js' | asset_url | script_tag }}\n<div></div>";
        let out = augment_template(raw, &section("hero"));
        assert_eq!(out.matches("hero.css").count(), 1);
        assert_eq!(out.matches("hero.js").count(), 1);
    }

    #[test]
    fn test_hardcoded_id_rewrite() {
        let out = augment_template("<div id=\"hero\"><p id=\"hero-title\"></p></div>", &section("hero"));
        assert!(!out.contains("id=\"hero\""));
        assert!(out.contains("id=\"{{ section_id }}\""));
        assert!(out.contains("id=\"{{ section_id }}-title\""));
    }

    #[test]
    fn test_id_rewrite_respects_word_boundaries() {
        let out = augment_template("<div id=\"heroic\"></div>", &section("hero"));
        assert!(out.contains("id=\"heroic\""));
    }

    #[test]
    fn test_class_token_rewrite_is_token_equal() {
        let raw = "<div class=\"hero hero-banner wide\"></div>";
        let out = augment_template(raw, &section("hero"));
        assert!(out.contains("class=\"hero-{{ section_id }} hero-banner wide\""));
    }

    #[test]
    fn test_class_without_matching_token_untouched() {
        let raw = "<div class=\"superhero  spaced\"></div>";
        let out = augment_template(raw, &section("hero"));
        // No token equals the name, so not even whitespace is normalized.
        assert!(out.contains("class=\"superhero  spaced\""));
    }

    #[test]
    fn test_augment_is_idempotent_for_sections() {
        let raw = "<div id=\"hero\" class=\"hero big\">content</div>";
        let once = augment_template(raw, &section("hero"));
        let twice = augment_template(&once, &section("hero"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_augment_is_idempotent_for_snippets() {
        let raw = "<span id=\"product-card-media\" class=\"product-card\">x</span>";
        let once = augment_template(raw, &snippet("product-card"));
        let twice = augment_template(&once, &snippet("product-card"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stage_predicates() {
        let c = section("hero");
        assert!(!AugmentStage::InstanceId.is_applied("<div>", &c));
        assert!(AugmentStage::InstanceId.is_applied("{% assign section_id = x %}", &c));
        // A stray mention of the variable is not the assign statement.
        assert!(!AugmentStage::InstanceId.is_applied("uses section_id somewhere", &c));
        assert!(AugmentStage::StyleRef.is_applied("{{ 'hero.css' | asset_url }}", &c));
        assert!(AugmentStage::ScriptRef.is_applied("{{ 'hero.js' | asset_url }}", &c));
    }

    #[test]
    fn test_names_with_regex_metacharacters_are_escaped() {
        // Directory names should be kebab-case, but a stray dot must not
        // turn into a regex wildcard.
        let c = section("v1.2");
        let out = augment_template("<div id=\"v192\"></div>", &c);
        assert!(out.contains("id=\"v192\""));
    }
}
