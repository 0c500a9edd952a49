//! Property tests for Themesmith transforms.
//!
//! Properties use randomized input generation to protect the pipeline's
//! core invariants: transforms are idempotent, never panic on malformed
//! input, and derived identities never collide across distinct
//! kebab-case component names.
//!
//! Run with: `cargo test --test properties`

use proptest::prelude::*;

use themesmith::{augment_template, scope_and_compile, wrap_script, Component, ComponentKind};

fn section(name: &str) -> Component {
    Component::new(name, ComponentKind::Section, format!("/t/sections/{name}"))
}

fn snippet(name: &str) -> Component {
    Component::new(name, ComponentKind::Snippet, format!("/t/snippets/{name}"))
}

/// Markup that actually exercises the rewrites: the component name
/// embedded in ids, class lists and longer tokens.
fn structured_markup(name: &str, shape: u8, filler: &str) -> String {
    match shape % 6 {
        0 => format!("<div id=\"{name}\">{filler}</div>"),
        1 => format!("<div id=\"{name}-inner\" class=\"{name}\">{filler}</div>"),
        2 => format!("<p class=\"{name} {name}-wide x\">{filler}</p>"),
        3 => format!("<span id=\"{name}ic\" class=\"super{name}\">{filler}</span>"),
        4 => format!("{filler}<section class=\"{name}\"><i id=\"{name}-a\"></i></section>"),
        _ => filler.to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: augmenting a template twice yields the first output
    /// unchanged, for arbitrary raw input.
    #[test]
    fn property_augment_idempotent_on_arbitrary_input(
        name in "[a-z]{1,8}(-[a-z]{1,8}){0,2}",
        raw in "(?s).{0,200}",
    ) {
        for component in [section(&name), snippet(&name)] {
            let once = augment_template(&raw, &component);
            let twice = augment_template(&once, &component);
            prop_assert_eq!(&once, &twice);
        }
    }

    /// PROPERTY: idempotence also holds for markup that embeds the
    /// component name in ids and class lists.
    #[test]
    fn property_augment_idempotent_on_component_markup(
        name in "[a-z]{1,8}(-[a-z]{1,8}){0,2}",
        shape in 0u8..6,
        filler in "[A-Za-z0-9 <>/=']{0,60}",
    ) {
        let raw = structured_markup(&name, shape, &filler);
        for component in [section(&name), snippet(&name)] {
            let once = augment_template(&raw, &component);
            let twice = augment_template(&once, &component);
            prop_assert_eq!(&once, &twice);
        }
    }

    /// PROPERTY: wrapping a script twice yields the first output
    /// unchanged.
    #[test]
    fn property_wrap_idempotent(
        name in "[a-z]{1,8}(-[a-z]{1,8}){0,2}",
        raw in "(?s).{0,200}",
    ) {
        for component in [section(&name), snippet(&name)] {
            let once = wrap_script(&raw, &component);
            let twice = wrap_script(&once, &component);
            prop_assert_eq!(&once, &twice);
        }
    }

    /// PROPERTY: distinct kebab-case names never share a wrapper name,
    /// asset file name, or scoping selector.
    #[test]
    fn property_distinct_names_are_isolated(
        a in "[a-z]{1,8}(-[a-z]{1,8}){0,2}",
        b in "[a-z]{1,8}(-[a-z]{1,8}){0,2}",
    ) {
        prop_assume!(a != b);
        let ca = section(&a);
        let cb = section(&b);

        prop_assert_ne!(ca.wrapper_name(), cb.wrapper_name());
        prop_assert_ne!(ca.css_asset(), cb.css_asset());
        prop_assert_ne!(ca.js_asset(), cb.js_asset());

        let wrapped_a = wrap_script("x();", &ca);
        let scope_selector = format!("[id^=\"{a}-\"]");
        let other_wrapper = format!("window.{} =", cb.wrapper_name());
        prop_assert!(wrapped_a.contains(&scope_selector));
        prop_assert!(!wrapped_a.contains(&other_wrapper));
    }

    /// PROPERTY: augmentation never panics on malformed markup.
    #[test]
    fn property_augment_never_panics(raw in "(?s).{0,256}") {
        let _ = augment_template(&raw, &section("hero"));
        let _ = augment_template(&raw, &snippet("product-card"));
    }

    /// PROPERTY: the style pipeline never panics; malformed SCSS is an
    /// error value, not a crash.
    #[test]
    fn property_style_never_panics(raw in "[ -~\\n]{0,120}") {
        let _ = scope_and_compile(&raw, &section("hero"));
    }
}
