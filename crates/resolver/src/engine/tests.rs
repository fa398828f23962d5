use super::*;
use pretty_assertions::assert_eq;

use dom::Selection;
use store::HighlightMetadata;

use crate::capture::capture_selection;
use crate::config::CaptureConfig;
use crate::marker::remove_marker;

fn cfg() -> ResolveConfig {
    ResolveConfig::default()
}

/// Captures `[start, end)` of the first element under `<body>` and turns it
/// into a stored descriptor.
fn captured_descriptor(html: &str, start: usize, end: usize) -> HighlightDescriptor {
    let doc = Document::parse(html);
    let container = doc.children(doc.body().expect("body"))[0];
    let sel = Selection::from_flat_range(&doc, container, start, end).expect("selection");
    capture_selection(&doc, &sel, &CaptureConfig::default())
        .expect("capturable selection")
        .into_descriptor(HighlightMetadata::default())
}

#[test]
fn unchanged_document_resolves_via_direct_offset() {
    let html = "<p>The quick brown fox jumps over the lazy dog</p>";
    let desc = captured_descriptor(html, 4, 19);
    assert_eq!(desc.text, "quick brown fox");

    let mut doc = Document::parse(html);
    assert_eq!(resolve(&mut doc, &desc, &cfg()), Outcome::Marked(Tier::DirectOffset));

    let marked = doc
        .element_with_attr("data-anchor-id", &desc.id)
        .expect("marker applied");
    assert_eq!(doc.flat_text(marked).text, desc.text);
}

#[test]
fn resolve_is_idempotent() {
    let html = "<p>Some stable text</p>";
    let desc = captured_descriptor(html, 0, 4);
    let mut doc = Document::parse(html);

    assert!(resolve(&mut doc, &desc, &cfg()).is_resolved());
    let after_first = doc.to_html();
    assert_eq!(resolve(&mut doc, &desc, &cfg()), Outcome::AlreadyMarked);
    assert_eq!(doc.to_html(), after_first);
}

#[test]
fn sibling_shift_falls_through_to_a_context_tier() {
    let html = "<div><p>alpha</p><p>the target text</p></div>";
    let desc = captured_descriptor(html, 9, 15);
    assert_eq!(desc.text, "target");

    // An unrelated <p> inserted before shifts the sibling index: the stored
    // path now decodes to the wrong element, so the direct tier cannot win.
    let mutated = "<div><p>injected</p><p>alpha</p><p>the target text</p></div>";
    let mut doc = Document::parse(mutated);
    let outcome = resolve(&mut doc, &desc, &cfg());
    assert!(matches!(
        outcome,
        Outcome::Marked(Tier::ContextExact) | Outcome::Marked(Tier::ContextPartial)
    ));
    let marked = doc.element_with_attr("data-anchor-id", &desc.id).expect("marked");
    assert_eq!(doc.flat_text(marked).text, "target");
}

#[test]
fn prepended_edit_lands_on_the_second_occurrence() {
    // The scenario naive first-match search gets wrong: the second "world"
    // was highlighted; after an edit shifts the offsets, context must still
    // pin the second occurrence, not the first.
    let desc = captured_descriptor("<p>Hello world, hello world.</p>", 19, 24);
    assert_eq!(desc.start_offset, 19);
    assert_eq!(desc.before_context, "Hello world, hello ");

    let mut doc = Document::parse("<p>Hi! Hello world, hello world.</p>");
    assert_eq!(resolve(&mut doc, &desc, &cfg()), Outcome::Marked(Tier::ContextExact));

    let container = doc.children(doc.body().unwrap())[0];
    assert_eq!(
        doc.outer_html(container),
        format!(
            r#"<p>Hi! Hello world, hello <mark data-anchor-id="{}">world</mark>.</p>"#,
            desc.id
        )
    );
}

#[test]
fn lost_container_searches_the_body() {
    let html = r#"<div id="old"><p>needle in a haystack</p></div>"#;
    let desc = captured_descriptor(html, 0, 6);

    // The id is gone and the structure reshuffled; only the text survives.
    let mut doc = Document::parse("<section><span>needle in a haystack</span></section>");
    let outcome = resolve(&mut doc, &desc, &cfg());
    assert!(outcome.is_resolved());
    let marked = doc.element_with_attr("data-anchor-id", &desc.id).expect("marked");
    assert_eq!(doc.flat_text(marked).text, "needle");
}

#[test]
fn nearest_occurrence_uses_offset_distance() {
    // Descriptor with contexts that no longer exist anywhere, duplicated
    // text, and a stored offset near the first copy.
    let desc = HighlightDescriptor::new(
        "html[1]/body[1]/p[1]",
        "the cat sat",
        12,
        23,
        "context that is gone ",
        " likewise gone",
    );

    let filler = "x".repeat(179);
    let html = format!("<p>ab the cat sat {filler} the cat sat tail</p>");
    let mut doc = Document::parse(&html);
    assert_eq!(
        resolve(&mut doc, &desc, &cfg()),
        Outcome::Marked(Tier::NearestOccurrence)
    );
    let container = doc.children(doc.body().unwrap())[0];
    // The first copy starts at 3 (|3 - 12| = 9); the far one loses.
    let marked = doc.element_with_attr("data-anchor-id", &desc.id).unwrap();
    assert_eq!(doc.flat_text(marked).text, "the cat sat");
    assert!(doc.outer_html(container).starts_with("<p>ab <mark"));
}

#[test]
fn unresolvable_descriptor_changes_nothing() {
    let desc = captured_descriptor("<p>vanished entirely</p>", 0, 8);
    let mut doc = Document::parse("<p>completely different page now</p>");
    let before = doc.to_html();
    assert_eq!(resolve(&mut doc, &desc, &cfg()), Outcome::Unresolved);
    assert_eq!(doc.to_html(), before);
}

#[test]
fn remove_after_resolve_round_trips_the_markup() {
    let html = "<p>pick <b>me</b> please</p>";
    let desc = captured_descriptor(html, 3, 8);
    let mut doc = Document::parse(html);
    let container = doc.children(doc.body().unwrap())[0];
    let pristine = doc.outer_html(container);

    assert!(resolve(&mut doc, &desc, &cfg()).is_resolved());
    assert!(remove_marker(&mut doc, &desc.id, &cfg()));
    assert_eq!(doc.outer_html(container), pristine);
}

#[test]
fn color_metadata_reaches_the_marker() {
    let html = "<p>tinted text</p>";
    let doc = Document::parse(html);
    let container = doc.children(doc.body().unwrap())[0];
    let sel = Selection::from_flat_range(&doc, container, 0, 6).unwrap();
    let desc = capture_selection(&doc, &sel, &CaptureConfig::default())
        .unwrap()
        .into_descriptor(HighlightMetadata {
            color: Some("#ffe08a".into()),
            ..Default::default()
        });

    let mut doc = Document::parse(html);
    assert!(resolve(&mut doc, &desc, &cfg()).is_resolved());
    let marked = doc.element_with_attr("data-anchor-id", &desc.id).unwrap();
    let el = doc.node(marked).unwrap().as_element().unwrap();
    assert_eq!(el.attr("data-anchor-color"), Some("#ffe08a"));
}
