use pretty_assertions::assert_eq;
use textanchor::{
    AnchorStore, Document, HighlightMetadata, Highlighter, InMemoryStore, JsonFileStore,
    Selection,
};

const PAGE: &str = "https://example.com/article?id=7";
const ARTICLE: &str = concat!(
    r#"<div id="content"><h1>On Anchors</h1>"#,
    r#"<p>Hello world, hello world.</p>"#,
    r#"<p>Another paragraph with some prose in it.</p></div>"#
);

fn select(doc: &Document, container_index: usize, start: usize, end: usize) -> Selection {
    let content = doc.element_with_attr("id", "content").expect("content div");
    let container = doc.children(content)[container_index];
    Selection::from_flat_range(doc, container, start, end).expect("selection")
}

#[test]
fn capture_persist_restore_remove() {
    let highlighter = Highlighter::new(InMemoryStore::new());

    // Capture the second "world" in the first paragraph.
    let mut doc = Document::parse(ARTICLE);
    let selection = select(&doc, 1, 19, 24);
    let saved = highlighter
        .save_selection(PAGE, &mut doc, &selection, HighlightMetadata::default())
        .unwrap()
        .expect("anchorable selection");
    assert_eq!(saved.text, "world");
    assert_eq!(saved.structural_path, "#content/p[1]");
    // The live document is marked immediately.
    assert!(doc.to_html().contains(&saved.id));

    // A later visit: fresh parse, restore from the store.
    let mut revisit = Document::parse(ARTICLE);
    let report = highlighter.restore_page(PAGE, &mut revisit).unwrap();
    assert_eq!(report.restored, 1);
    assert!(report.is_clean());
    let marked = revisit
        .element_with_attr("data-anchor-id", &saved.id)
        .expect("marker present");
    assert_eq!(revisit.flat_text(marked).text, "world");

    // Restoring again is a no-op, not a second marker.
    let report = highlighter.restore_page(PAGE, &mut revisit).unwrap();
    assert_eq!(report.already_marked, 1);
    assert_eq!(report.restored, 0);
    assert_eq!(
        revisit
            .elements_where(|el| el.attr("data-anchor-id").is_some())
            .len(),
        1
    );

    // Removal unwraps the marker and deletes the descriptor.
    assert!(highlighter
        .remove_highlight(PAGE, &mut revisit, &saved.id)
        .unwrap());
    assert!(revisit.element_with_attr("data-anchor-id", &saved.id).is_none());
    assert_eq!(
        highlighter.restore_page(PAGE, &mut revisit).unwrap().attempted(),
        0
    );
}

#[test]
fn page_key_normalization_joins_fragment_variants() {
    let highlighter = Highlighter::new(InMemoryStore::new());
    let mut doc = Document::parse(ARTICLE);
    let selection = select(&doc, 1, 0, 5);
    highlighter
        .save_selection(
            "https://example.com/article?id=7#section-2",
            &mut doc,
            &selection,
            HighlightMetadata::default(),
        )
        .unwrap()
        .expect("saved");

    // Same page addressed without the fragment restores the highlight.
    let mut revisit = Document::parse(ARTICLE);
    let report = highlighter.restore_page(PAGE, &mut revisit).unwrap();
    assert_eq!(report.restored, 1);
}

#[test]
fn empty_selection_saves_nothing() {
    let highlighter = Highlighter::new(InMemoryStore::new());
    let mut doc = Document::parse(ARTICLE);
    let collapsed = select(&doc, 1, 3, 3);
    let saved = highlighter
        .save_selection(PAGE, &mut doc, &collapsed, HighlightMetadata::default())
        .unwrap();
    assert_eq!(saved, None);
    assert_eq!(highlighter.restore_page(PAGE, &mut doc).unwrap().attempted(), 0);
}

#[test]
fn metadata_edits_survive_without_touching_structure() {
    let highlighter = Highlighter::new(InMemoryStore::new());
    let mut doc = Document::parse(ARTICLE);
    let selection = select(&doc, 2, 8, 17);
    let saved = highlighter
        .save_selection(PAGE, &mut doc, &selection, HighlightMetadata::default())
        .unwrap()
        .expect("saved");

    assert!(highlighter
        .update_metadata(
            PAGE,
            &saved.id,
            HighlightMetadata {
                comment: Some("worth rereading".into()),
                tags: vec!["prose".into()],
                color: Some("yellow".into()),
            },
        )
        .unwrap());
    assert!(!highlighter
        .update_metadata(PAGE, "no-such-id", HighlightMetadata::default())
        .unwrap());

    let stored = highlighter
        .store()
        .get(&textanchor::normalize_page_key(PAGE))
        .unwrap()
        .unwrap();
    let descriptor = stored.get(&saved.id).unwrap();
    assert_eq!(descriptor.comment.as_deref(), Some("worth rereading"));
    assert_eq!(descriptor.start_offset, saved.start_offset);
    assert_eq!(descriptor.text, saved.text);
    assert!(descriptor.updated_at.is_some());
}

#[test]
fn json_file_store_round_trips_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highlights.json");

    let saved = {
        let highlighter = Highlighter::new(JsonFileStore::new(&path));
        let mut doc = Document::parse(ARTICLE);
        let selection = select(&doc, 1, 19, 24);
        highlighter
            .save_selection(PAGE, &mut doc, &selection, HighlightMetadata::default())
            .unwrap()
            .expect("saved")
    };

    // A new highlighter over the same file: a later session.
    let highlighter = Highlighter::new(JsonFileStore::new(&path));
    let mut revisit = Document::parse(ARTICLE);
    let report = highlighter.restore_page(PAGE, &mut revisit).unwrap();
    assert_eq!(report.restored, 1);
    assert!(revisit.to_html().contains(&saved.id));
}
