use crate::support::{read_store, TestProject};
use folio::error::{ApiError, TreeError};
use folio::outline::view::OPEN_FILE_COMMAND;
use folio::outline::OutlineNode;
use folio::tree::{Collapsible, TreeChange, TreeNode};
use folio::types::ResourceType;
use std::fs;
use std::sync::{Arc, Mutex};

/// Structure of a tree with process-lifetime ids left out.
fn shape(node: &OutlineNode) -> Vec<(ResourceType, String, String, i64)> {
    let mut out = vec![(
        node.resource_type(),
        node.ids().display.clone(),
        node.ids().relative_uri(),
        node.ids().ordering,
    )];
    for child in node.structural_children() {
        out.extend(shape(&child));
    }
    out
}

#[test]
fn rebuilding_an_unchanged_project_is_idempotent() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    project.snip(Some(chapter.as_path()), "Inner");
    project.snip(None, "Loose");

    let before_root = project.outline().tree().unwrap().clone();
    let before = shape(&before_root);
    let generation = project.outline().generation();

    project.outline_mut().refresh().unwrap();
    let after_root = project.outline().tree().unwrap().clone();

    assert_eq!(shape(&after_root), before);
    assert_eq!(project.outline().generation(), generation + 1);
    assert_ne!(before_root.id(), after_root.id());
}

#[test]
fn parent_links_resolve_through_the_provider() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let fragment = project.first_fragment(&chapter);

    let node = project.node(&fragment);
    let parent = project.outline().parent_of(&node).unwrap();
    assert_eq!(parent.resource_type(), ResourceType::Chapter);
    assert_eq!(parent.uri(&project.root()), chapter);

    let root = project.outline().tree().unwrap().clone();
    assert_eq!(root.parent_id(), "");
    assert!(project.outline().parent_of(&root).is_none());
    assert_eq!(
        project.outline().lookup_by_id(node.id()).unwrap().uri(&project.root()),
        fragment
    );
}

#[test]
fn a_missing_snips_folder_disables_the_view_until_repaired() {
    let mut project = TestProject::new();
    let snips = project.snips_dir();
    fs::remove_dir_all(&snips).unwrap();

    let err = project.outline_mut().refresh().unwrap_err();
    assert!(matches!(
        err,
        ApiError::StructureError(TreeError::MissingDirectory(_))
    ));
    assert!(!project.outline().is_registered());
    assert!(matches!(
        project.outline().tree(),
        Err(ApiError::ProviderDisabled(_))
    ));
    assert!(matches!(
        project.outline_mut().refresh(),
        Err(ApiError::ProviderDisabled(_))
    ));

    fs::create_dir_all(&snips).unwrap();
    fs::write(snips.join(".config"), "{}").unwrap();
    project.session.reload().unwrap();
    assert!(project.outline().is_registered());
    assert!(project.outline().tree().is_ok());
}

#[test]
fn listeners_hear_rebuilds_and_derived_changes() {
    let mut project = TestProject::new();
    let seen: Arc<Mutex<Vec<TreeChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    project
        .outline_mut()
        .subscribe(move |change| sink.lock().unwrap().push(change.clone()));

    project.chapter("One");
    project.outline_mut().notify_changed();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].view_name, "outline");
    assert!(seen[0].rebuilt);
    assert!(!seen[1].rebuilt);
    assert_eq!(seen[0].generation, seen[1].generation);
}

#[test]
fn tree_items_carry_presentation_and_expansion_state() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let fragment = project.first_fragment(&chapter);

    let fragment_node = project.node(&fragment);
    let item = project.outline().get_tree_item(&fragment_node).unwrap();
    assert_eq!(item.label, "New Fragment");
    assert_eq!(item.collapsible, Collapsible::None);
    assert_eq!(item.context_value.as_deref(), Some("file"));
    assert_eq!(item.resource_uri, fragment);
    let command = item.command.unwrap();
    assert_eq!(command.command, OPEN_FILE_COMMAND);
    assert!(item.tooltip.starts_with("fragment | actual name: "));

    let chapter_node = project.node(&chapter);
    let item = project.outline().get_tree_item(&chapter_node).unwrap();
    assert_eq!(item.collapsible, Collapsible::Collapsed);
    assert_eq!(item.context_value.as_deref(), Some("dir"));

    project
        .outline_mut()
        .set_expanded(&chapter_node, true)
        .unwrap();
    project.outline_mut().refresh().unwrap();
    let chapter_node = project.node(&chapter);
    let item = project.outline().get_tree_item(&chapter_node).unwrap();
    assert_eq!(item.collapsible, Collapsible::Expanded);
}

#[test]
fn unrecorded_entries_are_shown_without_touching_the_store() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");

    let stray_chapter = project.chapters_dir().join("hand-made");
    fs::create_dir_all(stray_chapter.join("snips")).unwrap();
    fs::write(stray_chapter.join(".config"), "{}").unwrap();
    fs::write(stray_chapter.join("snips").join(".config"), "{}").unwrap();
    fs::write(chapter.join("pasted.wt"), "text").unwrap();
    let chapter_store = read_store(&chapter);

    project.outline_mut().refresh().unwrap();

    assert_eq!(project.titles(&project.chapters_dir()), vec!["One", "hand-made"]);
    assert_eq!(
        project.node(&stray_chapter).ids().ordering,
        folio::types::UNORDERED
    );
    assert_eq!(project.titles(&chapter), vec!["New Fragment", "pasted.wt", "Snips"]);
    assert_eq!(project.node(&chapter.join("pasted.wt")).ids().ordering, 1);
    assert_eq!(read_store(&chapter), chapter_store);
}

#[test]
fn local_roots_drop_selected_descendants() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let inner = project.snip(Some(chapter.as_path()), "Inner");
    let loose = project.snip(None, "Loose");

    let selection = vec![
        project.node(&inner),
        project.node(&chapter),
        project.node(&loose),
    ];
    let roots: Vec<_> = project
        .outline()
        .local_roots(&selection)
        .iter()
        .map(|node| node.uri(&project.root()))
        .collect();
    assert_eq!(roots, vec![chapter, loose]);
}
