use crate::support::TestProject;
use folio::config::{FolioConfig, StorageConfig};
use folio::todo::CacheEntry;
use folio::workspace::{ChangeEvent, Session, Workspace};
use std::fs;
use std::path::PathBuf;

#[test]
fn fragment_edits_only_touch_the_todo_cache() {
    let mut project = TestProject::new();
    let snip = project.snip(None, "Notes");
    let fragment = project.first_fragment(&snip);
    project.session.reload().unwrap();
    let outline_generation = project.outline().generation();
    let todo_generation = project.session.todos().generation();

    fs::write(&fragment, "[later]").unwrap();
    project
        .session
        .apply_changes(&[ChangeEvent::Modified(fragment.clone())])
        .unwrap();

    assert_eq!(project.outline().generation(), outline_generation);
    assert_eq!(project.session.todos().generation(), todo_generation);
    assert_eq!(
        project.session.todos().cache_entry(&fragment),
        Some(CacheEntry::Invalidated)
    );
}

#[test]
fn structural_changes_rebuild_both_views() {
    let mut project = TestProject::new();
    let outline_generation = project.outline().generation();
    let todo_generation = project.session.todos().generation();

    let snip = project.snips_dir().join("from-elsewhere");
    fs::create_dir_all(&snip).unwrap();
    fs::write(snip.join(".config"), "{}").unwrap();
    project
        .session
        .apply_changes(&[ChangeEvent::Created(snip.clone())])
        .unwrap();

    assert_eq!(project.outline().generation(), outline_generation + 1);
    assert_eq!(project.session.todos().generation(), todo_generation + 1);
    assert!(project.outline().lookup_by_uri(&snip).is_some());
}

#[test]
fn ordering_store_writes_are_structural() {
    let mut project = TestProject::new();
    let generation = project.outline().generation();
    project
        .session
        .apply_changes(&[ChangeEvent::Modified(project.snips_dir().join(".config"))])
        .unwrap();
    assert_eq!(project.outline().generation(), generation + 1);
}

#[test]
fn directory_metadata_changes_are_ignored() {
    let mut project = TestProject::new();
    let generation = project.outline().generation();
    project
        .session
        .apply_changes(&[ChangeEvent::Modified(project.snips_dir())])
        .unwrap();
    assert_eq!(project.outline().generation(), generation);
}

#[test]
fn expansion_state_persists_across_sessions() {
    let project = TestProject::new();
    let root = project.root();
    let config = FolioConfig {
        storage: StorageConfig {
            state_path: PathBuf::from("state"),
        },
        ..FolioConfig::default()
    };

    {
        let workspace = Workspace::load(&root).unwrap().unwrap();
        let mut session = Session::open(workspace, &config).unwrap();
        let container = session
            .outline()
            .lookup_by_uri(&root.join("data").join("snips"))
            .unwrap();
        session
            .outline_mut()
            .set_expanded(&container, true)
            .unwrap();
    }

    assert!(root.join("state").join("outline.collapseState.json").is_file());
    let workspace = Workspace::discover(&root.join("data")).unwrap();
    let session = Session::open(workspace, &config).unwrap();
    let container = session
        .outline()
        .lookup_by_uri(&root.join("data").join("snips"))
        .unwrap();
    assert_eq!(
        session
            .outline()
            .expansion()
            .is_expanded(&root.join("data").join("snips")),
        Some(true)
    );
    assert_eq!(
        session.outline().get_tree_item(&container).unwrap().collapsible,
        folio::tree::Collapsible::Expanded
    );
}
