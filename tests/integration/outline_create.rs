use crate::support::{file_name, named, ordering_of, read_store, TestProject};
use folio::error::ApiError;
use folio::outline::CreateOptions;
use folio::tree::TreeNode;

#[test]
fn new_chapters_are_appended_with_a_seed_fragment() {
    let mut project = TestProject::new();
    let one = project.chapter("One");
    let two = project.chapter("Two");

    assert_eq!(project.titles(&project.chapters_dir()), vec!["One", "Two"]);
    assert_eq!(ordering_of(&one), 0);
    assert_eq!(ordering_of(&two), 1);

    assert!(one.join("snips").join(".config").is_file());
    assert_eq!(project.titles(&one), vec!["New Fragment", "Snips"]);
    let fragment = project.first_fragment(&one);
    assert!(fragment.is_file());
    assert_eq!(ordering_of(&fragment), 0);
}

#[test]
fn generated_titles_use_the_next_ordering() {
    let mut project = TestProject::new();
    project.chapter("Existing");
    let created = project
        .outline_mut()
        .new_chapter(CreateOptions::default())
        .unwrap();

    let store = read_store(&project.chapters_dir());
    assert_eq!(store.get(&file_name(&created)).unwrap().title, "New Chapter (1)");
}

#[test]
fn skip_fragment_creates_an_empty_chapter() {
    let mut project = TestProject::new();
    let chapter = project.empty_chapter("Bare");
    assert_eq!(project.titles(&chapter), vec!["Snips"]);
    assert!(read_store(&chapter).is_empty());
}

#[test]
fn prevent_refresh_leaves_the_tree_stale() {
    let mut project = TestProject::new();
    let generation = project.outline().generation();
    let chapter = project
        .outline_mut()
        .new_chapter(CreateOptions {
            prevent_refresh: true,
            ..named("Later")
        })
        .unwrap();

    assert!(chapter.is_dir());
    assert_eq!(project.outline().generation(), generation);
    assert!(project.outline().lookup_by_uri(&chapter).is_none());

    project.outline_mut().refresh().unwrap();
    assert!(project.outline().lookup_by_uri(&chapter).is_some());
}

#[test]
fn snips_land_in_the_container_implied_by_the_resource() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");

    let top = project.snip(None, "Top");
    assert_eq!(top.parent().unwrap(), project.snips_dir());

    let in_chapter = project.snip(Some(chapter.as_path()), "Inner");
    assert_eq!(in_chapter.parent().unwrap(), chapter.join("snips"));

    // A fragment of a chapter snip points back at that chapter's snips.
    let inner_fragment = project.first_fragment(&in_chapter);
    let sibling = project.snip(Some(inner_fragment.as_path()), "Sibling");
    assert_eq!(sibling.parent().unwrap(), chapter.join("snips"));

    // A fragment of a top-level snip points at the top-level snips.
    let top_fragment = project.first_fragment(&top);
    let other = project.snip(Some(top_fragment.as_path()), "Other");
    assert_eq!(other.parent().unwrap(), project.snips_dir());

    assert_eq!(project.titles(&project.snips_dir()), vec!["Top", "Other"]);
    assert_eq!(project.titles(&chapter.join("snips")), vec!["Inner", "Sibling"]);
}

#[test]
fn snips_are_refused_in_the_chapters_container_and_at_the_root() {
    let mut project = TestProject::new();
    let chapters = project.node(&project.chapters_dir());
    let result = project.outline_mut().new_snip(Some(chapters.as_ref()), named("Nope"));
    assert!(matches!(result, Err(ApiError::InvalidTarget(_))));

    let root = project.outline().tree().unwrap().clone();
    let result = project.outline_mut().new_snip(Some(root.as_ref()), named("Nope"));
    assert!(matches!(result, Err(ApiError::InvalidTarget(_))));

    assert!(read_store(&project.snips_dir()).is_empty());
}

#[test]
fn fragments_follow_the_last_opened_document() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");

    let result = project.outline_mut().new_fragment(None, named("Orphan"));
    assert!(matches!(result, Err(ApiError::InvalidTarget(_))));

    let seed = project.first_fragment(&chapter);
    project.outline().document_opened(&seed);
    let created = project
        .outline_mut()
        .new_fragment(None, CreateOptions::default())
        .unwrap();

    assert_eq!(created.parent().unwrap(), chapter);
    assert_eq!(ordering_of(&created), 1);
    assert_eq!(
        read_store(&chapter).get(&file_name(&created)).unwrap().title,
        "New Fragment (1)"
    );
}

#[test]
fn fragments_dropped_next_to_a_fragment_become_siblings() {
    let mut project = TestProject::new();
    let snip = project.snip(None, "Snip");
    let seed = project.first_fragment(&snip);

    let created = project.fragment(&seed, "Second");
    assert_eq!(created.parent().unwrap(), snip);
    assert_eq!(project.titles(&snip), vec!["New Fragment (0)", "Second"]);
}

#[test]
fn fragments_for_a_container_use_its_last_item() {
    let mut project = TestProject::new();
    project.snip(None, "First");
    let last = project.snip(None, "Last");

    let created = project.fragment(&project.snips_dir(), "Added");
    assert_eq!(created.parent().unwrap(), last);
    assert_eq!(
        project.outline().context().access.lock().last_in(&project.snips_dir()),
        Some(project.first_fragment(&last).as_path())
    );
}

#[test]
fn fragments_are_refused_at_the_root() {
    let mut project = TestProject::new();
    let root = project.outline().tree().unwrap().clone();
    let result = project.outline_mut().new_fragment(Some(root.as_ref()), named("Nope"));
    assert!(matches!(result, Err(ApiError::InvalidTarget(_))));
}

#[test]
fn created_nodes_survive_a_rebuild() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let snip = project.snip(Some(chapter.as_path()), "Inner");
    let fragment = project.fragment(&snip, "Text");

    project.outline_mut().refresh().unwrap();
    for uri in [&chapter, &snip, &fragment] {
        let node = project.node(uri);
        assert_eq!(node.uri(&project.root()), *uri);
    }
    assert_eq!(project.titles(&snip), vec!["New Fragment (0)", "Text"]);
}
