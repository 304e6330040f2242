use crate::support::{file_name, ordering_of, read_store, TestProject};

#[test]
fn fragments_move_between_snips() {
    let mut project = TestProject::new();
    let from = project.snip(None, "From");
    let to = project.snip(None, "To");
    let fragment = project.first_fragment(&from);
    let name = file_name(&fragment);

    let mover = project.node(&fragment);
    let target = project.node(&to);
    let moved = project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    assert_eq!(moved, 1);
    assert!(!fragment.exists());
    let landed = to.join(&name);
    assert!(landed.is_file());
    assert!(read_store(&from).is_empty());
    assert_eq!(ordering_of(&landed), 1);
    assert_eq!(project.titles(&to).len(), 2);
    assert!(project.outline().lookup_by_uri(&landed).is_some());
}

#[test]
fn dropping_siblings_below_a_later_sibling_keeps_their_order() {
    let mut project = TestProject::new();
    let a = project.empty_snip(None, "A");
    let b = project.empty_snip(None, "B");
    project.empty_snip(None, "C");
    let d = project.empty_snip(None, "D");

    let movers = vec![project.node(&a), project.node(&b)];
    let target = project.node(&d);
    let moved = project
        .outline_mut()
        .handle_drop(Some(target), &movers)
        .unwrap();

    assert_eq!(moved, 2);
    assert_eq!(project.titles(&project.snips_dir()), vec!["C", "D", "A", "B"]);
    assert!(read_store(&project.snips_dir()).orderings_unique());
}

#[test]
fn dropping_onto_an_earlier_sibling_lands_before_it() {
    let mut project = TestProject::new();
    let a = project.empty_snip(None, "A");
    project.empty_snip(None, "B");
    project.empty_snip(None, "C");
    let d = project.empty_snip(None, "D");

    let mover = project.node(&d);
    let target = project.node(&a);
    project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    assert_eq!(project.titles(&project.snips_dir()), vec!["D", "A", "B", "C"]);
}

#[test]
fn chapters_reorder_by_dropping_onto_each_other() {
    let mut project = TestProject::new();
    let one = project.chapter("One");
    let two = project.chapter("Two");

    let mover = project.node(&two);
    let target = project.node(&one);
    project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    assert_eq!(project.titles(&project.chapters_dir()), vec!["Two", "One"]);
}

#[test]
fn snips_move_into_a_chapter() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let snip = project.snip(None, "Loose");
    let name = file_name(&snip);

    let mover = project.node(&snip);
    let target = project.node(&chapter);
    project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    let landed = chapter.join("snips").join(&name);
    assert!(landed.is_dir());
    assert_eq!(ordering_of(&landed), 0);
    assert!(read_store(&project.snips_dir()).is_empty());
    assert_eq!(project.titles(&chapter.join("snips")), vec!["Loose"]);
    // The snip keeps its own ordering store and fragment.
    assert_eq!(project.titles(&landed), vec!["New Fragment (0)"]);
}

#[test]
fn dropping_a_snips_container_moves_its_contents() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    project.empty_snip(None, "First");
    project.empty_snip(None, "Second");

    let mover = project.node(&project.snips_dir());
    let target = project.node(&chapter);
    let moved = project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    assert_eq!(moved, 1);
    assert!(project.titles(&project.snips_dir()).is_empty());
    assert_eq!(
        project.titles(&chapter.join("snips")),
        vec!["First", "Second"]
    );
}

#[test]
fn disallowed_drops_are_skipped() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let fragment = project.first_fragment(&chapter);
    let generation = project.outline().generation();

    // Chapters never leave the chapters container.
    let mover = project.node(&chapter);
    let target = project.node(&project.snips_dir());
    let moved = project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();
    assert_eq!(moved, 0);
    assert!(chapter.is_dir());

    // Fragments cannot be dropped on the root.
    let mover = project.node(&fragment);
    let moved = project.outline_mut().handle_drop(None, &[mover]).unwrap();
    assert_eq!(moved, 0);
    assert!(fragment.is_file());

    // Both attempts still rebuilt the tree.
    assert_eq!(project.outline().generation(), generation + 2);
}

#[test]
fn drops_onto_the_current_parent_are_ignored() {
    let mut project = TestProject::new();
    let snip = project.empty_snip(None, "Snip");
    let generation = project.outline().generation();

    let mover = project.node(&snip);
    let target = project.node(&project.snips_dir());
    let moved = project
        .outline_mut()
        .handle_drop(Some(target), &[mover])
        .unwrap();

    assert_eq!(moved, 0);
    assert_eq!(project.outline().generation(), generation);
    assert!(snip.is_dir());
}
