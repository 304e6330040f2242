use crate::support::{ordering_of, read_store, TestProject};

fn chapter_with_fragments(project: &mut TestProject) -> (std::path::PathBuf, Vec<std::path::PathBuf>) {
    let chapter = project.empty_chapter("One");
    let fragments = ["A", "B", "C"]
        .iter()
        .map(|title| project.fragment(&chapter, title))
        .collect();
    (chapter, fragments)
}

#[test]
fn move_up_swaps_with_the_previous_sibling() {
    let mut project = TestProject::new();
    let (chapter, fragments) = chapter_with_fragments(&mut project);

    let resource = project.node(&fragments[2]);
    assert!(project.outline_mut().move_up(&resource, &[]).unwrap());

    assert_eq!(project.titles(&chapter), vec!["A", "C", "B", "Snips"]);
    assert_eq!(ordering_of(&fragments[0]), 0);
    assert_eq!(ordering_of(&fragments[2]), 1);
    assert_eq!(ordering_of(&fragments[1]), 2);
}

#[test]
fn moving_past_the_edge_is_a_no_op() {
    let mut project = TestProject::new();
    let (chapter, fragments) = chapter_with_fragments(&mut project);
    let before = read_store(&chapter);

    let first = project.node(&fragments[0]);
    assert!(!project.outline_mut().move_up(&first, &[]).unwrap());
    let last = project.node(&fragments[2]);
    assert!(!project.outline_mut().move_down(&last, &[]).unwrap());

    assert_eq!(read_store(&chapter), before);
}

#[test]
fn selected_siblings_move_as_a_block() {
    let mut project = TestProject::new();
    let (chapter, fragments) = chapter_with_fragments(&mut project);

    let resource = project.node(&fragments[0]);
    let selection = vec![project.node(&fragments[0]), project.node(&fragments[1])];
    assert!(project
        .outline_mut()
        .move_down(&resource, &selection)
        .unwrap());

    assert_eq!(project.titles(&chapter), vec!["C", "A", "B", "Snips"]);
    assert!(read_store(&chapter).orderings_unique());
}

#[test]
fn selection_outside_the_parent_is_ignored() {
    let mut project = TestProject::new();
    let (chapter, fragments) = chapter_with_fragments(&mut project);
    let other = project.snip(None, "Elsewhere");
    let other_fragment = project.first_fragment(&other);

    let resource = project.node(&fragments[1]);
    let selection = vec![project.node(&other_fragment)];
    assert!(project.outline_mut().move_up(&resource, &selection).unwrap());

    assert_eq!(project.titles(&chapter), vec!["B", "A", "C", "Snips"]);
    assert_eq!(ordering_of(&other_fragment), 0);
}

#[test]
fn containers_and_root_keep_their_position() {
    let mut project = TestProject::new();
    let container = project.node(&project.snips_dir());
    assert!(!project.outline_mut().move_up(&container, &[]).unwrap());

    let root = project.outline().tree().unwrap().clone();
    assert!(!project.outline_mut().move_down(&root, &[]).unwrap());
}

#[test]
fn chapters_reorder_in_the_chapters_store() {
    let mut project = TestProject::new();
    let one = project.chapter("One");
    let two = project.chapter("Two");
    let three = project.chapter("Three");

    let resource = project.node(&one);
    assert!(project.outline_mut().move_down(&resource, &[]).unwrap());

    assert_eq!(project.titles(&project.chapters_dir()), vec!["Two", "One", "Three"]);
    assert_eq!(ordering_of(&two), 0);
    assert_eq!(ordering_of(&one), 1);
    assert_eq!(ordering_of(&three), 2);
}
