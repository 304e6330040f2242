use crate::support::{file_name, ordering_of, read_store, TestProject};
use folio::error::ApiError;
use folio::types::ResourceType;

#[test]
fn removing_a_fragment_recycles_it_and_closes_the_gap() {
    let mut project = TestProject::new();
    let chapter = project.empty_chapter("One");
    let a = project.fragment(&chapter, "A");
    let b = project.fragment(&chapter, "B");
    let c = project.fragment(&chapter, "C");

    let target = project.node(&b);
    let records = project
        .outline_mut()
        .remove_resources(&[target], |_| true)
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.old_uri, b.to_string_lossy());
    assert_eq!(record.resource_type, ResourceType::Fragment);
    assert_eq!(record.title.as_deref(), Some("B"));
    assert!(record.recycle_bin_name.starts_with("deleted-fragment-"));

    assert!(!b.exists());
    let recycled = project.outline().recycling_dir().join(&record.recycle_bin_name);
    assert!(recycled.is_file());

    let store = read_store(&chapter);
    assert!(store.get(&file_name(&b)).is_none());
    assert_eq!(ordering_of(&a), 0);
    assert_eq!(ordering_of(&c), 1);

    assert!(project.outline().lookup_by_uri(&b).is_none());
    assert_eq!(project.titles(&chapter), vec!["A", "C", "Snips"]);

    let log = project.outline().recycle_log().read().unwrap();
    assert_eq!(log, records);
}

#[test]
fn declining_the_confirmation_changes_nothing() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let target = project.node(&chapter);

    let mut asked = 0;
    let records = project
        .outline_mut()
        .remove_resources(&[target], |roots| {
            asked += 1;
            assert_eq!(roots.len(), 1);
            false
        })
        .unwrap();

    assert_eq!(asked, 1);
    assert!(records.is_empty());
    assert!(chapter.is_dir());
    assert!(project.outline().recycle_log().read().unwrap().is_empty());
}

#[test]
fn nested_selections_remove_only_their_local_roots() {
    let mut project = TestProject::new();
    let chapter = project.chapter("One");
    let inner = project.first_fragment(&chapter);
    let selection = vec![project.node(&inner), project.node(&chapter)];

    let records = project
        .outline_mut()
        .remove_resources(&selection, |roots| roots.len() == 1)
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource_type, ResourceType::Chapter);
    assert_eq!(records[0].title, None);
    assert!(!chapter.exists());
    assert!(read_store(&project.chapters_dir()).is_empty());
}

#[test]
fn removing_siblings_in_one_batch_keeps_orderings_dense() {
    let mut project = TestProject::new();
    let first = project.empty_snip(None, "First");
    let second = project.empty_snip(None, "Second");
    let third = project.empty_snip(None, "Third");
    let fourth = project.empty_snip(None, "Fourth");

    let selection = vec![project.node(&first), project.node(&third)];
    let records = project
        .outline_mut()
        .remove_resources(&selection, |_| true)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(ordering_of(&second), 0);
    assert_eq!(ordering_of(&fourth), 1);
    assert_eq!(project.titles(&project.snips_dir()), vec!["Second", "Fourth"]);
    assert_eq!(project.outline().recycle_log().read().unwrap().len(), 2);
}

#[test]
fn removing_a_container_empties_it_but_keeps_it() {
    let mut project = TestProject::new();
    project.snip(None, "One");
    project.snip(None, "Two");

    let container = project.node(&project.snips_dir());
    let records = project
        .outline_mut()
        .remove_resources(&[container], |_| true)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|record| record.resource_type == ResourceType::Container));
    assert!(project.snips_dir().is_dir());
    assert!(read_store(&project.snips_dir()).is_empty());
    assert!(project.titles(&project.snips_dir()).is_empty());
}

#[test]
fn the_root_cannot_be_removed() {
    let mut project = TestProject::new();
    let root = project.outline().tree().unwrap().clone();
    let result = project.outline_mut().remove_resources(&[root], |_| true);
    assert!(matches!(result, Err(ApiError::InvariantViolation(_))));
    assert!(project.outline().is_registered());
}

#[test]
fn removal_forgets_opened_fragments() {
    let mut project = TestProject::new();
    let snip = project.snip(None, "Snip");
    let fragment = project.first_fragment(&snip);
    project.outline().document_opened(&fragment);
    assert_eq!(project.outline().last_accessed(), Some(fragment.clone()));

    let target = project.node(&snip);
    project
        .outline_mut()
        .remove_resources(&[target], |_| true)
        .unwrap();

    assert_eq!(project.outline().last_accessed(), None);
}
