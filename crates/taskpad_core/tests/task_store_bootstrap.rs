use std::collections::HashSet;
use taskpad_core::{
    decode_tasks, encode_tasks, BootstrapSource, DefaultSeed, MemorySlot, PayloadError,
    PersistenceSlot, Priority, SeedProvider, SlotError, SlotResult, StoreConfig, StoreError,
    StoreState, Task, TaskDraft, TaskId, TaskPatch, TaskStore,
};

/// Slot whose reads always fail; records writes.
#[derive(Default)]
struct BrokenReadSlot {
    saves: usize,
}

impl PersistenceSlot for BrokenReadSlot {
    fn load(&self, _key: &str) -> SlotResult<Option<String>> {
        Err(SlotError::Unavailable("disk gone".to_string()))
    }

    fn save(&mut self, _key: &str, _value: &str) -> SlotResult<()> {
        self.saves += 1;
        Ok(())
    }
}

fn persisted_tasks() -> Vec<Task> {
    vec![Task {
        id: 42,
        title: "Renew passport".to_string(),
        description: String::new(),
        priority: Priority::High,
        completed: true,
    }]
}

#[test]
fn absent_slot_uses_seed_and_writes_it_once_ready() {
    let mut store = TaskStore::new(MemorySlot::new());

    let source = store.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::Seed);
    assert_eq!(store.state(), StoreState::Ready);
    assert_eq!(store.tasks(), DefaultSeed.seed_tasks().as_slice());
    assert_eq!(store.slot().save_count(), 1);
    let expected = encode_tasks(&DefaultSeed.seed_tasks()).unwrap();
    assert_eq!(store.slot().get("tasks"), Some(expected.as_str()));
}

#[test]
fn persisted_payload_wins_over_seed() {
    let payload = encode_tasks(&persisted_tasks()).unwrap();
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", payload));

    let source = store.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::Persisted);
    assert_eq!(store.tasks(), persisted_tasks().as_slice());
}

#[test]
fn persisted_max_id_bounds_future_ids() {
    let payload = encode_tasks(&persisted_tasks()).unwrap();
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", payload));
    store.bootstrap(&DefaultSeed).unwrap();

    let id = store.add(&mut TaskDraft::titled("after reload")).unwrap();
    assert_eq!(id, 43);
}

#[test]
fn unparsable_payload_falls_back_to_exact_seed() {
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", "{not json"));

    let source = store.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::SeedAfterUnreadable);
    assert_eq!(store.tasks(), DefaultSeed.seed_tasks().as_slice());
}

#[test]
fn records_missing_fields_are_treated_as_unparsable() {
    let payload = r#"[{"id":1,"title":"no flags","description":"","priority":"low"}]"#;
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", payload));

    let source = store.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::SeedAfterUnreadable);
    assert_eq!(store.tasks(), DefaultSeed.seed_tasks().as_slice());
}

#[test]
fn slot_read_failure_falls_back_to_seed() {
    let mut store = TaskStore::new(BrokenReadSlot::default());

    let source = store.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::SeedAfterUnreadable);
    assert_eq!(store.tasks().len(), 3);
    assert_eq!(store.slot().saves, 1);
}

#[test]
fn no_save_happens_while_loading() {
    let mut store = TaskStore::new(MemorySlot::new());

    let mut draft = TaskDraft::titled("too early");
    assert!(matches!(store.add(&mut draft), Err(StoreError::NotReady)));
    assert!(matches!(store.toggle_complete(1), Err(StoreError::NotReady)));
    assert!(matches!(store.start_edit(1), Err(StoreError::NotReady)));
    assert!(matches!(store.save_edit(), Err(StoreError::NotReady)));
    assert!(matches!(
        store.delete_task(1, |_| true),
        Err(StoreError::NotReady)
    ));
    store.update_draft(&TaskPatch::title("typed while loading"));

    assert!(store.is_loading());
    assert!(store.tasks().is_empty());
    assert_eq!(draft.title, "too early");
    assert_eq!(store.slot().save_count(), 0);

    store.bootstrap(&DefaultSeed).unwrap();
    assert_eq!(store.slot().save_count(), 1);
    assert_eq!(store.tasks(), DefaultSeed.seed_tasks().as_slice());
}

#[test]
fn configured_slot_key_and_id_base_are_used() {
    let config = StoreConfig {
        slot_key: "work-tasks".to_string(),
        id_base: 100,
    };
    let mut store = TaskStore::with_config(MemorySlot::new(), config);
    store.bootstrap(&Vec::<Task>::new()).unwrap();

    let id = store.add(&mut TaskDraft::titled("standup")).unwrap();

    assert_eq!(id, 100);
    assert!(store.slot().get("tasks").is_none());
    assert!(store.slot().get("work-tasks").unwrap().contains("standup"));
}

#[test]
fn reload_restores_previous_session() {
    let mut first = TaskStore::new(MemorySlot::new());
    first.bootstrap(&DefaultSeed).unwrap();
    first.toggle_complete(3).unwrap();
    first.add(&mut TaskDraft::titled("Pay rent")).unwrap();
    let slot = first.into_slot();

    let mut second = TaskStore::new(slot);
    let source = second.bootstrap(&DefaultSeed).unwrap();

    assert_eq!(source, BootstrapSource::Persisted);
    assert_eq!(second.tasks().len(), 4);
    assert!(second.task(3).unwrap().completed);
    assert_eq!(second.task(4).unwrap().title, "Pay rent");
}

fn max_id_store() -> TaskStore<MemorySlot> {
    let stored = vec![Task {
        id: TaskId::MAX,
        title: "last id".to_string(),
        description: String::new(),
        priority: Priority::Low,
        completed: false,
    }];
    let payload = encode_tasks(&stored).unwrap();
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", payload));
    assert_eq!(
        store.bootstrap(&DefaultSeed).unwrap(),
        BootstrapSource::Persisted
    );
    store
}

#[test]
fn exhausted_id_space_rejects_add_without_state_change() {
    let mut store = max_id_store();
    let saves_before = store.slot().save_count();

    for _ in 0..2 {
        let mut draft = TaskDraft::titled("one too many");
        let err = store.add(&mut draft).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(draft.title, "one too many");
    }

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.slot().save_count(), saves_before);
}

#[test]
fn ids_stay_unique_next_to_max_id() {
    let mut store = max_id_store();
    let _ = store.add(&mut TaskDraft::titled("a"));
    let _ = store.add(&mut TaskDraft::titled("b"));

    let ids: HashSet<_> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), store.tasks().len());
}

#[test]
fn duplicate_ids_in_payload_fall_back_to_seed() {
    let payload = r#"[
        {"id":1,"title":"first","description":"","priority":"high","completed":false},
        {"id":1,"title":"copy","description":"","priority":"low","completed":false}
    ]"#;
    let mut store = TaskStore::new(MemorySlot::with_value("tasks", payload));

    let source = store.bootstrap(&DefaultSeed).unwrap();
    store.toggle_complete(1).unwrap();

    assert_eq!(source, BootstrapSource::SeedAfterUnreadable);
    let ids: HashSet<_> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), store.tasks().len());
    assert_eq!(store.tasks().len(), DefaultSeed.seed_tasks().len());
    assert!(store.task(1).unwrap().completed);
}

#[test]
fn decode_reports_the_duplicated_id() {
    let payload = r#"[
        {"id":7,"title":"a","description":"","priority":"high","completed":false},
        {"id":8,"title":"b","description":"","priority":"high","completed":false},
        {"id":7,"title":"c","description":"","priority":"high","completed":true}
    ]"#;

    let err = decode_tasks(payload).unwrap_err();
    assert!(matches!(err, PayloadError::DuplicateId(7)));
}
