use taskpad_core::{Priority, Task, TaskDraft, TaskValidationError};

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let task = Task {
        id: 1,
        title: "Complete project proposal".to_string(),
        description: "Write and submit the project proposal by Friday".to_string(),
        priority: Priority::High,
        completed: false,
    };

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["title"], "Complete project proposal");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["completed"], false);
    assert_eq!(json.as_object().unwrap().len(), 5);
}

#[test]
fn decoding_requires_every_field() {
    let missing_description = r#"{"id":1,"title":"t","priority":"low","completed":false}"#;
    assert!(serde_json::from_str::<Task>(missing_description).is_err());

    let bad_priority = r#"{"id":1,"title":"t","description":"","priority":"urgent","completed":false}"#;
    assert!(serde_json::from_str::<Task>(bad_priority).is_err());
}

#[test]
fn from_draft_starts_incomplete() {
    let draft = TaskDraft {
        title: "Stretch".to_string(),
        description: String::new(),
        priority: Priority::Low,
    };

    let task = Task::from_draft(9, &draft).unwrap();

    assert_eq!(task.id, 9);
    assert!(!task.completed);
    assert!(task.is_editable());
}

#[test]
fn from_draft_rejects_blank_title() {
    let err = Task::from_draft(1, &TaskDraft::titled("\n  ")).unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyTitle);
}

#[test]
fn default_draft_is_blank_medium() {
    let draft = TaskDraft::default();
    assert_eq!(draft.title, "");
    assert_eq!(draft.description, "");
    assert_eq!(draft.priority, Priority::Medium);
}
