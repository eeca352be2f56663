use command_core::{
    ChangeFontSize, ChangeFontWeight, ChangeTextColor, Command, CommandError, CommandHistory,
    DeleteText, DocumentHandle, DocumentSnapshot, DocumentState, FontWeight, HistoryEntry,
    InsertText, TextColor,
};
use pretty_assertions::assert_eq;

fn new_doc() -> DocumentHandle {
    DocumentHandle::new(DocumentState::new())
}

fn doc_from(snapshot: DocumentSnapshot) -> DocumentHandle {
    DocumentHandle::new(DocumentState::from_snapshot(&snapshot).unwrap())
}

fn descriptions(history: &CommandHistory) -> Vec<String> {
    history
        .get_history()
        .into_iter()
        .map(|entry| entry.description)
        .collect()
}

fn command_cases(doc: &DocumentHandle) -> Vec<Box<dyn Command>> {
    let mut cases: Vec<Box<dyn Command>> = Vec::new();
    cases.push(Box::new(InsertText::new(doc, "🎉 yay", 5)));
    cases.push(Box::new(InsertText::new(doc, "end", 12)));
    cases.push(Box::new(DeleteText::new(doc, 7, 3)));
    cases.push(Box::new(DeleteText::new(doc, 7, 500)));
    cases.push(Box::new(ChangeFontSize::new(doc, 32)));
    cases.push(Box::new(ChangeFontWeight::new(doc, FontWeight::Bold)));
    cases.push(Box::new(ChangeTextColor::new(doc, TextColor::from_rgb(0xef4444))));
    cases
}

#[test]
fn test_undo_inverts_execute_for_every_command() {
    let start = DocumentSnapshot {
        content: "Hello, wörld".to_string(),
        font_size: 18,
        font_weight: FontWeight::Normal,
        text_color: TextColor::from_rgb(0x3b82f6),
    };

    let case_count = command_cases(&doc_from(start.clone())).len();
    for index in 0..case_count {
        let doc = doc_from(start.clone());
        let mut command = command_cases(&doc).swap_remove(index);
        let before = doc.snapshot();

        command.execute().unwrap();
        assert_ne!(doc.snapshot(), before, "{} had no effect", command.describe());

        command.undo().unwrap();
        assert_eq!(doc.snapshot(), before, "{} did not invert", command.describe());
    }
}

#[test]
fn test_history_linearity() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "a", 0)))
        .unwrap();
    history
        .execute(Box::new(ChangeFontSize::new(&doc, 20)))
        .unwrap();
    history
        .execute(Box::new(ChangeFontWeight::new(&doc, FontWeight::Bold)))
        .unwrap();

    assert!(history.can_undo());
    assert!(!history.can_redo());

    let entries = history.get_history();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|entry| entry.is_active));
}

#[test]
fn test_new_command_discards_undone_branch() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "one", 0)))
        .unwrap();
    history
        .execute(Box::new(InsertText::new(&doc, " two", 3)))
        .unwrap();
    history.undo().unwrap();
    history
        .execute(Box::new(InsertText::new(&doc, " three", 3)))
        .unwrap();

    assert_eq!(
        descriptions(&history),
        vec!["Insert: \"one\"", "Insert: \" three\""]
    );
    assert!(!history.can_redo());
    assert_eq!(doc.borrow().content(), "one three");
}

#[test]
fn test_redo_replays_forward() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "abc", 0)))
        .unwrap();
    history
        .execute(Box::new(DeleteText::new(&doc, 1, 1)))
        .unwrap();
    let after_second = doc.snapshot();

    history.undo().unwrap();
    assert_eq!(doc.borrow().content(), "abc");

    history.redo().unwrap();
    assert_eq!(doc.snapshot(), after_second);
}

#[test]
fn test_clear_leaves_document_untouched() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "keep me", 0)))
        .unwrap();
    history
        .execute(Box::new(ChangeTextColor::new(&doc, TextColor::from_rgb(0x10b981))))
        .unwrap();
    let before = doc.snapshot();

    history.clear();

    assert!(history.is_empty());
    assert_eq!(history.cursor(), None);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn test_undo_redo_are_noops_at_bounds() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    assert!(!history.can_undo());
    assert_eq!(history.undo(), Ok(false));

    history
        .execute(Box::new(InsertText::new(&doc, "x", 0)))
        .unwrap();
    assert!(!history.can_redo());
    assert_eq!(history.redo(), Ok(false));
    assert_eq!(history.cursor(), Some(0));
    assert_eq!(doc.borrow().content(), "x");

    history.clear();
    assert_eq!(history.undo(), Ok(false));
    assert_eq!(doc.borrow().content(), "x");
}

#[test]
fn test_example_scenario() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "hello", 0)))
        .unwrap();
    assert_eq!(doc.borrow().content(), "hello");

    history
        .execute(Box::new(ChangeFontSize::new(&doc, 24)))
        .unwrap();
    assert_eq!(doc.borrow().font_size(), 24);

    history.undo().unwrap();
    assert_eq!(doc.borrow().font_size(), 16);

    history.undo().unwrap();
    assert_eq!(doc.borrow().content(), "");

    history.redo().unwrap();
    assert_eq!(doc.borrow().content(), "hello");

    history.redo().unwrap();
    assert_eq!(doc.borrow().font_size(), 24);
}

#[test]
fn test_get_history_marks_undone_entries_inactive() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "hello", 0)))
        .unwrap();
    history
        .execute(Box::new(ChangeFontSize::new(&doc, 24)))
        .unwrap();
    history.undo().unwrap();

    assert_eq!(
        history.get_history(),
        vec![
            HistoryEntry {
                description: "Insert: \"hello\"".to_string(),
                is_active: true,
            },
            HistoryEntry {
                description: "Font size: 16px → 24px".to_string(),
                is_active: false,
            },
        ]
    );
    assert_eq!(history.get_active_commands().len(), 1);
    assert_eq!(history.cursor(), Some(0));
}

#[test]
fn test_active_commands_exclude_undone_entries() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "abc", 0)))
        .unwrap();
    history
        .execute(Box::new(ChangeFontWeight::new(&doc, FontWeight::Bold)))
        .unwrap();
    history
        .execute(Box::new(DeleteText::new(&doc, 0, 1)))
        .unwrap();
    history.undo().unwrap();
    let expected = doc.snapshot();

    let labels: Vec<String> = history
        .get_active_commands()
        .iter()
        .map(|command| command.describe())
        .collect();
    assert_eq!(labels, vec!["Insert: \"abc\"", "Font weight: normal → bold"]);
    assert_eq!(expected.content, "abc");
    assert_eq!(expected.font_weight, FontWeight::Bold);
}

#[test]
fn test_failed_execute_leaves_history_untouched() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "abc", 0)))
        .unwrap();
    history
        .execute(Box::new(ChangeFontSize::new(&doc, 20)))
        .unwrap();
    history.undo().unwrap();
    let before = doc.snapshot();

    let err = history
        .execute(Box::new(InsertText::new(&doc, "x", 10)))
        .unwrap_err();
    assert_eq!(err, CommandError::PositionOutOfRange { position: 10, len: 3 });

    // The undone entry survives because nothing was recorded.
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), Some(0));
    assert!(history.can_redo());
    assert_eq!(doc.snapshot(), before);

    let err = history
        .execute(Box::new(ChangeFontSize::new(&doc, 0)))
        .unwrap_err();
    assert_eq!(err, CommandError::InvalidFontSize(0));
    assert_eq!(history.len(), 2);
}

#[test]
fn test_failed_undo_keeps_cursor() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "abc", 0)))
        .unwrap();
    history
        .execute(Box::new(InsertText::new(&doc, "zz", 3)))
        .unwrap();

    // Resetting the document behind the history's back breaks the last insert's undo.
    doc.borrow_mut()
        .set_state(&DocumentSnapshot::default())
        .unwrap();

    let err = history.undo().unwrap_err();
    assert_eq!(err, CommandError::PositionOutOfRange { position: 3, len: 0 });
    assert_eq!(history.cursor(), Some(1));
    assert_eq!(history.undo_depth(), 2);
}

#[test]
fn test_delete_past_end_is_truncated_and_restored() {
    let doc = new_doc();
    let mut history = CommandHistory::new();

    history
        .execute(Box::new(InsertText::new(&doc, "Hello World", 0)))
        .unwrap();
    history
        .execute(Box::new(DeleteText::new(&doc, 6, 100)))
        .unwrap();
    assert_eq!(doc.borrow().content(), "Hello ");
    assert_eq!(descriptions(&history)[1], "Delete: \"World\"");

    history.undo().unwrap();
    assert_eq!(doc.borrow().content(), "Hello World");
}
