//! Command interface example
//!
//! Demonstrates how to drive a document through `CommandHistory` with hand-built commands.

use command_core::{
    ChangeFontSize, ChangeFontWeight, ChangeTextColor, CommandHistory, DeleteText,
    DocumentHandle, DocumentState, FontWeight, InsertText, MacroCommand, TextColor,
};

fn print_state(doc: &DocumentHandle) {
    let state = doc.snapshot();
    println!(
        "  content: {:?} | {}px {} {}",
        state.content, state.font_size, state.font_weight, state.text_color
    );
}

fn print_history(history: &CommandHistory) {
    for (index, entry) in history.get_history().iter().enumerate() {
        let marker = if entry.is_active { "●" } else { "○" };
        println!("  {marker} {index}: {}", entry.description);
    }
}

fn main() {
    println!("=== Command interface example ===\n");

    let doc = DocumentHandle::new(DocumentState::new());
    let mut history = CommandHistory::new();

    // 1. Text edits
    println!("1. Text edits:");
    history
        .execute(Box::new(InsertText::new(&doc, "Hello World", 0)))
        .unwrap();
    history
        .execute(Box::new(DeleteText::new(&doc, 5, 6)))
        .unwrap();
    print_state(&doc);

    // 2. Formatting
    println!("\n2. Formatting:");
    history
        .execute(Box::new(ChangeFontWeight::new(&doc, FontWeight::Bold)))
        .unwrap();
    history
        .execute(Box::new(ChangeTextColor::new(&doc, TextColor::from_rgb(0xef4444))))
        .unwrap();
    print_state(&doc);

    // 3. Macro
    println!("\n3. Macro:");
    let end = doc.borrow().char_len();
    let format = MacroCommand::new("Special format")
        .then(InsertText::new(&doc, "\n=== FORMATTED TEXT ===\n", end))
        .then(ChangeFontSize::new(&doc, 20));
    history.execute(Box::new(format)).unwrap();
    print_state(&doc);

    // 4. Undo / redo
    println!("\n4. Undo twice, redo once:");
    history.undo().unwrap();
    history.undo().unwrap();
    history.redo().unwrap();
    print_state(&doc);
    print_history(&history);

    // 5. A new command discards the undone tail
    println!("\n5. New command after undo:");
    history
        .execute(Box::new(ChangeFontSize::new(&doc, 24)))
        .unwrap();
    print_state(&doc);
    print_history(&history);
}
