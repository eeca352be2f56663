//! Replay example
//!
//! Rebuilds a session's document from scratch, pausing between steps the way a UI would animate
//! it. Run with `RUST_LOG`-style verbosity by passing `-v`.

use command_core::{EditorSession, FontWeight, SessionConfig, TextColor};
use std::thread;

fn main() {
    let verbose = std::env::args().any(|arg| arg == "-v");
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = SessionConfig {
        replay_step_delay_ms: 250,
        ..SessionConfig::default()
    };
    let delay = config.replay_step_delay();
    let mut session = EditorSession::new(config).expect("default config is valid");

    session.subscribe(|change| {
        if let Some(description) = &change.description {
            println!("  [v{}] {:?}: {}", change.new_version, change.kind, description);
        }
    });

    session.append_text("Command pattern").unwrap();
    session.change_font_weight(FontWeight::Bold).unwrap();
    session.change_text_color(TextColor::from_rgb(0x3b82f6)).unwrap();
    session.change_font_size(24).unwrap();
    session.undo().unwrap();

    println!("\nReplaying active commands:");
    let mut replay = session.replay().unwrap();
    for step in &mut replay {
        match step {
            Ok(step) => println!("  step {}/{}", step.index + 1, step.total),
            Err(err) => {
                eprintln!("  replay stopped: {err}");
                break;
            }
        }
        thread::sleep(delay);
    }
    drop(replay);

    println!("\nFinal state: {:?}", session.snapshot());
}
