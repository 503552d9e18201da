//! Keyboard reader thread. Turns crossterm key events into show input.

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use magic7ball::log_debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long the reader waits for an event before re-checking the running flag.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputEvent {
    /// Primary action (Enter/Space), not yet debounced.
    Press,
    Exit,
    /// Any other key; only shown in the debug overlay.
    Other(String),
}

/// Only the initial key-down counts; holding a key must not re-press.
pub(crate) fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Exit);
    }
    let event = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Press,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => InputEvent::Exit,
        other => InputEvent::Other(format!("{other:?}")),
    };
    Some(event)
}

pub(crate) fn spawn_input_thread(
    tx: Sender<InputEvent>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    log_debug(&format!("input poll error: {err}"));
                    break;
                }
            }
            let event = match event::read() {
                Ok(Event::Key(key)) => map_key(key),
                Ok(_) => None,
                Err(err) => {
                    log_debug(&format!("input read error: {err}"));
                    break;
                }
            };
            if let Some(event) = event {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn enter_and_space_press_the_button() {
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(InputEvent::Press)
        );
        assert_eq!(
            map_key(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(InputEvent::Press)
        );
    }

    #[test]
    fn quit_keys_exit() {
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputEvent::Exit)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(InputEvent::Exit)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Exit)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn held_key_auto_repeat_is_ignored() {
        let mut repeat = key(KeyCode::Char(' '), KeyModifiers::NONE);
        repeat.kind = KeyEventKind::Repeat;
        assert_eq!(map_key(repeat), None);
    }

    #[test]
    fn other_keys_are_reported_for_the_overlay() {
        assert!(matches!(
            map_key(key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(InputEvent::Other(_))
        ));
    }
}
