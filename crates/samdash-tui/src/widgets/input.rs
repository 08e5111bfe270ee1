//! Key → `tui_input` request mapping shared by every text field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::{Input, InputRequest};

/// Translate an editing key into an input request.
pub fn request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(c) if !ctrl => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Apply `key` to `input`. Returns `true` if the key was an editing key.
pub fn edit(input: &mut Input, key: KeyEvent) -> bool {
    match request(key) {
        Some(req) => {
            let _ = input.handle(req);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_backspace_edit_the_value() {
        let mut input = Input::default();
        for c in "gate".chars() {
            assert!(edit(&mut input, key(KeyCode::Char(c))));
        }
        edit(&mut input, key(KeyCode::Backspace));
        assert_eq!(input.value(), "gat");
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut input = Input::new("depot".into());
        edit(
            &mut input,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(input.value(), "");
    }

    #[test]
    fn navigation_keys_are_not_edits() {
        let mut input = Input::default();
        assert!(!edit(&mut input, key(KeyCode::Enter)));
        assert!(!edit(&mut input, key(KeyCode::Esc)));
    }
}
