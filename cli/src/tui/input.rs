//! Single-line text input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars, `0..=value.chars().count()`.
    cursor: usize,
    focused: bool,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
            }
            KeyCode::Delete if self.cursor < self.len() => {
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => return false,
        }
        true
    }

    /// The value as spans, with the cursor cell highlighted when focused.
    pub fn spans(&self) -> Vec<Span<'static>> {
        let base = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        if !self.focused {
            return vec![Span::styled(self.value.clone(), base)];
        }

        let at = self.byte_index(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut chars = rest.chars();
        let under = chars.next().map(String::from).unwrap_or_else(|| " ".into());
        let after: String = chars.collect();

        vec![
            Span::styled(before.to_string(), base),
            Span::styled(under, base.add_modifier(Modifier::REVERSED)),
            Span::styled(after, base),
        ]
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::default();
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn typing_appends() {
        assert_eq!(typed("00ab").value(), "00ab");
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = typed("ac");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");

        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "bc");

        input.handle_key(key(KeyCode::End));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn multibyte_chars() {
        let mut input = typed("é✓");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "é");
    }

    #[test]
    fn backspace_at_start_is_ignored() {
        let mut input = TextInput::default();
        assert!(!input.handle_key(key(KeyCode::Backspace)));
    }

    #[test]
    fn control_chars_are_not_inserted() {
        let mut input = TextInput::default();
        let consumed = input.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn clear_resets() {
        let mut input = typed("abc");
        input.clear();
        assert_eq!(input.value(), "");
        input.handle_key(key(KeyCode::Char('x')));
        assert_eq!(input.value(), "x");
    }
}
