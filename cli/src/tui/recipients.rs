//! The recipient editor.
//!
//! Focus slots, in order:
//!
//! ```text
//! 0 .. N         address, action, arguments inputs
//! N              submit
//! N+1 .. N+M     recipients already on the transaction (delete with 'd')
//! ```
//!
//! `M` is the length of the transaction's recipient list, which the editor
//! does not own: it is passed in on every call and the slot count is
//! recomputed each time. The editor emits [`EditorEvent`]s and the caller
//! applies them to the list.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use sigil_protocol::transaction::Recipient;

use super::input::TextInput;

pub const FIELD_ADDRESS: usize = 0;
pub const FIELD_ACTION: usize = 1;
pub const FIELD_ARGS: usize = 2;
/// Number of text inputs; also the index of the submit slot.
pub const FIELD_COUNT: usize = 3;

const FIELD_LABELS: [&str; FIELD_COUNT] = ["Address", "Action", "Arguments (JSON)"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Add {
        address: Vec<u8>,
        action: String,
        args_json: String,
    },
    Delete {
        index: usize,
    },
}

#[derive(Debug)]
pub struct RecipientEditor {
    inputs: [TextInput; FIELD_COUNT],
    focus: usize,
    feedback: Option<String>,
}

impl Default for RecipientEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipientEditor {
    pub fn new() -> Self {
        let mut editor = Self {
            inputs: Default::default(),
            focus: 0,
            feedback: None,
        };
        editor.apply_focus();
        editor
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn set_feedback(&mut self, message: impl Into<String>) {
        self.feedback = Some(message.into());
    }

    /// Called when the editor's tab becomes active again.
    pub fn switch_tab(&mut self) {
        self.focus = 0;
        self.apply_focus();
    }

    /// Handle one key, given the current number of recipients.
    pub fn handle_key(&mut self, key: KeyEvent, recipient_count: usize) -> Option<EditorEvent> {
        let total = total_slots(recipient_count);
        if self.focus >= total {
            self.focus = total - 1;
            self.apply_focus();
        }

        match key.code {
            KeyCode::Down => {
                self.focus = (self.focus + 1) % total;
                self.apply_focus();
                None
            }
            KeyCode::Up => {
                self.focus = (self.focus + total - 1) % total;
                self.apply_focus();
                None
            }
            KeyCode::Enter if self.focus == FIELD_COUNT => self.submit(),
            KeyCode::Char('d') if self.focus > FIELD_COUNT => {
                let index = self.focus - FIELD_COUNT - 1;
                self.focus -= 1;
                self.apply_focus();
                Some(EditorEvent::Delete { index })
            }
            _ => {
                if self.focus < FIELD_COUNT {
                    self.inputs[self.focus].handle_key(key);
                }
                None
            }
        }
    }

    fn submit(&mut self) -> Option<EditorEvent> {
        let address_text = self.inputs[FIELD_ADDRESS].value();
        let address = match hex::decode(address_text) {
            Ok(bytes) if !address_text.is_empty() => bytes,
            _ => {
                self.feedback = Some("Invalid address".to_string());
                return None;
            }
        };

        let action = self.inputs[FIELD_ACTION].value();
        let args_json = self.inputs[FIELD_ARGS].value();
        if Recipient::from_parts(address.clone(), action, args_json).is_err() {
            self.feedback = Some("Invalid arguments".to_string());
            return None;
        }

        let event = EditorEvent::Add {
            address,
            action: action.to_string(),
            args_json: args_json.to_string(),
        };
        for input in &mut self.inputs {
            input.clear();
        }
        self.feedback = None;
        Some(event)
    }

    fn apply_focus(&mut self) {
        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.set_focused(i == self.focus);
        }
    }

    /// Render the form and the recipient list.
    pub fn render(&self, recipients: &[Recipient]) -> Text<'static> {
        let mut lines = Vec::with_capacity(FIELD_COUNT + recipients.len() + 5);

        for (i, input) in self.inputs.iter().enumerate() {
            let label_style = if input.is_focused() {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(format!("{}: ", FIELD_LABELS[i]), label_style)];
            spans.extend(input.spans());
            lines.push(Line::from(spans));
        }

        let submit_style = if self.focus == FIELD_COUNT {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled("[ Add recipient ]", submit_style)));

        if let Some(feedback) = &self.feedback {
            lines.push(Line::from(Span::styled(
                feedback.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "press 'd' to delete the selected recipient",
            Style::default().fg(Color::DarkGray),
        )));

        for (i, recipient) in recipients.iter().enumerate() {
            let style = if self.focus == FIELD_COUNT + 1 + i {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(recipient_line(recipient), style)));
        }

        Text::from(lines)
    }
}

fn total_slots(recipient_count: usize) -> usize {
    FIELD_COUNT + 1 + recipient_count
}

pub fn recipient_line(recipient: &Recipient) -> String {
    match recipient {
        Recipient::Plain { address } => format!("address={}", hex::encode(address)),
        Recipient::NamedAction {
            address,
            action,
            args,
        } => format!(
            "address={} action={} args={}",
            hex::encode(address),
            action,
            serde_json::Value::Array(args.clone())
        ),
    }
}
