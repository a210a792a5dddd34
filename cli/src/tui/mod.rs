//! # Interactive Review
//!
//! Opened with `--interactive` on a prepared transaction, before it is
//! signed. Two tabs:
//!
//! - **Recipients**: the [`RecipientEditor`]; adds and removes contract
//!   recipients on the transaction.
//! - **Summary**: read-only view of what is about to be signed.
//!
//! `Ctrl+S` confirms, `Esc` aborts. The loop is single-threaded: one key is
//! fully applied before the next is read.

pub mod input;
pub mod recipients;

use std::io::Stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};

use sigil_protocol::pipeline::PreparedTransaction;
use sigil_protocol::transaction::types::display_fixed_point;
use sigil_protocol::transaction::Recipient;

use recipients::{EditorEvent, RecipientEditor};

const EVENT_POLL_MILLIS: u64 = 200;
const TAB_TITLES: [&str; 2] = ["Recipients", "Summary"];
const HELP_LINE: &str =
    "Tab: switch tab | Up/Down: move | Enter: add | d: delete | Ctrl+S: confirm | Esc: abort";

/// How the operator left the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Recipients,
    Summary,
}

struct App<'a> {
    prepared: &'a mut PreparedTransaction,
    editor: RecipientEditor,
    tab: Tab,
}

/// Review `prepared` in the terminal.
pub fn review(prepared: &mut PreparedTransaction) -> Result<Outcome> {
    let mut terminal = init_terminal().context("failed to set up the terminal")?;
    let run_result = run_event_loop(&mut terminal, prepared);
    let restore_result = restore_terminal(&mut terminal).context("failed to restore the terminal");
    restore_result?;
    run_result
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    prepared: &mut PreparedTransaction,
) -> Result<Outcome> {
    let mut app = App::new(prepared);
    loop {
        terminal.draw(|frame| app.render(frame))?;
        if !event::poll(Duration::from_millis(EVENT_POLL_MILLIS))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(outcome) = app.on_key(key) {
                return Ok(outcome);
            }
        }
    }
}

impl<'a> App<'a> {
    fn new(prepared: &'a mut PreparedTransaction) -> Self {
        Self {
            prepared,
            editor: RecipientEditor::new(),
            tab: Tab::Recipients,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return Some(Outcome::Confirmed),
            KeyCode::Char('c') if ctrl => return Some(Outcome::Aborted),
            KeyCode::Esc => return Some(Outcome::Aborted),
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = match self.tab {
                    Tab::Recipients => Tab::Summary,
                    Tab::Summary => {
                        self.editor.switch_tab();
                        Tab::Recipients
                    }
                };
                return None;
            }
            _ => {}
        }

        if self.tab == Tab::Recipients {
            let count = self.prepared.transaction.data.recipients.len();
            if let Some(event) = self.editor.handle_key(key, count) {
                self.apply(event);
            }
        }
        None
    }

    fn apply(&mut self, event: EditorEvent) {
        let tx = &mut self.prepared.transaction;
        match event {
            EditorEvent::Add {
                address,
                action,
                args_json,
            } => match Recipient::from_parts(address, &action, &args_json) {
                Ok(recipient) => {
                    tracing::debug!(action = %action, "recipient added");
                    tx.add_recipient(recipient);
                }
                Err(_) => self.editor.set_feedback("Invalid arguments"),
            },
            EditorEvent::Delete { index } => {
                if tx.remove_recipient(index).is_some() {
                    tracing::debug!(index, "recipient removed");
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let selected = match self.tab {
            Tab::Recipients => 0,
            Tab::Summary => 1,
        };
        let tabs = Tabs::new(TAB_TITLES)
            .block(Block::default().borders(Borders::ALL).title("sigil"))
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let body = match self.tab {
            Tab::Recipients => self
                .editor
                .render(&self.prepared.transaction.data.recipients),
            Tab::Summary => self.summary(),
        };
        let body = Paragraph::new(body)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(body, chunks[1]);

        let footer = Paragraph::new(HELP_LINE).block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn summary(&self) -> Text<'static> {
        let tx = &self.prepared.transaction;
        let data = &tx.data;
        let mut lines = vec![
            Line::from(format!("Type: {}", tx.tx_type)),
            Line::from(format!("Index: {}", self.prepared.index)),
            Line::from(format!("Curve: {}", self.prepared.curve)),
            Line::default(),
            Line::from(format!("UCO transfers: {}", data.ledger.uco.transfers.len())),
        ];
        for transfer in &data.ledger.uco.transfers {
            lines.push(Line::from(format!(
                "  to={} amount={}",
                hex::encode(&transfer.to),
                display_fixed_point(transfer.amount)
            )));
        }
        lines.push(Line::from(format!(
            "Token transfers: {}",
            data.ledger.token.transfers.len()
        )));
        for transfer in &data.ledger.token.transfers {
            lines.push(Line::from(format!(
                "  to={} amount={} token={} id={}",
                hex::encode(&transfer.to),
                display_fixed_point(transfer.amount),
                hex::encode(&transfer.token_address),
                transfer.token_id
            )));
        }
        lines.push(Line::from(format!("Recipients: {}", data.recipients.len())));
        lines.push(Line::from(format!("Ownerships: {}", data.ownerships.len())));
        lines.push(Line::from(format!("Content: {} bytes", data.content.len())));
        lines.push(Line::from(format!("Code: {} bytes", data.code.len())));
        Text::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use sigil_protocol::identity::AccessSeed;
    use sigil_protocol::network::{ClientError, LedgerClient, SubmissionReceipt, TransactionFee};
    use sigil_protocol::pipeline::{prepare, PrepareOptions};
    use sigil_protocol::transaction::{Transaction, TransactionRequest, UcoTransferSpec};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// A ledger that is never reached: the index is always supplied.
    struct NoLedger;

    #[async_trait::async_trait]
    impl LedgerClient for NoLedger {
        async fn last_transaction_index(&self, _: &str) -> Result<u32, ClientError> {
            unreachable!()
        }

        async fn transaction_fee(&self, _: &Transaction) -> Result<TransactionFee, ClientError> {
            unreachable!()
        }

        async fn send_transaction(&self, _: &Transaction) -> Result<SubmissionReceipt, ClientError> {
            unreachable!()
        }
    }

    async fn prepared() -> PreparedTransaction {
        let request = TransactionRequest {
            access_seed: AccessSeed::new(b"seed".to_vec()),
            index: 1,
            index_supplied: true,
            uco_transfers: vec![UcoTransferSpec {
                to: "00aa".into(),
                amount: 1.5,
            }],
            ..Default::default()
        };
        prepare(&request, PrepareOptions::default(), &NoLedger)
            .await
            .unwrap()
    }

    fn type_text(app: &mut App<'_>, text: &str) {
        for c in text.chars() {
            assert!(app.on_key(key(KeyCode::Char(c))).is_none());
        }
    }

    fn submit(app: &mut App<'_>) {
        while app.editor.focus() != recipients::FIELD_COUNT {
            app.on_key(key(KeyCode::Down));
        }
        app.on_key(key(KeyCode::Enter));
    }

    #[tokio::test]
    async fn confirm_and_abort_keys() {
        let mut prepared = prepared().await;
        let mut app = App::new(&mut prepared);
        assert_eq!(app.on_key(ctrl('s')), Some(Outcome::Confirmed));
        assert_eq!(app.on_key(key(KeyCode::Esc)), Some(Outcome::Aborted));
    }

    #[tokio::test]
    async fn added_recipient_lands_on_transaction() {
        let mut prepared = prepared().await;
        {
            let mut app = App::new(&mut prepared);
            type_text(&mut app, "00cc");
            app.on_key(key(KeyCode::Down));
            type_text(&mut app, "vote");
            app.on_key(key(KeyCode::Down));
            type_text(&mut app, "[\"yes\"]");
            submit(&mut app);
            assert!(app.editor.feedback().is_none());
        }
        let recipients = &prepared.transaction.data.recipients;
        assert_eq!(recipients.len(), 1);
        assert!(matches!(
            &recipients[0],
            Recipient::NamedAction { address, action, .. } if address == &vec![0x00, 0xCC] && action == "vote"
        ));
    }

    #[tokio::test]
    async fn invalid_arguments_add_nothing() {
        let mut prepared = prepared().await;
        let mut app = App::new(&mut prepared);
        type_text(&mut app, "00cc");
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Down));
        type_text(&mut app, "[not json");
        submit(&mut app);

        assert_eq!(app.editor.feedback(), Some("Invalid arguments"));
        assert!(app.prepared.transaction.data.recipients.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_from_transaction() {
        let mut prepared = prepared().await;
        prepared.transaction.add_recipient(Recipient::Plain {
            address: vec![0x01],
        });
        prepared.transaction.add_recipient(Recipient::Plain {
            address: vec![0x02],
        });
        let mut app = App::new(&mut prepared);

        // Up from 0 lands on the last recipient.
        app.on_key(key(KeyCode::Up));
        app.on_key(key(KeyCode::Char('d')));

        let remaining = &app.prepared.transaction.data.recipients;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].address(), &[0x01]);
        assert_eq!(app.editor.focus(), recipients::FIELD_COUNT + 1);
    }

    #[tokio::test]
    async fn tab_round_trip_resets_editor_focus() {
        let mut prepared = prepared().await;
        let mut app = App::new(&mut prepared);
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Summary);

        // Keys on the summary tab do not reach the editor.
        app.on_key(key(KeyCode::Char('x')));
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Recipients);
        assert_eq!(app.editor.focus(), 0);
    }

    #[tokio::test]
    async fn renders_both_tabs() {
        let mut prepared = prepared().await;
        let mut app = App::new(&mut prepared);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("press 'd' to delete the selected recipient"));

        app.on_key(key(KeyCode::Tab));
        terminal.draw(|frame| app.render(frame)).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("amount=1.50000000"));
        assert!(screen.contains("Index: 1"));
    }
}
