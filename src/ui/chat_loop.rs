//! Full-screen chat interface and the per-turn control flow behind it.

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

use crate::api::ApiClient;
use crate::core::conversation::Conversation;
use crate::core::message::Message;

/// Rendered under an assistant message that carried a tool-usage annotation.
const TOOL_MARKER: &str = "⚙ tool assisted";

const TYPING_FRAMES: [&str; 3] = ["·", "· ·", "· · ·"];

/// What a finished turn hands back to the event loop.
struct TurnOutcome {
    turn: u64,
    message: Message,
}

/// Resolves one chat turn to the assistant message the transcript gets.
///
/// Whitespace-only text resolves to `None` (no network call was made). Every
/// failure kind degrades to the same canned fallback reply; the distinct kind
/// is only recorded in the log.
pub async fn resolve_turn(
    client: &ApiClient,
    text: &str,
    history: Vec<Message>,
) -> Option<Message> {
    match client.send_chat(text, history).await {
        Ok(Some(response)) => Some(Message::assistant(response.reply, response.tools_used)),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "chat turn degraded to local fallback");
            Some(Message::fallback(text))
        }
    }
}

struct ChatApp {
    conversation: Conversation,
    input: String,
    scroll_offset: u16,
    auto_scroll: bool,
    tick: usize,
}

impl ChatApp {
    fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            tick: 0,
        }
    }

    fn display_lines(&self) -> Vec<Line<'_>> {
        transcript_lines(
            self.conversation.messages(),
            self.conversation.is_sending(),
            self.tick,
        )
    }

    fn max_scroll_offset(&self, available_height: u16) -> u16 {
        let total_lines = self.display_lines().len() as u16;
        total_lines.saturating_sub(available_height)
    }
}

/// Builds the transcript as styled lines. User messages get a cyan `You:`
/// prefix, assistant messages render plain, and a dimmed marker follows any
/// message that carried a tool-usage annotation. While a turn is outstanding
/// a pulsing typing indicator sits at the bottom.
fn transcript_lines(messages: &[Message], sending: bool, tick: usize) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    for msg in messages {
        if msg.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&msg.content, Style::default().fg(Color::Cyan)),
            ]));
        } else {
            for content_line in msg.content.lines() {
                if content_line.trim().is_empty() {
                    lines.push(Line::from(""));
                } else {
                    lines.push(Line::from(Span::styled(
                        content_line,
                        Style::default().fg(Color::White),
                    )));
                }
            }
        }
        if msg.has_tool_usage() {
            lines.push(Line::from(Span::styled(
                TOOL_MARKER,
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    if sending {
        lines.push(Line::from(Span::styled(
            TYPING_FRAMES[(tick / 4) % TYPING_FRAMES.len()],
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn ui(f: &mut Frame, app: &ChatApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = app.display_lines();
    let available_height = chunks[0].height.saturating_sub(1);
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let messages_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Chat - Parley"))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));

    f.render_widget(messages_paragraph, chunks[0]);

    let sending = app.conversation.is_sending();
    let input_style = if sending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let input_title = if sending {
        "Waiting for reply… (Ctrl+L to clear, Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, Ctrl+L to clear, Ctrl+C to quit)"
    };

    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title))
        .wrap(Wrap { trim: true });

    f.render_widget(input, chunks[1]);

    if !sending {
        f.set_cursor_position((chunks[1].x + app.input.width() as u16 + 1, chunks[1].y + 1));
    }
}

/// Runs the interactive chat loop until the user quits.
pub async fn run_chat(base_url: String) -> Result<(), Box<dyn Error>> {
    let client = Arc::new(ApiClient::new(&base_url));
    let mut app = ChatApp::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<TurnOutcome>();

    let result = loop {
        terminal.draw(|f| ui(f, &app))?;
        app.tick = app.tick.wrapping_add(1);

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(());
                    }
                    KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.conversation.reset();
                        app.scroll_offset = 0;
                        app.auto_scroll = true;
                    }
                    KeyCode::Enter => {
                        let text = app.input.trim().to_string();
                        if text.is_empty() {
                            continue;
                        }
                        // The turn guard rejects a submit while one is in
                        // flight; the input is left untouched in that case.
                        if let Some(turn) = app.conversation.begin_turn() {
                            let history = app.conversation.snapshot();
                            app.conversation.push(Message::user(text.clone()));
                            app.input.clear();
                            app.auto_scroll = true;

                            let client = Arc::clone(&client);
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                // Text is non-empty here, so a reply or a
                                // fallback always comes back.
                                if let Some(message) = resolve_turn(&client, &text, history).await
                                {
                                    let _ = tx.send(TurnOutcome { turn, message });
                                }
                            });
                        }
                    }
                    KeyCode::Char(c) => {
                        app.input.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Up => {
                        app.auto_scroll = false;
                        app.scroll_offset = app.scroll_offset.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        let available_height = terminal
                            .size()
                            .map(|s| s.height)
                            .unwrap_or_default()
                            .saturating_sub(3)
                            .saturating_sub(1);
                        let max_scroll = app.max_scroll_offset(available_height);
                        app.scroll_offset = app.scroll_offset.saturating_add(1).min(max_scroll);
                        if app.scroll_offset >= max_scroll {
                            app.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        app.auto_scroll = false;
                        app.scroll_offset = app.scroll_offset.saturating_sub(3);
                    }
                    MouseEventKind::ScrollDown => {
                        let available_height = terminal
                            .size()
                            .map(|s| s.height)
                            .unwrap_or_default()
                            .saturating_sub(3)
                            .saturating_sub(1);
                        let max_scroll = app.max_scroll_offset(available_height);
                        app.scroll_offset = app.scroll_offset.saturating_add(3).min(max_scroll);
                        if app.scroll_offset >= max_scroll {
                            app.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Finished turns land here; a reply from before a clear is still
        // appended, it just no longer closes the current turn.
        while let Ok(outcome) = rx.try_recv() {
            app.conversation.push(outcome.message);
            app.conversation.finish_turn(outcome.turn);
            app.auto_scroll = true;
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
