//! In-memory conversation transcript and the per-turn send guard.
//!
//! The store has a single logical writer (the chat event loop), so there is
//! no interior locking. Reentrancy is handled by an explicit turn state
//! machine instead of an ad-hoc loading flag: a turn must be opened with
//! [`Conversation::begin_turn`] before a request goes out, and only the
//! matching [`Conversation::finish_turn`] closes it.

use crate::core::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

pub struct Conversation {
    messages: Vec<Message>,
    state: TurnState,
    turn: u64,
}

impl Conversation {
    /// A new conversation is never empty: it starts with the seeded greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
            state: TurnState::Idle,
            turn: 0,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discards the transcript and reseeds the greeting. Irrevocable. Any
    /// in-flight turn is orphaned: its reply may still be appended, but its
    /// `finish_turn` no longer matches.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::greeting());
        self.state = TurnState::Idle;
        self.turn += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Copy-on-read view of the transcript. Later mutations of the store are
    /// never observable through a snapshot.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_sending(&self) -> bool {
        self.state == TurnState::Sending
    }

    /// Opens a turn, returning its id. `None` while another turn is still
    /// outstanding, which is how submissions are rejected mid-send.
    pub fn begin_turn(&mut self) -> Option<u64> {
        if self.state == TurnState::Sending {
            return None;
        }
        self.state = TurnState::Sending;
        self.turn += 1;
        Some(self.turn)
    }

    /// Closes the turn with the given id. Stale ids (from before a reset) are
    /// ignored so an orphaned reply cannot clobber a newer turn.
    pub fn finish_turn(&mut self, turn: u64) {
        if turn == self.turn {
            self.state = TurnState::Idle;
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
