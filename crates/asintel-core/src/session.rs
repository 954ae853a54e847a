//! Append-only conversation session.
//!
//! The session owns every [`ChatTurn`] for one process lifetime: turns
//! are appended, never mutated or removed, and ids are strictly
//! increasing regardless of sender interleaving. There is no
//! persistence; the log dies with the process.

use chrono::Utc;
use uuid::Uuid;

use asintel_types::chat::{ChatTurn, Sender, TurnState};
use asintel_types::error::SessionError;

/// An append-only ordered log of chat turns.
///
/// Created with a seeded agent greeting, so a fresh session starts in
/// `AwaitingUser`. The turn-taking state is a soft UI convention:
/// either side may append at any time.
#[derive(Debug)]
pub struct ConversationSession {
    id: Uuid,
    turns: Vec<ChatTurn>,
    next_id: u64,
}

impl ConversationSession {
    /// Create a session seeded with an agent greeting turn.
    pub fn new(greeting: impl Into<String>) -> Self {
        let mut session = Self {
            id: Uuid::now_v7(),
            turns: Vec::new(),
            next_id: 0,
        };
        session.push(Sender::Agent, greeting.into(), false);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append an agent turn.
    pub fn append_agent_message(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(Sender::Agent, text.into(), false)
    }

    /// Append an agent turn carrying a retrieval result that was
    /// superseded by a newer request. The turn is kept in order and
    /// flagged rather than dropped.
    pub fn append_stale_agent_message(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(Sender::Agent, text.into(), true)
    }

    /// Append a user turn.
    ///
    /// Fails with [`SessionError::EmptyMessage`] when the text is blank
    /// after trimming. The stored text is the trimmed form.
    pub fn append_user_message(
        &mut self,
        text: impl AsRef<str>,
    ) -> Result<&ChatTurn, SessionError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        Ok(self.push(Sender::User, trimmed.to_string(), false))
    }

    /// A finite, restartable view of the current log.
    ///
    /// Iterates over the turns appended so far; turns appended later are
    /// not observed by an iterator already created.
    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Whose turn the UI expects next, based on the last sender.
    pub fn expected_turn(&self) -> TurnState {
        match self.turns.last().map(|t| t.sender) {
            Some(Sender::Agent) | None => TurnState::AwaitingUser,
            Some(Sender::User) => TurnState::AwaitingAgent,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    fn push(&mut self, sender: Sender, text: String, stale: bool) -> &ChatTurn {
        let turn = ChatTurn {
            id: self.next_id,
            sender,
            text,
            created_at: Utc::now(),
            stale,
        };
        self.next_id += 1;
        self.turns.push(turn);
        // Just pushed, so last() is always present.
        self.turns.last().expect("turn just appended")
    }
}
