//! Conversation turn types.
//!
//! These types model the append-only conversation log between the user
//! and the agent: turn senders, individual turns, and the soft
//! turn-taking state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Agent,
    User,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Agent => write!(f, "agent"),
            Sender::User => write!(f, "user"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agent" => Ok(Sender::Agent),
            "user" => Ok(Sender::User),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Whose turn the UI expects next.
///
/// This is a soft convention for presentation, not a precondition:
/// either side may append at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    AwaitingUser,
    AwaitingAgent,
}

/// One message in the conversation log.
///
/// Turns are owned by the session and never mutated after creation.
/// Ids are strictly increasing within a session regardless of sender
/// interleaving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// True for a retrieval result delivered after a newer request was
    /// dispatched. Stale results are appended, never dropped.
    #[serde(default)]
    pub stale: bool,
}
