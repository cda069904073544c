use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in the session transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub model_id: String,
    pub created_at: DateTime<Local>,
    /// Id of the user turn this turn answers; a user turn carries its own id
    pub correlation_id: u64,
    /// Set on assistant turns that stand in for a failed or timed-out response
    #[serde(default)]
    pub failed: bool,
}

impl Turn {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

/// Append-only transcript. Turns are never reordered or edited in place.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    turns: Vec<Turn>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == id)
    }

    /// Assistant turn answering the user turn `correlation_id`, if any
    pub fn reply_to(&self, correlation_id: u64) -> Option<&Turn> {
        self.turns
            .iter()
            .find(|t| t.is_assistant() && t.correlation_id == correlation_id)
    }
}
