//! Conversation domain model.
//!
//! A `Transcript` is the append-only list of messages shown in the chat panel.
//! Messages are immutable once created.

use crate::NonEmptyString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    text: NonEmptyString,
}

impl Message {
    #[must_use]
    pub fn user(text: NonEmptyString) -> Self {
        Self {
            role: Role::User,
            text,
        }
    }

    #[must_use]
    pub fn assistant(text: NonEmptyString) -> Self {
        Self {
            role: Role::Assistant,
            text,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

/// Ordered, append-only conversation log.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
