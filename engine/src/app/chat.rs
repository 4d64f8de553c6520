//! Chat panel: transcript, draft and in-flight requests.

use tokio::sync::mpsc::error::TryRecvError;

use tlapal_providers::NO_ANSWER_TEXT;
use tlapal_types::{Message, NonEmptyStaticStr, NonEmptyString, Transcript, sanitize_terminal_text};

use super::{App, ChatReply};
use crate::{SYSTEM_INSTRUCTION, TECHNICAL_ERROR_TEXT, WELCOME_TEXT, ui::DraftInput};

const WELCOME: NonEmptyStaticStr = NonEmptyStaticStr::new(WELCOME_TEXT);
const TECHNICAL_ERROR: NonEmptyStaticStr = NonEmptyStaticStr::new(TECHNICAL_ERROR_TEXT);
const NO_ANSWER: NonEmptyStaticStr = NonEmptyStaticStr::new(NO_ANSWER_TEXT);

#[derive(Debug)]
pub struct ChatState {
    transcript: Transcript,
    draft: DraftInput,
    /// Requests spawned whose reply has not been appended yet.
    pending: usize,
}

impl ChatState {
    pub(super) fn new() -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant(WELCOME.into()));
        Self {
            transcript,
            draft: DraftInput::default(),
            pending: 0,
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn draft(&self) -> &DraftInput {
        &self.draft
    }

    pub(super) fn draft_mut(&mut self) -> &mut DraftInput {
        &mut self.draft
    }

    #[must_use]
    pub fn pending_replies(&self) -> usize {
        self.pending
    }

    /// Drives the "Escribiendo..." indicator.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.pending > 0
    }
}

impl App {
    pub fn pending_replies(&self) -> usize {
        self.chat.pending
    }

    /// Send the chat draft.
    ///
    /// A blank or whitespace-only draft is ignored. Otherwise the draft becomes
    /// a user message and a task is spawned that calls the remote endpoint with
    /// the credential as it is right now. Returns whether a request was sent.
    pub fn submit_chat(&mut self) -> bool {
        if self.chat.draft.is_blank() {
            return false;
        }
        let Ok(content) = NonEmptyString::new(self.chat.draft.take_text()) else {
            return false;
        };

        let query = content.as_str().to_owned();
        self.chat.transcript.push(Message::user(content));
        self.chat.pending += 1;

        let client = self.runtime.client.clone();
        let credential = self.session.credential().clone();
        let reply_tx = self.runtime.reply_tx.clone();

        tracing::info!(
            chars = query.chars().count(),
            pending = self.chat.pending,
            has_credential = !credential.is_empty(),
            "Sending chat message"
        );

        tokio::spawn(async move {
            let result = client.send(&query, SYSTEM_INSTRUCTION, &credential).await;
            // The receiver only goes away with the app.
            let _ = reply_tx.send(ChatReply { result });
        });

        true
    }

    /// Append every finished reply to the transcript, without blocking.
    pub fn process_replies(&mut self) {
        loop {
            let reply = match self.runtime.reply_rx.try_recv() {
                Ok(reply) => reply,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return,
            };
            self.chat.pending = self.chat.pending.saturating_sub(1);

            let message = match reply.result {
                Ok(text) => {
                    let text = sanitize_terminal_text(&text);
                    NonEmptyString::new(text.as_ref()).unwrap_or_else(|_| NO_ANSWER.into())
                }
                Err(e) => {
                    tracing::warn!("Chat request failed: {e}");
                    TECHNICAL_ERROR.into()
                }
            };
            self.chat.transcript.push(Message::assistant(message));
        }
    }
}
