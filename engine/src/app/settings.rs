//! Settings panel and the session credential.

use tlapal_types::Credential;

use super::App;
use crate::ui::DraftInput;

/// Holds the credential for the lifetime of the process. Never persisted.
#[derive(Debug, Default)]
pub struct Session {
    credential: Credential,
}

impl Session {
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }
}

/// Feedback line under the credential field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsNotice {
    Saved,
    Cleared,
}

impl SettingsNotice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Saved => "Clave guardada para esta sesión.",
            Self::Cleared => "Clave borrada.",
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsState {
    draft: DraftInput,
    notice: Option<SettingsNotice>,
}

impl SettingsState {
    /// The field while it is being edited.
    #[must_use]
    pub fn draft(&self) -> &DraftInput {
        &self.draft
    }

    pub(super) fn draft_mut(&mut self) -> &mut DraftInput {
        &mut self.draft
    }

    #[must_use]
    pub fn notice(&self) -> Option<SettingsNotice> {
        self.notice
    }

    pub(super) fn begin_edit(&mut self, current: &Credential) {
        self.draft = DraftInput::with_text(current.expose_secret());
        self.notice = None;
    }

    pub(super) fn cancel_edit(&mut self) {
        self.draft.clear();
    }
}

impl App {
    /// Store the edited credential in the session.
    ///
    /// The draft is stored exactly as typed. No shape validation.
    pub fn save_credential(&mut self) {
        let credential = Credential::new(self.settings.draft.take_text());
        let notice = if credential.is_empty() {
            SettingsNotice::Cleared
        } else {
            SettingsNotice::Saved
        };

        tracing::info!(
            chars = credential.char_len(),
            "Session credential updated"
        );
        self.session.set_credential(credential);
        self.settings.notice = Some(notice);
    }
}
