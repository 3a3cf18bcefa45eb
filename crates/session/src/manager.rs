use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{
    prompt::Confirm,
    session::{SessionError, SessionState, TransferMetadata, TransferSession},
};

/// Serialises inbound sessions.
///
/// Only one session is live at a time: [`SessionManager::begin`] waits until
/// the previous [`ActiveSession`] is dropped, so operator prompts never
/// interleave. Requests arriving meanwhile queue in arrival order (the tokio
/// mutex is fair).
pub struct SessionManager {
    turn: Mutex<()>,
    confirm: Arc<dyn Confirm>,
    auto_accept: bool,
}

impl SessionManager {
    /// `auto_accept` skips the initial accept prompt only; overwrite
    /// decisions are still asked.
    pub fn new(confirm: Arc<dyn Confirm>, auto_accept: bool) -> Self {
        Self {
            turn: Mutex::new(()),
            confirm,
            auto_accept,
        }
    }

    /// Wait for the previous session to finish, then open a new one.
    pub async fn begin(&self, metadata: TransferMetadata) -> ActiveSession<'_> {
        let turn = self.turn.lock().await;
        ActiveSession {
            _turn: turn,
            session: TransferSession::new(metadata),
            confirm: Arc::clone(&self.confirm),
            auto_accept: self.auto_accept,
        }
    }
}

/// The one live session. Holds the manager's turn until dropped.
pub struct ActiveSession<'a> {
    _turn: MutexGuard<'a, ()>,
    session: TransferSession,
    confirm: Arc<dyn Confirm>,
    auto_accept: bool,
}

impl ActiveSession<'_> {
    pub fn metadata(&self) -> &TransferMetadata {
        self.session.metadata()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Accept gate. Suspends until the operator answers unless auto-accept is on.
    pub async fn confirm_receive(&mut self) -> Result<bool, SessionError> {
        if self.auto_accept {
            self.session.advance(SessionState::Confirmed)?;
            return Ok(true);
        }

        self.session.advance(SessionState::AwaitingConfirmation)?;
        let accepted = self.ask("Would you like to download the file?".to_string()).await;
        self.session.advance(if accepted {
            SessionState::Confirmed
        } else {
            SessionState::Rejected
        })?;
        Ok(accepted)
    }

    /// Overwrite gate for a destination that already exists. Declining aborts
    /// the session.
    pub async fn confirm_overwrite(&mut self) -> Result<bool, SessionError> {
        self.session.advance(SessionState::AwaitingOverwriteDecision)?;
        let question = format!(
            "{} already exists. Overwrite it?",
            self.session.metadata().filename
        );
        let overwrite = self.ask(question).await;
        if !overwrite {
            self.session.advance(SessionState::Aborted)?;
        }
        Ok(overwrite)
    }

    pub fn begin_write(&mut self) -> Result<(), SessionError> {
        self.session.advance(SessionState::Writing)
    }

    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.session.advance(SessionState::Completed)
    }

    /// Abort unless already finished.
    pub fn abort(&mut self) {
        if !self.session.state().is_terminal() {
            let _ = self.session.advance(SessionState::Aborted);
        }
    }

    async fn ask(&self, question: String) -> bool {
        let confirm = Arc::clone(&self.confirm);
        match tokio::task::spawn_blocking(move || confirm.confirm(&question)).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        if !self.session.state().is_terminal() {
            debug!(
                "Session {} dropped in state {:?}",
                self.session.metadata().filename,
                self.session.state()
            );
        }
    }
}
