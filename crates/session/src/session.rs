use thiserror::Error;
use tracing::debug;

/// Out-of-band descriptors of one pushed file. Trusted as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMetadata {
    /// Base name only; directory components are stripped on arrival.
    pub filename: String,
    pub file_size: u64,
    /// Free-form sender description, e.g. `"den (192.168.1.4)"`.
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Received,
    AwaitingConfirmation,
    Confirmed,
    Rejected,
    AwaitingOverwriteDecision,
    Writing,
    Completed,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Aborted)
    }

    fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (from, Aborted) => !from.is_terminal(),
            (Received, AwaitingConfirmation | Confirmed) => true,
            (AwaitingConfirmation, Confirmed | Rejected) => true,
            (Confirmed, AwaitingOverwriteDecision | Writing) => true,
            (AwaitingOverwriteDecision, Writing) => true,
            (Writing, Completed) => true,
            _ => false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session transition {from:?} -> {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// State of one inbound request, from metadata to a terminal state.
#[derive(Debug)]
pub struct TransferSession {
    metadata: TransferMetadata,
    state: SessionState,
}

impl TransferSession {
    pub fn new(metadata: TransferMetadata) -> Self {
        Self {
            metadata,
            state: SessionState::Received,
        }
    }

    pub fn metadata(&self) -> &TransferMetadata {
        &self.metadata
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn advance(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_advance_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        debug!(
            "Session {}: {:?} -> {:?}",
            self.metadata.filename, self.state, next
        );
        self.state = next;
        Ok(())
    }
}
