//! Inbound transfer sessions.
//!
//! One [`TransferSession`] per pushed file, walked through
//! `Received -> AwaitingConfirmation -> Confirmed|Rejected ->
//! [AwaitingOverwriteDecision] -> Writing -> Completed|Aborted`.
//! The [`SessionManager`] admits one session at a time so operator prompts
//! stay sequential; prompts go through the [`Confirm`] trait.

pub mod manager;
pub mod prompt;
pub mod session;

pub use manager::{ActiveSession, SessionManager};
pub use prompt::{Confirm, ScriptedConfirm, TerminalConfirm};
pub use session::{SessionError, SessionState, TransferMetadata, TransferSession};
