//! The capability set the navigator needs from a 3270 terminal session.
//!
//! The navigator never speaks the terminal protocol itself. It only asks a
//! [`TerminalSession`] whether text is on the screen, moves between fields,
//! types, presses attention keys and waits for the keyboard to unlock.
//! [`s3270::S3270Session`] drives a real `s3270` process, and
//! [`scripted::ScriptedSession`] replays canned screens for tests.

pub mod s3270;
pub mod scripted;

use std::fmt;

use crate::error::SessionError;

pub type SessionResult<T> = Result<T, SessionError>;

/// Attention keys that submit the screen to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AidKey {
    Enter,
    Clear,
    Pf(u8),
    Pa(u8),
}

impl fmt::Display for AidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AidKey::Enter => write!(f, "Enter"),
            AidKey::Clear => write!(f, "Clear"),
            AidKey::Pf(n) => write!(f, "PF({n})"),
            AidKey::Pa(n) => write!(f, "PA({n})"),
        }
    }
}

/// A live session with the remote application.
///
/// Every call blocks until the remote side answers or the implementation's
/// own timeout fires; a timeout is reported as [`SessionError::Timeout`].
pub trait TerminalSession {
    /// Full visible text of the screen, one line per row.
    fn screen_text(&mut self) -> SessionResult<String>;

    /// Whether `marker` appears anywhere on the screen. The navigator
    /// classifies from [`Self::screen_text`] so it reads the screen once per
    /// round; this is for callers checking a single marker.
    fn is_text_present(&mut self, marker: &str) -> SessionResult<bool> {
        Ok(self.screen_text()?.contains(marker))
    }

    /// Move the cursor into the field holding `marker`.
    ///
    /// Fails with [`SessionError::FieldNotFound`] when the marker is not on
    /// the screen.
    fn position_cursor_to_field_containing(&mut self, marker: &str) -> SessionResult<()>;

    /// Move the cursor to the next unprotected field.
    fn tab(&mut self) -> SessionResult<()>;

    fn type_text(&mut self, text: &str) -> SessionResult<()>;

    fn send_key(&mut self, key: AidKey) -> SessionResult<()>;

    /// Block until the host has processed the last input and unlocked the
    /// keyboard.
    fn wait_for_keyboard(&mut self) -> SessionResult<()>;

    fn connect(&mut self) -> SessionResult<()>;

    fn disconnect(&mut self) -> SessionResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aid_key_action_names() {
        assert_eq!(AidKey::Enter.to_string(), "Enter");
        assert_eq!(AidKey::Clear.to_string(), "Clear");
        assert_eq!(AidKey::Pf(3).to_string(), "PF(3)");
        assert_eq!(AidKey::Pa(1).to_string(), "PA(1)");
    }
}
