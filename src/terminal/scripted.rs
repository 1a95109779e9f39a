//! In-memory terminal session that replays canned screens.
//!
//! Every attention key other than CLEAR replaces the screen with the next
//! queued one; CLEAR blanks it. `connect` shows the connect screen. All
//! operations except screen reads are recorded so tests can assert on the
//! exact sequence the navigator produced.

use std::collections::VecDeque;

use super::{AidKey, SessionResult, TerminalSession};
use crate::error::SessionError;

/// One recorded call against a [`ScriptedSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOp {
    WaitForKeyboard,
    PositionCursor(String),
    Tab,
    Type(String),
    Key(AidKey),
    Connect,
    Disconnect,
}

#[derive(Debug, Clone)]
pub struct ScriptedSession {
    screen: String,
    pending: VecDeque<String>,
    connect_screen: String,
    connected: bool,
    ops: Vec<SessionOp>,
    failures: Vec<(SessionOp, SessionError)>,
}

impl ScriptedSession {
    /// A connected session currently showing `screen`.
    pub fn new(screen: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            pending: VecDeque::new(),
            connect_screen: String::new(),
            connected: true,
            ops: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Queue the screen shown after the next attention key.
    pub fn then(mut self, screen: impl Into<String>) -> Self {
        self.pending.push_back(screen.into());
        self
    }

    /// Screen shown right after `connect`.
    pub fn with_connect_screen(mut self, screen: impl Into<String>) -> Self {
        self.connect_screen = screen.into();
        self
    }

    /// Fail the first call matching `op` with `error`. The call is still
    /// recorded.
    pub fn fail_on(mut self, op: SessionOp, error: SessionError) -> Self {
        self.failures.push((op, error));
        self
    }

    pub fn ops(&self) -> &[SessionOp] {
        &self.ops
    }

    pub fn current_screen(&self) -> &str {
        &self.screen
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn record(&mut self, op: SessionOp) -> SessionResult<()> {
        let injected = self.failures.iter().position(|(candidate, _)| *candidate == op);
        self.ops.push(op);
        if let Some(index) = injected {
            return Err(self.failures.remove(index).1);
        }
        Ok(())
    }

    fn ensure_connected(&self) -> SessionResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(SessionError::Network("session is not connected".to_string()))
        }
    }
}

impl TerminalSession for ScriptedSession {
    fn screen_text(&mut self) -> SessionResult<String> {
        self.ensure_connected()?;
        Ok(self.screen.clone())
    }

    fn position_cursor_to_field_containing(&mut self, marker: &str) -> SessionResult<()> {
        self.record(SessionOp::PositionCursor(marker.to_string()))?;
        self.ensure_connected()?;
        if !self.screen.contains(marker) {
            return Err(SessionError::FieldNotFound {
                marker: marker.to_string(),
            });
        }
        Ok(())
    }

    fn tab(&mut self) -> SessionResult<()> {
        self.record(SessionOp::Tab)?;
        self.ensure_connected()
    }

    fn type_text(&mut self, text: &str) -> SessionResult<()> {
        self.record(SessionOp::Type(text.to_string()))?;
        self.ensure_connected()
    }

    fn send_key(&mut self, key: AidKey) -> SessionResult<()> {
        self.record(SessionOp::Key(key))?;
        self.ensure_connected()?;
        match key {
            AidKey::Clear => self.screen.clear(),
            _ => {
                if let Some(next) = self.pending.pop_front() {
                    self.screen = next;
                }
            }
        }
        Ok(())
    }

    fn wait_for_keyboard(&mut self) -> SessionResult<()> {
        self.record(SessionOp::WaitForKeyboard)?;
        self.ensure_connected()
    }

    fn connect(&mut self) -> SessionResult<()> {
        self.record(SessionOp::Connect)?;
        self.connected = true;
        self.screen = self.connect_screen.clone();
        Ok(())
    }

    fn disconnect(&mut self) -> SessionResult<()> {
        self.record(SessionOp::Disconnect)?;
        self.connected = false;
        self.screen.clear();
        Ok(())
    }
}
