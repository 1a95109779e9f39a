use crate::{error::NavigationError, terminal::TerminalSession};

/// Reconnects the session when the screen cannot be classified.
///
/// A fresh connection always starts at the session manager logon screen,
/// which is a known state. No partial recovery (such as CLEAR) is tried
/// since an unknown screen says nothing about which key would be safe.
///
/// The budget caps consecutive reconnects: every recognised screen in
/// between starts the count again.
#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    max_attempts: Option<u32>,
    consecutive: u32,
    total: u32,
}

impl RecoveryPolicy {
    /// `None` allows unlimited reconnects.
    pub fn new(max_attempts: Option<u32>) -> Self {
        Self {
            max_attempts,
            consecutive: 0,
            total: 0,
        }
    }

    /// Reconnects performed since this policy was created.
    pub fn attempts(&self) -> u32 {
        self.total
    }

    /// Reconnects performed since the last recognised screen.
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// A screen was classified; the next unknown screen starts a new run.
    pub fn screen_recognised(&mut self) {
        self.consecutive = 0;
    }

    /// Disconnect and reconnect, or fail with
    /// [`NavigationError::RecoveryExhausted`] once the budget is spent.
    pub fn recover<S: TerminalSession + ?Sized>(
        &mut self,
        session: &mut S,
    ) -> Result<(), NavigationError> {
        if let Some(max) = self.max_attempts {
            if self.consecutive >= max {
                log::error!("❌ Screen still unrecognised after {max} reconnects, giving up");
                return Err(NavigationError::RecoveryExhausted {
                    attempts: self.consecutive,
                });
            }
        }

        self.consecutive += 1;
        self.total += 1;
        log::warn!(
            "⚠️ Unable to determine position in application, resetting connection (attempt {})",
            self.consecutive
        );
        session.disconnect()?;
        session.connect()?;
        Ok(())
    }
}
