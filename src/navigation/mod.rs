//! Drives a session from whatever screen it shows to the SimBank main menu.
//!
//! Each round waits for the keyboard, classifies the screen and either stops
//! (main menu), reconnects (unknown screen) or runs the one transition
//! planned for the classified screen. Multi-screen journeys such as
//! logon → application selector → CICS are a series of rounds, never nested
//! calls.

pub mod recovery;
pub mod screen;
pub mod transition;

pub use recovery::RecoveryPolicy;
pub use screen::{ScreenState, SCREEN_MARKERS};
pub use transition::{Transition, TransitionStep};

use crate::{
    config::{Credentials, SimbankConfig},
    error::{ConfigError, NavigationError},
    terminal::TerminalSession,
};

/// Consecutive reconnects allowed unless configured otherwise.
pub const DEFAULT_MAX_RECOVERIES: u32 = 3;

/// What a successful navigation went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationReport {
    /// Transitions executed
    pub transitions: usize,
    /// Disconnect/connect cycles performed
    pub recoveries: u32,
    /// Every classification made, in order, ending with `MainMenu`
    pub visited: Vec<ScreenState>,
    /// Text of the main menu screen
    pub screen: String,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    credentials: Credentials,
    application: String,
    max_recoveries: Option<u32>,
}

impl Navigator {
    /// `application` is the literal the session manager menu expects, not
    /// the logical name.
    pub fn new(credentials: Credentials, application: impl Into<String>) -> Self {
        Self {
            credentials,
            application: application.into(),
            max_recoveries: Some(DEFAULT_MAX_RECOVERIES),
        }
    }

    pub fn from_config(config: &SimbankConfig) -> Result<Self, ConfigError> {
        let credentials = config.credentials.resolve()?;
        let application = config.application.resolve()?;
        Ok(Self::new(credentials, application)
            .with_max_recoveries(Some(config.navigation.max_recoveries)))
    }

    /// `None` reconnects for as long as the screen stays unrecognised.
    pub fn with_max_recoveries(mut self, max_recoveries: Option<u32>) -> Self {
        self.max_recoveries = max_recoveries;
        self
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn goto_main_menu<S: TerminalSession + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<NavigationReport, NavigationError> {
        let mut recovery = RecoveryPolicy::new(self.max_recoveries);
        let mut transitions = 0;
        let mut visited = Vec::new();
        let mut expected: Option<ScreenState> = None;

        loop {
            session.wait_for_keyboard()?;
            let screen = session.screen_text()?;
            let state = ScreenState::classify(&screen);
            visited.push(state);

            if let Some(expected) = expected.take() {
                if expected != state {
                    log::warn!("Expected to reach {expected} but the screen shows {state}");
                }
            }

            if state != ScreenState::Unknown {
                recovery.screen_recognised();
            }

            if state == ScreenState::MainMenu {
                log::info!(
                    "✅ Reached SimBank main menu after {transitions} transitions and {} reconnects",
                    recovery.attempts()
                );
                return Ok(NavigationReport {
                    transitions,
                    recoveries: recovery.attempts(),
                    visited,
                    screen,
                });
            }

            match Transition::plan(state, &self.credentials, &self.application) {
                Some(transition) => {
                    transition.execute(session)?;
                    transitions += 1;
                    expected = Some(transition.expected);
                }
                None => {
                    log::debug!("Unrecognised screen:\n{screen}");
                    recovery.recover(session)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::scripted::ScriptedSession;

    #[test]
    fn test_already_on_main_menu() -> anyhow::Result<()> {
        let navigator = Navigator::new(Credentials::new("IBMUSER", "SYS1"), "BANKTEST");
        let mut session = ScriptedSession::new("SIMBANK MAIN MENU");

        let report = navigator.goto_main_menu(&mut session)?;

        assert_eq!(report.transitions, 0);
        assert_eq!(report.recoveries, 0);
        assert_eq!(report.visited, vec![ScreenState::MainMenu]);
        assert_eq!(report.screen, "SIMBANK MAIN MENU");
        Ok(())
    }

    #[test]
    fn test_from_config_resolves_application() -> anyhow::Result<()> {
        let config = SimbankConfig::from_toml(
            r#"
[application]
name = "bank"
[application.names]
bank = "BANKTEST"
[credentials]
username = "IBMUSER"
password = "SYS1"
"#,
        )?;

        let navigator = Navigator::from_config(&config)?;
        assert_eq!(navigator.application(), "BANKTEST");
        Ok(())
    }

    #[test]
    fn test_from_config_without_credentials() {
        let config = SimbankConfig::default();
        assert!(matches!(
            Navigator::from_config(&config),
            Err(ConfigError::MissingCredential(_))
        ));
    }
}
