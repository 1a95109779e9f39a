//! Input sequences that move a classified screen one step toward the bank
//! main menu.

use std::fmt;

use super::screen::ScreenState;
use crate::{
    config::Credentials,
    terminal::{AidKey, SessionResult, TerminalSession},
};

/// Key that backs out of a SimBank sub-menu.
pub const RETURN_KEY: AidKey = AidKey::Pf(3);
/// CICS transaction that starts SimBank.
pub const BANK_TRANSACTION: &str = "bank";

const USERID_FIELD: &str = "Userid";
const PASSWORD_FIELD: &str = "Password";
const COMMAND_FIELD: &str = "===>";

/// Text that must not show up in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"********\"")
    }
}

/// Single action against the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionStep {
    /// Move the cursor to the field holding this text
    PositionCursor(&'static str),
    /// Jump to the next input field
    Tab,
    /// Type text into the current field
    Type(String),
    /// Type text that is never logged
    TypeSecret(Secret),
    /// Submit the screen with an attention key
    Press(AidKey),
    /// Block until the keyboard unlocks
    WaitForKeyboard,
}

impl TransitionStep {
    fn apply<S: TerminalSession + ?Sized>(&self, session: &mut S) -> SessionResult<()> {
        match self {
            TransitionStep::PositionCursor(marker) => {
                session.position_cursor_to_field_containing(marker)
            }
            TransitionStep::Tab => session.tab(),
            TransitionStep::Type(text) => session.type_text(text),
            TransitionStep::TypeSecret(Secret(text)) => session.type_text(text),
            TransitionStep::Press(key) => session.send_key(*key),
            TransitionStep::WaitForKeyboard => session.wait_for_keyboard(),
        }
    }
}

/// Steps leading away from one screen, and the screen they should land on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: ScreenState,
    pub expected: ScreenState,
    pub steps: Vec<TransitionStep>,
}

impl Transition {
    /// Plan the transition out of `state`. `MainMenu` and `Unknown` have
    /// none.
    pub fn plan(state: ScreenState, credentials: &Credentials, application: &str) -> Option<Self> {
        use TransitionStep::*;

        let (expected, steps) = match state {
            ScreenState::AccountMenu | ScreenState::TransferMenu => (
                ScreenState::MainMenu,
                vec![Press(RETURN_KEY), WaitForKeyboard],
            ),
            ScreenState::TransactionPrompt => (
                ScreenState::MainMenu,
                vec![
                    PositionCursor("DFHZC2312"),
                    Press(AidKey::Clear),
                    WaitForKeyboard,
                    Tab,
                    Type(BANK_TRANSACTION.to_string()),
                    Press(AidKey::Enter),
                    WaitForKeyboard,
                ],
            ),
            ScreenState::ApplicationSelector => (
                ScreenState::TransactionPrompt,
                vec![
                    PositionCursor(COMMAND_FIELD),
                    Tab,
                    Type(application.to_string()),
                    Press(AidKey::Enter),
                    WaitForKeyboard,
                ],
            ),
            ScreenState::LogonScreen => (
                ScreenState::ApplicationSelector,
                vec![
                    PositionCursor(USERID_FIELD),
                    Tab,
                    Type(credentials.username().to_string()),
                    PositionCursor(PASSWORD_FIELD),
                    Tab,
                    TypeSecret(Secret(credentials.password().to_string())),
                    Press(AidKey::Enter),
                    WaitForKeyboard,
                ],
            ),
            ScreenState::MainMenu | ScreenState::Unknown => return None,
        };

        Some(Self {
            from: state,
            expected,
            steps,
        })
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute<S: TerminalSession + ?Sized>(&self, session: &mut S) -> SessionResult<()> {
        log::info!("➡️ Leaving {} toward {}", self.from, self.expected);
        for (idx, step) in self.steps.iter().enumerate() {
            log::debug!("  step {}/{}: {step:?}", idx + 1, self.steps.len());
            step.apply(session)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SessionError,
        terminal::scripted::{ScriptedSession, SessionOp},
    };

    fn credentials() -> Credentials {
        Credentials::new("IBMUSER", "SYS1")
    }

    #[test]
    fn test_terminal_states_have_no_transition() {
        assert!(Transition::plan(ScreenState::MainMenu, &credentials(), "BANKTEST").is_none());
        assert!(Transition::plan(ScreenState::Unknown, &credentials(), "BANKTEST").is_none());
    }

    #[test]
    fn test_sub_menus_return_with_pf3() -> anyhow::Result<()> {
        for state in [ScreenState::AccountMenu, ScreenState::TransferMenu] {
            let Some(transition) = Transition::plan(state, &credentials(), "BANKTEST") else {
                anyhow::bail!("no transition planned for {state}");
            };
            assert_eq!(transition.expected, ScreenState::MainMenu);

            let mut session = ScriptedSession::new("SIMBANK ACCOUNT MENU");
            transition.execute(&mut session)?;
            assert_eq!(
                session.ops(),
                &[SessionOp::Key(AidKey::Pf(3)), SessionOp::WaitForKeyboard]
            );
        }
        Ok(())
    }

    #[test]
    fn test_transaction_prompt_enters_bank() -> anyhow::Result<()> {
        let Some(transition) =
            Transition::plan(ScreenState::TransactionPrompt, &credentials(), "BANKTEST")
        else {
            anyhow::bail!("no transition planned");
        };

        let mut session = ScriptedSession::new("DFHZC2312 *** WELCOME TO CICS ***")
            .then("SIMBANK MAIN MENU");
        transition.execute(&mut session)?;

        assert_eq!(
            session.ops(),
            &[
                SessionOp::PositionCursor("DFHZC2312".to_string()),
                SessionOp::Key(AidKey::Clear),
                SessionOp::WaitForKeyboard,
                SessionOp::Tab,
                SessionOp::Type("bank".to_string()),
                SessionOp::Key(AidKey::Enter),
                SessionOp::WaitForKeyboard,
            ]
        );
        assert_eq!(session.current_screen(), "SIMBANK MAIN MENU");
        Ok(())
    }

    #[test]
    fn test_missing_field_stops_the_sequence() {
        let transition = Transition::plan(ScreenState::LogonScreen, &credentials(), "BANKTEST");
        let mut session = ScriptedSession::new("SIMFRAME LOGON SCREEN\nUserid ===>");

        let result = transition.map(|t| t.execute(&mut session));

        assert_eq!(
            result,
            Some(Err(SessionError::FieldNotFound {
                marker: "Password".to_string()
            }))
        );
        assert_eq!(
            session.ops().last(),
            Some(&SessionOp::PositionCursor("Password".to_string()))
        );
        assert!(!session.ops().contains(&SessionOp::Key(AidKey::Enter)));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let transition = Transition::plan(ScreenState::LogonScreen, &credentials(), "BANKTEST");
        let rendered = format!("{transition:?}");
        assert!(rendered.contains("IBMUSER"));
        assert!(!rendered.contains("SYS1"));
    }
}
