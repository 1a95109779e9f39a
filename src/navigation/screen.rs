use strum::Display;

/// Named classification of what the terminal currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ScreenState {
    /// SimBank main menu, where navigation stops
    MainMenu,
    AccountMenu,
    TransferMenu,
    /// CICS waiting for a transaction id
    TransactionPrompt,
    /// Session manager menu listing the applications
    ApplicationSelector,
    LogonScreen,
    /// Nothing recognisable; handled by reconnecting
    Unknown,
}

/// Screen markers in priority order. The first marker present on the screen
/// decides the state, so keep this a list.
pub const SCREEN_MARKERS: [(&str, ScreenState); 6] = [
    ("SIMBANK MAIN MENU", ScreenState::MainMenu),
    ("SIMBANK ACCOUNT MENU", ScreenState::AccountMenu),
    ("SIMBANK TRANSFER MENU", ScreenState::TransferMenu),
    ("DFHZC2312", ScreenState::TransactionPrompt),
    ("SIMFRAME MAIN MENU", ScreenState::ApplicationSelector),
    ("SIMFRAME LOGON SCREEN", ScreenState::LogonScreen),
];

impl ScreenState {
    pub fn classify(screen: &str) -> Self {
        SCREEN_MARKERS
            .iter()
            .find(|(marker, _)| screen.contains(marker))
            .map(|(_, state)| *state)
            .unwrap_or(ScreenState::Unknown)
    }

    /// Marker identifying this state, if it has one.
    pub fn marker(self) -> Option<&'static str> {
        SCREEN_MARKERS
            .iter()
            .find(|(_, state)| *state == self)
            .map(|(marker, _)| *marker)
    }
}
