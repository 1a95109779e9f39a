//! Installation verification: confirms the bank main menu offers the
//! options a test expects before it starts.

use crate::error::NavigationError;

/// Lines of the SimBank main menu, each expected exactly once.
pub const BANK_MENU_LINES: [&str; 3] = [
    "Options     Description        PFKey ",
    "BROWSE      Browse Accounts    PF1",
    "TRANSF      Transfer Money     PF4",
];

pub fn verify_bank_menu(screen: &str) -> Result<(), NavigationError> {
    for marker in BANK_MENU_LINES {
        let occurrences = screen.matches(marker).count();
        if occurrences != 1 {
            return Err(NavigationError::UnexpectedScreen {
                marker: marker.to_string(),
                occurrences,
            });
        }
    }
    log::info!("✅ SimBank main menu offers all expected options");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_menu() -> String {
        [
            "                     SIMBANK MAIN MENU",
            "",
            "     Options     Description        PFKey ",
            "     BROWSE      Browse Accounts    PF1",
            "     TRANSF      Transfer Money     PF4",
        ]
        .join("\n")
    }

    #[test]
    fn test_complete_menu_passes() {
        assert_eq!(verify_bank_menu(&main_menu()), Ok(()));
    }

    #[test]
    fn test_missing_option() {
        let screen = main_menu().replace("TRANSF", "XXXXXX");
        assert_eq!(
            verify_bank_menu(&screen),
            Err(NavigationError::UnexpectedScreen {
                marker: BANK_MENU_LINES[2].to_string(),
                occurrences: 0,
            })
        );
    }

    #[test]
    fn test_duplicated_option() {
        let screen = format!("{}\n     BROWSE      Browse Accounts    PF1", main_menu());
        assert!(matches!(
            verify_bank_menu(&screen),
            Err(NavigationError::UnexpectedScreen { occurrences: 2, .. })
        ));
    }
}
