//! SimBank navigation: drives a 3270 session to the SimBank main menu
//!
//! Tests against the SimBank demo application need the terminal parked on
//! the bank main menu before they start. [`navigation::Navigator`] gets it
//! there from any screen: it classifies the visible text, runs the one input
//! sequence that moves that screen forward (logon, application selection,
//! CICS transaction, or backing out of a sub-menu) and reconnects when the
//! screen is not recognised at all.
//!
//! The terminal itself sits behind [`terminal::TerminalSession`]. The
//! [`terminal::s3270`] backend drives a real `s3270` process and
//! [`terminal::scripted`] replays canned screens for tests.

#[doc(hidden)]
pub mod boot;
pub mod config;
pub mod error;
pub mod ivt;
pub mod navigation;
pub mod terminal;

pub use config::{Credentials, SimbankConfig};
pub use error::{ConfigError, NavigationError, SessionError};
pub use navigation::{NavigationReport, Navigator, ScreenState};
pub use terminal::{AidKey, TerminalSession};
