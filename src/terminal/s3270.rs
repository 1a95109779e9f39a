//! Terminal session backed by the `s3270` scripting client.
//!
//! `s3270` owns the TN3270 connection and the screen buffer. It reads one
//! action per line on stdin and answers with zero or more `data: ` lines, a
//! status line and finally `ok` or `error`. The process runs under a pty via
//! `expectrl` so every reply can be awaited with a timeout.

use std::{process::Command, time::Duration};

use expectrl::{Expect, Regex};

use super::{AidKey, SessionResult, TerminalSession};
use crate::{config::TerminalConfig, error::SessionError};

#[cfg(not(windows))]
type ScriptProcess = expectrl::session::Session<
    expectrl::process::unix::UnixProcess,
    expectrl::process::unix::PtyStream,
>;

#[cfg(windows)]
type ScriptProcess = expectrl::session::Session<
    expectrl::process::windows::WinProcess,
    expectrl::process::windows::ProcessStream,
>;

/// Last line of every reply.
const REPLY_TERMINATOR: &str = r"(?m)^(ok|error)\r?$";

/// Extra time the pty allows beyond the configured action timeout.
const REPLY_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardState {
    Unlocked,
    Locked,
    Error,
}

/// The fields of the status line the session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatusLine {
    keyboard: KeyboardState,
    connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reply {
    data: Vec<String>,
    status: Option<StatusLine>,
    ok: bool,
}

pub struct S3270Session {
    config: TerminalConfig,
    process: ScriptProcess,
}

impl S3270Session {
    /// Start `s3270` without connecting it to a host.
    pub fn spawn(config: TerminalConfig) -> SessionResult<Self> {
        log::info!("🟢 Spawning {} for {}", config.s3270_path, host_address(&config));

        let cmd = Command::new(&config.s3270_path);
        let mut process: ScriptProcess = expectrl::session::Session::spawn(cmd).map_err(|err| {
            SessionError::Network(format!("failed to spawn {}: {err}", config.s3270_path))
        })?;
        process.set_expect_timeout(Some(reply_timeout(&config)));

        Ok(Self { config, process })
    }

    fn run(&mut self, action: &str) -> SessionResult<Reply> {
        let label = action_label(action);
        log::debug!("s3270 <- {label}");

        self.process
            .send_line(action)
            .map_err(|err| SessionError::Network(format!("failed to send {label}: {err}")))?;

        let captures = self
            .process
            .expect(Regex(REPLY_TERMINATOR))
            .map_err(|err| match err {
                expectrl::Error::ExpectTimeout => {
                    SessionError::Timeout(format!("no reply to {label}"))
                }
                other => SessionError::Network(format!("lost s3270 while running {label}: {other}")),
            })?;

        let ok = captures.get(1).map(|word| word == b"ok").unwrap_or(false);
        let body = String::from_utf8_lossy(captures.before()).into_owned();
        Ok(parse_reply(&body, ok))
    }

    /// Run `action` and turn an `error` reply into the matching
    /// [`SessionError`].
    fn execute(&mut self, action: &str) -> SessionResult<Reply> {
        let reply = self.run(action)?;
        if reply.ok {
            Ok(reply)
        } else {
            Err(classify_failure(action, &reply.data))
        }
    }
}

impl TerminalSession for S3270Session {
    fn screen_text(&mut self) -> SessionResult<String> {
        Ok(self.execute("Ascii")?.data.join("\n"))
    }

    fn position_cursor_to_field_containing(&mut self, marker: &str) -> SessionResult<()> {
        let screen = self.screen_text()?;
        let (row, col) = locate_marker(&screen, marker).ok_or_else(|| {
            SessionError::FieldNotFound {
                marker: marker.to_string(),
            }
        })?;
        self.execute(&format!("MoveCursor({row},{col})"))?;
        Ok(())
    }

    fn tab(&mut self) -> SessionResult<()> {
        self.execute("Tab")?;
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> SessionResult<()> {
        self.execute(&format!("String(\"{}\")", quote(text)))?;
        Ok(())
    }

    fn send_key(&mut self, key: AidKey) -> SessionResult<()> {
        self.execute(&key.to_string())?;
        Ok(())
    }

    fn wait_for_keyboard(&mut self) -> SessionResult<()> {
        let reply = self.execute(&format!("Wait({},Unlock)", self.config.timeout_secs))?;
        match reply.status {
            Some(StatusLine {
                connected: false, ..
            }) => Err(SessionError::Network("host disconnected".to_string())),
            Some(StatusLine {
                keyboard: KeyboardState::Unlocked,
                ..
            }) => Ok(()),
            Some(StatusLine { keyboard, .. }) => Err(SessionError::KeyboardLocked(format!(
                "keyboard still {keyboard:?} after wait"
            ))),
            None => Err(SessionError::Datastream(
                "reply to Wait carried no status line".to_string(),
            )),
        }
    }

    fn connect(&mut self) -> SessionResult<()> {
        log::info!("🔌 Connecting to {}", host_address(&self.config));
        self.execute(&format!("Connect({})", host_address(&self.config)))?;
        Ok(())
    }

    fn disconnect(&mut self) -> SessionResult<()> {
        log::info!("Disconnecting from {}", self.config.host);
        self.execute("Disconnect")?;
        Ok(())
    }
}

impl Drop for S3270Session {
    fn drop(&mut self) {
        if let Err(err) = self.process.send_line("Quit") {
            log::debug!("failed to send Quit to s3270: {err}");
        }
    }
}

/// s3270 enforces `timeout_secs` itself in `Wait`; the pty waits a little
/// longer so the `error` reply is always read instead of left in the buffer.
fn reply_timeout(config: &TerminalConfig) -> Duration {
    Duration::from_secs(config.timeout_secs) + REPLY_GRACE
}

fn host_address(config: &TerminalConfig) -> String {
    let prefix = if config.tls { "L:" } else { "" };
    format!("{prefix}{}:{}", config.host, config.port)
}

fn parse_status(line: &str) -> Option<StatusLine> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }
    let keyboard = match fields[0] {
        "U" => KeyboardState::Unlocked,
        "L" => KeyboardState::Locked,
        "E" => KeyboardState::Error,
        _ => return None,
    };
    Some(StatusLine {
        keyboard,
        connected: fields[3].starts_with("C("),
    })
}

/// Split the text preceding `ok`/`error` into data lines and the status
/// line. The pty echoes the action back, so anything that is neither data
/// nor the trailing status line is ignored.
fn parse_reply(body: &str, ok: bool) -> Reply {
    let mut data = Vec::new();
    let mut status = None;

    for line in body.lines().map(|line| line.trim_end_matches('\r')) {
        if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else if !line.trim().is_empty() {
            status = parse_status(line);
        }
    }

    Reply { data, status, ok }
}

/// How an action appears in logs and errors. Typed text may be a password,
/// so `String(...)` never shows its argument.
fn action_label(action: &str) -> &str {
    if action.starts_with("String(") {
        "String(...)"
    } else {
        action
    }
}

fn classify_failure(action: &str, data: &[String]) -> SessionError {
    let label = action_label(action);
    let message = data.join(" ");
    let lower = message.to_lowercase();

    if lower.contains("timed out") || lower.contains("timeout") {
        SessionError::Timeout(format!("{label}: {message}"))
    } else if lower.contains("locked") {
        SessionError::KeyboardLocked(format!("{label}: {message}"))
    } else if action.starts_with("Connect(") || lower.contains("not connected") {
        SessionError::Network(format!("{label}: {message}"))
    } else {
        SessionError::Datastream(format!("{label}: {message}"))
    }
}

/// Zero-based row and column of the first occurrence of `marker`.
fn locate_marker(screen: &str, marker: &str) -> Option<(usize, usize)> {
    screen.lines().enumerate().find_map(|(row, line)| {
        line.find(marker)
            .map(|byte_index| (row, line[..byte_index].chars().count()))
    })
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ascii_reply_with_echo() {
        let body = "Ascii\r\n\
                    data:  SIMFRAME LOGON SCREEN\r\n\
                    data: \r\n\
                    data: Userid ===>\r\n\
                    U F U C(simbank) I 4 24 80 2 9 0x0 0.012\r\n";

        let reply = parse_reply(body, true);

        assert!(reply.ok);
        assert_eq!(
            reply.data,
            vec![" SIMFRAME LOGON SCREEN", "", "Userid ===>"]
        );
        assert_eq!(
            reply.status,
            Some(StatusLine {
                keyboard: KeyboardState::Unlocked,
                connected: true,
            })
        );
    }

    #[test]
    fn test_status_line_when_disconnected_and_locked() {
        assert_eq!(
            parse_status("L U U N N 4 24 80 0 0 0x0 -"),
            Some(StatusLine {
                keyboard: KeyboardState::Locked,
                connected: false,
            })
        );
        assert_eq!(parse_status("Wait(30,Unlock)"), None);
    }

    #[test]
    fn test_classify_failures() {
        let timeout = classify_failure("Wait(30,Unlock)", &["Wait timed out".to_string()]);
        assert!(matches!(timeout, SessionError::Timeout(_)));

        let locked = classify_failure("Tab", &["Keyboard locked".to_string()]);
        assert!(matches!(locked, SessionError::KeyboardLocked(_)));

        let refused = classify_failure(
            "Connect(simbank:2023)",
            &["Connection refused".to_string()],
        );
        assert!(matches!(refused, SessionError::Network(_)));

        let other = classify_failure("MoveCursor(99,0)", &["Invalid row".to_string()]);
        assert!(matches!(other, SessionError::Datastream(_)));
    }

    #[test]
    fn test_failures_hide_typed_text() {
        let locked = classify_failure("String(\"SYS1\")", &["Keyboard locked".to_string()]);
        assert!(matches!(locked, SessionError::KeyboardLocked(_)));
        assert!(!locked.to_string().contains("SYS1"));
        assert!(locked.to_string().contains("String(...)"));

        let other = classify_failure("String(\"SYS1\")", &["Field protected".to_string()]);
        assert!(!other.to_string().contains("SYS1"));

        assert_eq!(action_label("String(\"bank\")"), "String(...)");
        assert_eq!(action_label("PF(3)"), "PF(3)");
    }

    #[test]
    fn test_reply_timeout_outlasts_wait() {
        let config = TerminalConfig::default();
        assert!(reply_timeout(&config) > Duration::from_secs(config.timeout_secs));
    }

    #[test]
    fn test_locate_marker_counts_characters() {
        let screen = "SIMFRAME MAIN MENU\n  ▶ Type ===> here";
        assert_eq!(locate_marker(screen, "===>"), Some((1, 9)));
        assert_eq!(locate_marker(screen, "Password"), None);
    }

    #[test]
    fn test_quote_escapes_specials() {
        assert_eq!(quote(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(quote("bank"), "bank");
    }

    #[test]
    fn test_host_address_prefixes_tls() {
        let mut config = TerminalConfig::default();
        config.host = "simbank".to_string();
        config.port = 2023;
        assert_eq!(host_address(&config), "simbank:2023");

        config.tls = true;
        assert_eq!(host_address(&config), "L:simbank:2023");
    }
}
