//! Clipboard and browser access through platform commands.

use log::{debug, warn};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use taskbox_core::{Browser, Clipboard, ClipboardError, ClipboardReply, ShareError};
use url::Url;

fn default_clipboard_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["pbcopy"]
    } else if cfg!(target_os = "windows") {
        &["clip"]
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        &["wl-copy"]
    } else {
        &["xclip", "-selection", "clipboard"]
    };
    argv.iter().map(|arg| arg.to_string()).collect()
}

fn default_browser_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", ""]
    } else {
        &["xdg-open"]
    };
    argv.iter().map(|arg| arg.to_string()).collect()
}

/// Pipes text into a clipboard program on a worker thread.
pub struct CommandClipboard {
    argv: Vec<String>,
}

impl CommandClipboard {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv: argv
                .filter(|argv| !argv.is_empty())
                .unwrap_or_else(default_clipboard_command),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: String, reply: ClipboardReply) {
        let argv = self.argv.clone();
        debug!(
            "event=clipboard_write module=cli status=start request_id={} program={}",
            reply.request_id(),
            argv[0]
        );
        thread::spawn(move || reply.complete(pipe_to_program(&argv, &text)));
    }
}

fn pipe_to_program(argv: &[String], text: &str) -> Result<(), ClipboardError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ClipboardError("no clipboard command configured".to_string()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| ClipboardError(format!("failed to start `{program}`: {err}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|err| ClipboardError(format!("failed to write to `{program}`: {err}")))?;
    }

    let status = child
        .wait()
        .map_err(|err| ClipboardError(format!("failed to wait for `{program}`: {err}")))?;
    if !status.success() {
        return Err(ClipboardError(format!("`{program}` exited with {status}")));
    }
    Ok(())
}

/// Hands links to the desktop's default browser.
pub struct CommandBrowser {
    argv: Vec<String>,
}

impl CommandBrowser {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv: argv
                .filter(|argv| !argv.is_empty())
                .unwrap_or_else(default_browser_command),
        }
    }
}

impl Browser for CommandBrowser {
    fn open_link(&mut self, link: &Url) -> Result<(), ShareError> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| ShareError::Browser("no browser command configured".to_string()))?;

        let child = Command::new(program)
            .args(args)
            .arg(link.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| ShareError::Browser(format!("failed to start `{program}`: {err}")))?;

        let program = program.clone();
        thread::spawn(move || reap_launcher(&program, child));
        Ok(())
    }
}

/// Waits for a launcher so it never lingers as a zombie.
fn reap_launcher(program: &str, mut child: Child) -> bool {
    match child.wait() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!("event=share_link module=cli status=error program={program} exit={status}");
            false
        }
        Err(err) => {
            warn!("event=share_link module=cli status=error program={program} error={err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{pipe_to_program, reap_launcher, CommandClipboard};
    use std::process::{Command, Stdio};

    #[test]
    fn empty_override_falls_back_to_platform_default() {
        let clipboard = CommandClipboard::new(Some(Vec::new()));
        assert!(!clipboard.argv.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn launcher_is_reaped_with_its_exit_status() {
        let spawn = |program: &str| {
            Command::new(program)
                .stdout(Stdio::null())
                .spawn()
                .unwrap()
        };

        assert!(reap_launcher("true", spawn("true")));
        assert!(!reap_launcher("false", spawn("false")));
    }

    #[test]
    fn missing_program_reports_error() {
        let err = pipe_to_program(&["taskbox-no-such-clipboard".to_string()], "x").unwrap_err();
        assert!(err.0.contains("failed to start"));
    }
}
