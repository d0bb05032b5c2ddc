//! Clipboard sinks for the copy action.
//!
//! Copying never touches store state; a failure is only reported.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard tools not available (tried {0})")]
    Unavailable(String),

    #[error("Clipboard command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into the first clipboard tool that runs successfully.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<Vec<String>>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SystemClipboard {
    /// `preferred` is a whitespace-separated command line tried before the
    /// defaults: Wayland, then X11, then macOS, then Windows tools.
    pub fn new(preferred: Option<&str>) -> Self {
        let mut commands: Vec<Vec<String>> = Vec::new();

        if let Some(line) = preferred {
            let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
            if !parts.is_empty() {
                commands.push(parts);
            }
        }

        commands.push(argv(&["wl-copy"]));
        commands.push(argv(&["xclip", "-selection", "clipboard"]));
        commands.push(argv(&["xsel", "--clipboard", "--input"]));
        commands.push(argv(&["pbcopy"]));
        commands.push(argv(&["clip"]));

        Self { commands }
    }

    fn run(argv: &[String], text: &str) -> Result<(), ClipboardError> {
        let failed = |reason: String| ClipboardError::CommandFailed {
            command: argv.join(" "),
            reason,
        };

        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        // stdin is dropped before waiting so the tool sees end of input
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        written.map_err(|e| failed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(failed(format!("exited with {status}")))
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_failure = None;

        for argv in &self.commands {
            match Self::run(argv, text) {
                Ok(()) => {
                    debug!(command = %argv.join(" "), bytes = text.len(), "copied to clipboard");
                    return Ok(());
                }
                Err(e) => {
                    debug!(error = %e, "clipboard command failed");
                    last_failure = Some(e);
                }
            }
        }

        let tried = self
            .commands
            .iter()
            .map(|argv| argv[0].as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(match last_failure {
            Some(e @ ClipboardError::CommandFailed { .. }) if self.commands.len() == 1 => e,
            _ => ClipboardError::Unavailable(tried),
        })
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Keeps copied text in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copied.push(text.to_string());
        Ok(())
    }
}
