use serde::Serialize;
use shared_types::{MonitorError, SmsTransport};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Sends SMS by running an external program
///
/// `{number}` and `{message}` in the argument list are replaced before the program runs, e.g.
/// `kdeconnect-cli --send-sms {message} --destination {number}`.
pub struct CommandSmsTransport {
    program: String,
    args: Vec<String>,
}

impl CommandSmsTransport {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn render_args(&self, phone_number: &str, message: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{number}", phone_number)
                    .replace("{message}", message)
            })
            .collect()
    }
}

impl SmsTransport for CommandSmsTransport {
    fn send(&self, phone_number: &str, message: &str) -> Result<(), MonitorError> {
        let output = Command::new(&self.program)
            .args(self.render_args(phone_number, message))
            .output()
            .map_err(|e| MonitorError::Transport(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(MonitorError::Transport(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct OutboxEntry<'a> {
    phone_number: &'a str,
    message: &'a str,
    queued_at: i64,
}

/// Queues SMS as JSON lines in an outbox file for another process to deliver
pub struct OutboxSmsTransport {
    path: PathBuf,
}

impl OutboxSmsTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SmsTransport for OutboxSmsTransport {
    fn send(&self, phone_number: &str, message: &str) -> Result<(), MonitorError> {
        let entry = OutboxEntry {
            phone_number,
            message,
            queued_at: chrono::Utc::now().timestamp_millis(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|e| MonitorError::Transport(format!("failed to encode outbox entry: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MonitorError::Transport(format!("failed to create outbox dir: {}", e)))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                MonitorError::Transport(format!("failed to open {}: {}", self.path.display(), e))
            })?;

        writeln!(file, "{}", line)
            .map_err(|e| MonitorError::Transport(format!("failed to write outbox: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let transport = CommandSmsTransport::new(
            "kdeconnect-cli",
            vec![
                "--send-sms".to_string(),
                "{message}".to_string(),
                "--destination".to_string(),
                "{number}".to_string(),
            ],
        );

        assert_eq!(
            transport.render_args("+15551234567", "hi there"),
            vec!["--send-sms", "hi there", "--destination", "+15551234567"]
        );
    }

    #[test]
    fn test_missing_program_is_transport_error() {
        let transport = CommandSmsTransport::new("/nonexistent/sms-sender", vec![]);
        assert!(matches!(
            transport.send("1", "x"),
            Err(MonitorError::Transport(_))
        ));
    }

    #[test]
    fn test_outbox_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox").join("sms.jsonl");
        let transport = OutboxSmsTransport::new(&path);

        transport.send("+15551234567", "first").unwrap();
        transport.send("5550001111", "second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["phone_number"], "+15551234567");
        assert_eq!(lines[1]["message"], "second");
    }
}
