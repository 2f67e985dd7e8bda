//! Tracker secret discovery. The password never lives in the repo or
//! on the command line; it comes from the environment, a secret-store
//! command such as `pass`, or a credentials file.

use anyhow::{Context as _, Result};
use std::fs;
use std::process::Command;

const PASSWORD_VAR: &str = "WEEKREV_RT_PASSWORD";
const PASS_CMD_VAR: &str = "WEEKREV_RT_PASS_CMD";
const PASSWORD_FILE_VAR: &str = "WEEKREV_RT_PASSWORD_FILE";

pub fn discover_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_VAR) {
        return first_line(&password)
            .with_context(|| format!("{} is set but empty", PASSWORD_VAR));
    }

    if let Ok(command) = std::env::var(PASS_CMD_VAR) {
        return run_password_command(&command);
    }

    if let Ok(path) = std::env::var(PASSWORD_FILE_VAR) {
        let content =
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
        return first_line(&content).with_context(|| format!("{} is empty", path));
    }

    anyhow::bail!(
        "no tracker password configured; set {}, {} or {}",
        PASSWORD_VAR,
        PASS_CMD_VAR,
        PASSWORD_FILE_VAR
    )
}

/// Runs the configured secret-store command and takes the first stdout
/// line as the password, the convention `pass` uses. The command is
/// split on whitespace; no shell is involved.
fn run_password_command(command: &str) -> Result<String> {
    let mut parts = command.split_whitespace();
    let program = parts.next().context("password command is empty")?;

    let output = Command::new(program)
        .args(parts)
        .output()
        .with_context(|| format!("failed to execute password command '{}'", command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("password command failed: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    first_line(&stdout).with_context(|| format!("password command '{}' printed nothing", command))
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim_end)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
}
