// src/exec/policy.rs

//! Command-string checks applied before anything is spawned.

use crate::config::Settings;
use crate::errors::{RelayError, Result};

/// Where a command came from; decides which checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    /// Free text typed by the operator: name and character checks.
    FreeText,
    /// `/script` arguments: character check only.
    Script,
    /// Configured shortcuts and builtins: no checks.
    Trusted,
}

/// A command that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    pub command: String,
    /// Emit-everything mode: no emission cap for this run.
    pub out_all: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CommandPolicy {
    out_all_prefix: String,
    white_list: Vec<String>,
    black_list: Vec<String>,
    black_chars: Vec<String>,
}

impl CommandPolicy {
    pub fn new(
        out_all_prefix: impl Into<String>,
        white_list: Vec<String>,
        black_list: Vec<String>,
        black_chars: Vec<String>,
    ) -> Self {
        Self {
            out_all_prefix: out_all_prefix.into(),
            white_list: white_list.into_iter().map(|s| s.to_lowercase()).collect(),
            black_list: black_list.into_iter().map(|s| s.to_lowercase()).collect(),
            black_chars: black_chars.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.exec.out_all_prefix.clone(),
            settings.policy.white_list.clone(),
            settings.policy.black_list.clone(),
            settings.policy.black_chars.clone(),
        )
    }

    /// Strip the emit-everything prefix and apply the checks for `origin`.
    pub fn validate(&self, raw: &str, origin: CommandOrigin) -> Result<ValidatedCommand> {
        let (command, out_all) = self.split_out_all(raw);

        match origin {
            CommandOrigin::FreeText => {
                self.check_name(command)?;
                self.check_chars(command)?;
            }
            CommandOrigin::Script => self.check_chars(command)?,
            CommandOrigin::Trusted => {}
        }

        Ok(ValidatedCommand {
            command: command.to_string(),
            out_all,
        })
    }

    fn split_out_all<'a>(&self, raw: &'a str) -> (&'a str, bool) {
        if self.out_all_prefix.is_empty() {
            return (raw, false);
        }
        match raw.strip_prefix(self.out_all_prefix.as_str()) {
            Some(rest) => (rest, true),
            None => (raw, false),
        }
    }

    fn check_chars(&self, command: &str) -> Result<()> {
        if self.black_chars.iter().any(|c| command.contains(c.as_str())) {
            return Err(RelayError::IllegalCommand);
        }
        Ok(())
    }

    /// First word, ignoring a leading `sudo`, against the name lists.
    fn check_name(&self, command: &str) -> Result<()> {
        let lowered = command.to_lowercase();
        let mut words = lowered.split_whitespace();
        let name = match words.next() {
            Some("sudo") => words.next().unwrap_or(""),
            Some(first) => first,
            None => "",
        };

        if !self.white_list.is_empty() && !self.white_list.iter().any(|w| w == name) {
            return Err(RelayError::IllegalCommand);
        }
        if self.black_list.iter().any(|b| b == name) {
            return Err(RelayError::IllegalCommand);
        }
        Ok(())
    }
}
