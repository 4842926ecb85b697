// src/bot/command.rs

//! Parsing of operator text into requests.

/// One operator request, as parsed from message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Start,
    Help,
    Tasks,
    /// `/kill <id>`; `None` when the id is missing.
    Kill(Option<String>),
    /// `/sudo_login <password>`; `None` when the password is missing.
    SudoLogin(Option<String>),
    /// `/script [name args...]`.
    Script(Vec<String>),
    Pwd,
    Ls,
    /// `cd <path>`.
    ChangeDir(String),
    /// Anything else runs as a shell command.
    Shell(String),
}

impl OperatorCommand {
    pub fn parse(text: &str) -> Self {
        if let Some(path) = text.strip_prefix("cd ") {
            return OperatorCommand::ChangeDir(path.trim().to_string());
        }

        let Some(rest) = text.strip_prefix('/') else {
            return OperatorCommand::Shell(text.to_string());
        };

        let mut words = rest.split_whitespace();
        let head = words.next().unwrap_or("");
        // Group chats address commands as `/kill@relay_bot`.
        let name = head.split('@').next().unwrap_or(head);
        let args: Vec<String> = words.map(str::to_string).collect();

        match name {
            "start" => OperatorCommand::Start,
            "help" => OperatorCommand::Help,
            "tasks" => OperatorCommand::Tasks,
            "kill" => OperatorCommand::Kill(args.into_iter().next()),
            "sudo_login" => OperatorCommand::SudoLogin(args.into_iter().next()),
            "script" => OperatorCommand::Script(args),
            "pwd" => OperatorCommand::Pwd,
            "ls" => OperatorCommand::Ls,
            _ => OperatorCommand::Shell(text.to_string()),
        }
    }

    /// Requests that are disabled in only-shortcuts mode.
    pub fn needs_free_commands(&self) -> bool {
        matches!(
            self,
            OperatorCommand::SudoLogin(_)
                | OperatorCommand::Script(_)
                | OperatorCommand::ChangeDir(_)
                | OperatorCommand::Shell(_)
        )
    }
}
