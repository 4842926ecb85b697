// src/bot/dispatch.rs

//! Maps authorized operator messages onto runner operations.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bot::access::{AccessControl, CallerId};
use crate::bot::command::OperatorCommand;
use crate::bot::menu::{ShortcutMenu, help_text};
use crate::bot::sudo::sudo_login;
use crate::errors::RelayError;
use crate::exec::{CommandOrigin, CommandRunner};
use crate::scripts::ScriptCatalog;
use crate::sink::Sink;
use crate::types::OutputChunk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A typed message.
    Text(String),
    /// A pressed shortcut button, carrying its key.
    Shortcut(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub caller: CallerId,
    pub payload: Payload,
}

impl Incoming {
    pub fn text(caller: CallerId, text: impl Into<String>) -> Self {
        Self {
            caller,
            payload: Payload::Text(text.into()),
        }
    }

    pub fn shortcut(caller: CallerId, key: impl Into<String>) -> Self {
        Self {
            caller,
            payload: Payload::Shortcut(key.into()),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    runner: CommandRunner,
    access: Arc<dyn AccessControl>,
    catalog: Arc<dyn ScriptCatalog>,
    menu: Arc<ShortcutMenu>,
    only_shortcuts: bool,
}

impl Dispatcher {
    pub fn new(
        runner: CommandRunner,
        access: Arc<dyn AccessControl>,
        catalog: Arc<dyn ScriptCatalog>,
        menu: ShortcutMenu,
        only_shortcuts: bool,
    ) -> Self {
        Self {
            runner,
            access,
            catalog,
            menu: Arc::new(menu),
            only_shortcuts,
        }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Handle one message. Unauthorized callers are logged and dropped
    /// without a reply.
    pub async fn handle(&self, incoming: Incoming, sink: &dyn Sink) {
        if !self.access.is_authorized(incoming.caller) {
            warn!(caller = incoming.caller, "unauthorized access denied");
            return;
        }

        match incoming.payload {
            Payload::Text(text) => self.handle_text(&text, sink).await,
            Payload::Shortcut(key) => self.handle_shortcut(&key, sink).await,
        }
    }

    async fn handle_text(&self, text: &str, sink: &dyn Sink) {
        let command = OperatorCommand::parse(text);

        if self.only_shortcuts && command.needs_free_commands() {
            debug!("free commands disabled; ignoring message");
            return;
        }

        match command {
            OperatorCommand::Start | OperatorCommand::Help => {
                let mut msg = help_text();
                let menu = self.menu.render();
                if !menu.is_empty() {
                    msg.push_str("\r\n");
                    msg.push_str(&menu);
                }
                self.reply(sink, msg).await;
            }
            OperatorCommand::Tasks => {
                let listing = self.runner.registry().list().render();
                self.reply(sink, listing).await;
            }
            OperatorCommand::Kill(None) => {
                self.reply(sink, "Usage: /kill pid".to_string()).await;
            }
            OperatorCommand::Kill(Some(id)) => {
                let msg = match self.runner.kill(&id) {
                    Ok(cmd) => format!("killed: {cmd}"),
                    Err(e) => e.to_string(),
                };
                self.reply(sink, msg).await;
            }
            OperatorCommand::SudoLogin(None) => {
                self.reply(sink, "Usage: /sudo_login password".to_string())
                    .await;
            }
            OperatorCommand::SudoLogin(Some(password)) => {
                let msg = match sudo_login(&password).await {
                    Ok(true) => "sudo succeeded.",
                    Ok(false) => "sudo failed.",
                    Err(e) => {
                        warn!(error = %e, "sudo login could not run");
                        "sudo failed."
                    }
                };
                self.reply(sink, msg.to_string()).await;
            }
            OperatorCommand::Script(args) if args.is_empty() => {
                self.reply(sink, self.script_usage()).await;
            }
            OperatorCommand::Script(args) => {
                self.runner
                    .execute(&args.join(" "), CommandOrigin::Script, true, sink)
                    .await;
            }
            OperatorCommand::Pwd => {
                let msg = format!("pwd: {}", self.runner.working_directory().display());
                self.reply(sink, msg).await;
            }
            OperatorCommand::Ls => {
                self.runner
                    .execute("ls", CommandOrigin::Trusted, false, sink)
                    .await;
            }
            OperatorCommand::ChangeDir(path) => {
                let msg = match self.runner.change_directory(&path) {
                    Ok(dir) => format!("pwd: {}", dir.display()),
                    Err(e) => e.to_string(),
                };
                self.reply(sink, msg).await;
            }
            OperatorCommand::Shell(cmd) => {
                self.runner
                    .execute(&cmd, CommandOrigin::FreeText, false, sink)
                    .await;
            }
        }
    }

    async fn handle_shortcut(&self, key: &str, sink: &dyn Sink) {
        let Some(shortcut) = self.menu.lookup(key) else {
            warn!(key, "unknown shortcut pressed");
            self.reply(sink, RelayError::IllegalCommand.to_string())
                .await;
            return;
        };

        self.runner
            .execute(&shortcut.cmd, CommandOrigin::Trusted, shortcut.script, sink)
            .await;
    }

    fn script_usage(&self) -> String {
        let root = &self.runner.options().scripts_root;
        let mut msg = "Usage: /script script_name args".to_string();
        match self.catalog.list_scripts(root) {
            Ok(scripts) => {
                for script in scripts {
                    msg.push_str("\r\n");
                    msg.push_str(&script);
                }
            }
            Err(e) => warn!(root = %root.display(), error = %e, "listing scripts failed"),
        }
        msg
    }

    async fn reply(&self, sink: &dyn Sink, text: String) {
        let chunk = OutputChunk::new(text, self.runner.options().max_output_len);
        sink.emit(chunk.into_string()).await;
    }
}
