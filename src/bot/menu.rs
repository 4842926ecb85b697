// src/bot/menu.rs

//! Shortcut keyboard shown by `/start`.

use std::collections::BTreeMap;

use crate::config::{Settings, ShortcutConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    /// Callback key delivered when the button is pressed.
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct ShortcutMenu {
    rows: Vec<Vec<MenuButton>>,
    shortcuts: BTreeMap<String, ShortcutConfig>,
}

impl ShortcutMenu {
    pub fn from_settings(settings: &Settings) -> Self {
        let rows = settings
            .menu
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|key| {
                        settings.shortcut.get(key).map(|sc| MenuButton {
                            label: sc.label.clone(),
                            key: key.clone(),
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            shortcuts: settings.shortcut.clone(),
        }
    }

    pub fn rows(&self) -> &[Vec<MenuButton>] {
        &self.rows
    }

    pub fn lookup(&self, key: &str) -> Option<&ShortcutConfig> {
        self.shortcuts.get(key)
    }

    /// Text rendering: one line per row, `[label] !key` per button.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| format!("[{}] !{}", b.label, b.key))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

pub fn help_text() -> String {
    [
        "Any inputs will be called as a shell command.",
        "Supported commands:",
        "/script to run scripts in ./scripts directory",
        "/tasks to show all running tasks",
        "/sudo_login to call sudo",
        "/kill to kill a running task",
        "/pwd to show the working directory",
        "/ls to list the working directory",
        "Shortcut:",
    ]
    .join("\r\n")
}
