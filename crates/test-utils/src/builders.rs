#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use shell_relay::config::{
    AccessSection, ExecSection, MenuSection, PolicySection, RawSettings, Settings, ShortcutConfig,
};

/// Builder for `Settings` to simplify test setup.
///
/// Starts from the defaults with a single allowed user (`1`) and a short
/// slice so tests that cross slice boundaries stay fast.
pub struct SettingsBuilder {
    settings: RawSettings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: RawSettings {
                access: AccessSection {
                    enabled_users: vec![1],
                },
                exec: ExecSection {
                    slice: "100ms".to_string(),
                    ..ExecSection::default()
                },
                policy: PolicySection::default(),
                menu: MenuSection::default(),
                shortcut: BTreeMap::new(),
            },
        }
    }

    pub fn with_user(mut self, id: i64) -> Self {
        self.settings.access.enabled_users.push(id);
        self
    }

    pub fn slice(mut self, slice: &str) -> Self {
        self.settings.exec.slice = slice.to_string();
        self
    }

    pub fn max_output_len(mut self, len: usize) -> Self {
        self.settings.exec.max_output_len = len;
        self
    }

    pub fn emission_cap(mut self, cap: usize) -> Self {
        self.settings.exec.emission_cap = cap;
        self
    }

    pub fn scripts_root(mut self, root: impl AsRef<Path>) -> Self {
        self.settings.exec.scripts_root = root.as_ref().to_path_buf();
        self
    }

    pub fn white_list(mut self, name: &str) -> Self {
        self.settings.policy.white_list.push(name.to_string());
        self
    }

    pub fn black_list(mut self, name: &str) -> Self {
        self.settings.policy.black_list.push(name.to_string());
        self
    }

    pub fn black_char(mut self, chars: &str) -> Self {
        self.settings.policy.black_chars.push(chars.to_string());
        self
    }

    pub fn only_shortcuts(mut self, val: bool) -> Self {
        self.settings.menu.only_shortcuts = val;
        self
    }

    /// Add a shortcut and place it on its own menu row.
    pub fn shortcut(mut self, key: &str, label: &str, cmd: &str, script: bool) -> Self {
        self.settings.shortcut.insert(
            key.to_string(),
            ShortcutConfig {
                label: label.to_string(),
                cmd: cmd.to_string(),
                script,
            },
        );
        self.settings.menu.rows.push(vec![key.to_string()]);
        self
    }

    pub fn raw(self) -> RawSettings {
        self.settings
    }

    pub fn build(self) -> Settings {
        Settings::try_from(self.settings).expect("Failed to build valid settings from builder")
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
