// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level settings as read from a TOML file.
///
/// ```toml
/// [access]
/// enabled_users = [123456789]
///
/// [exec]
/// scripts_root = "./scripts"
/// max_output_len = 4096
/// slice = "1s"
/// emission_cap = 3
///
/// [policy]
/// black_chars = [";", "&&"]
///
/// [menu]
/// rows = [["uptime", "disk"]]
///
/// [shortcut.uptime]
/// label = "Uptime"
/// cmd = "uptime"
/// ```
///
/// All sections except `[access]` are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSettings {
    pub access: AccessSection,

    #[serde(default)]
    pub exec: ExecSection,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub menu: MenuSection,

    /// Shortcut commands keyed by the callback key used in `menu.rows`.
    #[serde(default)]
    pub shortcut: BTreeMap<String, ShortcutConfig>,
}

/// Validated settings.
///
/// Construct via `Settings::try_from(RawSettings)` (see `validate.rs`) so that
/// menu references and numeric limits are checked and `exec.slice` is parsed.
#[derive(Debug, Clone)]
pub struct Settings {
    pub access: AccessSection,
    pub exec: ExecSection,
    pub policy: PolicySection,
    pub menu: MenuSection,
    pub shortcut: BTreeMap<String, ShortcutConfig>,
    slice: Duration,
}

impl Settings {
    pub(crate) fn new_unchecked(raw: RawSettings, slice: Duration) -> Self {
        Self {
            access: raw.access,
            exec: raw.exec,
            policy: raw.policy,
            menu: raw.menu,
            shortcut: raw.shortcut,
            slice,
        }
    }

    /// Parsed `exec.slice`.
    pub fn slice(&self) -> Duration {
        self.slice
    }
}

/// `[access]` section: the caller allow-list.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AccessSection {
    #[serde(default)]
    pub enabled_users: Vec<i64>,
}

/// `[exec]` section: how commands are run and how their output is sliced.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecSection {
    /// Root directory `/script` arguments are resolved against.
    #[serde(default = "default_scripts_root")]
    pub scripts_root: PathBuf,

    /// Maximum length in bytes of a single message sent to the operator.
    #[serde(default = "default_max_output_len")]
    pub max_output_len: usize,

    /// Time window output is accumulated for before it is sent.
    #[serde(default = "default_slice")]
    pub slice: String,

    /// Number of sliced messages after which the drain detaches from a
    /// still-running command.
    #[serde(default = "default_emission_cap")]
    pub emission_cap: usize,

    /// Prefix that lifts the emission cap for one command.
    #[serde(default = "default_out_all_prefix")]
    pub out_all_prefix: String,
}

fn default_scripts_root() -> PathBuf {
    PathBuf::from("./scripts")
}

fn default_max_output_len() -> usize {
    4096
}

fn default_slice() -> String {
    "1s".to_string()
}

fn default_emission_cap() -> usize {
    3
}

fn default_out_all_prefix() -> String {
    "oa;".to_string()
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            scripts_root: default_scripts_root(),
            max_output_len: default_max_output_len(),
            slice: default_slice(),
            emission_cap: default_emission_cap(),
            out_all_prefix: default_out_all_prefix(),
        }
    }
}

/// `[policy]` section: command-string checks applied before spawning.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PolicySection {
    /// If non-empty, only these command names may run as free text.
    #[serde(default)]
    pub white_list: Vec<String>,

    /// Command names that may never run as free text.
    #[serde(default)]
    pub black_list: Vec<String>,

    /// Substrings that make any free-text or script command illegal.
    #[serde(default)]
    pub black_chars: Vec<String>,
}

/// `[menu]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MenuSection {
    /// Accept only shortcuts and the builtin slash commands.
    #[serde(default)]
    pub only_shortcuts: bool,

    /// Keyboard layout: each row lists shortcut keys.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// `[shortcut.<key>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortcutConfig {
    /// Button text.
    pub label: String,

    /// The command to run when pressed.
    pub cmd: String,

    /// Resolve `cmd` against `exec.scripts_root`.
    #[serde(default)]
    pub script: bool,
}
