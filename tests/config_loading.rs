// tests/config_loading.rs
mod common;
use crate::common::{init_tracing, TestResult};

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use shell_relay::config::load_and_validate;
use shell_relay::errors::RelayError;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[access]
enabled_users = [42]
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.access.enabled_users, vec![42]);
    assert_eq!(cfg.exec.scripts_root, PathBuf::from("./scripts"));
    assert_eq!(cfg.exec.max_output_len, 4096);
    assert_eq!(cfg.slice(), Duration::from_secs(1));
    assert_eq!(cfg.exec.emission_cap, 3);
    assert_eq!(cfg.exec.out_all_prefix, "oa;");
    assert!(cfg.policy.white_list.is_empty());
    assert!(cfg.policy.black_chars.is_empty());
    assert!(!cfg.menu.only_shortcuts);
    assert!(cfg.shortcut.is_empty());

    Ok(())
}

#[test]
fn full_config_is_parsed() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[access]
enabled_users = [1, 2]

[exec]
scripts_root = "/opt/relay/scripts"
max_output_len = 1000
slice = "250ms"
emission_cap = 5
out_all_prefix = "all:"

[policy]
white_list = ["ls", "uptime"]
black_list = ["rm"]
black_chars = [";", "&&"]

[menu]
only_shortcuts = true
rows = [["uptime", "disk"], ["backup"]]

[shortcut.uptime]
label = "Uptime"
cmd = "uptime"

[shortcut.disk]
label = "Disk"
cmd = "df -h"

[shortcut.backup]
label = "Backup"
cmd = "backup.sh"
script = true
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.exec.scripts_root, PathBuf::from("/opt/relay/scripts"));
    assert_eq!(cfg.exec.max_output_len, 1000);
    assert_eq!(cfg.slice(), Duration::from_millis(250));
    assert_eq!(cfg.exec.emission_cap, 5);
    assert_eq!(cfg.exec.out_all_prefix, "all:");
    assert_eq!(cfg.policy.black_chars, vec![";".to_string(), "&&".to_string()]);
    assert!(cfg.menu.only_shortcuts);
    assert_eq!(cfg.menu.rows.len(), 2);

    let backup = cfg.shortcut.get("backup").expect("backup shortcut must exist");
    assert!(backup.script);
    assert_eq!(backup.cmd, "backup.sh");
    assert!(!cfg.shortcut["disk"].script);

    Ok(())
}

#[test]
fn empty_allow_list_is_rejected() {
    let file = write_config(
        r#"
[access]
enabled_users = []
"#,
    );

    match load_and_validate(file.path()) {
        Err(RelayError::ConfigError(msg)) => assert!(msg.contains("enabled_users")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn menu_row_with_unknown_shortcut_is_rejected() {
    let file = write_config(
        r#"
[access]
enabled_users = [1]

[menu]
rows = [["missing"]]
"#,
    );

    match load_and_validate(file.path()) {
        Err(RelayError::ConfigError(msg)) => assert!(msg.contains("missing")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn bad_slice_duration_is_rejected() {
    let file = write_config(
        r#"
[access]
enabled_users = [1]

[exec]
slice = "10 parsecs"
"#,
    );

    match load_and_validate(file.path()) {
        Err(RelayError::ConfigError(msg)) => assert!(msg.contains("slice")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn zero_output_length_is_rejected() {
    let file = write_config(
        r#"
[access]
enabled_users = [1]

[exec]
max_output_len = 0
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(RelayError::ConfigError(_))
    ));
}

#[test]
fn missing_access_section_is_a_toml_error() {
    let file = write_config(
        r#"
[exec]
slice = "1s"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(RelayError::TomlError(_))
    ));
}

#[test]
fn overflowing_slice_is_rejected() {
    let file = write_config(
        r#"
[access]
enabled_users = [1]

[exec]
slice = "99999999999999999h"
"#,
    );

    match load_and_validate(file.path()) {
        Err(RelayError::ConfigError(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}
