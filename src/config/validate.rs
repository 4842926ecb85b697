// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{RelayError, Result};
use crate::types::parse_duration;

impl TryFrom<RawSettings> for Settings {
    type Error = crate::errors::RelayError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        let slice = parse_duration(&raw.exec.slice)
            .map_err(|e| RelayError::ConfigError(format!("[exec].slice: {e}")))?;
        Ok(Settings::new_unchecked(raw, slice))
    }
}

fn validate_raw_settings(cfg: &RawSettings) -> Result<()> {
    ensure_has_users(cfg)?;
    validate_exec(cfg)?;
    validate_menu_rows(cfg)?;
    Ok(())
}

fn ensure_has_users(cfg: &RawSettings) -> Result<()> {
    if cfg.access.enabled_users.is_empty() {
        return Err(RelayError::ConfigError(
            "[access].enabled_users must list at least one user id".to_string(),
        ));
    }
    Ok(())
}

fn validate_exec(cfg: &RawSettings) -> Result<()> {
    if cfg.exec.max_output_len == 0 {
        return Err(RelayError::ConfigError(
            "[exec].max_output_len must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.exec.out_all_prefix.is_empty() {
        return Err(RelayError::ConfigError(
            "[exec].out_all_prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_menu_rows(cfg: &RawSettings) -> Result<()> {
    for (row_idx, row) in cfg.menu.rows.iter().enumerate() {
        for key in row {
            if !cfg.shortcut.contains_key(key) {
                return Err(RelayError::ConfigError(format!(
                    "menu row {} references unknown shortcut '{}'",
                    row_idx, key
                )));
            }
        }
    }

    for (key, sc) in cfg.shortcut.iter() {
        if sc.cmd.trim().is_empty() {
            return Err(RelayError::ConfigError(format!(
                "shortcut '{}' has an empty `cmd`",
                key
            )));
        }
    }

    Ok(())
}
