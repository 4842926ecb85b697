// src/config/mod.rs

//! Settings loading and validation for shell-relay.
//!
//! - `model.rs` defines the TOML-backed data model.
//! - `loader.rs` reads a settings file from disk.
//! - `validate.rs` turns `RawSettings` into checked `Settings`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    AccessSection, ExecSection, MenuSection, PolicySection, RawSettings, Settings,
    ShortcutConfig,
};
