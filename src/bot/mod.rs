// src/bot/mod.rs

//! Operator-facing boundary.
//!
//! Messages arrive as [`Incoming`] values from a transport, pass the
//! [`AccessControl`] check and are dispatched to the command runner. Replies
//! go back through the transport's [`crate::sink::Sink`].

pub mod access;
pub mod command;
pub mod dispatch;
pub mod menu;
pub mod sudo;

pub use access::{AccessControl, AllowList, CallerId};
pub use command::OperatorCommand;
pub use dispatch::{Dispatcher, Incoming, Payload};
pub use menu::{MenuButton, ShortcutMenu};
