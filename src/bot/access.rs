// src/bot/access.rs

use std::collections::HashSet;

/// Identifier of the operator a message came from.
pub type CallerId = i64;

/// Capability check consulted before any request is dispatched.
pub trait AccessControl: Send + Sync {
    fn is_authorized(&self, caller: CallerId) -> bool;
}

/// Fixed allow-list from `[access].enabled_users`.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    users: HashSet<CallerId>,
}

impl AllowList {
    pub fn new(users: impl IntoIterator<Item = CallerId>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }
}

impl AccessControl for AllowList {
    fn is_authorized(&self, caller: CallerId) -> bool {
        self.users.contains(&caller)
    }
}
