use super::Service;
use crate::models::{BestResultCell, User};
use std::sync::Mutex;
use tracing::instrument;

/// Generations between two progress log lines.
pub const DEFAULT_LOG_INTERVAL: u32 = 50;

pub struct ServiceBuilder {
    pub(super) users: Vec<User>,
    pub(super) log_interval: u32,
}

impl ServiceBuilder {
    pub(super) fn new(users: Vec<User>) -> Self {
        Self {
            users,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }

    /// Appends users, e.g. synthesized ones after those read from a file.
    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users);
        self
    }

    /// Logs progress every `interval` generations. Zero disables progress lines.
    pub fn with_log_interval(mut self, interval: u32) -> Self {
        self.log_interval = interval;
        self
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[instrument(level = "debug", skip(self), fields(users_count = self.users.len(), log_interval = self.log_interval))]
    pub fn build(self) -> Service {
        Service {
            users: self.users.into(),
            best: BestResultCell::default(),
            running: Mutex::new(()),
            log_interval: self.log_interval,
        }
    }
}
